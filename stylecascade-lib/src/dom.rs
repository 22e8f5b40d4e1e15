use crate::MAX_NODE_DEPTH;

/// Read access to the object tree being styled. Implement this for your UI layer.
pub trait ObjectAdapter {
    type Handle: Copy + Eq;

    /// Parent object if any.
    fn parent(&self, object: Self::Handle) -> Option<Self::Handle>;

    /// Type name of the object, matched by bare selector identifiers.
    fn name(&self, object: Self::Handle) -> Option<&str>;

    fn id(&self, object: Self::Handle) -> Option<&str>;

    /// Class names in declaration order.
    fn classes(&self, object: Self::Handle) -> &[String];

    /// Active pseudo-classes such as `hover` or `focus`.
    fn pseudo_classes(&self, object: Self::Handle) -> &[String];

    /// Root-to-target path, target included. Only the nearest
    /// [`MAX_NODE_DEPTH`] objects are kept for very deep trees.
    fn ancestor_path(&self, object: Self::Handle) -> Vec<Self::Handle> {
        let mut path = vec![object];
        let mut current = object;
        while let Some(parent) = self.parent(current) {
            if path.len() == MAX_NODE_DEPTH {
                log::warn!(
                    "ancestor path deeper than {} objects, outer ancestors ignored",
                    MAX_NODE_DEPTH
                );
                break;
            }
            path.push(parent);
            current = parent;
        }
        path.reverse();
        path
    }
}

pub mod object_tree {
    use super::ObjectAdapter;

    /// Index of an object inside its [`ObjectTree`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct ObjectId(usize);

    #[derive(Debug, Clone, Default, PartialEq, Eq)]
    pub struct ObjectData {
        pub name: Option<String>,
        pub id: Option<String>,
        pub classes: Vec<String>,
        pub pseudo_classes: Vec<String>,
    }

    impl ObjectData {
        pub fn new(name: &str) -> Self {
            ObjectData {
                name: Some(name.to_string()),
                ..ObjectData::default()
            }
        }

        /// Builds an object from compound text like `button#ok.primary.wide:hover`.
        /// Unlike selectors, any number of classes and pseudo-classes is accepted.
        /// Returns `None` on characters outside `[A-Za-z0-9_-.#:]`, on a prefix
        /// with no identifier after it, on a second id, and on empty text.
        pub fn from_compound(text: &str) -> Option<Self> {
            let mut data = ObjectData::default();
            let mut prefix = None;
            let mut buffer = String::new();

            for ch in text.chars() {
                if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' {
                    buffer.push(ch);
                    continue;
                }
                if !matches!(ch, '#' | '.' | ':') {
                    return None;
                }
                if prefix.is_some() || !buffer.is_empty() {
                    data.save(prefix, std::mem::take(&mut buffer))?;
                }
                prefix = Some(ch);
            }
            if prefix.is_some() || !buffer.is_empty() {
                data.save(prefix, buffer)?;
            }
            if data == ObjectData::default() {
                return None;
            }
            Some(data)
        }

        /// A bare name can only come first, so only the id can repeat.
        fn save(&mut self, prefix: Option<char>, value: String) -> Option<()> {
            if value.is_empty() {
                return None;
            }
            match prefix {
                None => self.name = Some(value),
                Some('#') if self.id.is_some() => return None,
                Some('#') => self.id = Some(value),
                Some('.') => self.classes.push(value),
                Some(_) => self.pseudo_classes.push(value),
            }
            Some(())
        }
    }

    #[derive(Debug, Clone)]
    struct Entry {
        parent: Option<ObjectId>,
        children: Vec<ObjectId>,
        data: ObjectData,
    }

    /// Arena-backed object tree.
    #[derive(Debug, Clone, Default)]
    pub struct ObjectTree {
        entries: Vec<Entry>,
    }

    impl ObjectTree {
        pub fn new() -> Self {
            ObjectTree::default()
        }

        pub fn len(&self) -> usize {
            self.entries.len()
        }

        pub fn is_empty(&self) -> bool {
            self.entries.is_empty()
        }

        pub fn add_root(&mut self, data: ObjectData) -> ObjectId {
            self.push(None, data)
        }

        pub fn append_child(&mut self, parent: ObjectId, data: ObjectData) -> ObjectId {
            let child = self.push(Some(parent), data);
            self.entries[parent.0].children.push(child);
            child
        }

        /// Appends a chain of objects, each the child of the previous one, and
        /// returns their handles in order.
        pub fn append_path(&mut self, parent: Option<ObjectId>, chain: Vec<ObjectData>) -> Vec<ObjectId> {
            let mut handles = Vec::with_capacity(chain.len());
            let mut current = parent;
            for data in chain {
                let handle = match current {
                    Some(parent) => self.append_child(parent, data),
                    None => self.add_root(data),
                };
                handles.push(handle);
                current = Some(handle);
            }
            handles
        }

        fn push(&mut self, parent: Option<ObjectId>, data: ObjectData) -> ObjectId {
            let handle = ObjectId(self.entries.len());
            self.entries.push(Entry {
                parent,
                children: Vec::new(),
                data,
            });
            handle
        }

        pub fn get(&self, object: ObjectId) -> &ObjectData {
            &self.entries[object.0].data
        }

        pub fn children(&self, object: ObjectId) -> &[ObjectId] {
            &self.entries[object.0].children
        }

        /// Every handle, parents before children.
        pub fn handles(&self) -> impl Iterator<Item = ObjectId> {
            (0..self.entries.len()).map(ObjectId)
        }

        pub fn set_id(&mut self, object: ObjectId, id: &str) {
            self.entries[object.0].data.id = Some(id.to_string());
        }

        pub fn add_class(&mut self, object: ObjectId, class: &str) {
            let classes = &mut self.entries[object.0].data.classes;
            if !classes.iter().any(|c| c == class) {
                classes.push(class.to_string());
            }
        }

        pub fn add_pseudo_class(&mut self, object: ObjectId, pseudo_class: &str) {
            let pseudo_classes = &mut self.entries[object.0].data.pseudo_classes;
            if !pseudo_classes.iter().any(|p| p == pseudo_class) {
                pseudo_classes.push(pseudo_class.to_string());
            }
        }

        pub fn remove_pseudo_class(&mut self, object: ObjectId, pseudo_class: &str) {
            self.entries[object.0]
                .data
                .pseudo_classes
                .retain(|p| p != pseudo_class);
        }
    }

    impl ObjectAdapter for ObjectTree {
        type Handle = ObjectId;

        fn parent(&self, object: ObjectId) -> Option<ObjectId> {
            self.entries[object.0].parent
        }

        fn name(&self, object: ObjectId) -> Option<&str> {
            self.get(object).name.as_deref()
        }

        fn id(&self, object: ObjectId) -> Option<&str> {
            self.get(object).id.as_deref()
        }

        fn classes(&self, object: ObjectId) -> &[String] {
            &self.get(object).classes
        }

        fn pseudo_classes(&self, object: ObjectId) -> &[String] {
            &self.get(object).pseudo_classes
        }
    }
}

#[cfg(test)]
mod tests {
    use super::object_tree::*;
    use super::*;

    #[test]
    fn test_compound_object_text() {
        let data = ObjectData::from_compound("button#ok.primary.wide:hover").unwrap();
        assert_eq!(data.name.as_deref(), Some("button"));
        assert_eq!(data.id.as_deref(), Some("ok"));
        assert_eq!(data.classes, vec!["primary".to_string(), "wide".to_string()]);
        assert_eq!(data.pseudo_classes, vec!["hover".to_string()]);

        let anonymous = ObjectData::from_compound(".x").unwrap();
        assert_eq!(anonymous.name, None);
        assert!(ObjectData::from_compound("a>b").is_none());
    }

    #[test]
    fn test_compound_object_text_rejects_malformed() {
        assert!(ObjectData::from_compound("a#").is_none());
        assert!(ObjectData::from_compound("a..b").is_none());
        assert!(ObjectData::from_compound(":").is_none());
        assert!(ObjectData::from_compound("#a#b").is_none());
        assert!(ObjectData::from_compound("").is_none());
        assert!(ObjectData::from_compound("a\0b").is_none());
    }

    #[test]
    fn test_set_id_and_add_class() {
        let mut tree = ObjectTree::new();
        let label = tree.add_root(ObjectData::new("label"));
        assert_eq!(tree.id(label), None);

        tree.set_id(label, "title");
        tree.add_class(label, "big");
        tree.add_class(label, "big");
        tree.add_class(label, "bold");
        assert_eq!(tree.id(label), Some("title"));
        assert_eq!(tree.classes(label), &["big".to_string(), "bold".to_string()]);
    }

    #[test]
    fn test_ancestor_path_is_root_first() {
        let mut tree = ObjectTree::new();
        let handles = tree.append_path(
            None,
            vec![ObjectData::new("root"), ObjectData::new("mid"), ObjectData::new("leaf")],
        );
        assert_eq!(tree.ancestor_path(handles[2]), handles);
        assert_eq!(tree.ancestor_path(handles[0]), vec![handles[0]]);
        assert_eq!(tree.children(handles[0]), &[handles[1]]);
    }

    #[test]
    fn test_deep_paths_keep_nearest_objects() {
        let mut tree = ObjectTree::new();
        let chain = (0..MAX_NODE_DEPTH + 8)
            .map(|i| ObjectData::new(&format!("n{}", i)))
            .collect();
        let handles = tree.append_path(None, chain);
        let target = *handles.last().unwrap();
        let path = tree.ancestor_path(target);
        assert_eq!(path.len(), MAX_NODE_DEPTH);
        assert_eq!(path.last(), Some(&target));
        assert_eq!(path[0], handles[8]);
    }

    #[test]
    fn test_pseudo_class_toggle() {
        let mut tree = ObjectTree::new();
        let button = tree.add_root(ObjectData::new("button"));
        tree.add_pseudo_class(button, "hover");
        tree.add_pseudo_class(button, "hover");
        assert_eq!(tree.pseudo_classes(button), &["hover".to_string()]);
        tree.remove_pseudo_class(button, "hover");
        assert!(tree.pseudo_classes(button).is_empty());
    }
}
