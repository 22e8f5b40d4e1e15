use crate::dom::ObjectAdapter;
use crate::style::selector::{Selector, SelectorNode};

/// Returns true if every qualifier present on `node` holds for `object`.
/// Names and ids compare exactly; classes and pseudo-classes must appear
/// anywhere in the object's lists.
pub fn matches_node<A: ObjectAdapter>(adapter: &A, object: A::Handle, node: &SelectorNode<'_>) -> bool {
    if let Some(id) = node.id() {
        if adapter.id(object) != Some(id) {
            return false;
        }
    }
    if let Some(name) = node.name() {
        if adapter.name(object) != Some(name) {
            return false;
        }
    }
    if let Some(class) = node.class_name() {
        if !adapter.classes(object).iter().any(|c| c == class) {
            return false;
        }
    }
    if let Some(pseudo_class) = node.pseudo_class() {
        if !adapter.pseudo_classes(object).iter().any(|p| p == pseudo_class) {
            return false;
        }
    }
    true
}

/// Matches `selector` against a root-to-target path (target last).
///
/// The terminal node must hold for the target itself. The remaining nodes
/// are matched in order against the ancestors with descendant semantics: an
/// ancestor that does not satisfy the next node is skipped, and each cursor
/// only moves forward.
pub fn is_path_match<A: ObjectAdapter>(adapter: &A, path: &[A::Handle], selector: &Selector) -> bool {
    let Some((&target, ancestors)) = path.split_last() else {
        return false;
    };
    let mut nodes = selector.nodes();
    let Some(terminal) = nodes.next_back() else {
        return false;
    };
    if !matches_node(adapter, target, &terminal) {
        return false;
    }

    let mut objects = ancestors.iter();
    'nodes: for node in nodes {
        for &object in objects.by_ref() {
            if matches_node(adapter, object, &node) {
                continue 'nodes;
            }
        }
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::object_tree::{ObjectData, ObjectTree};
    use crate::style::selector::parse_selector;

    fn build(tree: &mut ObjectTree, chain: &[&str]) -> Vec<crate::ObjectId> {
        let data = chain
            .iter()
            .map(|text| ObjectData::from_compound(text).unwrap())
            .collect();
        tree.append_path(None, data)
    }

    fn matches(tree: &ObjectTree, path: &[crate::ObjectId], selector: &str) -> bool {
        is_path_match(tree, path, &parse_selector(selector).unwrap())
    }

    #[test]
    fn test_single_node() {
        let mut tree = ObjectTree::new();
        let path = build(&mut tree, &["window", "button#ok.primary:hover"]);
        assert!(matches(&tree, &path, "button"));
        assert!(matches(&tree, &path, "#ok"));
        assert!(matches(&tree, &path, ".primary"));
        assert!(matches(&tree, &path, ":hover"));
        assert!(matches(&tree, &path, "button.primary#ok:hover"));
        assert!(!matches(&tree, &path, "button.secondary"));
        assert!(!matches(&tree, &path, "label"));
    }

    #[test]
    fn test_class_anywhere_in_list() {
        let mut tree = ObjectTree::new();
        let path = build(&mut tree, &["item.a.b.c"]);
        assert!(matches(&tree, &path, ".a"));
        assert!(matches(&tree, &path, ".b"));
        assert!(matches(&tree, &path, ".c"));
        assert!(!matches(&tree, &path, ".d"));
    }

    #[test]
    fn test_descendant_skips_unrelated_ancestors() {
        let mut tree = ObjectTree::new();
        let path = build(&mut tree, &["root", "other", "mid", "leaf"]);
        assert!(matches(&tree, &path, "mid leaf"));
        assert!(matches(&tree, &path, "root leaf"));
        assert!(matches(&tree, &path, "root mid leaf"));
        assert!(matches(&tree, &path, "root other mid leaf"));
        // Order matters.
        assert!(!matches(&tree, &path, "mid root leaf"));
        // Each ancestor is consumed once.
        assert!(!matches(&tree, &path, "mid mid leaf"));
    }

    #[test]
    fn test_terminal_node_must_match_target() {
        let mut tree = ObjectTree::new();
        let path = build(&mut tree, &["div.x", "span.x"]);
        assert!(!matches(&tree, &path, "div.x"));
        assert!(matches(&tree, &path, "span.x"));
        assert!(matches(&tree, &path, ".x .x"));
        // The target cannot also stand in for an ancestor.
        assert!(!matches(&tree, &path[1..], ".x .x"));
    }

    #[test]
    fn test_empty_path() {
        let tree = ObjectTree::new();
        assert!(!is_path_match(&tree, &[], &parse_selector("a").unwrap()));
    }
}
