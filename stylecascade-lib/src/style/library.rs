use crate::dom::ObjectAdapter;
use crate::style::matcher::is_path_match;
use crate::style::selector::{QualifierKind, Selector, SelectorNode};
use crate::style::sheet::StyleSheet;
use log::{debug, trace};
use std::collections::HashMap;

/// A selector together with the style it applies. Both are owned copies.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub selector: Selector,
    pub sheet: StyleSheet,
}

/// Bucket key for a selector node: the first present of pseudo-class,
/// class, id and name, written with its prefix (`:hover`, `.panel`, `#ok`,
/// `button`).
pub fn index_key_of(node: &SelectorNode<'_>) -> Option<String> {
    [
        QualifierKind::PseudoClass,
        QualifierKind::Class,
        QualifierKind::Id,
        QualifierKind::Name,
    ]
    .into_iter()
    .find_map(|kind| node.get(kind).map(|value| format!("{}{}", kind.prefix(), value)))
}

/// Rule store indexed by the terminal node of each selector.
///
/// Creating a library is the explicit init step; [`StyleLibrary::shutdown`]
/// (or dropping it) releases every stored selector and sheet. A library is
/// plain data: share it read-only across threads, but serialize writes.
#[derive(Debug, Default)]
pub struct StyleLibrary {
    buckets: HashMap<String, Vec<Rule>>,
}

impl StyleLibrary {
    pub fn new() -> Self {
        StyleLibrary::default()
    }

    /// Releases all rules. Equivalent to dropping the library, with a log line.
    pub fn shutdown(self) {
        debug!(
            "style library shut down: {} rules in {} buckets released",
            self.rule_count(),
            self.bucket_count()
        );
    }

    pub fn rule_count(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Rules stored under `key`, in insertion order.
    pub fn rules_for(&self, key: &str) -> &[Rule] {
        self.buckets.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Stores `sheet` for `selector`. A selector already present has the
    /// valid slots of `sheet` written over its stored sheet; a new selector
    /// gets its own copy of both. Returns false when the terminal node has
    /// nothing to index by.
    pub fn put_rule(&mut self, selector: &Selector, sheet: &StyleSheet) -> bool {
        let Some(key) = selector.terminal().as_ref().and_then(index_key_of) else {
            debug!("rule `{}` has no indexable terminal node, skipped", selector);
            return false;
        };
        let bucket = self.buckets.entry(key).or_default();

        if let Some(rule) = bucket.iter_mut().find(|rule| rule.selector == *selector) {
            debug!("rule `{}` redeclared, replacing {} properties", selector, sheet.valid_count());
            rule.sheet.replace(sheet);
            return true;
        }

        let mut own_sheet = StyleSheet::new();
        own_sheet.merge(sheet);
        debug!("rule `{}` added with {} properties", selector, own_sheet.valid_count());
        bucket.push(Rule {
            selector: selector.clone(),
            sheet: own_sheet,
        });
        true
    }

    /// Lookup keys for an object, highest precedence first: classes from
    /// last declared to first, then the id, then the name.
    fn object_keys<A: ObjectAdapter>(adapter: &A, object: A::Handle) -> Vec<String> {
        let mut keys: Vec<String> = adapter
            .classes(object)
            .iter()
            .rev()
            .map(|class| format!(".{}", class))
            .collect();
        if let Some(id) = adapter.id(object) {
            keys.push(format!("#{}", id));
        }
        if let Some(name) = adapter.name(object) {
            keys.push(name.to_string());
        }
        keys
    }

    /// Merges every rule matching `object` into `out` and returns how many matched.
    ///
    /// Merging never overwrites a slot that is already valid, whether it was
    /// filled by an earlier rule in this call or by the caller beforehand.
    /// Combined with the key order this gives the precedence
    /// last class > earlier classes > id > name. Ids do not outrank classes
    /// here, and rules whose terminal node is indexed by a pseudo-class are
    /// never reached through this lookup.
    pub fn resolve_style<A: ObjectAdapter>(&self, adapter: &A, object: A::Handle, out: &mut StyleSheet) -> usize {
        if self.buckets.is_empty() {
            return 0;
        }
        let path = adapter.ancestor_path(object);
        let mut matched = 0;

        for key in Self::object_keys(adapter, object) {
            let Some(bucket) = self.buckets.get(&key) else {
                continue;
            };
            for rule in bucket {
                if is_path_match(adapter, &path, &rule.selector) {
                    trace!("`{}` matched in bucket `{}`", rule.selector, key);
                    out.merge(&rule.sheet);
                    matched += 1;
                }
            }
        }
        matched
    }
}
