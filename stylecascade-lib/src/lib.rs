//! Selector-driven style resolution for tree-structured UI objects.
//!
//! Rules are written as `selector -> style sheet` pairs and stored in a
//! [`StyleLibrary`](style::library::StyleLibrary), indexed by the last node of
//! their selector. Resolving an object walks its class, id and name buckets,
//! keeps the rules whose selector matches the object's ancestor path, and
//! merges them into an output sheet.

pub mod dom;
pub mod style;
pub mod style_pass;

pub use dom::object_tree::{ObjectData, ObjectId, ObjectTree};
pub use dom::ObjectAdapter;
pub use style::library::StyleLibrary;
pub use style::rule_text::{load_rules, parse_rules, LoadError};
pub use style::selector::{parse_selector, ParseError, QualifierKind, Selector};
pub use style::sheet::{Color, StyleKey, StyleSheet, StyleValue, STYLE_KEY_TOTAL};

/// Capacity of a name buffer, terminator included; identifiers hold at most
/// `MAX_NAME_LEN - 1` characters.
pub const MAX_NAME_LEN: usize = 128;

/// Maximum number of nodes in one selector.
pub const MAX_SELECTOR_DEPTH: usize = 32;

/// Maximum number of objects considered on an ancestor path, target included.
pub const MAX_NODE_DEPTH: usize = 32;
