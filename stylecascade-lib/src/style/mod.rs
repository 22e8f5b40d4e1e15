pub mod library;
pub mod matcher;
pub mod rule_text;
pub mod selector;
pub mod sheet;
