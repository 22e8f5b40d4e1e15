use crate::{MAX_NAME_LEN, MAX_SELECTOR_DEPTH};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// ------------------------------
/// 1. Selector Data
/// ------------------------------

/// The four constraints a selector node can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QualifierKind {
    /// Bare identifier at the start of a token, e.g. `button`.
    Name,
    /// `:hover`
    PseudoClass,
    /// `.primary`
    Class,
    /// `#submit`
    Id,
}

impl QualifierKind {
    fn from_prefix(ch: char) -> Option<Self> {
        match ch {
            ':' => Some(QualifierKind::PseudoClass),
            '.' => Some(QualifierKind::Class),
            '#' => Some(QualifierKind::Id),
            _ => None,
        }
    }

    /// Text written before the identifier; empty for names.
    pub fn prefix(self) -> &'static str {
        match self {
            QualifierKind::Name => "",
            QualifierKind::PseudoClass => ":",
            QualifierKind::Class => ".",
            QualifierKind::Id => "#",
        }
    }
}

impl fmt::Display for QualifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            QualifierKind::Name => "name",
            QualifierKind::PseudoClass => "pseudo-class",
            QualifierKind::Class => "class",
            QualifierKind::Id => "id",
        })
    }
}

/// Errors produced by [`parse_selector`]. None of them leave a partial selector behind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("selector text is empty")]
    Empty,
    #[error("a compound token may carry only one {0} qualifier")]
    DuplicateQualifier(QualifierKind),
    #[error("selector has more than {} nodes", MAX_SELECTOR_DEPTH)]
    SelectorTooDeep,
    #[error("identifier longer than {} characters", MAX_NAME_LEN - 1)]
    NameTooLong,
    #[error("invalid character at position {0}")]
    InvalidCharacter(usize),
}

/// Byte range into a selector's shared name buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Span {
    start: u16,
    end: u16,
}

#[derive(Debug, Clone, Copy, Default)]
struct NodeSlots {
    name: Option<Span>,
    pseudo_class: Option<Span>,
    class: Option<Span>,
    id: Option<Span>,
}

impl NodeSlots {
    fn slot(&self, kind: QualifierKind) -> Option<Span> {
        match kind {
            QualifierKind::Name => self.name,
            QualifierKind::PseudoClass => self.pseudo_class,
            QualifierKind::Class => self.class,
            QualifierKind::Id => self.id,
        }
    }

    fn slot_mut(&mut self, kind: QualifierKind) -> &mut Option<Span> {
        match kind {
            QualifierKind::Name => &mut self.name,
            QualifierKind::PseudoClass => &mut self.pseudo_class,
            QualifierKind::Class => &mut self.class,
            QualifierKind::Id => &mut self.id,
        }
    }
}

/// A chain of compound nodes, outermost ancestor first, target constraint last.
///
/// All identifiers of a selector live in one buffer; nodes refer to it by
/// span, so cloning or dropping a selector is a single unit of work.
#[derive(Debug, Clone)]
pub struct Selector {
    names: String,
    nodes: Vec<NodeSlots>,
}

/// Borrowed view of one position in a [`Selector`]. Absent fields are wildcards.
#[derive(Debug, Clone, Copy)]
pub struct SelectorNode<'a> {
    names: &'a str,
    slots: &'a NodeSlots,
}

impl<'a> SelectorNode<'a> {
    pub fn get(&self, kind: QualifierKind) -> Option<&'a str> {
        self.slots
            .slot(kind)
            .map(|span| &self.names[span.start as usize..span.end as usize])
    }

    pub fn name(&self) -> Option<&'a str> {
        self.get(QualifierKind::Name)
    }

    pub fn pseudo_class(&self) -> Option<&'a str> {
        self.get(QualifierKind::PseudoClass)
    }

    pub fn class_name(&self) -> Option<&'a str> {
        self.get(QualifierKind::Class)
    }

    pub fn id(&self) -> Option<&'a str> {
        self.get(QualifierKind::Id)
    }
}

impl PartialEq for SelectorNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        [
            QualifierKind::Name,
            QualifierKind::Class,
            QualifierKind::PseudoClass,
            QualifierKind::Id,
        ]
        .into_iter()
        .all(|kind| self.get(kind) == other.get(kind))
    }
}

impl fmt::Display for SelectorNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for kind in [
            QualifierKind::Name,
            QualifierKind::PseudoClass,
            QualifierKind::Class,
            QualifierKind::Id,
        ] {
            if let Some(value) = self.get(kind) {
                write!(f, "{}{}", kind.prefix(), value)?;
            }
        }
        Ok(())
    }
}

impl Selector {
    /// Number of nodes; always at least one.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, index: usize) -> Option<SelectorNode<'_>> {
        self.nodes.get(index).map(|slots| SelectorNode {
            names: &self.names,
            slots,
        })
    }

    pub fn nodes(&self) -> impl DoubleEndedIterator<Item = SelectorNode<'_>> + ExactSizeIterator {
        self.nodes.iter().map(move |slots| SelectorNode {
            names: &self.names,
            slots,
        })
    }

    /// The node constraining the target object itself.
    pub fn terminal(&self) -> Option<SelectorNode<'_>> {
        self.nodes().next_back()
    }
}

/// Structural equality: same length and, position by position, every
/// qualifier is absent on both sides or present with identical text.
impl PartialEq for Selector {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.nodes().zip(other.nodes()).all(|(a, b)| a == b)
    }
}

impl Eq for Selector {}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, node) in self.nodes().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", node)?;
        }
        Ok(())
    }
}

impl FromStr for Selector {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_selector(s)
    }
}

/// ------------------------------
/// 2. Selector Parsing
/// ------------------------------

fn is_name_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '-' || ch == '_'
}

/// An identifier being read: its kind, where its prefix sits, where its text starts.
#[derive(Debug, Clone, Copy)]
struct Pending {
    kind: QualifierKind,
    prefix_at: usize,
    start: usize,
}

#[derive(Debug, Default)]
struct SelectorBuilder {
    names: String,
    nodes: Vec<NodeSlots>,
    current: Option<NodeSlots>,
}

impl SelectorBuilder {
    /// Opens a node for the token being read, if none is open yet.
    fn open(&mut self) -> Result<(), ParseError> {
        if self.current.is_none() {
            if self.nodes.len() >= MAX_SELECTOR_DEPTH {
                return Err(ParseError::SelectorTooDeep);
            }
            self.current = Some(NodeSlots::default());
        }
        Ok(())
    }

    fn save(&mut self, text: &str, pending: Pending, end: usize) -> Result<(), ParseError> {
        let value = &text[pending.start..end];
        if value.is_empty() {
            return Err(ParseError::InvalidCharacter(pending.prefix_at));
        }
        if value.len() >= MAX_NAME_LEN {
            return Err(ParseError::NameTooLong);
        }
        let node = self.current.get_or_insert_with(NodeSlots::default);
        let slot = node.slot_mut(pending.kind);
        if slot.is_some() {
            return Err(ParseError::DuplicateQualifier(pending.kind));
        }
        let start = self.names.len();
        self.names.push_str(value);
        *slot = Some(Span {
            start: start as u16,
            end: self.names.len() as u16,
        });
        Ok(())
    }

    fn close(&mut self) {
        if let Some(node) = self.current.take() {
            self.nodes.push(node);
        }
    }

    fn finish(mut self) -> Result<Selector, ParseError> {
        self.close();
        if self.nodes.is_empty() {
            return Err(ParseError::Empty);
        }
        Ok(Selector {
            names: self.names,
            nodes: self.nodes,
        })
    }
}

/// Parse selector text such as `"window .panel #ok:hover"`.
///
/// Tokens are separated by spaces (descendant combinator). A token is an
/// optional bare name followed by `:pseudo`, `.class` and `#id` qualifiers,
/// each kind at most once. Identifiers use `[A-Za-z0-9_-]`.
pub fn parse_selector(text: &str) -> Result<Selector, ParseError> {
    let mut builder = SelectorBuilder::default();
    let mut pending: Option<Pending> = None;

    for (pos, ch) in text.char_indices() {
        if is_name_char(ch) {
            if pending.is_none() {
                builder.open()?;
                pending = Some(Pending {
                    kind: QualifierKind::Name,
                    prefix_at: pos,
                    start: pos,
                });
            }
            continue;
        }
        if let Some(kind) = QualifierKind::from_prefix(ch) {
            builder.open()?;
            if let Some(prev) = pending.take() {
                builder.save(text, prev, pos)?;
            }
            pending = Some(Pending {
                kind,
                prefix_at: pos,
                start: pos + 1,
            });
            continue;
        }
        if ch == ' ' {
            if let Some(prev) = pending.take() {
                builder.save(text, prev, pos)?;
            }
            builder.close();
            continue;
        }
        return Err(ParseError::InvalidCharacter(pos));
    }
    if let Some(prev) = pending.take() {
        builder.save(text, prev, text.len())?;
    }
    builder.finish()
}
