//! Parsed form of an ECMAScript pattern.
//!
//! The tree keeps every construct the source used, including the ones the
//! host cannot express (look-around, back-references); rejecting those is the
//! emitter's job so that syntax errors are always reported first.

use crate::code_point_set::CodePointSet;
use crate::flags::RegexFlags;

#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    /// Matches the empty string.
    Empty,
    /// A single code point. Outside Unicode mode this is a UTF-16 code unit
    /// and may be half of a surrogate pair.
    Char(u32),
    /// `.`
    Dot,
    Class(CharClass),
    /// `\p{..}` / `\P{..}` outside a class.
    Property(PropertyEscape),
    Anchor(AnchorKind),
    WordBoundary { negated: bool },
    Group {
        capture: Option<Capture>,
        node: Box<Node>,
    },
    LookAround {
        behind: bool,
        negated: bool,
        node: Box<Node>,
    },
    BackReference(BackReference),
    Repeat {
        node: Box<Node>,
        quantifier: Quantifier,
    },
    Cat(Vec<Node>),
    Alt(Vec<Node>),
}

impl Node {
    pub(crate) fn cat(mut nodes: Vec<Node>) -> Node {
        match nodes.len() {
            0 => Node::Empty,
            1 => nodes.pop().unwrap_or(Node::Empty),
            _ => Node::Cat(nodes),
        }
    }

    pub(crate) fn alt(mut nodes: Vec<Node>) -> Node {
        match nodes.len() {
            0 => Node::Empty,
            1 => nodes.pop().unwrap_or(Node::Empty),
            _ => Node::Alt(nodes),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnchorKind {
    Start,
    End,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Capture {
    /// 1-based group number.
    pub index: u32,
    pub name: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BackReference {
    Index(u32),
    Named(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Quantifier {
    pub min: u32,
    /// `None` is unbounded.
    pub max: Option<u32>,
    pub greedy: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PropertyEscape {
    /// `General_Category`, `Script`, ... in `\p{name=value}`.
    pub name: Option<String>,
    pub value: String,
    pub negated: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClassOp {
    Union,
    Intersection,
    Difference,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ClassOperand {
    Set(CodePointSet),
    Property(PropertyEscape),
    Nested(CharClass),
    /// `\q{..}` alternatives longer than one code point.
    Strings(Vec<Vec<u32>>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct CharClass {
    pub negated: bool,
    pub op: ClassOp,
    pub operands: Vec<ClassOperand>,
    /// A single atom or range endpoint was a surrogate code unit outside
    /// Unicode mode.
    pub lone_surrogates: bool,
    /// Built from `\w`/`\W`: matched without the host's case folding.
    pub fold_exempt: bool,
}

impl CharClass {
    pub fn from_set(set: CodePointSet, negated: bool) -> Self {
        CharClass {
            negated,
            op: ClassOp::Union,
            operands: vec![ClassOperand::Set(set)],
            lone_surrogates: false,
            fold_exempt: false,
        }
    }
}

/// A parsed pattern.
#[derive(Clone, Debug, PartialEq)]
pub struct Pattern {
    pub node: Node,
    pub flags: RegexFlags,
    pub capture_count: u32,
    /// Named groups in source order with their group numbers.
    pub named_groups: Vec<(String, u32)>,
}
