//! Syntax tree.
//!
//! Every node is a plain struct that embeds a [`NodeBase`]; closed enums
//! (`Statement`, `Expression`, `Pattern`, ...) box their payloads so the enums
//! stay two words wide. Parents own their children and `Program` owns
//! everything, so a finished tree is `Send + Sync` and immutable apart from the
//! per-node [`UserData`] slot.

use std::any::Any;
use std::fmt;
use std::sync::OnceLock;

use esz_common::{Atom, Location, Range};
use smallvec::SmallVec;

mod expressions;
mod functions;
mod jsx;
mod modules;
mod node_list;
mod node_ref;
mod operators;
mod patterns;
mod statements;

pub use expressions::*;
pub use functions::*;
pub use jsx::*;
pub use modules::*;
pub use node_list::NodeList;
pub use node_ref::NodeRef;
pub use operators::*;
pub use patterns::*;
pub use statements::*;

// =============================================================================
// Node base
// =============================================================================

/// Set-once extension slot for consumers of the tree.
///
/// The parser never writes it. Any thread holding a shared reference to the
/// tree may attach one value to a node; later attempts fail.
#[derive(Default)]
pub struct UserData(OnceLock<Box<dyn Any + Send + Sync>>);

impl UserData {
    /// Attach `value`. Returns it back if the slot is already taken.
    pub fn set<T: Any + Send + Sync>(&self, value: T) -> Result<(), T> {
        let mut pending = Some(value);
        self.0.get_or_init(|| match pending.take() {
            Some(value) => Box::new(value),
            None => Box::new(()),
        });
        match pending {
            None => Ok(()),
            Some(value) => Err(value),
        }
    }

    pub fn get<T: Any>(&self) -> Option<&T> {
        self.0.get().and_then(|value| value.downcast_ref::<T>())
    }

    pub fn is_set(&self) -> bool {
        self.0.get().is_some()
    }
}

impl fmt::Debug for UserData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_set() {
            f.write_str("UserData(..)")
        } else {
            f.write_str("UserData(empty)")
        }
    }
}

/// Source extent shared by every node.
#[derive(Debug, Default)]
pub struct NodeBase {
    pub range: Range,
    pub location: Location,
    pub user_data: UserData,
}

impl NodeBase {
    pub fn new(range: Range, location: Location) -> Self {
        NodeBase {
            range,
            location,
            user_data: UserData::default(),
        }
    }
}

// =============================================================================
// Node kinds
// =============================================================================

/// Kind tag for every node in the tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    // Program
    Script,
    Module,

    // Statements
    Block,
    Empty,
    Expression,
    Directive,
    If,
    Labeled,
    Break,
    Continue,
    With,
    Switch,
    SwitchCase,
    Return,
    Throw,
    Try,
    CatchClause,
    While,
    DoWhile,
    For,
    ForIn,
    ForOf,
    Debugger,
    VariableDeclaration,
    VariableDeclarator,
    FunctionDeclaration,
    ClassDeclaration,

    // Module items
    ImportDeclaration,
    ImportSpecifier,
    ImportDefaultSpecifier,
    ImportNamespaceSpecifier,
    ImportAttribute,
    ExportNamedDeclaration,
    ExportDefaultDeclaration,
    ExportAllDeclaration,
    ExportSpecifier,

    // Expressions
    Identifier,
    PrivateIdentifier,
    Literal,
    TemplateLiteral,
    TemplateElement,
    TaggedTemplate,
    This,
    Super,
    Array,
    Object,
    Property,
    Spread,
    Function,
    ArrowFunction,
    Class,
    Member,
    Call,
    New,
    Chain,
    Update,
    Unary,
    Binary,
    Logical,
    Conditional,
    Assignment,
    Sequence,
    Yield,
    Await,
    MetaProperty,
    Import,
    FunctionBody,

    // Patterns
    ArrayPattern,
    ObjectPattern,
    AssignmentPattern,
    RestElement,

    // Classes
    ClassBody,
    MethodDefinition,
    PropertyDefinition,
    StaticBlock,

    // JSX
    JsxElement,
    JsxFragment,
    JsxOpeningElement,
    JsxClosingElement,
    JsxOpeningFragment,
    JsxClosingFragment,
    JsxAttribute,
    JsxSpreadAttribute,
    JsxExpressionContainer,
    JsxEmptyExpression,
    JsxText,
    JsxIdentifier,
    JsxMemberExpression,
    JsxNamespacedName,
}

impl NodeKind {
    pub fn is_statement(self) -> bool {
        use NodeKind::*;
        matches!(
            self,
            Block
                | Empty
                | Expression
                | Directive
                | If
                | Labeled
                | Break
                | Continue
                | With
                | Switch
                | Return
                | Throw
                | Try
                | While
                | DoWhile
                | For
                | ForIn
                | ForOf
                | Debugger
                | VariableDeclaration
                | FunctionDeclaration
                | ClassDeclaration
        )
    }

    pub fn is_iteration(self) -> bool {
        matches!(
            self,
            NodeKind::While | NodeKind::DoWhile | NodeKind::For | NodeKind::ForIn | NodeKind::ForOf
        )
    }

    pub fn is_jsx(self) -> bool {
        (self as u8) >= (NodeKind::JsxElement as u8)
    }
}

// =============================================================================
// Labels
// =============================================================================

/// Names of the labels that directly label an iteration or `switch`
/// statement, outermost first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LabelSet(SmallVec<[Atom; 1]>);

impl LabelSet {
    pub fn new() -> Self {
        LabelSet(SmallVec::new())
    }

    pub fn push(&mut self, label: Atom) {
        self.0.push(label);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|label| label.as_str() == name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Atom> {
        self.0.iter()
    }
}

impl FromIterator<Atom> for LabelSet {
    fn from_iter<I: IntoIterator<Item = Atom>>(iter: I) -> Self {
        LabelSet(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_data_is_set_once() {
        let base = NodeBase::default();
        assert!(!base.user_data.is_set());
        assert!(base.user_data.set(7_u32).is_ok());
        assert_eq!(base.user_data.set(9_u32), Err(9));
        assert_eq!(base.user_data.get::<u32>(), Some(&7));
        assert_eq!(base.user_data.get::<String>(), None);
    }

    #[test]
    fn label_set_lookup() {
        let labels: LabelSet = [Atom::new("outer"), Atom::new("inner")].into_iter().collect();
        assert!(labels.contains("inner"));
        assert!(!labels.contains("other"));
        assert_eq!(labels.len(), 2);
    }

    #[test]
    fn jsx_kinds_are_grouped_last() {
        assert!(NodeKind::JsxText.is_jsx());
        assert!(NodeKind::JsxNamespacedName.is_jsx());
        assert!(!NodeKind::StaticBlock.is_jsx());
        assert!(NodeKind::ForOf.is_iteration());
        assert!(!NodeKind::Switch.is_iteration());
    }
}
