//! Functions, arrows and classes.

use super::{Expression, Identifier, NodeBase, NodeList, Pattern, PropertyKey, Statement};
use crate::hoisting::HoistingScope;

#[derive(Debug)]
pub struct FunctionBody {
    pub base: NodeBase,
    /// Directives first, then statements.
    pub body: NodeList<Statement>,
}

/// Function declaration, function expression or method value.
#[derive(Debug)]
pub struct Function {
    pub base: NodeBase,
    pub id: Option<Identifier>,
    pub params: NodeList<Pattern>,
    pub body: FunctionBody,
    pub is_async: bool,
    pub is_generator: bool,
    /// Strict either by inheritance or by its own `"use strict"`.
    pub strict: bool,
    pub hoisting: HoistingScope,
}

impl Function {
    /// Every parameter is a plain identifier.
    pub fn has_simple_parameters(&self) -> bool {
        self.params.iter().all(|param| matches!(param, Pattern::Identifier(_)))
    }
}

#[derive(Debug)]
pub enum ArrowBody {
    Block(Box<FunctionBody>),
    Expression(Expression),
}

#[derive(Debug)]
pub struct ArrowFunction {
    pub base: NodeBase,
    pub params: NodeList<Pattern>,
    pub body: ArrowBody,
    pub is_async: bool,
    pub strict: bool,
    pub hoisting: HoistingScope,
}

// =============================================================================
// Classes
// =============================================================================

/// Class declaration or expression.
#[derive(Debug)]
pub struct Class {
    pub base: NodeBase,
    pub id: Option<Identifier>,
    pub super_class: Option<Expression>,
    pub body: ClassBody,
}

#[derive(Debug)]
pub struct ClassBody {
    pub base: NodeBase,
    pub body: NodeList<ClassElement>,
}

#[derive(Debug)]
pub enum ClassElement {
    Method(Box<MethodDefinition>),
    Property(Box<PropertyDefinition>),
    StaticBlock(Box<StaticBlock>),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MethodKind {
    Constructor,
    Method,
    Get,
    Set,
}

#[derive(Debug)]
pub struct MethodDefinition {
    pub base: NodeBase,
    pub key: PropertyKey,
    pub value: Box<Function>,
    pub kind: MethodKind,
    pub is_static: bool,
}

/// Class field.
#[derive(Debug)]
pub struct PropertyDefinition {
    pub base: NodeBase,
    pub key: PropertyKey,
    pub value: Option<Expression>,
    pub is_static: bool,
}

#[derive(Debug)]
pub struct StaticBlock {
    pub base: NodeBase,
    pub body: NodeList<Statement>,
    pub hoisting: HoistingScope,
}
