//! Import and export declarations.

use super::{Class, Expression, Function, Identifier, Literal, NodeBase, NodeList, Statement};

/// Identifier or string name in an import/export clause.
#[derive(Debug)]
pub enum ModuleExportName {
    Identifier(Box<Identifier>),
    Literal(Box<Literal>),
}

impl ModuleExportName {
    pub fn name(&self) -> &str {
        match self {
            ModuleExportName::Identifier(id) => id.name.as_str(),
            ModuleExportName::Literal(lit) => lit.as_str().unwrap_or_default(),
        }
    }

    pub fn base(&self) -> &NodeBase {
        match self {
            ModuleExportName::Identifier(id) => &id.base,
            ModuleExportName::Literal(lit) => &lit.base,
        }
    }
}

#[derive(Debug)]
pub struct ImportSpecifier {
    pub base: NodeBase,
    pub imported: ModuleExportName,
    pub local: Identifier,
}

#[derive(Debug)]
pub struct ImportDefaultSpecifier {
    pub base: NodeBase,
    pub local: Identifier,
}

#[derive(Debug)]
pub struct ImportNamespaceSpecifier {
    pub base: NodeBase,
    pub local: Identifier,
}

#[derive(Debug)]
pub enum ImportClause {
    Default(Box<ImportDefaultSpecifier>),
    Namespace(Box<ImportNamespaceSpecifier>),
    Named(Box<ImportSpecifier>),
}

impl ImportClause {
    pub fn local(&self) -> &Identifier {
        match self {
            ImportClause::Default(s) => &s.local,
            ImportClause::Namespace(s) => &s.local,
            ImportClause::Named(s) => &s.local,
        }
    }
}

/// `key: "value"` inside `with { ... }`.
#[derive(Debug)]
pub struct ImportAttribute {
    pub base: NodeBase,
    pub key: ModuleExportName,
    pub value: Literal,
}

#[derive(Debug)]
pub struct ImportDeclaration {
    pub base: NodeBase,
    pub specifiers: NodeList<ImportClause>,
    pub source: Literal,
    pub attributes: NodeList<ImportAttribute>,
}

#[derive(Debug)]
pub struct ExportSpecifier {
    pub base: NodeBase,
    pub local: ModuleExportName,
    pub exported: ModuleExportName,
}

#[derive(Debug)]
pub struct ExportNamedDeclaration {
    pub base: NodeBase,
    /// `export var|let|const|function|class ...`.
    pub declaration: Option<Statement>,
    pub specifiers: NodeList<ExportSpecifier>,
    pub source: Option<Literal>,
    pub attributes: NodeList<ImportAttribute>,
}

#[derive(Debug)]
pub enum ExportDefaultKind {
    Function(Box<Function>),
    Class(Box<Class>),
    Expression(Expression),
}

#[derive(Debug)]
pub struct ExportDefaultDeclaration {
    pub base: NodeBase,
    pub declaration: ExportDefaultKind,
}

/// `export * from "m"` or `export * as name from "m"`.
#[derive(Debug)]
pub struct ExportAllDeclaration {
    pub base: NodeBase,
    pub exported: Option<ModuleExportName>,
    pub source: Literal,
    pub attributes: NodeList<ImportAttribute>,
}
