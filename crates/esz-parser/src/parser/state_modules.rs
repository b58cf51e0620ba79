//! Parser state - import and export declarations

use esz_common::diagnostics::diagnostic_codes;
use esz_common::{Atom, Diagnostic, Location, Range};
use esz_scanner::{SyntaxKind, TokenFlags};
use rustc_hash::FxHashSet;

use super::scope::BindingKind;
use super::state::{Marker, ParserState};
use super::state_statements::StatementContext;
use crate::ast::{
    ExportAllDeclaration, ExportDefaultDeclaration, ExportDefaultKind, ExportNamedDeclaration,
    ExportSpecifier, Identifier, ImportAttribute, ImportClause, ImportDeclaration,
    ImportDefaultSpecifier, ImportNamespaceSpecifier, ImportSpecifier, Literal, ModuleExportName,
    NodeBase, NodeKind, NodeList, Statement,
};
use crate::error::PResult;

impl ParserState {
    // =========================================================================
    // Imports
    // =========================================================================

    /// `import ...` at the top level of a module.
    pub(crate) fn parse_import_declaration(&mut self, start: Marker) -> PResult<Statement> {
        self.next_token()?;
        let mut specifiers = Vec::new();

        if !self.is_token(SyntaxKind::StringLiteral) {
            if self.current.kind.is_identifier_like() {
                let clause_start = self.start();
                let local = self.parse_binding_identifier(BindingKind::Lexical)?;
                specifiers.push(ImportClause::Default(Box::new(ImportDefaultSpecifier {
                    base: self.finish_node(NodeKind::ImportDefaultSpecifier, clause_start),
                    local,
                })));
                if self.eat(SyntaxKind::CommaToken)?
                    && !matches!(
                        self.kind(),
                        SyntaxKind::AsteriskToken | SyntaxKind::OpenBraceToken
                    )
                {
                    return Err(self.unexpected());
                }
            }
            match self.kind() {
                SyntaxKind::AsteriskToken => specifiers.push(self.parse_import_namespace()?),
                SyntaxKind::OpenBraceToken => self.parse_named_imports(&mut specifiers)?,
                _ if specifiers.is_empty() => return Err(self.unexpected()),
                _ => {}
            }
            self.expect(SyntaxKind::FromKeyword)?;
        }

        let source = self.parse_module_source()?;
        let attributes = self.parse_import_attributes()?;
        self.consume_semicolon()?;
        Ok(Statement::Import(Box::new(ImportDeclaration {
            base: self.finish_node(NodeKind::ImportDeclaration, start),
            specifiers: NodeList::from(specifiers),
            source,
            attributes: NodeList::from(attributes),
        })))
    }

    fn parse_import_namespace(&mut self) -> PResult<ImportClause> {
        let start = self.start();
        self.next_token()?;
        self.expect(SyntaxKind::AsKeyword)?;
        let local = self.parse_binding_identifier(BindingKind::Lexical)?;
        Ok(ImportClause::Namespace(Box::new(ImportNamespaceSpecifier {
            base: self.finish_node(NodeKind::ImportNamespaceSpecifier, start),
            local,
        })))
    }

    fn parse_named_imports(&mut self, specifiers: &mut Vec<ImportClause>) -> PResult<()> {
        self.expect(SyntaxKind::OpenBraceToken)?;
        while !self.is_token(SyntaxKind::CloseBraceToken) {
            let start = self.start();
            let token = self.current.clone();
            let imported = self.parse_module_export_name()?;
            let local = if self.eat(SyntaxKind::AsKeyword)? {
                self.parse_binding_identifier(BindingKind::Lexical)?
            } else {
                // `{ name }` binds the imported name itself.
                let ModuleExportName::Identifier(id) = &imported else {
                    return Err(self.unexpected());
                };
                self.check_identifier(&token, true)?;
                self.declare_name(&id.name, BindingKind::Lexical, token.range, token.location.start)?;
                Identifier {
                    base: self.node_like(NodeKind::Identifier, &id.base),
                    name: id.name.clone(),
                }
            };
            specifiers.push(ImportClause::Named(Box::new(ImportSpecifier {
                base: self.finish_node(NodeKind::ImportSpecifier, start),
                imported,
                local,
            })));
            if !self.is_token(SyntaxKind::CloseBraceToken) {
                self.expect(SyntaxKind::CommaToken)?;
            }
        }
        self.expect(SyntaxKind::CloseBraceToken)
    }

    /// Identifier name or string literal naming an import or export.
    fn parse_module_export_name(&mut self) -> PResult<ModuleExportName> {
        if self.is_token(SyntaxKind::StringLiteral) {
            if self.current.flags.contains(TokenFlags::LONE_SURROGATE) {
                self.tolerate_at_token(diagnostic_codes::MALFORMED_EXPORT_NAME, &[])?;
            }
            return Ok(ModuleExportName::Literal(Box::new(self.parse_literal()?)));
        }
        Ok(ModuleExportName::Identifier(Box::new(self.parse_identifier_name()?)))
    }

    fn parse_module_source(&mut self) -> PResult<Literal> {
        if !self.is_token(SyntaxKind::StringLiteral) {
            return Err(self.unexpected());
        }
        self.parse_literal()
    }

    /// Optional `with { key: "value", ... }`.
    fn parse_import_attributes(&mut self) -> PResult<Vec<ImportAttribute>> {
        let mut attributes = Vec::new();
        if !self.eat(SyntaxKind::WithKeyword)? {
            return Ok(attributes);
        }
        self.expect(SyntaxKind::OpenBraceToken)?;
        let mut keys: FxHashSet<Atom> = FxHashSet::default();
        while !self.is_token(SyntaxKind::CloseBraceToken) {
            let start = self.start();
            let key = self.parse_module_export_name()?;
            let key_name = Atom::new(key.name());
            if !keys.insert(key_name.clone()) {
                self.tolerate_at(
                    diagnostic_codes::DUPLICATE_IMPORT_ATTRIBUTE,
                    &[key_name.as_str()],
                    key.base(),
                )?;
            }
            self.expect(SyntaxKind::ColonToken)?;
            let value = self.parse_module_source()?;
            attributes.push(ImportAttribute {
                base: self.finish_node(NodeKind::ImportAttribute, start),
                key,
                value,
            });
            if !self.is_token(SyntaxKind::CloseBraceToken) {
                self.expect(SyntaxKind::CommaToken)?;
            }
        }
        self.expect(SyntaxKind::CloseBraceToken)?;
        Ok(attributes)
    }

    // =========================================================================
    // Exports
    // =========================================================================

    /// `export ...` at the top level of a module.
    pub(crate) fn parse_export_declaration(&mut self, start: Marker) -> PResult<Statement> {
        self.next_token()?;
        match self.kind() {
            SyntaxKind::AsteriskToken => self.parse_export_all(start),
            SyntaxKind::DefaultKeyword => self.parse_export_default(start),
            SyntaxKind::OpenBraceToken => self.parse_export_named(start),
            _ => self.parse_export_declaration_statement(start),
        }
    }

    fn parse_export_all(&mut self, start: Marker) -> PResult<Statement> {
        self.next_token()?;
        let exported = if self.eat(SyntaxKind::AsKeyword)? {
            let name = self.parse_module_export_name()?;
            self.record_export(name.name(), name.base())?;
            Some(name)
        } else {
            None
        };
        self.expect(SyntaxKind::FromKeyword)?;
        let source = self.parse_module_source()?;
        let attributes = self.parse_import_attributes()?;
        self.consume_semicolon()?;
        Ok(Statement::ExportAll(Box::new(ExportAllDeclaration {
            base: self.finish_node(NodeKind::ExportAllDeclaration, start),
            exported,
            source,
            attributes: NodeList::from(attributes),
        })))
    }

    fn parse_export_default(&mut self, start: Marker) -> PResult<Statement> {
        let keyword = self.node_at_token(NodeKind::Identifier);
        self.record_export("default", &keyword)?;
        self.next_token()?;
        let declaration_start = self.start();
        let declaration = match self.kind() {
            SyntaxKind::FunctionKeyword => {
                let function = self.parse_function_declaration_node(declaration_start, false, true)?;
                ExportDefaultKind::Function(Box::new(function))
            }
            SyntaxKind::AsyncKeyword
                if self.peek_kind_on_same_line() == Some(SyntaxKind::FunctionKeyword) =>
            {
                self.next_token()?;
                let function = self.parse_function_declaration_node(declaration_start, true, true)?;
                ExportDefaultKind::Function(Box::new(function))
            }
            SyntaxKind::ClassKeyword => {
                let class = self.parse_class_node(declaration_start, true, true)?;
                ExportDefaultKind::Class(Box::new(class))
            }
            _ => {
                let expression = self.allow_in(|p| p.parse_assignment_expression())?;
                self.consume_semicolon()?;
                ExportDefaultKind::Expression(expression)
            }
        };
        Ok(Statement::ExportDefault(Box::new(ExportDefaultDeclaration {
            base: self.finish_node(NodeKind::ExportDefaultDeclaration, start),
            declaration,
        })))
    }

    fn parse_export_named(&mut self, start: Marker) -> PResult<Statement> {
        self.next_token()?;
        let mut specifiers = Vec::new();
        // Local names with the token that wrote them, checked once `from` is ruled out.
        let mut locals = Vec::new();
        while !self.is_token(SyntaxKind::CloseBraceToken) {
            let specifier_start = self.start();
            locals.push(self.current.clone());
            let local = self.parse_module_export_name()?;
            let exported = if self.eat(SyntaxKind::AsKeyword)? {
                self.parse_module_export_name()?
            } else {
                self.copy_export_name(&local)
            };
            self.record_export(exported.name(), exported.base())?;
            specifiers.push(ExportSpecifier {
                base: self.finish_node(NodeKind::ExportSpecifier, specifier_start),
                local,
                exported,
            });
            if !self.is_token(SyntaxKind::CloseBraceToken) {
                self.expect(SyntaxKind::CommaToken)?;
            }
        }
        self.expect(SyntaxKind::CloseBraceToken)?;

        let (source, attributes) = if self.eat(SyntaxKind::FromKeyword)? {
            let source = self.parse_module_source()?;
            (Some(source), self.parse_import_attributes()?)
        } else {
            for token in &locals {
                if token.kind == SyntaxKind::StringLiteral || token.kind.is_reserved_word() {
                    return Err(Diagnostic::at_location(
                        diagnostic_codes::UNEXPECTED_TOKEN,
                        &[&format!("'{}'", token.raw)],
                        token.range,
                        token.location,
                    )
                    .into());
                }
                let name = Self::token_name(token);
                if !self.is_declared_at_top(&name) {
                    self.undefined_exports
                        .entry(name)
                        .or_insert((token.range, token.location.start));
                }
            }
            (None, Vec::new())
        };
        self.consume_semicolon()?;
        Ok(Statement::ExportNamed(Box::new(ExportNamedDeclaration {
            base: self.finish_node(NodeKind::ExportNamedDeclaration, start),
            declaration: None,
            specifiers: NodeList::from(specifiers),
            source,
            attributes: NodeList::from(attributes),
        })))
    }

    fn parse_export_declaration_statement(&mut self, start: Marker) -> PResult<Statement> {
        let is_declaration = match self.kind() {
            SyntaxKind::VarKeyword
            | SyntaxKind::ConstKeyword
            | SyntaxKind::FunctionKeyword
            | SyntaxKind::ClassKeyword => true,
            SyntaxKind::LetKeyword => self.is_let_declaration(false),
            SyntaxKind::AsyncKeyword => {
                self.peek_kind_on_same_line() == Some(SyntaxKind::FunctionKeyword)
            }
            _ => false,
        };
        if !is_declaration {
            return Err(self.unexpected());
        }
        let declaration = self.parse_statement_list_item(StatementContext::List)?;
        let mut ids = Vec::new();
        match &declaration {
            Statement::VariableDeclaration(variables) => {
                for declarator in &variables.declarations {
                    declarator.id.bound_names(&mut ids);
                }
            }
            Statement::FunctionDeclaration(function) => ids.extend(function.id.as_ref()),
            Statement::ClassDeclaration(class) => ids.extend(class.id.as_ref()),
            _ => {}
        }
        let names: Vec<(Atom, Range, Location)> = ids
            .into_iter()
            .map(|id| (id.name.clone(), id.base.range, id.base.location))
            .collect();
        for (name, range, location) in names {
            if !self.exported_names.insert(name.clone()) {
                self.report(Diagnostic::at_location(
                    diagnostic_codes::DUPLICATE_EXPORT,
                    &[name.as_str()],
                    range,
                    location,
                ))?;
            }
        }
        Ok(Statement::ExportNamed(Box::new(ExportNamedDeclaration {
            base: self.finish_node(NodeKind::ExportNamedDeclaration, start),
            declaration: Some(declaration),
            specifiers: NodeList::empty(),
            source: None,
            attributes: NodeList::empty(),
        })))
    }

    /// Same name for the exported side of `export { name }`.
    fn copy_export_name(&self, local: &ModuleExportName) -> ModuleExportName {
        match local {
            ModuleExportName::Identifier(id) => ModuleExportName::Identifier(Box::new(Identifier {
                base: self.node_like(NodeKind::Identifier, &id.base),
                name: id.name.clone(),
            })),
            ModuleExportName::Literal(literal) => ModuleExportName::Literal(Box::new(Literal {
                base: self.node_like(NodeKind::Literal, &literal.base),
                value: crate::ast::LiteralValue::String(Atom::new(local.name())),
                raw: literal.raw.clone(),
            })),
        }
    }

    fn record_export(&mut self, name: &str, base: &NodeBase) -> PResult<()> {
        if self.exported_names.insert(Atom::new(name)) {
            return Ok(());
        }
        self.tolerate_at(diagnostic_codes::DUPLICATE_EXPORT, &[name], base)
    }

    /// Report local exports that no top-level declaration provided.
    pub(crate) fn check_undefined_exports(&mut self) -> PResult<()> {
        let mut missing: Vec<_> = self
            .undefined_exports
            .drain()
            .map(|(name, (range, position))| (range, position, name))
            .collect();
        missing.sort_by_key(|(range, _, _)| range.start);
        for (range, position, name) in missing {
            self.tolerate(diagnostic_codes::EXPORT_NOT_DEFINED, &[name.as_str()], range, position)?;
        }
        Ok(())
    }
}
