//! Declaration scopes, labels and private names.

use bitflags::bitflags;
use esz_common::diagnostics::diagnostic_codes;
use esz_common::{Atom, Position, Range};
use rustc_hash::{FxHashMap, FxHashSet};

use super::state::ParserState;
use crate::error::PResult;
use crate::hoisting::{HoistingBuilder, HoistingScope};

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub(crate) struct ScopeFlags: u8 {
        /// Program body.
        const TOP = 1 << 0;
        /// Function body, including parameters.
        const FUNCTION = 1 << 1;
        const ARROW = 1 << 2;
        /// Catch clause with a single identifier parameter.
        const SIMPLE_CATCH = 1 << 3;
        const STATIC_BLOCK = 1 << 4;
        /// Scopes that `var` declarations stop at.
        const VAR = Self::TOP.bits() | Self::FUNCTION.bits() | Self::STATIC_BLOCK.bits();
    }
}

/// How a name is being bound.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum BindingKind {
    Var,
    Lexical,
    /// Sloppy-mode plain function declaration.
    Function,
    /// The single identifier of `catch (e)`.
    SimpleCatch,
    /// Formal parameter: var-like, but not hoisted.
    Param,
    /// Name already validated and only needs checking, never declaring.
    None,
}

#[derive(Debug, Default)]
pub(crate) struct Scope {
    pub(crate) flags: ScopeFlags,
    var: FxHashSet<Atom>,
    lexical: FxHashSet<Atom>,
    functions: FxHashSet<Atom>,
    catch_param: Option<Atom>,
    pub(crate) hoisting: HoistingBuilder,
}

impl Scope {
    fn new(flags: ScopeFlags) -> Self {
        Scope {
            flags,
            ..Scope::default()
        }
    }

    fn is_var_scope(&self) -> bool {
        self.flags.intersects(ScopeFlags::VAR)
    }
}

/// A label in scope, and whether it labels an iteration statement.
#[derive(Clone, Debug)]
pub(crate) struct Label {
    pub(crate) name: Atom,
    pub(crate) is_loop: bool,
    /// Start of the labeled body; chained labels share it.
    pub(crate) statement_start: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PrivateNameKind {
    Field,
    Method,
    Getter,
    Setter,
    /// A getter and setter pair.
    Accessor,
}

#[derive(Debug, Default)]
pub(crate) struct PrivateScope {
    declared: FxHashMap<Atom, (PrivateNameKind, bool)>,
    used: Vec<(Atom, Range, Position)>,
}

impl ParserState {
    // =========================================================================
    // Scopes
    // =========================================================================

    pub(crate) fn push_scope(&mut self, flags: ScopeFlags) {
        self.scopes.push(Scope::new(flags));
    }

    pub(crate) fn pop_scope(&mut self) -> HoistingScope {
        self.scopes
            .pop()
            .map(|scope| scope.hoisting.finish())
            .unwrap_or_default()
    }

    /// Run `f` in a block scope.
    pub(crate) fn with_block_scope<T>(
        &mut self,
        flags: ScopeFlags,
        f: impl FnOnce(&mut Self) -> PResult<T>,
    ) -> PResult<T> {
        let depth = self.scopes.len();
        self.push_scope(flags);
        let result = f(self);
        self.scopes.truncate(depth);
        result
    }

    fn treats_functions_as_var(&self, scope: &Scope) -> bool {
        scope.flags.contains(ScopeFlags::FUNCTION)
            || (!self.module && scope.flags.contains(ScopeFlags::TOP))
    }

    /// Innermost scope `var` declarations land in.
    fn var_scope_mut(&mut self) -> Option<&mut Scope> {
        self.scopes.iter_mut().rev().find(|scope| scope.is_var_scope())
    }

    /// Declare `name`, reporting a conflicting earlier declaration.
    pub(crate) fn declare_name(
        &mut self,
        name: &Atom,
        kind: BindingKind,
        range: Range,
        position: Position,
    ) -> PResult<()> {
        let module = self.module;
        let mut redeclared = false;
        match kind {
            BindingKind::None => return Ok(()),
            BindingKind::Lexical => {
                let Some(scope) = self.scopes.last_mut() else {
                    return Ok(());
                };
                redeclared = scope.lexical.contains(name)
                    || scope.functions.contains(name)
                    || scope.var.contains(name);
                scope.lexical.insert(name.clone());
                if scope.is_var_scope() {
                    scope.hoisting.add_lexical(name);
                }
                if module && scope.flags.contains(ScopeFlags::TOP) {
                    self.undefined_exports.remove(name);
                }
            }
            BindingKind::SimpleCatch => {
                if let Some(scope) = self.scopes.last_mut() {
                    scope.lexical.insert(name.clone());
                    scope.catch_param = Some(name.clone());
                }
            }
            BindingKind::Function => {
                let Some(scope) = self.scopes.last() else {
                    return Ok(());
                };
                redeclared = if self.treats_functions_as_var(scope) {
                    scope.lexical.contains(name)
                } else {
                    scope.lexical.contains(name) || scope.var.contains(name)
                };
                if let Some(scope) = self.scopes.last_mut() {
                    scope.functions.insert(name.clone());
                }
            }
            BindingKind::Var | BindingKind::Param => {
                for index in (0..self.scopes.len()).rev() {
                    let scope = &self.scopes[index];
                    let catch_exempt = scope.flags.contains(ScopeFlags::SIMPLE_CATCH)
                        && scope.catch_param.as_ref() == Some(name);
                    if (scope.lexical.contains(name) && !catch_exempt)
                        || (!self.treats_functions_as_var(scope) && scope.functions.contains(name))
                    {
                        redeclared = true;
                        break;
                    }
                    let scope = &mut self.scopes[index];
                    scope.var.insert(name.clone());
                    if module && scope.flags.contains(ScopeFlags::TOP) {
                        self.undefined_exports.remove(name);
                    }
                    if scope.is_var_scope() {
                        if kind == BindingKind::Var {
                            scope.hoisting.add_var(name);
                        }
                        break;
                    }
                }
            }
        }
        if redeclared {
            self.tolerate(
                diagnostic_codes::IDENTIFIER_ALREADY_DECLARED,
                &[name.as_str()],
                range,
                position,
            )?;
        }
        Ok(())
    }

    /// Binding kind for a function declaration in the current scope.
    pub(crate) fn function_binding_kind(&self, plain: bool) -> BindingKind {
        if !self.strict && plain {
            return BindingKind::Function;
        }
        match self.scopes.last() {
            Some(scope) if self.treats_functions_as_var(scope) => BindingKind::Var,
            _ => BindingKind::Lexical,
        }
    }

    /// Declare a function declaration's name and list it in the enclosing
    /// body's hoisting scope when it sits directly in that body.
    pub(crate) fn declare_function(
        &mut self,
        name: &Atom,
        plain: bool,
        range: Range,
        position: Position,
    ) -> PResult<()> {
        let kind = self.function_binding_kind(plain);
        let at_body_level = self.scopes.last().is_some_and(Scope::is_var_scope);
        if kind == BindingKind::Var {
            // Var-like, but listed as a function rather than a var name.
            if self.scopes.last().is_some_and(|scope| scope.lexical.contains(name)) {
                self.tolerate(
                    diagnostic_codes::IDENTIFIER_ALREADY_DECLARED,
                    &[name.as_str()],
                    range,
                    position,
                )?;
            }
            if let Some(scope) = self.scopes.last_mut() {
                scope.var.insert(name.clone());
            }
        } else if kind == BindingKind::Lexical && at_body_level {
            let Some(scope) = self.scopes.last_mut() else {
                return Ok(());
            };
            let redeclared = scope.lexical.contains(name)
                || scope.functions.contains(name)
                || scope.var.contains(name);
            scope.lexical.insert(name.clone());
            if self.module && scope.flags.contains(ScopeFlags::TOP) {
                self.undefined_exports.remove(name);
            }
            if redeclared {
                self.tolerate(
                    diagnostic_codes::IDENTIFIER_ALREADY_DECLARED,
                    &[name.as_str()],
                    range,
                    position,
                )?;
            }
        } else {
            self.declare_name(name, kind, range, position)?;
        }
        if at_body_level && let Some(scope) = self.var_scope_mut() {
            scope.hoisting.add_function(name);
        }
        Ok(())
    }

    /// Whether `name` is declared at the top level of the program.
    pub(crate) fn is_declared_at_top(&self, name: &Atom) -> bool {
        self.scopes
            .first()
            .is_some_and(|scope| scope.lexical.contains(name) || scope.var.contains(name))
    }

    // =========================================================================
    // Labels
    // =========================================================================

    /// Labels that directly label the statement starting at `start`.
    pub(crate) fn labels_for(&self, start: u32) -> crate::ast::LabelSet {
        self.labels
            .iter()
            .filter(|label| label.statement_start == start)
            .map(|label| label.name.clone())
            .collect()
    }

    pub(crate) fn find_label(&self, name: &str) -> Option<&Label> {
        self.labels.iter().rev().find(|label| label.name.as_str() == name)
    }

    // =========================================================================
    // Private names
    // =========================================================================

    pub(crate) fn enter_class_body(&mut self) {
        self.private_scopes.push(PrivateScope::default());
    }

    /// Resolve private names used in the class body. Names not declared here
    /// move to the enclosing class, or are reported at the outermost one.
    pub(crate) fn exit_class_body(&mut self) -> PResult<()> {
        let Some(scope) = self.private_scopes.pop() else {
            return Ok(());
        };
        for (name, range, position) in scope.used {
            if scope.declared.contains_key(&name) {
                continue;
            }
            if let Some(parent) = self.private_scopes.last_mut() {
                parent.used.push((name, range, position));
            } else {
                self.tolerate(
                    diagnostic_codes::UNDECLARED_PRIVATE_NAME,
                    &[name.as_str()],
                    range,
                    position,
                )?;
            }
        }
        Ok(())
    }

    pub(crate) fn declare_private_name(
        &mut self,
        name: &Atom,
        kind: PrivateNameKind,
        is_static: bool,
        range: Range,
        position: Position,
    ) -> PResult<()> {
        if name.as_str() == "constructor" {
            return self.tolerate(diagnostic_codes::PRIVATE_NAME_CONSTRUCTOR, &[], range, position);
        }
        let Some(scope) = self.private_scopes.last_mut() else {
            return Ok(());
        };
        let duplicate = match scope.declared.get(name).copied() {
            None => {
                scope.declared.insert(name.clone(), (kind, is_static));
                false
            }
            Some((existing, existing_static)) => {
                let pairs = matches!(
                    (existing, kind),
                    (PrivateNameKind::Getter, PrivateNameKind::Setter)
                        | (PrivateNameKind::Setter, PrivateNameKind::Getter)
                );
                if pairs && existing_static == is_static {
                    scope
                        .declared
                        .insert(name.clone(), (PrivateNameKind::Accessor, is_static));
                    false
                } else {
                    true
                }
            }
        };
        if duplicate {
            self.tolerate(
                diagnostic_codes::DUPLICATE_PRIVATE_NAME,
                &[name.as_str()],
                range,
                position,
            )?;
        }
        Ok(())
    }

    pub(crate) fn use_private_name(&mut self, name: &Atom, range: Range, position: Position) -> PResult<()> {
        match self.private_scopes.last_mut() {
            Some(scope) => {
                scope.used.push((name.clone(), range, position));
                Ok(())
            }
            None => self.tolerate(
                diagnostic_codes::UNDECLARED_PRIVATE_NAME,
                &[name.as_str()],
                range,
                position,
            ),
        }
    }
}
