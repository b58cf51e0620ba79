//! Names hoisted to the top of a function or program body.

use esz_common::Atom;
use rustc_hash::FxHashSet;

/// Declarations a body hoists, computed while the body is parsed.
///
/// `var_names` includes `var` declarations nested in blocks, loops and `catch`
/// clauses, but not those inside nested functions. `function_declarations`
/// lists only functions declared directly in the body, in source order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HoistingScope {
    pub var_names: Vec<Atom>,
    pub function_declarations: Vec<Atom>,
    /// `let`, `const` and `class` names declared directly in the body.
    pub lexical_names: Vec<Atom>,
}

impl HoistingScope {
    pub fn is_empty(&self) -> bool {
        self.var_names.is_empty()
            && self.function_declarations.is_empty()
            && self.lexical_names.is_empty()
    }

    pub fn declares_var(&self, name: &str) -> bool {
        self.var_names.iter().any(|n| n.as_str() == name)
    }

    pub fn declares_function(&self, name: &str) -> bool {
        self.function_declarations.iter().any(|n| n.as_str() == name)
    }
}

/// Collects a [`HoistingScope`] without duplicate `var` names.
#[derive(Debug, Default)]
pub(crate) struct HoistingBuilder {
    scope: HoistingScope,
    seen_vars: FxHashSet<Atom>,
}

impl HoistingBuilder {
    pub(crate) fn add_var(&mut self, name: &Atom) {
        if self.seen_vars.insert(name.clone()) {
            self.scope.var_names.push(name.clone());
        }
    }

    pub(crate) fn add_function(&mut self, name: &Atom) {
        self.scope.function_declarations.push(name.clone());
    }

    pub(crate) fn add_lexical(&mut self, name: &Atom) {
        self.scope.lexical_names.push(name.clone());
    }

    pub(crate) fn finish(self) -> HoistingScope {
        self.scope
    }
}
