//! Per-compilation translation state

use crate::common::{Config, DiagnosticKind, Diagnostics};
use crate::ir::{Temp, TempAllocator};
use crate::types::{Type, TypeTable};

use super::scope::{LookupMode, Scope, Symbol};

/// The blank identifier
pub const BLANK: &str = "_";

/// Function whose body is being translated
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub name: String,
    /// Declared result types, `None` if any of them failed to resolve
    pub results: Option<Vec<Type>>,
}

/// All mutable state of one translation run
///
/// Every semantic action receives the context explicitly; nothing is shared
/// between runs.
#[derive(Debug)]
pub struct Context {
    scope: Scope,
    diagnostics: Diagnostics,
    temps: TempAllocator,
    types: TypeTable,
    frames: Vec<Frame>,
}

impl Context {
    pub fn new(config: &Config) -> Self {
        Self {
            scope: Scope::new(),
            diagnostics: Diagnostics::new(),
            temps: TempAllocator::new(),
            types: TypeTable::new(config.sizes),
            frames: Vec::new(),
        }
    }

    pub fn report(&mut self, kind: DiagnosticKind, line: usize, message: impl Into<String>) {
        self.diagnostics.push(kind, line, message);
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Consume the context, keeping only its diagnostics
    pub fn finish(self) -> Diagnostics {
        log::debug!(
            "translation finished: {} temporaries, {} diagnostics",
            self.temps.issued(),
            self.diagnostics.len()
        );
        self.diagnostics
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn scope_mut(&mut self) -> &mut Scope {
        &mut self.scope
    }

    pub fn enter_scope(&mut self) {
        self.scope.push_child();
        log::debug!("enter scope at depth {}", self.scope.depth());
    }

    pub fn exit_scope(&mut self) {
        log::debug!("leave scope at depth {}", self.scope.depth());
        self.scope.pop_to_parent();
    }

    pub fn fresh_temp(&mut self) -> Temp {
        self.temps.fresh()
    }

    pub fn type_table(&self) -> &TypeTable {
        &self.types
    }

    pub fn type_table_mut(&mut self) -> &mut TypeTable {
        &mut self.types
    }

    pub fn size_of(&self, ty: &Type) -> usize {
        self.types.size_of(ty)
    }

    /// Bind `name` in the active scope, reporting a redeclaration
    ///
    /// Returns `false` if the name was already bound there; the existing
    /// binding is left untouched in that case. The blank identifier `_` is
    /// never bound.
    pub fn declare(&mut self, line: usize, name: &str, ty: Option<Type>) -> bool {
        if name == BLANK {
            return true;
        }
        let size = ty.as_ref().map_or(0, |t| self.types.size_of(t));
        let depth = self.scope.depth();
        match self.scope.declare(name, ty, size).map(|s| s.offset) {
            Ok(offset) => {
                log::debug!("declare {} at offset {} (size {}, depth {})", name, offset, size, depth);
                true
            }
            Err(err) => {
                self.report(DiagnosticKind::RedeclareError, line, err.to_string());
                false
            }
        }
    }

    /// Bind `name` as a constant
    pub fn declare_constant(&mut self, line: usize, name: &str, ty: Option<Type>) -> bool {
        if !self.declare(line, name, ty) {
            return false;
        }
        // Just declared in the active scope, so the update cannot miss
        self.scope.mark_constant(name).is_ok()
    }

    /// Bind a type name in the active scope, reporting a redeclaration
    pub fn define_type(&mut self, line: usize, name: &str, ty: Option<Type>) -> bool {
        match self.scope.define_type(name, ty) {
            Ok(()) => true,
            Err(err) => {
                self.report(DiagnosticKind::RedeclareError, line, err.to_string());
                false
            }
        }
    }

    /// Nearest visible symbol called `name`
    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.scope.lookup(name, LookupMode::Default).ok()
    }

    /// Whether `name` is a constant visible from the active scope
    pub fn is_constant(&self, name: &str) -> bool {
        self.lookup(name).is_some_and(|s| s.is_const)
    }

    /// Open the scope of a function body
    pub fn enter_function(&mut self, name: &str, results: Option<Vec<Type>>) {
        log::debug!("enter function {}", name);
        self.frames.push(Frame {
            name: name.to_string(),
            results,
        });
        self.enter_scope();
    }

    pub fn exit_function(&mut self) {
        self.exit_scope();
        if let Some(frame) = self.frames.pop() {
            log::debug!("leave function {}", frame.name);
        }
    }

    pub fn current_function(&self) -> Option<&Frame> {
        self.frames.last()
    }

    pub fn enter_loop(&mut self) {
        self.scope.enter_loop();
    }

    pub fn exit_loop(&mut self) {
        self.scope.exit_loop();
    }

    pub fn in_loop(&self) -> bool {
        self.scope.in_loop()
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}
