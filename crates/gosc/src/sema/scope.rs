//! Symbol table and scope management

use std::collections::HashMap;

use thiserror::Error;

use crate::types::Type;

/// A symbol in the symbol table
#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    pub name: String,
    /// `None` when the declaration's type could not be established
    pub ty: Option<Type>,
    pub size: usize,
    /// Byte offset inside the declaring scope's frame
    pub offset: usize,
    pub is_const: bool,
}

/// How far a lookup walks up the scope chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupMode {
    /// Only the active scope
    Current,
    /// The active scope, then each enclosing one up to the root
    Default,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScopeError {
    #[error("{0} already declared")]
    Redeclared(String),

    #[error("{0} not declared")]
    NotDeclared(String),

    #[error("{0} is a type, not an expression")]
    IsType(String),
}

/// In-place change to an existing symbol
#[derive(Debug, Clone, PartialEq)]
pub enum SymbolUpdate {
    Type { ty: Type, size: usize },
    Constant,
}

/// An `import` as recorded on the root scope
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    /// Name the package is referred to by, `None` for dot imports
    pub name: Option<String>,
    pub path: String,
}

/// Scope metadata
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeMetadata {
    pub package: Option<String>,
    pub imports: Vec<Import>,
}

/// A lexical scope
///
/// The active scope owns its parent, so the chain from the active scope to
/// the root is exactly the path lookups traverse. Leaving a scope drops its
/// symbols.
#[derive(Debug, Default)]
pub struct Scope {
    symbols: HashMap<String, Symbol>,
    /// Type definitions and aliases; `None` marks a definition whose type was rejected
    types: HashMap<String, Option<Type>>,
    parent: Option<Box<Scope>>,
    offset: usize,
    depth: usize,
    loop_depth: usize,
    metadata: ScopeMetadata,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    fn binds(&self, name: &str) -> bool {
        self.symbols.contains_key(name) || self.types.contains_key(name)
    }

    /// Declare a symbol in this scope at the current offset
    pub fn declare(&mut self, name: &str, ty: Option<Type>, size: usize) -> Result<&Symbol, ScopeError> {
        if self.binds(name) {
            return Err(ScopeError::Redeclared(name.to_string()));
        }
        let symbol = Symbol {
            name: name.to_string(),
            ty,
            size,
            offset: self.offset,
            is_const: false,
        };
        self.offset += size;
        Ok(self.symbols.entry(name.to_string()).or_insert(symbol))
    }

    /// Define a named type in this scope
    pub fn define_type(&mut self, name: &str, ty: Option<Type>) -> Result<(), ScopeError> {
        if self.binds(name) {
            return Err(ScopeError::Redeclared(name.to_string()));
        }
        self.types.insert(name.to_string(), ty);
        Ok(())
    }

    /// Look up a symbol by name
    ///
    /// A type bound nearer than any symbol of that name hides it.
    pub fn lookup(&self, name: &str, mode: LookupMode) -> Result<&Symbol, ScopeError> {
        if let Some(sym) = self.symbols.get(name) {
            return Ok(sym);
        }
        if self.types.contains_key(name) {
            return Err(ScopeError::IsType(name.to_string()));
        }
        match (&self.parent, mode) {
            (Some(parent), LookupMode::Default) => parent.lookup(name, mode),
            _ => Err(ScopeError::NotDeclared(name.to_string())),
        }
    }

    /// Look up a symbol by name (mutable)
    pub fn lookup_mut(&mut self, name: &str) -> Option<&mut Symbol> {
        if self.symbols.contains_key(name) {
            self.symbols.get_mut(name)
        } else if self.types.contains_key(name) {
            None
        } else if let Some(parent) = &mut self.parent {
            parent.lookup_mut(name)
        } else {
            None
        }
    }

    /// Look up a named type. The inner `None` marks a rejected definition.
    pub fn lookup_type(&self, name: &str) -> Option<Option<&Type>> {
        if let Some(ty) = self.types.get(name) {
            Some(ty.as_ref())
        } else if self.symbols.contains_key(name) {
            None
        } else if let Some(parent) = &self.parent {
            parent.lookup_type(name)
        } else {
            None
        }
    }

    /// Whether the nearest binding of `name` is a type rather than a symbol
    pub fn resolves_to_type(&self, name: &str) -> bool {
        if self.types.contains_key(name) {
            true
        } else if self.symbols.contains_key(name) {
            false
        } else {
            self.parent.as_ref().is_some_and(|p| p.resolves_to_type(name))
        }
    }

    pub fn mark_constant(&mut self, name: &str) -> Result<(), ScopeError> {
        self.update(name, SymbolUpdate::Constant)
    }

    /// Mutate the nearest symbol called `name`
    pub fn update(&mut self, name: &str, update: SymbolUpdate) -> Result<(), ScopeError> {
        let sym = self
            .lookup_mut(name)
            .ok_or_else(|| ScopeError::NotDeclared(name.to_string()))?;
        match update {
            SymbolUpdate::Type { ty, size } => {
                sym.ty = Some(ty);
                sym.size = size;
            }
            SymbolUpdate::Constant => sym.is_const = true,
        }
        Ok(())
    }

    /// Push a new child scope
    pub fn push_child(&mut self) {
        let old_scope = std::mem::take(self);
        self.depth = old_scope.depth + 1;
        self.loop_depth = old_scope.loop_depth;
        self.parent = Some(Box::new(old_scope));
    }

    /// Pop to parent scope, discarding this scope's bindings
    pub fn pop_to_parent(&mut self) -> bool {
        if let Some(parent) = self.parent.take() {
            *self = *parent;
            true
        } else {
            false
        }
    }

    /// Next free offset in this scope
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Nesting depth, 0 for the root
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn enter_loop(&mut self) {
        self.loop_depth += 1;
    }

    pub fn exit_loop(&mut self) {
        self.loop_depth = self.loop_depth.saturating_sub(1);
    }

    pub fn in_loop(&self) -> bool {
        self.loop_depth > 0
    }

    /// Metadata of the root scope
    pub fn metadata(&self) -> &ScopeMetadata {
        match &self.parent {
            Some(parent) => parent.metadata(),
            None => &self.metadata,
        }
    }

    pub fn metadata_mut(&mut self) -> &mut ScopeMetadata {
        match &mut self.parent {
            Some(parent) => parent.metadata_mut(),
            None => &mut self.metadata,
        }
    }

    /// Whether `name` refers to an imported package
    pub fn is_package(&self, name: &str) -> bool {
        self.metadata()
            .imports
            .iter()
            .any(|import| import.name.as_deref() == Some(name))
    }
}
