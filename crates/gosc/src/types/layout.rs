//! Size and layout calculation

use std::collections::HashMap;

use thiserror::Error;

use super::descriptor::{Field, Primitive, StructType, Type};

/// Byte sizes of the primitive kinds and of pointers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeConfig {
    pub int: usize,
    pub float: usize,
    pub bool: usize,
    pub string: usize,
    pub pointer: usize,
}

impl SizeConfig {
    pub fn primitive(&self, kind: Primitive) -> usize {
        match kind {
            Primitive::Int => self.int,
            Primitive::Float => self.float,
            Primitive::Bool => self.bool,
            Primitive::String => self.string,
        }
    }
}

impl Default for SizeConfig {
    fn default() -> Self {
        Self {
            int: 4,
            float: 8,
            bool: 1,
            string: 4,
            pointer: 4,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("field {0} redeclared")]
    DuplicateField(String),

    #[error("array bound must be non-negative")]
    NegativeBound(i64),

    #[error("type is too large")]
    TooLarge,
}

/// Per-compilation table of type sizes
///
/// Sizes of defined types are cached under their name when the definition
/// is registered, so later lookups by name do not recompute them.
#[derive(Debug, Clone, Default)]
pub struct TypeTable {
    sizes: SizeConfig,
    named: HashMap<String, usize>,
}

impl TypeTable {
    pub fn new(sizes: SizeConfig) -> Self {
        Self {
            sizes,
            named: HashMap::new(),
        }
    }

    pub fn size_of(&self, ty: &Type) -> usize {
        match ty {
            Type::Primitive(p) => self.sizes.primitive(*p),
            Type::Named { name, underlying } => self
                .named
                .get(name)
                .copied()
                .unwrap_or_else(|| self.size_of(underlying)),
            Type::Pointer(_) | Type::Func(_) => self.sizes.pointer,
            // Arrays are bounded when built, see `array_type`
            Type::Array { element, count } => count.saturating_mul(self.size_of(element)),
            Type::Slice(_) => 0,
            Type::Struct(s) => s.size,
        }
    }

    /// Record the size of a defined type under its name
    pub fn register_named(&mut self, name: impl Into<String>, size: usize) {
        self.named.insert(name.into(), size);
    }

    pub fn named_size(&self, name: &str) -> Option<usize> {
        self.named.get(name).copied()
    }

    /// Lay out struct fields in declaration order
    pub fn layout_struct(&self, fields: Vec<(String, Type)>) -> Result<StructType, LayoutError> {
        for (i, (name, _)) in fields.iter().enumerate() {
            if fields[..i].iter().any(|(earlier, _)| earlier == name) {
                return Err(LayoutError::DuplicateField(name.clone()));
            }
        }

        let mut offset: usize = 0;
        let mut laid_out = Vec::with_capacity(fields.len());
        for (name, ty) in fields {
            let size = self.size_of(&ty);
            let next = offset.checked_add(size).ok_or(LayoutError::TooLarge)?;
            laid_out.push(Field { name, ty, size, offset });
            offset = next;
        }

        Ok(StructType { fields: laid_out, size: offset })
    }

    /// Build an array type, or a slice type when the bound is absent
    pub fn array_type(&self, element: Type, bound: Option<i64>) -> Result<Type, LayoutError> {
        match bound {
            None => Ok(Type::slice_of(element)),
            Some(n) if n < 0 => Err(LayoutError::NegativeBound(n)),
            Some(n) => {
                let count = usize::try_from(n).map_err(|_| LayoutError::TooLarge)?;
                count
                    .checked_mul(self.size_of(&element))
                    .ok_or(LayoutError::TooLarge)?;
                Ok(Type::array_of(element, count))
            }
        }
    }
}
