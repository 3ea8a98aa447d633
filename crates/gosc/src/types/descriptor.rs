//! Type descriptors

use std::fmt;

/// Built-in scalar kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Int,
    Float,
    Bool,
    String,
}

impl Primitive {
    pub fn name(&self) -> &'static str {
        match self {
            Primitive::Int => "int",
            Primitive::Float => "float",
            Primitive::Bool => "bool",
            Primitive::String => "string",
        }
    }

    fn bit(self) -> u8 {
        match self {
            Primitive::Int => 1,
            Primitive::Float => 1 << 1,
            Primitive::Bool => 1 << 2,
            Primitive::String => 1 << 3,
        }
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Set of primitive kinds an operator accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KindSet(u8);

impl KindSet {
    pub const EMPTY: KindSet = KindSet(0);
    pub const ALL: KindSet = KindSet(0b1111);

    pub fn of(kinds: &[Primitive]) -> Self {
        Self(kinds.iter().fold(0, |bits, k| bits | k.bit()))
    }

    pub fn contains(&self, kind: Primitive) -> bool {
        self.0 & kind.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

/// A struct field with its computed layout
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub ty: Type,
    pub size: usize,
    pub offset: usize,
}

/// Laid-out struct: fields in declaration order plus total size
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StructType {
    pub fields: Vec<Field>,
    pub size: usize,
}

impl StructType {
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Parameter and result types of a function
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Signature {
    pub params: Vec<Type>,
    pub results: Vec<Type>,
}

/// Recursive type descriptor
#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    Primitive(Primitive),
    /// Defined type: `type Celsius float`
    Named { name: String, underlying: Box<Type> },
    Pointer(Box<Type>),
    Array { element: Box<Type>, count: usize },
    Slice(Box<Type>),
    Struct(StructType),
    Func(Signature),
}

impl Type {
    pub fn int() -> Self {
        Type::Primitive(Primitive::Int)
    }

    pub fn float() -> Self {
        Type::Primitive(Primitive::Float)
    }

    pub fn boolean() -> Self {
        Type::Primitive(Primitive::Bool)
    }

    pub fn string() -> Self {
        Type::Primitive(Primitive::String)
    }

    pub fn pointer_to(base: Type) -> Self {
        Type::Pointer(Box::new(base))
    }

    pub fn slice_of(element: Type) -> Self {
        Type::Slice(Box::new(element))
    }

    pub fn array_of(element: Type, count: usize) -> Self {
        Type::Array {
            element: Box::new(element),
            count,
        }
    }

    pub fn named(name: impl Into<String>, underlying: Type) -> Self {
        Type::Named {
            name: name.into(),
            underlying: Box::new(underlying),
        }
    }

    /// The type with any `Named` layers stripped
    pub fn resolved(&self) -> &Type {
        match self {
            Type::Named { underlying, .. } => underlying.resolved(),
            other => other,
        }
    }

    /// Primitive kind of this type, seen through defined types
    pub fn primitive(&self) -> Option<Primitive> {
        match self.resolved() {
            Type::Primitive(p) => Some(*p),
            _ => None,
        }
    }

    pub fn is(&self, kind: Primitive) -> bool {
        self.primitive() == Some(kind)
    }

    /// Element type produced by indexing or ranging over this type
    pub fn element(&self) -> Option<&Type> {
        match self.resolved() {
            Type::Array { element, .. } | Type::Slice(element) => Some(element),
            _ => None,
        }
    }

    pub fn as_struct(&self) -> Option<&StructType> {
        match self.resolved() {
            Type::Struct(s) => Some(s),
            // Selectors look through one level of pointer
            Type::Pointer(base) => match base.resolved() {
                Type::Struct(s) => Some(s),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn as_signature(&self) -> Option<&Signature> {
        match self.resolved() {
            Type::Func(sig) => Some(sig),
            _ => None,
        }
    }
}

impl From<Primitive> for Type {
    fn from(p: Primitive) -> Self {
        Type::Primitive(p)
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, types: &[Type]) -> fmt::Result {
    for (i, ty) in types.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", ty)?;
    }
    Ok(())
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Primitive(p) => write!(f, "{}", p),
            Type::Named { name, .. } => write!(f, "{}", name),
            Type::Pointer(base) => write!(f, "*{}", base),
            Type::Array { element, count } => write!(f, "[{}]{}", count, element),
            Type::Slice(element) => write!(f, "[]{}", element),
            Type::Struct(s) => {
                write!(f, "struct {{")?;
                for (i, field) in s.fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ";")?;
                    }
                    write!(f, " {} {}", field.name, field.ty)?;
                }
                write!(f, " }}")
            }
            Type::Func(sig) => {
                write!(f, "func(")?;
                write_list(f, &sig.params)?;
                write!(f, ")")?;
                match sig.results.as_slice() {
                    [] => Ok(()),
                    [single] => write!(f, " {}", single),
                    many => {
                        write!(f, " (")?;
                        write_list(f, many)?;
                        write!(f, ")")
                    }
                }
            }
        }
    }
}
