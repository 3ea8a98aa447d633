//! IR instruction definitions

use std::fmt;

/// A temporary value (virtual register)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Temp(pub u32);

impl fmt::Display for Temp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

/// Storage location: a declared variable or a generated temporary
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Place {
    Var(String),
    Temp(Temp),
}

impl Place {
    pub fn var(name: impl Into<String>) -> Self {
        Place::Var(name.into())
    }

    pub fn as_var(&self) -> Option<&str> {
        match self {
            Place::Var(name) => Some(name),
            Place::Temp(_) => None,
        }
    }
}

impl From<Temp> for Place {
    fn from(t: Temp) -> Self {
        Place::Temp(t)
    }
}

impl fmt::Display for Place {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Place::Var(name) => write!(f, "{}", name),
            Place::Temp(t) => write!(f, "{}", t),
        }
    }
}

/// Literal constant as written in the source
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Int(n) => write!(f, "{}", n),
            Literal::Float(x) => write!(f, "{:?}", x),
            Literal::Str(s) => write!(f, "{:?}", s),
            Literal::Bool(b) => write!(f, "{}", b),
        }
    }
}

/// Binary operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    LogOr,
    LogAnd,
    Or,
    Xor,
    And,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Shl,
    Shr,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BinOp::LogOr => "||",
            BinOp::LogAnd => "&&",
            BinOp::Or => "|",
            BinOp::Xor => "^",
            BinOp::And => "&",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Gt => ">",
            BinOp::Ge => ">=",
            BinOp::Shl => "<<",
            BinOp::Shr => ">>",
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Rem => "%",
        };
        f.write_str(s)
    }
}

/// Unary operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    Plus,
    Neg,
    Not,
    Deref,
    AddrOf,
}

impl fmt::Display for UnOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            UnOp::Plus => "+",
            UnOp::Neg => "-",
            UnOp::Not => "!",
            UnOp::Deref => "*",
            UnOp::AddrOf => "&",
        };
        f.write_str(s)
    }
}

/// `=` or one of the compound forms such as `+=`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    Assign,
    Compound(BinOp),
}

impl fmt::Display for AssignOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssignOp::Assign => write!(f, "="),
            AssignOp::Compound(op) => write!(f, "{}=", op),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncDec {
    Inc,
    Dec,
}

impl fmt::Display for IncDec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IncDec::Inc => write!(f, "++"),
            IncDec::Dec => write!(f, "--"),
        }
    }
}

/// IR instruction
#[derive(Debug, Clone, PartialEq)]
pub enum Inst {
    /// dst = literal
    Const { dst: Temp, value: Literal },

    /// dst = src (copy)
    Copy { dst: Place, src: Place },

    /// dst op= src
    Compound { op: BinOp, dst: Place, src: Place },

    /// dst = lhs op rhs
    Binary { op: BinOp, dst: Temp, lhs: Place, rhs: Place },

    /// dst = op src
    Unary { op: UnOp, dst: Temp, src: Place },

    /// dst = T(src)
    Convert { dst: Temp, ty: String, src: Place },

    /// dst = base[index]
    Index { dst: Temp, base: Place, index: Place },

    /// dst = base[low:high]
    Slice { dst: Temp, base: Place, low: Option<Place>, high: Option<Place> },

    /// dst = base.field, located at `offset` bytes into the struct
    Field { dst: Temp, base: Place, field: String, offset: usize },

    /// [d1, d2 =] call func(args), one destination per result
    Call { dst: Vec<Temp>, func: Place, args: Vec<Place> },

    /// place++ / place--
    Step { op: IncDec, place: Place },

    /// return values
    Return(Vec<Place>),
}

impl Inst {
    /// The place written by this instruction, if any
    /// For calls with several results, the first of them.
    pub fn dest(&self) -> Option<Place> {
        match self {
            Inst::Const { dst, .. }
            | Inst::Binary { dst, .. }
            | Inst::Unary { dst, .. }
            | Inst::Convert { dst, .. }
            | Inst::Index { dst, .. }
            | Inst::Slice { dst, .. }
            | Inst::Field { dst, .. } => Some(Place::Temp(*dst)),
            Inst::Copy { dst, .. } | Inst::Compound { dst, .. } => Some(dst.clone()),
            Inst::Call { dst, .. } => dst.first().copied().map(Place::Temp),
            Inst::Step { place, .. } => Some(place.clone()),
            Inst::Return(_) => None,
        }
    }
}

fn write_places(f: &mut fmt::Formatter<'_>, places: &[Place]) -> fmt::Result {
    for (i, p) in places.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", p)?;
    }
    Ok(())
}

impl fmt::Display for Inst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Inst::Const { dst, value } => write!(f, "{} = {}", dst, value),
            Inst::Copy { dst, src } => write!(f, "{} = {}", dst, src),
            Inst::Compound { op, dst, src } => write!(f, "{} {}= {}", dst, op, src),
            Inst::Binary { op, dst, lhs, rhs } => write!(f, "{} = {} {} {}", dst, lhs, op, rhs),
            Inst::Unary { op, dst, src } => write!(f, "{} = {}{}", dst, op, src),
            Inst::Convert { dst, ty, src } => write!(f, "{} = {}({})", dst, ty, src),
            Inst::Index { dst, base, index } => write!(f, "{} = {}[{}]", dst, base, index),
            Inst::Slice { dst, base, low, high } => {
                write!(f, "{} = {}[", dst, base)?;
                if let Some(low) = low {
                    write!(f, "{}", low)?;
                }
                write!(f, ":")?;
                if let Some(high) = high {
                    write!(f, "{}", high)?;
                }
                write!(f, "]")
            }
            Inst::Field { dst, base, field, offset } => {
                write!(f, "{} = {}.{} @{}", dst, base, field, offset)
            }
            Inst::Call { dst, func, args } => {
                if !dst.is_empty() {
                    for (i, t) in dst.iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{}", t)?;
                    }
                    write!(f, " = ")?;
                }
                write!(f, "call {}(", func)?;
                write_places(f, args)?;
                write!(f, ")")
            }
            Inst::Step { op, place } => write!(f, "{}{}", place, op),
            Inst::Return(values) => {
                write!(f, "return")?;
                if !values.is_empty() {
                    write!(f, " ")?;
                    write_places(f, values)?;
                }
                Ok(())
            }
        }
    }
}
