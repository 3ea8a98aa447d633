//! Synthesized-attribute nodes
//!
//! Every reduction produces one [`Node`]: the production it came from, the
//! line it was reduced on, its synthesized [`Attributes`], and the child
//! nodes it was built from. Children are kept so the full derivation can be
//! exported as a graph after translation.

use crate::ir::{AssignOp, BinOp, IncDec, Inst, Place, UnOp};
use crate::types::{KindSet, Type};

/// Grammar category a node was reduced from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Production {
    SourceFile,
    PackageClause,
    ImportDecl,
    ImportSpec,
    ConstDecl,
    ConstSpec,
    VarDecl,
    VarSpec,
    TypeDecl,
    TypeDef,
    AliasDecl,
    FunctionDecl,
    Signature,
    Parameters,
    ParameterDecl,
    IdentifierList,
    ExpressionList,
    Block,
    StatementList,
    ShortVarDecl,
    Assignment,
    IncDecStmt,
    ExpressionStmt,
    EmptyStmt,
    IfStmt,
    ForStmt,
    ForClause,
    RangeClause,
    Condition,
    ReturnStmt,
    BreakStmt,
    ContinueStmt,
    BinaryExpr,
    UnaryExpr,
    OperandName,
    IntLit,
    FloatLit,
    StringLit,
    BoolLit,
    Conversion,
    Index,
    SliceExpr,
    Selector,
    Call,
    PrimitiveType,
    TypeName,
    ArrayType,
    SliceType,
    PointerType,
    StructType,
    FieldDecl,
}

impl Production {
    pub fn name(&self) -> String {
        format!("{:?}", self)
    }
}

/// Operator carried by a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    Binary(BinOp),
    Unary(UnOp),
    Assign(AssignOp),
    Step(IncDec),
    /// Call whose callee resolved to a function
    Call,
}

/// Auxiliary tags attached to a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Extra {
    pub opcode: Option<Opcode>,
    /// Kinds the node's operator accepts
    pub allowed: KindSet,
    /// Literal array bound, `None` for slices
    pub bound: Option<i64>,
}

/// Synthesized attributes of a node
///
/// For expression and type nodes the lists hold exactly one entry when the
/// node is well typed and are empty when an error was reported below it.
/// List productions concatenate their children's entries in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes {
    pub types: Vec<Type>,
    pub sizes: Vec<usize>,
    pub places: Vec<Place>,
    pub idents: Vec<String>,
    pub code: Vec<Inst>,
    pub extra: Extra,
}

impl Attributes {
    /// Append another node's lists after this one's
    pub fn extend(&mut self, other: &Attributes) {
        self.types.extend(other.types.iter().cloned());
        self.sizes.extend(other.sizes.iter().copied());
        self.places.extend(other.places.iter().cloned());
        self.idents.extend(other.idents.iter().cloned());
        self.code.extend(other.code.iter().cloned());
    }
}

/// Attribute bag produced by one reduction
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub production: Production,
    pub line: usize,
    pub attrs: Attributes,
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(production: Production, line: usize) -> Self {
        Self {
            production,
            line,
            attrs: Attributes::default(),
            children: Vec::new(),
        }
    }

    /// Node describing a type: one type and its size, no place
    pub fn of_type(production: Production, line: usize, ty: Type, size: usize) -> Self {
        let mut node = Self::new(production, line);
        node.attrs.types.push(ty);
        node.attrs.sizes.push(size);
        node
    }

    /// Node describing a value held in `place`
    pub fn of_value(production: Production, line: usize, ty: Type, size: usize, place: Place) -> Self {
        let mut node = Self::of_type(production, line, ty, size);
        node.attrs.places.push(place);
        node
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_code(mut self, code: Vec<Inst>) -> Self {
        self.attrs.code = code;
        self
    }

    pub fn with_opcode(mut self, opcode: Opcode) -> Self {
        self.attrs.extra.opcode = Some(opcode);
        self
    }

    pub fn ty(&self) -> Option<&Type> {
        self.attrs.types.first()
    }

    pub fn size(&self) -> Option<usize> {
        self.attrs.sizes.first().copied()
    }

    pub fn place(&self) -> Option<&Place> {
        self.attrs.places.first()
    }

    /// Type and place of a well-typed value node
    pub fn value(&self) -> Option<(&Type, &Place)> {
        Some((self.ty()?, self.place()?))
    }

    pub fn ident(&self) -> Option<&str> {
        self.attrs.idents.first().map(String::as_str)
    }

    pub fn code(&self) -> &[Inst] {
        &self.attrs.code
    }

    /// Take the instructions out of this node, leaving it without code
    pub fn take_code(&mut self) -> Vec<Inst> {
        std::mem::take(&mut self.attrs.code)
    }

    /// Number of nodes in this subtree, including `self`
    pub fn count(&self) -> usize {
        let mut count = 0;
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            count += 1;
            pending.extend(node.children.iter());
        }
        count
    }

    /// Pre-order search for the first node of a production
    pub fn find(&self, production: Production) -> Option<&Node> {
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            if node.production == production {
                return Some(node);
            }
            pending.extend(node.children.iter().rev());
        }
        None
    }
}
