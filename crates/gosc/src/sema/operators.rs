//! Operand kinds accepted by each operator

use crate::ir::{AssignOp, BinOp, UnOp};
use crate::types::Primitive as P;
use crate::types::{KindSet, Type};

/// Kinds a binary operator accepts for its (equal) operand types
pub fn binary_kinds(op: BinOp) -> KindSet {
    match op {
        BinOp::LogOr | BinOp::LogAnd => KindSet::of(&[P::Bool]),
        BinOp::Eq | BinOp::Ne => KindSet::of(&[P::Bool, P::Int, P::String, P::Float]),
        BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge => KindSet::of(&[P::Int, P::String, P::Float]),
        BinOp::Div => KindSet::of(&[P::Int, P::Float]),
        BinOp::Add
        | BinOp::Sub
        | BinOp::Mul
        | BinOp::Rem
        | BinOp::And
        | BinOp::Or
        | BinOp::Xor
        | BinOp::Shl
        | BinOp::Shr => KindSet::of(&[P::Int]),
    }
}

/// Whether the operator yields `bool` regardless of its operand type
pub fn yields_bool(op: BinOp) -> bool {
    matches!(
        op,
        BinOp::LogOr
            | BinOp::LogAnd
            | BinOp::Eq
            | BinOp::Ne
            | BinOp::Lt
            | BinOp::Le
            | BinOp::Gt
            | BinOp::Ge
    )
}

/// Result type of a well-typed binary application
pub fn binary_result(op: BinOp, operand: &Type) -> Type {
    if yields_bool(op) {
        Type::boolean()
    } else {
        operand.clone()
    }
}

/// Kinds a unary operator accepts; the result keeps the operand's type
pub fn unary_kinds(op: UnOp) -> KindSet {
    match op {
        UnOp::Not => KindSet::of(&[P::Bool]),
        UnOp::Plus | UnOp::Neg | UnOp::Deref | UnOp::AddrOf => {
            KindSet::of(&[P::Int, P::Float, P::String])
        }
    }
}

/// Kinds an assignment operator accepts. Plain `=` takes any type, including
/// composite ones, which is signalled by `None`. Every compound form is
/// integer-only.
pub fn assign_kinds(op: AssignOp) -> Option<KindSet> {
    match op {
        AssignOp::Assign => None,
        AssignOp::Compound(_) => Some(KindSet::of(&[P::Int])),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quotient_accepts_float_but_remainder_does_not() {
        assert!(binary_kinds(BinOp::Div).contains(P::Float));
        assert!(!binary_kinds(BinOp::Rem).contains(P::Float));
        assert!(!binary_kinds(BinOp::Shl).contains(P::String));
    }

    #[test]
    fn test_arithmetic_is_integer_only_except_quotient() {
        for op in [BinOp::Add, BinOp::Sub, BinOp::Mul, BinOp::And, BinOp::Xor] {
            let kinds = binary_kinds(op);
            assert!(kinds.contains(P::Int), "{}", op);
            assert!(!kinds.contains(P::Float), "{}", op);
            assert!(!kinds.contains(P::String), "{}", op);
        }
    }

    #[test]
    fn test_comparisons_yield_bool() {
        assert_eq!(binary_result(BinOp::Lt, &Type::string()), Type::boolean());
        assert_eq!(binary_result(BinOp::Add, &Type::int()), Type::int());
        assert!(!binary_kinds(BinOp::Lt).contains(P::Bool));
        assert!(binary_kinds(BinOp::Eq).contains(P::Bool));
    }

    #[test]
    fn test_assignment_operator_sets() {
        assert_eq!(assign_kinds(AssignOp::Assign), None);
        let shl = assign_kinds(AssignOp::Compound(BinOp::Shl)).unwrap();
        assert!(shl.contains(P::Int));
        assert!(!shl.contains(P::Float));
        let div = assign_kinds(AssignOp::Compound(BinOp::Div)).unwrap();
        assert!(!div.contains(P::Float));
    }

    #[test]
    fn test_not_requires_bool() {
        assert!(unary_kinds(UnOp::Not).contains(P::Bool));
        assert!(!unary_kinds(UnOp::Not).contains(P::Int));
        assert!(!unary_kinds(UnOp::Neg).contains(P::Bool));
    }

    #[test]
    fn test_address_and_indirection_share_the_arithmetic_kinds() {
        for op in [UnOp::Deref, UnOp::AddrOf] {
            assert!(unary_kinds(op).contains(P::Int));
            assert!(unary_kinds(op).contains(P::String));
            assert!(!unary_kinds(op).contains(P::Bool));
        }
    }
}
