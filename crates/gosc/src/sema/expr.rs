//! Actions for expression productions
//!
//! A well-typed expression node carries exactly one type, size and place.
//! Its instructions are moved up into the parent, so after translation the
//! root holds the code of the whole unit in source order.

use crate::common::DiagnosticKind;
use crate::ir::{BinOp, Inst, Literal, Place, Temp, UnOp};
use crate::node::{Node, Opcode, Production};
use crate::types::{Primitive, Type};

use super::Context;
use super::context::BLANK;
use super::operators::{binary_kinds, binary_result, unary_kinds};

/// Type and place of a well-typed value node
pub(super) fn operand(node: &Node) -> Option<(Type, Place)> {
    node.value().map(|(ty, place)| (ty.clone(), place.clone()))
}

/// Whether an expression denotes a storage location
pub(super) fn is_addressable(node: &Node) -> bool {
    match node.production {
        Production::OperandName | Production::Index | Production::Selector => true,
        Production::UnaryExpr => node.attrs.extra.opcode == Some(Opcode::Unary(UnOp::Deref)),
        _ => false,
    }
}

pub(crate) fn parse_int(text: &str) -> Option<i64> {
    match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => i64::from_str_radix(hex, 16).ok(),
        None => text.parse().ok(),
    }
}

/// Contents of a string literal with its quotes removed
pub(super) fn unquote(text: &str) -> String {
    if let Some(raw) = text.strip_prefix('`') {
        return raw.strip_suffix('`').unwrap_or(raw).to_string();
    }
    let inner = text.strip_prefix('"').unwrap_or(text);
    let inner = inner.strip_suffix('"').unwrap_or(inner);

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

impl Context {
    /// Type and place of a node used where exactly one value is expected
    ///
    /// A checked call with no result or several results is reported here.
    pub(super) fn single_value(&mut self, line: usize, node: &Node) -> Option<(Type, Place)> {
        if node.attrs.extra.opcode == Some(Opcode::Call) && node.attrs.types.len() != 1 {
            let name = node.children.first().and_then(Node::ident).unwrap_or("function");
            let message = if node.attrs.types.is_empty() {
                format!("{}() (no value) used as value", name)
            } else {
                format!("multiple-value {}() in single-value context", name)
            };
            self.report(DiagnosticKind::TypeError, line, message);
            return None;
        }
        operand(node)
    }

    /// Values of an expression list, one entry per value
    ///
    /// A list made of a single call with several results stands for all of
    /// them. Entries are `None` where an error was already reported.
    pub(super) fn list_values(&mut self, line: usize, list: &Node) -> Vec<Option<(Type, Place)>> {
        match list.children.as_slice() {
            [single] if single.attrs.types.len() > 1 => single
                .attrs
                .types
                .iter()
                .cloned()
                .zip(single.attrs.places.iter().cloned())
                .map(Some)
                .collect(),
            children => children.iter().map(|c| self.single_value(line, c)).collect(),
        }
    }

    /// Allocate a temporary holding `ty`, returning the node and the temp
    fn value_node(&mut self, production: Production, line: usize, ty: Type) -> (Node, Temp) {
        let dst = self.fresh_temp();
        let size = self.size_of(&ty);
        (Node::of_value(production, line, ty, size, Place::Temp(dst)), dst)
    }

    fn literal(&mut self, production: Production, line: usize, ty: Type, value: Literal) -> Node {
        let (node, dst) = self.value_node(production, line, ty);
        node.with_code(vec![Inst::Const { dst, value }])
    }

    pub fn int_lit(&mut self, line: usize, text: &str) -> Node {
        match parse_int(text) {
            Some(n) => self.literal(Production::IntLit, line, Type::int(), Literal::Int(n)),
            None => {
                self.report(
                    DiagnosticKind::TypeError,
                    line,
                    format!("constant {} overflows int", text),
                );
                Node::new(Production::IntLit, line)
            }
        }
    }

    pub fn float_lit(&mut self, line: usize, text: &str) -> Node {
        match text.parse::<f64>() {
            Ok(x) => self.literal(Production::FloatLit, line, Type::float(), Literal::Float(x)),
            Err(_) => {
                self.report(
                    DiagnosticKind::TypeError,
                    line,
                    format!("malformed constant {}", text),
                );
                Node::new(Production::FloatLit, line)
            }
        }
    }

    pub fn string_lit(&mut self, line: usize, text: &str) -> Node {
        let value = Literal::Str(unquote(text));
        self.literal(Production::StringLit, line, Type::string(), value)
    }

    pub fn bool_lit(&mut self, line: usize, value: bool) -> Node {
        self.literal(Production::BoolLit, line, Type::boolean(), Literal::Bool(value))
    }

    /// Identifier used as a value
    pub fn operand_name(&mut self, line: usize, name: &str) -> Node {
        let binding = self.lookup(name).map(|s| (s.ty.clone(), s.size));
        let mut node = match binding {
            Some((Some(ty), size)) => {
                Node::of_value(Production::OperandName, line, ty, size, Place::var(name))
            }
            // Declared with a type that failed; reported at the declaration
            Some((None, _)) => Node::new(Production::OperandName, line),
            None if name == BLANK || self.scope().is_package(name) => {
                Node::new(Production::OperandName, line)
            }
            None if self.scope().resolves_to_type(name) => {
                self.report(
                    DiagnosticKind::TypeError,
                    line,
                    format!("{} is a type, not an expression", name),
                );
                Node::new(Production::OperandName, line)
            }
            None => {
                self.report(DiagnosticKind::NameError, line, format!("{} not declared", name));
                Node::new(Production::OperandName, line)
            }
        };
        node.attrs.idents.push(name.to_string());
        node
    }

    pub fn binary(&mut self, line: usize, op: BinOp, mut lhs: Node, mut rhs: Node) -> Node {
        let allowed = binary_kinds(op);
        let mut code = lhs.take_code();
        code.extend(rhs.take_code());

        let mut node = match (self.single_value(line, &lhs), self.single_value(line, &rhs)) {
            (Some((lt, lp)), Some((rt, rp))) => {
                if lt != rt {
                    self.report(
                        DiagnosticKind::TypeMismatch,
                        line,
                        format!("different types {} and {} for operator {}", lt, rt, op),
                    );
                    Node::new(Production::BinaryExpr, line)
                } else if !lt.primitive().is_some_and(|k| allowed.contains(k)) {
                    self.report(
                        DiagnosticKind::TypeMismatch,
                        line,
                        format!("invalid type for operator {}: {}", op, lt),
                    );
                    Node::new(Production::BinaryExpr, line)
                } else {
                    let (node, dst) = self.value_node(Production::BinaryExpr, line, binary_result(op, &lt));
                    code.push(Inst::Binary { op, dst, lhs: lp, rhs: rp });
                    node
                }
            }
            _ => Node::new(Production::BinaryExpr, line),
        };

        node.attrs.extra.allowed = allowed;
        node.with_opcode(Opcode::Binary(op))
            .with_code(code)
            .with_children(vec![lhs, rhs])
    }

    pub fn unary(&mut self, line: usize, op: UnOp, mut operand_node: Node) -> Node {
        let allowed = unary_kinds(op);
        let mut code = operand_node.take_code();

        let result = self.single_value(line, &operand_node).and_then(|(ty, src)| {
            if ty.primitive().is_some_and(|k| allowed.contains(k)) {
                return Some((ty, src));
            }
            match op {
                UnOp::Not => {
                    self.report(DiagnosticKind::TypeMismatch, line, "type should be boolean");
                }
                _ => {
                    self.report(
                        DiagnosticKind::TypeMismatch,
                        line,
                        format!("invalid type for operator {}: {}", op, ty),
                    );
                }
            }
            None
        });

        let mut node = match result {
            Some((ty, src)) => {
                let (node, dst) = self.value_node(Production::UnaryExpr, line, ty);
                code.push(Inst::Unary { op, dst, src });
                node
            }
            None => Node::new(Production::UnaryExpr, line),
        };
        node.attrs.extra.allowed = allowed;
        node.with_opcode(Opcode::Unary(op))
            .with_code(code)
            .with_child(operand_node)
    }

    /// `T(x)` where `target` is the type node for `T`
    pub fn conversion(&mut self, line: usize, target: Node, mut expr: Node) -> Node {
        let mut code = expr.take_code();

        let value = self.single_value(line, &expr);
        let node = match (target.ty().cloned(), value) {
            (Some(to), Some((from, src))) => {
                let numeric = |t: &Type| t.is(Primitive::Int) || t.is(Primitive::Float);
                let valid = from == to
                    || (from.primitive().is_some() && from.primitive() == to.primitive())
                    || (numeric(&from) && numeric(&to))
                    || (to.is(Primitive::String) && from.is(Primitive::Int));
                if valid {
                    let name = to.to_string();
                    let (node, dst) = self.value_node(Production::Conversion, line, to);
                    code.push(Inst::Convert { dst, ty: name, src });
                    node
                } else {
                    self.report(
                        DiagnosticKind::TypeMismatch,
                        line,
                        format!("cannot convert {} to {}", from, to),
                    );
                    Node::new(Production::Conversion, line)
                }
            }
            _ => Node::new(Production::Conversion, line),
        };
        node.with_code(code).with_children(vec![target, expr])
    }

    /// `a[i]`
    pub fn index(&mut self, line: usize, mut base: Node, mut index: Node) -> Node {
        let mut code = base.take_code();
        code.extend(index.take_code());

        let element = self.single_value(line, &base).and_then(|(ty, place)| {
            let element = if ty.is(Primitive::String) {
                Type::int()
            } else if let Some(element) = ty.element() {
                element.clone()
            } else {
                self.report(DiagnosticKind::TypeError, line, format!("cannot index {}", ty));
                return None;
            };
            Some((element, place))
        });

        let index_value = self.single_value(line, &index);
        if let Some((ty, _)) = &index_value {
            if !ty.is(Primitive::Int) {
                self.report(DiagnosticKind::TypeError, line, "index type should be integer");
            }
        }

        let node = match (element, index_value) {
            (Some((element, base_place)), Some((index_ty, index_place))) if index_ty.is(Primitive::Int) => {
                let (node, dst) = self.value_node(Production::Index, line, element);
                code.push(Inst::Index { dst, base: base_place, index: index_place });
                node
            }
            _ => Node::new(Production::Index, line),
        };
        node.with_code(code).with_children(vec![base, index])
    }

    /// `a[lo:hi]` with either bound optional
    pub fn slice_expr(&mut self, line: usize, mut base: Node, low: Option<Node>, high: Option<Node>) -> Node {
        let mut code = base.take_code();
        let mut bounds = Vec::new();
        let mut bounds_ok = true;
        let mut places = Vec::new();

        for bound in [low, high] {
            let Some(mut bound) = bound else {
                places.push(None);
                continue;
            };
            code.extend(bound.take_code());
            match self.single_value(line, &bound) {
                Some((ty, place)) if ty.is(Primitive::Int) => places.push(Some(place)),
                Some(_) => {
                    self.report(DiagnosticKind::TypeError, line, "index type should be integer");
                    bounds_ok = false;
                }
                None => bounds_ok = false,
            }
            bounds.push(bound);
        }

        let sliced = self.single_value(line, &base).and_then(|(ty, place)| {
            let result = if ty.is(Primitive::String) {
                ty
            } else if let Some(element) = ty.element() {
                Type::slice_of(element.clone())
            } else {
                self.report(DiagnosticKind::TypeError, line, format!("cannot slice {}", ty));
                return None;
            };
            Some((result, place))
        });

        let node = match sliced {
            Some((ty, place)) if bounds_ok => {
                let (node, dst) = self.value_node(Production::SliceExpr, line, ty);
                let mut places = places.into_iter();
                code.push(Inst::Slice {
                    dst,
                    base: place,
                    low: places.next().flatten(),
                    high: places.next().flatten(),
                });
                node
            }
            _ => Node::new(Production::SliceExpr, line),
        };

        let mut children = vec![base];
        children.extend(bounds);
        node.with_code(code).with_children(children)
    }

    /// `x.f`
    pub fn selector(&mut self, line: usize, mut base: Node, field: &str) -> Node {
        let mut code = base.take_code();

        let mut node = match self.single_value(line, &base) {
            Some((ty, place)) => match ty.as_struct().and_then(|s| s.field(field)).cloned() {
                Some(f) => {
                    let (node, dst) = self.value_node(Production::Selector, line, f.ty);
                    code.push(Inst::Field {
                        dst,
                        base: place,
                        field: f.name,
                        offset: f.offset,
                    });
                    node
                }
                None => {
                    self.report(
                        DiagnosticKind::TypeError,
                        line,
                        format!("type {} has no field or method {}", ty, field),
                    );
                    Node::new(Production::Selector, line)
                }
            },
            // Members of imported packages are not checked
            None => Node::new(Production::Selector, line),
        };
        node.attrs.idents.push(field.to_string());
        node.with_code(code).with_child(base)
    }

    /// `f(args)`
    pub fn call(&mut self, line: usize, mut callee: Node, args: Option<Node>) -> Node {
        let mut code = callee.take_code();
        let mut args = args.unwrap_or_else(|| Node::new(Production::ExpressionList, line));
        code.extend(args.take_code());

        let callee_name = callee.ident().unwrap_or("function").to_string();
        let signature = match callee.ty() {
            Some(ty) => match ty.as_signature() {
                Some(sig) => Some(sig.clone()),
                None => {
                    self.report(
                        DiagnosticKind::TypeError,
                        line,
                        format!("cannot call non-function {} (type {})", callee_name, ty),
                    );
                    None
                }
            },
            None => None,
        };

        let node = match (signature, callee.place().cloned()) {
            (Some(sig), Some(func)) => {
                let values = self.list_values(line, &args);
                if values.len() != sig.params.len() {
                    let which = if values.len() < sig.params.len() {
                        "not enough"
                    } else {
                        "too many"
                    };
                    self.report(
                        DiagnosticKind::AssignmentMismatch,
                        line,
                        format!(
                            "{} arguments in call to {}: have {}, want {}",
                            which,
                            callee_name,
                            values.len(),
                            sig.params.len()
                        ),
                    );
                } else {
                    for (value, param) in values.iter().zip(&sig.params) {
                        if let Some((ty, _)) = value {
                            if ty != param {
                                self.report(
                                    DiagnosticKind::TypeMismatch,
                                    line,
                                    format!("cannot use {} as {} value in argument to {}", ty, param, callee_name),
                                );
                            }
                        }
                    }
                }

                let mut node = Node::new(Production::Call, line);
                let mut dst = Vec::new();
                for result in sig.results {
                    let t = self.fresh_temp();
                    node.attrs.sizes.push(self.size_of(&result));
                    node.attrs.types.push(result);
                    node.attrs.places.push(Place::Temp(t));
                    dst.push(t);
                }
                let args = values.into_iter().flatten().map(|(_, place)| place).collect();
                code.push(Inst::Call { dst, func, args });
                node.with_opcode(Opcode::Call)
            }
            _ => Node::new(Production::Call, line),
        };
        node.with_code(code).with_children(vec![callee, args])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn messages(ctx: &Context) -> Vec<String> {
        ctx.diagnostics().iter().map(|d| d.message.clone()).collect()
    }

    #[test]
    fn test_literals_allocate_fresh_temporaries() {
        let mut ctx = Context::default();
        let a = ctx.int_lit(1, "0x10");
        let b = ctx.string_lit(1, r#""a\tb""#);
        assert_eq!(a.place(), Some(&Place::Temp(Temp(0))));
        assert_eq!(b.place(), Some(&Place::Temp(Temp(1))));
        assert_eq!(a.code()[0].to_string(), "t0 = 16");
        assert_eq!(b.code(), &[Inst::Const { dst: Temp(1), value: Literal::Str("a\tb".into()) }]);
    }

    #[test]
    fn test_binary_on_equal_types() {
        let mut ctx = Context::default();
        let lhs = ctx.int_lit(1, "1");
        let rhs = ctx.int_lit(1, "2");
        let node = ctx.binary(1, BinOp::Add, lhs, rhs);
        assert_eq!(node.ty(), Some(&Type::int()));
        assert_eq!(node.place(), Some(&Place::Temp(Temp(2))));
        let code: Vec<_> = node.code().iter().map(ToString::to_string).collect();
        assert_eq!(code, vec!["t0 = 1", "t1 = 2", "t2 = t0 + t1"]);
        assert!(ctx.diagnostics().is_empty());
    }

    #[test]
    fn test_binary_type_errors() {
        let mut ctx = Context::default();
        let lhs = ctx.int_lit(5, "1");
        let rhs = ctx.string_lit(5, "\"x\"");
        let mixed = ctx.binary(5, BinOp::Add, lhs, rhs);
        assert!(mixed.ty().is_none());

        let lhs = ctx.bool_lit(6, true);
        let rhs = ctx.bool_lit(6, false);
        let bad = ctx.binary(6, BinOp::Lt, lhs, rhs);
        assert!(bad.ty().is_none());

        assert_eq!(
            messages(&ctx),
            vec![
                "different types int and string for operator +",
                "invalid type for operator <: bool",
            ]
        );
        assert_eq!(ctx.diagnostics().count(DiagnosticKind::TypeMismatch), 2);
    }

    #[test]
    fn test_errors_do_not_cascade() {
        let mut ctx = Context::default();
        let missing = ctx.operand_name(2, "y");
        let one = ctx.int_lit(2, "1");
        let sum = ctx.binary(2, BinOp::Add, missing, one);
        let two = ctx.int_lit(2, "2");
        let product = ctx.binary(2, BinOp::Mul, sum, two);
        assert!(product.ty().is_none());
        assert_eq!(messages(&ctx), vec!["y not declared"]);
        assert_eq!(ctx.diagnostics().count(DiagnosticKind::NameError), 1);
    }

    #[test]
    fn test_comparison_yields_bool() {
        let mut ctx = Context::default();
        let lhs = ctx.float_lit(1, "1.5");
        let rhs = ctx.float_lit(1, "2.");
        let node = ctx.binary(1, BinOp::Ge, lhs, rhs);
        assert_eq!(node.ty(), Some(&Type::boolean()));
        assert_eq!(node.size(), Some(1));
    }

    #[test]
    fn test_not_requires_bool() {
        let mut ctx = Context::default();
        let n = ctx.int_lit(3, "1");
        let node = ctx.unary(3, UnOp::Not, n);
        assert!(node.ty().is_none());
        assert_eq!(messages(&ctx), vec!["type should be boolean"]);
    }

    #[test]
    fn test_address_and_indirection_keep_the_operand_type() {
        let mut ctx = Context::default();
        ctx.declare(1, "x", Some(Type::int()));
        let x = ctx.operand_name(1, "x");
        let deref = ctx.unary(1, UnOp::Deref, x);
        assert_eq!(deref.ty(), Some(&Type::int()));
        let x = ctx.operand_name(1, "x");
        let addr = ctx.unary(1, UnOp::AddrOf, x);
        assert_eq!(addr.ty(), Some(&Type::int()));
        assert_eq!(addr.code()[0].to_string(), "t1 = &x");
        assert!(ctx.diagnostics().is_empty());

        let flag = ctx.bool_lit(2, true);
        let bad = ctx.unary(2, UnOp::AddrOf, flag);
        assert!(bad.ty().is_none());
        assert_eq!(messages(&ctx), vec!["invalid type for operator &: bool"]);
    }

    #[test]
    fn test_arithmetic_rejects_float_and_string_except_quotient() {
        let mut ctx = Context::default();
        let lhs = ctx.float_lit(1, "1.5");
        let rhs = ctx.float_lit(1, "2.5");
        let quotient = ctx.binary(1, BinOp::Div, lhs, rhs);
        assert_eq!(quotient.ty(), Some(&Type::float()));

        let lhs = ctx.float_lit(2, "1.5");
        let rhs = ctx.float_lit(2, "2.5");
        ctx.binary(2, BinOp::Sub, lhs, rhs);
        let lhs = ctx.string_lit(3, "\"x\"");
        let rhs = ctx.string_lit(3, "\"y\"");
        ctx.binary(3, BinOp::Add, lhs, rhs);

        assert_eq!(
            messages(&ctx),
            vec![
                "invalid type for operator -: float",
                "invalid type for operator +: string",
            ]
        );
    }

    #[test]
    fn test_index_and_slice() {
        let mut ctx = Context::default();
        let arr = Type::Array { element: Box::new(Type::string()), count: 3 };
        ctx.declare(1, "a", Some(arr));

        let a = ctx.operand_name(1, "a");
        let i = ctx.int_lit(1, "1");
        let elem = ctx.index(1, a, i);
        assert_eq!(elem.ty(), Some(&Type::string()));

        let a = ctx.operand_name(2, "a");
        let f = ctx.float_lit(2, "1.0");
        let bad = ctx.index(2, a, f);
        assert!(bad.ty().is_none());
        assert_eq!(messages(&ctx), vec!["index type should be integer"]);

        let a = ctx.operand_name(3, "a");
        let hi = ctx.int_lit(3, "2");
        let part = ctx.slice_expr(3, a, None, Some(hi));
        assert_eq!(part.ty(), Some(&Type::slice_of(Type::string())));
        assert_eq!(part.code().last().unwrap().to_string(), "t4 = a[:t3]");
    }

    #[test]
    fn test_selector_reads_field_offsets() {
        let mut ctx = Context::default();
        let layout = ctx
            .type_table()
            .layout_struct(vec![("a".into(), Type::int()), ("b".into(), Type::float())])
            .unwrap();
        ctx.declare(1, "s", Some(Type::pointer_to(Type::Struct(layout))));

        let s = ctx.operand_name(1, "s");
        let b = ctx.selector(1, s, "b");
        assert_eq!(b.ty(), Some(&Type::float()));
        assert_eq!(b.code()[0].to_string(), "t0 = s.b @4");

        let s = ctx.operand_name(2, "s");
        let missing = ctx.selector(2, s, "c");
        assert!(missing.ty().is_none());
        assert_eq!(ctx.diagnostics().count(DiagnosticKind::TypeError), 1);
    }

    #[test]
    fn test_calls_check_arguments() {
        let mut ctx = Context::default();
        let sig = crate::types::Signature {
            params: vec![Type::int(), Type::int()],
            results: vec![Type::int(), Type::boolean()],
        };
        ctx.declare(1, "divmod", Some(Type::Func(sig)));

        let f = ctx.operand_name(1, "divmod");
        let a = ctx.int_lit(1, "7");
        let b = ctx.int_lit(1, "2");
        let args = ctx.expression_list(1, vec![a, b]);
        let call = ctx.call(1, f, Some(args));
        assert_eq!(call.attrs.types, vec![Type::int(), Type::boolean()]);
        assert_eq!(call.code().last().unwrap().to_string(), "t2, t3 = call divmod(t0, t1)");

        let f = ctx.operand_name(2, "divmod");
        let a = ctx.string_lit(2, "\"7\"");
        let args = ctx.expression_list(2, vec![a]);
        ctx.call(2, f, Some(args));
        assert_eq!(
            messages(&ctx),
            vec!["not enough arguments in call to divmod: have 1, want 2"]
        );
        assert_eq!(ctx.diagnostics().count(DiagnosticKind::AssignmentMismatch), 1);
    }

    #[test]
    fn test_inner_type_hides_outer_variable() {
        let mut ctx = Context::default();
        ctx.declare(1, "x", Some(Type::int()));
        ctx.enter_scope();
        ctx.define_type(2, "x", Some(Type::float()));

        let node = ctx.operand_name(3, "x");
        assert!(node.ty().is_none());
        assert_eq!(messages(&ctx), vec!["x is a type, not an expression"]);
        assert_eq!(ctx.diagnostics().count(DiagnosticKind::TypeError), 1);

        ctx.exit_scope();
        let node = ctx.operand_name(4, "x");
        assert_eq!(node.ty(), Some(&Type::int()));
    }

    #[test]
    fn test_calls_in_single_value_positions() {
        let mut ctx = Context::default();
        let none = crate::types::Signature { params: vec![], results: vec![] };
        let two = crate::types::Signature {
            params: vec![],
            results: vec![Type::int(), Type::int()],
        };
        ctx.declare(1, "g", Some(Type::Func(none)));
        ctx.declare(1, "two", Some(Type::Func(two)));

        let f = ctx.operand_name(2, "two");
        let call = ctx.call(2, f, None);
        let one = ctx.int_lit(2, "1");
        let sum = ctx.binary(2, BinOp::Add, call, one);
        assert!(sum.ty().is_none());

        let f = ctx.operand_name(3, "g");
        let call = ctx.call(3, f, None);
        let neg = ctx.unary(3, UnOp::Neg, call);
        assert!(neg.ty().is_none());

        // a lone call in a list stands for all of its results
        let f = ctx.operand_name(4, "two");
        let call = ctx.call(4, f, None);
        let list = ctx.expression_list(4, vec![call]);
        assert_eq!(ctx.list_values(4, &list).len(), 2);

        assert_eq!(
            messages(&ctx),
            vec![
                "multiple-value two() in single-value context",
                "g() (no value) used as value",
            ]
        );
        assert_eq!(ctx.diagnostics().count(DiagnosticKind::TypeError), 2);
    }

    #[test]
    fn test_conversions() {
        let mut ctx = Context::default();
        let target = ctx.primitive_type(1, Primitive::Float);
        let n = ctx.int_lit(1, "3");
        let node = ctx.conversion(1, target, n);
        assert_eq!(node.ty(), Some(&Type::float()));
        assert_eq!(node.code()[1].to_string(), "t1 = float(t0)");

        let target = ctx.primitive_type(2, Primitive::Bool);
        let n = ctx.int_lit(2, "3");
        ctx.conversion(2, target, n);
        assert_eq!(messages(&ctx), vec!["cannot convert int to bool"]);
    }

    #[test]
    fn test_imported_packages_resolve_silently() {
        let mut ctx = Context::default();
        ctx.import_spec(1, None, "\"fmt\"");
        let fmt = ctx.operand_name(2, "fmt");
        let println = ctx.selector(2, fmt, "Println");
        let call = ctx.call(2, println, None);
        assert!(call.ty().is_none());
        assert!(ctx.diagnostics().is_empty());
    }
}
