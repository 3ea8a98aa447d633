//! Actions for statement and list productions

use crate::common::DiagnosticKind;
use crate::ir::{AssignOp, IncDec, Inst, Place};
use crate::node::{Node, Opcode, Production};
use crate::types::{Primitive, Type};

use super::Context;
use super::expr::{is_addressable, operand};
use super::operators::assign_kinds;

/// What follows `for` before the body
#[derive(Debug)]
pub enum LoopHeader {
    /// `for { ... }`
    Infinite,
    Condition(Node),
    Clause {
        init: Option<Node>,
        cond: Option<Node>,
        post: Option<Node>,
    },
    Range(Node),
}

/// Left-hand side of a range clause
#[derive(Debug)]
pub enum RangeTargets {
    /// `for range x`
    Discard,
    /// `for k, v := range x`, an identifier list
    Define(Node),
    /// `for a[i], b = range x`, an expression list
    Assign(Node),
}

/// Concatenate the code of `nodes` in order, taking it out of each
fn collect_code<'a>(nodes: impl IntoIterator<Item = &'a mut Node>) -> Vec<Inst> {
    nodes.into_iter().flat_map(Node::take_code).collect()
}

impl Context {
    pub fn identifier_list(&mut self, line: usize, names: Vec<String>) -> Node {
        let mut node = Node::new(Production::IdentifierList, line);
        node.attrs.idents = names;
        node
    }

    /// Parallel lists of the expressions in order
    pub fn expression_list(&mut self, line: usize, mut exprs: Vec<Node>) -> Node {
        let mut node = Node::new(Production::ExpressionList, line);
        for expr in &mut exprs {
            node.attrs.code.extend(expr.take_code());
            node.attrs.extend(&expr.attrs);
        }
        node.with_children(exprs)
    }

    pub fn statement_list(&mut self, line: usize, mut stmts: Vec<Node>) -> Node {
        let code = collect_code(&mut stmts);
        Node::new(Production::StatementList, line)
            .with_code(code)
            .with_children(stmts)
    }

    pub fn block(&mut self, line: usize, mut stmts: Node) -> Node {
        let code = stmts.take_code();
        Node::new(Production::Block, line)
            .with_code(code)
            .with_child(stmts)
    }

    pub fn empty_stmt(&mut self, line: usize) -> Node {
        Node::new(Production::EmptyStmt, line)
    }

    pub fn expression_stmt(&mut self, line: usize, mut expr: Node) -> Node {
        let code = expr.take_code();
        Node::new(Production::ExpressionStmt, line)
            .with_code(code)
            .with_child(expr)
    }

    /// Report an assignment to a constant; `false` if the target is one
    fn check_not_constant(&mut self, line: usize, target: &Node) -> bool {
        if target.production != Production::OperandName {
            return true;
        }
        match target.ident() {
            Some(name) if self.is_constant(name) => {
                self.report(
                    DiagnosticKind::ConstantAssignment,
                    line,
                    format!("cannot assign to constant {}", name),
                );
                false
            }
            _ => true,
        }
    }

    /// `a, b op= x, y`
    pub fn assignment(&mut self, line: usize, op: AssignOp, mut lhs: Node, mut rhs: Node) -> Node {
        let mut code = lhs.take_code();
        code.extend(rhs.take_code());
        let values = self.list_values(line, &rhs);

        if lhs.children.len() != values.len() {
            self.report(
                DiagnosticKind::AssignmentMismatch,
                line,
                format!(
                    "assignment mismatch: {} variables but {} values",
                    lhs.children.len(),
                    values.len()
                ),
            );
        } else if matches!(op, AssignOp::Compound(_)) && values.len() != 1 {
            self.report(
                DiagnosticKind::AssignmentMismatch,
                line,
                format!("assignment operation {} requires single-valued expressions", op),
            );
        } else {
            for (target, value) in lhs.children.iter().zip(values) {
                if !self.check_not_constant(line, target) {
                    continue;
                }
                let Some((lt, lp)) = operand(target) else { continue };
                if !is_addressable(target) {
                    self.report(
                        DiagnosticKind::TypeError,
                        line,
                        format!("cannot assign to {} value", lt),
                    );
                    continue;
                }
                let Some((rt, rp)) = value else { continue };

                if lt != rt {
                    self.report(
                        DiagnosticKind::TypeMismatch,
                        line,
                        format!("{} assigned to {}", rt, lt),
                    );
                    continue;
                }
                if let Some(kinds) = assign_kinds(op) {
                    if !lt.primitive().is_some_and(|k| kinds.contains(k)) {
                        self.report(
                            DiagnosticKind::TypeMismatch,
                            line,
                            format!("invalid type for operator {}: {}", op, lt),
                        );
                        continue;
                    }
                }

                code.push(match op {
                    AssignOp::Assign => Inst::Copy { dst: lp, src: rp },
                    AssignOp::Compound(bin) => Inst::Compound { op: bin, dst: lp, src: rp },
                });
            }
        }

        Node::new(Production::Assignment, line)
            .with_opcode(Opcode::Assign(op))
            .with_code(code)
            .with_children(vec![lhs, rhs])
    }

    /// `x++` / `x--`
    pub fn inc_dec(&mut self, line: usize, op: IncDec, mut target: Node) -> Node {
        let mut code = target.take_code();

        if self.check_not_constant(line, &target) {
            if let Some((ty, place)) = self.single_value(line, &target) {
                if !ty.is(Primitive::Int) {
                    let verb = match op {
                        IncDec::Inc => "incremented",
                        IncDec::Dec => "decremented",
                    };
                    self.report(
                        DiagnosticKind::TypeMismatch,
                        line,
                        format!("{} cannot be {}", ty, verb),
                    );
                } else if !is_addressable(&target) {
                    self.report(
                        DiagnosticKind::TypeError,
                        line,
                        format!("cannot assign to {} value", ty),
                    );
                } else {
                    code.push(Inst::Step { op, place });
                }
            }
        }

        Node::new(Production::IncDecStmt, line)
            .with_opcode(Opcode::Step(op))
            .with_code(code)
            .with_child(target)
    }

    /// Bind each name to the type of its value in the active scope
    ///
    /// On an arity mismatch every name is still bound, without a type, so
    /// later uses are not reported again.
    pub fn short_var_decl(&mut self, line: usize, names: Node, mut values: Node) -> Node {
        let mut node = Node::new(Production::ShortVarDecl, line);
        let mut code = values.take_code();
        let vals = self.list_values(line, &values);
        let idents = names.attrs.idents.clone();

        if idents.len() != vals.len() {
            self.report(
                DiagnosticKind::AssignmentMismatch,
                line,
                format!(
                    "assignment mismatch: {} variables but {} values",
                    idents.len(),
                    vals.len()
                ),
            );
            for name in &idents {
                self.declare(line, name, None);
            }
        } else {
            for (name, value) in idents.iter().zip(vals) {
                let ty = value.as_ref().map(|(ty, _)| ty.clone());
                if !self.declare(line, name, ty) {
                    continue;
                }
                if let Some((ty, place)) = value {
                    node.attrs.sizes.push(self.size_of(&ty));
                    node.attrs.types.push(ty);
                    code.push(Inst::Copy { dst: Place::var(name), src: place });
                }
            }
        }

        node.attrs.idents = idents;
        node.with_code(code).with_children(vec![names, values])
    }

    /// Boolean condition of `if` or `for`
    pub fn condition(&mut self, line: usize, mut expr: Node) -> Node {
        let code = expr.take_code();
        let mut node = Node::new(Production::Condition, line);

        if let Some((ty, place)) = self.single_value(line, &expr) {
            if ty.is(Primitive::Bool) {
                node.attrs.sizes.push(self.size_of(&ty));
                node.attrs.types.push(ty);
                node.attrs.places.push(place);
            } else {
                self.report(
                    DiagnosticKind::TypeMismatch,
                    line,
                    format!("expression type should be bool, found {}", ty),
                );
            }
        }
        node.with_code(code).with_child(expr)
    }

    /// `if [init;] cond { ... } [else ...]`; code is init, cond, then, else
    pub fn if_stmt(&mut self, line: usize, init: Option<Node>, cond: Node, then: Node, els: Option<Node>) -> Node {
        let mut children: Vec<Node> = init.into_iter().collect();
        children.push(cond);
        children.push(then);
        children.extend(els);

        let code = collect_code(&mut children);
        Node::new(Production::IfStmt, line)
            .with_code(code)
            .with_children(children)
    }

    /// `for header { body }`; code is init, cond, body, post
    pub fn for_stmt(&mut self, line: usize, header: LoopHeader, mut body: Node) -> Node {
        let mut code = Vec::new();
        let mut post_code = Vec::new();
        let mut children = Vec::new();

        match header {
            LoopHeader::Infinite => {}
            LoopHeader::Condition(mut cond) | LoopHeader::Range(mut cond) => {
                code.extend(cond.take_code());
                children.push(cond);
            }
            LoopHeader::Clause { init, cond, post } => {
                let mut parts: Vec<Node> = init.into_iter().chain(cond).collect();
                code.extend(collect_code(&mut parts));
                if let Some(mut post) = post {
                    post_code = post.take_code();
                    parts.push(post);
                }
                children.push(Node::new(Production::ForClause, line).with_children(parts));
            }
        }

        code.extend(body.take_code());
        code.extend(post_code);
        children.push(body);
        Node::new(Production::ForStmt, line)
            .with_code(code)
            .with_children(children)
    }

    /// `[targets] range x`
    pub fn range_clause(&mut self, line: usize, targets: RangeTargets, mut expr: Node) -> Node {
        let mut code = expr.take_code();

        let iteration = self.single_value(line, &expr).and_then(|(ty, _)| {
            if ty.is(Primitive::String) {
                Some((Type::int(), Type::int()))
            } else if let Some(element) = ty.element() {
                Some((Type::int(), element.clone()))
            } else {
                self.report(
                    DiagnosticKind::TypeError,
                    line,
                    format!("cannot range over {}", ty),
                );
                None
            }
        });

        let mut node = Node::new(Production::RangeClause, line);
        match targets {
            RangeTargets::Discard => {}
            RangeTargets::Define(names) => {
                let idents = names.attrs.idents.clone();
                if idents.len() > 2 {
                    self.report(
                        DiagnosticKind::AssignmentMismatch,
                        line,
                        "range clause permits at most two iteration variables",
                    );
                    for name in &idents {
                        self.declare(line, name, None);
                    }
                } else {
                    let kinds = iteration.map(|(k, v)| [k, v]);
                    for (i, name) in idents.iter().enumerate() {
                        let ty = kinds.as_ref().map(|kv| kv[i].clone());
                        if self.declare(line, name, ty.clone()) {
                            if let Some(ty) = ty {
                                node.attrs.sizes.push(self.size_of(&ty));
                                node.attrs.types.push(ty);
                            }
                        }
                    }
                }
                node.attrs.idents = idents;
                node.children.push(names);
            }
            RangeTargets::Assign(mut targets) => {
                code.extend(targets.take_code());
                if targets.children.len() > 2 {
                    self.report(
                        DiagnosticKind::AssignmentMismatch,
                        line,
                        "range clause permits at most two iteration variables",
                    );
                } else if let Some((key, value)) = iteration {
                    for (target, rt) in targets.children.iter().zip([key, value]) {
                        if !self.check_not_constant(line, target) {
                            continue;
                        }
                        if let Some((lt, _)) = operand(target) {
                            if lt != rt {
                                self.report(
                                    DiagnosticKind::TypeMismatch,
                                    line,
                                    format!("{} assigned to {}", rt, lt),
                                );
                            }
                        }
                    }
                }
                node.children.push(targets);
            }
        }

        node.children.push(expr);
        node.with_code(code)
    }

    /// `return [values]`, checked against the enclosing function's results
    pub fn return_stmt(&mut self, line: usize, values: Option<Node>) -> Node {
        let mut node = Node::new(Production::ReturnStmt, line);
        let mut values = values.unwrap_or_else(|| Node::new(Production::ExpressionList, line));
        let mut code = values.take_code();
        let vals = self.list_values(line, &values);

        let expected = self.current_function().and_then(|f| f.results.clone());
        if let Some(results) = expected {
            if vals.len() != results.len() {
                let which = if vals.len() > results.len() {
                    "too many"
                } else {
                    "not enough"
                };
                self.report(
                    DiagnosticKind::AssignmentMismatch,
                    line,
                    format!(
                        "{} return values: have {}, want {}",
                        which,
                        vals.len(),
                        results.len()
                    ),
                );
            } else {
                for (value, want) in vals.iter().zip(&results) {
                    if let Some((have, _)) = value {
                        if have != want {
                            self.report(
                                DiagnosticKind::TypeMismatch,
                                line,
                                format!("cannot use {} as {} value in return statement", have, want),
                            );
                        }
                    }
                }
            }
        }

        let places = vals.into_iter().flatten().map(|(_, place)| place).collect();
        code.push(Inst::Return(places));
        node.attrs.code = code;
        node.with_child(values)
    }

    fn loop_control(&mut self, line: usize, production: Production, keyword: &str) -> Node {
        if !self.in_loop() {
            self.report(
                DiagnosticKind::ControlError,
                line,
                format!("{} is not in a loop", keyword),
            );
        }
        Node::new(production, line)
    }

    pub fn break_stmt(&mut self, line: usize) -> Node {
        self.loop_control(line, Production::BreakStmt, "break")
    }

    pub fn continue_stmt(&mut self, line: usize) -> Node {
        self.loop_control(line, Production::ContinueStmt, "continue")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{BinOp, Temp};
    use pretty_assertions::assert_eq;

    fn messages(ctx: &Context) -> Vec<String> {
        ctx.diagnostics().iter().map(|d| d.message.clone()).collect()
    }

    fn names(ctx: &mut Context, names: &[&str]) -> Node {
        ctx.identifier_list(1, names.iter().map(|n| n.to_string()).collect())
    }

    fn targets(ctx: &mut Context, line: usize, names: &[&str]) -> Node {
        let exprs = names.iter().map(|n| ctx.operand_name(line, n)).collect();
        ctx.expression_list(line, exprs)
    }

    #[test]
    fn test_string_assigned_to_int() {
        let mut ctx = Context::default();
        ctx.declare(1, "x", Some(Type::int()));
        let lhs = targets(&mut ctx, 2, &["x"]);
        let a = ctx.string_lit(2, "\"a\"");
        let rhs = ctx.expression_list(2, vec![a]);
        let node = ctx.assignment(2, AssignOp::Assign, lhs, rhs);

        assert_eq!(messages(&ctx), vec!["string assigned to int"]);
        assert_eq!(ctx.diagnostics().count(DiagnosticKind::TypeMismatch), 1);
        // only the literal's instruction survives
        assert_eq!(node.code().len(), 1);
    }

    #[test]
    fn test_constant_target_is_rejected_regardless_of_type() {
        let mut ctx = Context::default();
        ctx.declare_constant(1, "c", Some(Type::int()));
        let lhs = targets(&mut ctx, 2, &["c"]);
        let two = ctx.string_lit(2, "\"2\"");
        let rhs = ctx.expression_list(2, vec![two]);
        ctx.assignment(2, AssignOp::Assign, lhs, rhs);

        assert_eq!(messages(&ctx), vec!["cannot assign to constant c"]);
        assert_eq!(ctx.diagnostics().count(DiagnosticKind::ConstantAssignment), 1);
    }

    #[test]
    fn test_assignment_arity() {
        let mut ctx = Context::default();
        ctx.declare(1, "a", Some(Type::int()));
        ctx.declare(1, "b", Some(Type::int()));
        let lhs = targets(&mut ctx, 3, &["a", "b"]);
        let one = ctx.int_lit(3, "1");
        let rhs = ctx.expression_list(3, vec![one]);
        ctx.assignment(3, AssignOp::Assign, lhs, rhs);
        assert_eq!(messages(&ctx), vec!["assignment mismatch: 2 variables but 1 values"]);
    }

    #[test]
    fn test_compound_assignment_is_integer_only() {
        let mut ctx = Context::default();
        ctx.declare(1, "n", Some(Type::int()));
        ctx.declare(1, "f", Some(Type::float()));
        let lhs = targets(&mut ctx, 1, &["n"]);
        let x = ctx.int_lit(1, "2");
        let rhs = ctx.expression_list(1, vec![x]);
        let ok = ctx.assignment(1, AssignOp::Compound(BinOp::Mul), lhs, rhs);
        assert_eq!(ok.code().last().unwrap().to_string(), "n *= t0");

        for (line, op) in [(2, BinOp::Mul), (3, BinOp::Div)] {
            let lhs = targets(&mut ctx, line, &["f"]);
            let x = ctx.float_lit(line, "2.0");
            let rhs = ctx.expression_list(line, vec![x]);
            let node = ctx.assignment(line, AssignOp::Compound(op), lhs, rhs);
            assert_eq!(node.code().len(), 1);
        }
        assert_eq!(
            messages(&ctx),
            vec![
                "invalid type for operator *=: float",
                "invalid type for operator /=: float",
            ]
        );
    }

    #[test]
    fn test_short_var_decl_binds_in_active_scope() {
        let mut ctx = Context::default();
        let ids = names(&mut ctx, &["a", "b"]);
        let one = ctx.int_lit(1, "1");
        let s = ctx.string_lit(1, "\"s\"");
        let vals = ctx.expression_list(1, vec![one, s]);
        let node = ctx.short_var_decl(1, ids, vals);

        assert_eq!(node.attrs.idents.len(), node.attrs.types.len());
        assert_eq!(node.attrs.types.len(), node.attrs.sizes.len());
        assert_eq!(node.attrs.sizes, vec![4, 4]);
        assert_eq!(ctx.lookup("b").unwrap().ty, Some(Type::string()));
        assert_eq!(ctx.lookup("b").unwrap().offset, 4);
        let code: Vec<_> = node.code().iter().map(ToString::to_string).collect();
        assert_eq!(code, vec!["t0 = 1", "t1 = \"s\"", "a = t0", "b = t1"]);
    }

    #[test]
    fn test_short_var_decl_mismatch_binds_untyped_names() {
        let mut ctx = Context::default();
        let ids = names(&mut ctx, &["a", "b"]);
        let one = ctx.int_lit(1, "1");
        let vals = ctx.expression_list(1, vec![one]);
        ctx.short_var_decl(1, ids, vals);

        let use_b = ctx.operand_name(2, "b");
        assert!(use_b.ty().is_none());
        assert_eq!(messages(&ctx), vec!["assignment mismatch: 2 variables but 1 values"]);
    }

    #[test]
    fn test_increment_requires_int() {
        let mut ctx = Context::default();
        ctx.declare(1, "s", Some(Type::string()));
        let s = ctx.operand_name(4, "s");
        ctx.inc_dec(4, IncDec::Inc, s);
        assert_eq!(messages(&ctx), vec!["string cannot be incremented"]);

        ctx.declare(1, "n", Some(Type::int()));
        let n = ctx.operand_name(5, "n");
        let node = ctx.inc_dec(5, IncDec::Dec, n);
        assert_eq!(node.code(), &[Inst::Step { op: IncDec::Dec, place: Place::var("n") }]);
    }

    #[test]
    fn test_condition_must_be_bool() {
        let mut ctx = Context::default();
        let n = ctx.int_lit(7, "1");
        let cond = ctx.condition(7, n);
        assert!(cond.ty().is_none());
        assert_eq!(messages(&ctx), vec!["expression type should be bool, found int"]);
    }

    #[test]
    fn test_for_clause_code_order() {
        let mut ctx = Context::default();
        ctx.declare(1, "i", Some(Type::int()));

        let i = targets(&mut ctx, 1, &["i"]);
        let zero = ctx.int_lit(1, "0");
        let zero = ctx.expression_list(1, vec![zero]);
        let init = ctx.assignment(1, AssignOp::Assign, i, zero);

        let i = ctx.operand_name(1, "i");
        let ten = ctx.int_lit(1, "10");
        let lt = ctx.binary(1, BinOp::Lt, i, ten);
        let cond = ctx.condition(1, lt);

        let i = ctx.operand_name(1, "i");
        let post = ctx.inc_dec(1, IncDec::Inc, i);

        let one = ctx.int_lit(2, "1");
        let body_stmt = ctx.expression_stmt(2, one);
        let list = ctx.statement_list(2, vec![body_stmt]);
        let body = ctx.block(2, list);

        let node = ctx.for_stmt(
            1,
            LoopHeader::Clause { init: Some(init), cond: Some(cond), post: Some(post) },
            body,
        );
        let code: Vec<_> = node.code().iter().map(ToString::to_string).collect();
        assert_eq!(
            code,
            vec!["t0 = 0", "i = t0", "t1 = 10", "t2 = i < t1", "t3 = 1", "i++"]
        );
        assert_eq!(node.children[0].production, Production::ForClause);
        assert_eq!(node.children[0].children.len(), 3);
    }

    #[test]
    fn test_range_declares_key_and_element() {
        let mut ctx = Context::default();
        ctx.declare(1, "xs", Some(Type::slice_of(Type::float())));
        let xs = ctx.operand_name(1, "xs");
        let ids = names(&mut ctx, &["i", "x"]);
        let node = ctx.range_clause(1, RangeTargets::Define(ids), xs);

        assert_eq!(node.attrs.types, vec![Type::int(), Type::float()]);
        assert_eq!(ctx.lookup("x").unwrap().ty, Some(Type::float()));

        ctx.declare(1, "n", Some(Type::int()));
        let n = ctx.operand_name(2, "n");
        ctx.range_clause(2, RangeTargets::Discard, n);
        assert_eq!(messages(&ctx), vec!["cannot range over int"]);
    }

    #[test]
    fn test_return_checks_results() {
        let mut ctx = Context::default();
        ctx.enter_function("f", Some(vec![Type::int()]));
        let s = ctx.string_lit(3, "\"s\"");
        let vals = ctx.expression_list(3, vec![s]);
        let node = ctx.return_stmt(3, Some(vals));
        ctx.return_stmt(4, None);
        ctx.exit_function();

        assert_eq!(node.code().last(), Some(&Inst::Return(vec![Place::Temp(Temp(0))])));
        assert_eq!(
            messages(&ctx),
            vec![
                "cannot use string as int value in return statement",
                "not enough return values: have 0, want 1",
            ]
        );
    }

    #[test]
    fn test_break_outside_loop() {
        let mut ctx = Context::default();
        ctx.break_stmt(9);
        ctx.enter_scope();
        ctx.enter_loop();
        ctx.continue_stmt(10);
        ctx.exit_loop();
        ctx.exit_scope();

        let diags: Vec<_> = ctx.diagnostics().iter().collect();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].kind, DiagnosticKind::ControlError);
        assert_eq!(diags[0].line, 9);
    }
}
