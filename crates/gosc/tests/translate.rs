//! Whole-program translation through the public API

use go_frontend::driver::write_graph;
use go_frontend::{translate, Config, Diagnostic, DiagnosticKind, Production, Translation, Type};
use pretty_assertions::assert_eq;

fn run(source: &str) -> Translation {
    translate(source, &Config::default())
}

fn kinds(diagnostics: &[Diagnostic]) -> Vec<DiagnosticKind> {
    diagnostics.iter().map(|d| d.kind).collect()
}

fn messages(diagnostics: &[Diagnostic]) -> Vec<&str> {
    diagnostics.iter().map(|d| d.message.as_str()).collect()
}

const PROGRAM: &str = r#"package main

import "fmt"

type Point struct {
	x, y int
}

func sum(xs []int) int {
	total := 0
	for _, v := range xs {
		total += v
	}
	return total
}

func main() {
	var p Point
	p.x = 3
	var arr [4]int
	for i := 0; i < 4; i++ {
		arr[i] = i * p.x
	}
	n := sum(arr[:])
	if n > 10 {
		fmt.Println(n)
	} else if n == 0 {
		return
	}
}
"#;

#[test]
fn test_well_typed_program() {
    let result = run(PROGRAM);
    assert_eq!(messages(&result.diagnostics), Vec::<&str>::new());
    assert!(result.is_success());

    let root = result.root.unwrap();
    assert_eq!(root.production, Production::SourceFile);
    let call = root.find(Production::Call).unwrap();
    assert_eq!(call.ty(), Some(&Type::int()));
}

#[test]
fn test_string_assigned_to_int() {
    let result = run("package main\nfunc main() {\n\tvar x int\n\tx = \"a\"\n}\n");
    assert_eq!(kinds(&result.diagnostics), vec![DiagnosticKind::TypeMismatch]);
    assert_eq!(messages(&result.diagnostics), vec!["string assigned to int"]);
    assert_eq!(result.diagnostics[0].line, 4);
    assert!(result.root.is_some());
}

#[test]
fn test_duplicate_struct_field_reported_once() {
    let source = "package main\ntype S struct {\n\ta int\n\ta float\n}\nvar s S\nfunc main() {\n\ts.a = 1\n}\n";
    let result = run(source);
    assert_eq!(kinds(&result.diagnostics), vec![DiagnosticKind::RedeclareError]);
    assert_eq!(messages(&result.diagnostics), vec!["field a redeclared"]);
}

#[test]
fn test_constant_reassignment() {
    let source = "package main\nconst c int = 1\nfunc main() {\n\tc = 2\n}\n";
    let result = run(source);
    assert_eq!(kinds(&result.diagnostics), vec![DiagnosticKind::ConstantAssignment]);
    assert_eq!(result.diagnostics[0].line, 4);
}

#[test]
fn test_array_size() {
    let result = run("package main\nvar a [3]int\n");
    assert!(result.is_success());
    let root = result.root.unwrap();
    let array = root.find(Production::ArrayType).unwrap();
    assert_eq!(array.size(), Some(12));
    assert_eq!(array.ty(), Some(&Type::array_of(Type::int(), 3)));
    assert_eq!(root.find(Production::VarSpec).unwrap().attrs.sizes, vec![12]);
}

#[test]
fn test_negative_array_bound() {
    let result = run("package main\nvar a [-2]int\nfunc main() {\n\ta[0] = 1\n}\n");
    assert_eq!(kinds(&result.diagnostics), vec![DiagnosticKind::SizeError]);
    assert_eq!(result.diagnostics[0].line, 2);
}

#[test]
fn test_array_too_large() {
    let result = run("package main\nvar a [4611686018427387904]int\n");
    assert_eq!(kinds(&result.diagnostics), vec![DiagnosticKind::SizeError]);
    assert_eq!(messages(&result.diagnostics), vec!["type is too large"]);
    assert_eq!(result.diagnostics[0].line, 2);
    assert!(result.root.is_some());
}

#[test]
fn test_call_results_in_single_value_context() {
    let source = "package main\nfunc g() {\n}\nfunc two() (int, int) {\n\treturn 1, 2\n}\nfunc main() {\n\tg()\n\ta, b := two()\n\tx := g()\n\tvar y int = g()\n\tz := two() + 1\n\ta, b = b, a\n}\n";
    let result = run(source);
    assert_eq!(
        messages(&result.diagnostics),
        vec![
            "g() (no value) used as value",
            "g() (no value) used as value",
            "multiple-value two() in single-value context",
        ]
    );
    assert_eq!(kinds(&result.diagnostics), vec![DiagnosticKind::TypeError; 3]);
    let lines: Vec<_> = result.diagnostics.iter().map(|d| d.line).collect();
    assert_eq!(lines, vec![10, 11, 12]);
}

#[test]
fn test_inner_type_shadows_outer_variable() {
    let source = "package main\nfunc main() {\n\tx := 1\n\t{\n\t\ttype x int\n\t\tx = 2\n\t}\n\tx = 3\n}\n";
    let result = run(source);
    assert_eq!(messages(&result.diagnostics), vec!["x is a type, not an expression"]);
    assert_eq!(result.diagnostics[0].line, 6);
}

#[test]
fn test_redeclaration_and_shadowing() {
    let source = "package main\nfunc main() {\n\tx := 1\n\t{\n\t\tx := \"s\"\n\t\tx = \"t\"\n\t}\n\tx = 2\n\tx := 3\n}\n";
    let result = run(source);
    assert_eq!(kinds(&result.diagnostics), vec![DiagnosticKind::RedeclareError]);
    assert_eq!(messages(&result.diagnostics), vec!["x already declared"]);
    assert_eq!(result.diagnostics[0].line, 9);
}

#[test]
fn test_diagnostics_accumulate_in_source_order() {
    let source = "package main\nfunc main() {\n\ty = 1\n\tvar b bool = 1\n\tbreak\n}\n";
    let result = run(source);
    assert_eq!(
        kinds(&result.diagnostics),
        vec![
            DiagnosticKind::NameError,
            DiagnosticKind::TypeMismatch,
            DiagnosticKind::ControlError,
        ]
    );
    let lines: Vec<_> = result.diagnostics.iter().map(|d| d.line).collect();
    assert_eq!(lines, vec![3, 4, 5]);
}

#[test]
fn test_fatal_syntax_error_drops_root() {
    let source = "package main\nvar x int = \"s\"\nfunc main( {\n}\n";
    let result = run(source);
    assert!(result.root.is_none());
    assert_eq!(
        kinds(&result.diagnostics),
        vec![DiagnosticKind::TypeMismatch, DiagnosticKind::ParsingError]
    );
}

#[test]
fn test_deep_nesting_is_a_syntax_error() {
    let source = format!("package main\nvar n = {}1{}\n", "(".repeat(200), ")".repeat(200));
    let result = run(&source);
    assert!(result.root.is_none());
    assert_eq!(kinds(&result.diagnostics), vec![DiagnosticKind::ParsingError]);
    assert_eq!(messages(&result.diagnostics), vec!["expression nested too deeply"]);
}

#[test]
fn test_graph_export() {
    let result = run("package main\nvar a int = 1\n");
    let mut out = Vec::new();
    write_graph(result.root.as_ref(), &mut out).unwrap();
    let dot = String::from_utf8(out).unwrap();

    assert!(dot.starts_with("strict digraph G {\n"));
    assert!(dot.ends_with("}\n"));
    assert!(dot.contains("n0 [label=\"SourceFile\"]"));
    assert!(dot.contains("PackageClause main"));
    assert!(dot.contains("IntLit [t0]"));

    let root = result.root.unwrap();
    let edges = dot.lines().filter(|l| l.contains("->")).count();
    assert_eq!(edges, root.count() - 1);
}

#[test]
fn test_graph_of_failed_translation_is_empty() {
    let result = run("package main\nfunc main() {\n\tx := $\n}\n");
    assert_eq!(kinds(&result.diagnostics), vec![DiagnosticKind::LexicalError]);
    let mut out = Vec::new();
    write_graph(result.root.as_ref(), &mut out).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "strict digraph G {\n}\n");
}
