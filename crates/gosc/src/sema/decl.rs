//! Actions for declarations and the compilation unit

use crate::common::DiagnosticKind;
use crate::ir::{Inst, Place};
use crate::node::{Node, Production};
use crate::types::{Signature, Type};

use super::Context;
use super::expr::unquote;
use super::scope::Import;

/// Parameter types of a `Parameters` node, `None` if any failed to resolve
fn parameter_types(params: &Node) -> Option<Vec<Type>> {
    let mut types = Vec::new();
    for decl in &params.children {
        let expected = decl.attrs.idents.len().max(1);
        if decl.attrs.types.len() != expected {
            return None;
        }
        types.extend(decl.attrs.types.iter().cloned());
    }
    Some(types)
}

/// Concatenate child declarations into one group node
fn group(production: Production, line: usize, mut specs: Vec<Node>) -> Node {
    let mut node = Node::new(production, line);
    for spec in &mut specs {
        node.attrs.code.extend(spec.take_code());
        node.attrs.extend(&spec.attrs);
    }
    node.with_children(specs)
}

impl Context {
    pub fn package_clause(&mut self, line: usize, name: &str) -> Node {
        self.scope_mut().metadata_mut().package = Some(name.to_string());
        let mut node = Node::new(Production::PackageClause, line);
        node.attrs.idents.push(name.to_string());
        node
    }

    /// `import [name] "path"`
    ///
    /// The package is referred to by its alias, or by the last element of
    /// its path. Dot and blank imports bind no name.
    pub fn import_spec(&mut self, line: usize, alias: Option<&str>, path: &str) -> Node {
        let path = unquote(path);
        let name = match alias {
            Some("." | "_") => None,
            Some(alias) => Some(alias.to_string()),
            None => path.rsplit('/').next().map(str::to_string),
        };

        let mut node = Node::new(Production::ImportSpec, line);
        node.attrs.idents.extend(name.clone());
        self.scope_mut()
            .metadata_mut()
            .imports
            .push(Import { name, path });
        node
    }

    pub fn import_decl(&mut self, line: usize, specs: Vec<Node>) -> Node {
        group(Production::ImportDecl, line, specs)
    }

    /// Shared by `var` and `const` specs
    fn value_spec(
        &mut self,
        production: Production,
        line: usize,
        names: Node,
        ty: Option<Node>,
        values: Option<Node>,
    ) -> Node {
        let constant = production == Production::ConstSpec;
        let mut node = Node::new(production, line);
        let idents = names.attrs.idents.clone();

        // `Some(None)`: a type was written but could not be resolved
        let declared: Option<Option<Type>> = ty.as_ref().map(|t| t.ty().cloned());

        let mut values = values;
        let mut code = values.as_mut().map(Node::take_code).unwrap_or_default();
        let vals = values.as_ref().map(|v| self.list_values(line, v));

        let bind = |ctx: &mut Self, name: &str, ty: Option<Type>| {
            if constant {
                ctx.declare_constant(line, name, ty)
            } else {
                ctx.declare(line, name, ty)
            }
        };

        match &vals {
            Some(vals) if vals.len() != idents.len() => {
                self.report(
                    DiagnosticKind::AssignmentMismatch,
                    line,
                    format!(
                        "assignment mismatch: {} {} but {} values",
                        idents.len(),
                        if constant { "constants" } else { "variables" },
                        vals.len()
                    ),
                );
                let ty = declared.flatten();
                for name in &idents {
                    bind(self, name, ty.clone());
                }
            }
            _ => {
                for (i, name) in idents.iter().enumerate() {
                    let value = vals.as_ref().and_then(|v| v[i].clone());
                    let ty = match (&declared, &value) {
                        (Some(Some(want)), Some((have, _))) if have != want => {
                            self.report(
                                DiagnosticKind::TypeMismatch,
                                line,
                                format!("{} assigned to {}", have, want),
                            );
                            Some(want.clone())
                        }
                        (Some(declared), _) => declared.clone(),
                        (None, value) => value.as_ref().map(|(ty, _)| ty.clone()),
                    };

                    if !bind(self, name, ty.clone()) {
                        continue;
                    }
                    let Some(ty) = ty else { continue };
                    if let Some((have, src)) = value {
                        if have == ty {
                            code.push(Inst::Copy { dst: Place::var(name), src });
                        }
                    }
                    node.attrs.sizes.push(self.size_of(&ty));
                    node.attrs.types.push(ty);
                }
            }
        }

        node.attrs.idents = idents;
        let mut children = vec![names];
        children.extend(ty);
        children.extend(values);
        node.with_code(code).with_children(children)
    }

    /// `a, b T = x, y` with either the type or the values omitted
    pub fn var_spec(&mut self, line: usize, names: Node, ty: Option<Node>, values: Option<Node>) -> Node {
        self.value_spec(Production::VarSpec, line, names, ty, values)
    }

    pub fn const_spec(&mut self, line: usize, names: Node, ty: Option<Node>, values: Node) -> Node {
        self.value_spec(Production::ConstSpec, line, names, ty, Some(values))
    }

    pub fn var_decl(&mut self, line: usize, specs: Vec<Node>) -> Node {
        group(Production::VarDecl, line, specs)
    }

    pub fn const_decl(&mut self, line: usize, specs: Vec<Node>) -> Node {
        group(Production::ConstDecl, line, specs)
    }

    pub fn type_decl(&mut self, line: usize, specs: Vec<Node>) -> Node {
        group(Production::TypeDecl, line, specs)
    }

    /// `type T U`: a new named type over `U`, sized once and cached by name
    pub fn type_def(&mut self, line: usize, name: &str, ty: Node) -> Node {
        let mut node = match ty.ty() {
            Some(underlying) => {
                let size = self.size_of(underlying);
                let named = Type::named(name, underlying.clone());
                if self.define_type(line, name, Some(named.clone())) {
                    self.type_table_mut().register_named(name, size);
                }
                Node::of_type(Production::TypeDef, line, named, size)
            }
            None => {
                self.define_type(line, name, None);
                Node::new(Production::TypeDef, line)
            }
        };
        node.attrs.idents.push(name.to_string());
        node.with_child(ty)
    }

    /// `type T = U`: `T` is another name for `U` itself
    pub fn alias_decl(&mut self, line: usize, name: &str, ty: Node) -> Node {
        self.define_type(line, name, ty.ty().cloned());
        let mut node = match (ty.ty(), ty.size()) {
            (Some(t), Some(size)) => Node::of_type(Production::AliasDecl, line, t.clone(), size),
            _ => Node::new(Production::AliasDecl, line),
        };
        node.attrs.idents.push(name.to_string());
        node.with_child(ty)
    }

    /// `a, b T`, or a bare `T`; one type entry per name
    pub fn parameter_decl(&mut self, line: usize, names: Option<Node>, ty: Node) -> Node {
        let mut node = Node::new(Production::ParameterDecl, line);
        let idents = names.as_ref().map(|n| n.attrs.idents.clone()).unwrap_or_default();

        if let (Some(param_ty), Some(size)) = (ty.ty(), ty.size()) {
            for _ in 0..idents.len().max(1) {
                node.attrs.types.push(param_ty.clone());
                node.attrs.sizes.push(size);
            }
        }
        node.attrs.idents = idents;

        let mut children: Vec<Node> = names.into_iter().collect();
        children.push(ty);
        node.with_children(children)
    }

    pub fn parameters(&mut self, line: usize, decls: Vec<Node>) -> Node {
        let mut node = Node::new(Production::Parameters, line);
        for decl in &decls {
            node.attrs.extend(&decl.attrs);
        }
        node.with_children(decls)
    }

    /// `func name(params) results`, before the body is read
    ///
    /// Binds the function in the enclosing scope, then opens the function
    /// scope and binds the parameters there. The body is translated in that
    /// same scope; [`Context::function_decl`] closes it.
    pub fn function_header(&mut self, line: usize, name: &str, params: Node, results: Option<Node>) -> Node {
        let param_types = parameter_types(&params);
        let result_types = match &results {
            Some(results) => parameter_types(results),
            None => Some(Vec::new()),
        };

        let signature = match (param_types, result_types.clone()) {
            (Some(params), Some(results)) => Some(Signature { params, results }),
            _ => None,
        };
        let func_ty = signature.map(Type::Func);
        self.declare(line, name, func_ty.clone());
        self.enter_function(name, result_types);

        for decl in &params.children {
            let ty = decl.ty().cloned();
            let complete = decl.attrs.types.len() == decl.attrs.idents.len().max(1);
            for param in &decl.attrs.idents {
                self.declare(line, param, ty.clone().filter(|_| complete));
            }
        }

        let mut node = match func_ty {
            Some(ty) => self.type_node(Production::Signature, line, ty),
            None => Node::new(Production::Signature, line),
        };
        node.attrs.idents.push(name.to_string());
        let mut children = vec![params];
        children.extend(results);
        node.with_children(children)
    }

    /// Close the function opened by [`Context::function_header`]
    pub fn function_decl(&mut self, line: usize, header: Node, body: Option<Node>) -> Node {
        self.exit_function();

        let mut node = Node::new(Production::FunctionDecl, line);
        node.attrs.idents = header.attrs.idents.clone();
        node.attrs.types = header.attrs.types.clone();
        node.attrs.sizes = header.attrs.sizes.clone();

        let mut children = vec![header];
        if let Some(mut body) = body {
            node.attrs.code = body.take_code();
            children.push(body);
        }
        node.with_children(children)
    }

    /// Root of the compilation unit, holding the code of every declaration
    pub fn source_file(&mut self, line: usize, package: Node, imports: Vec<Node>, mut decls: Vec<Node>) -> Node {
        let code = decls.iter_mut().flat_map(Node::take_code).collect();
        let mut children = vec![package];
        children.extend(imports);
        children.extend(decls);
        Node::new(Production::SourceFile, line)
            .with_code(code)
            .with_children(children)
    }
}
