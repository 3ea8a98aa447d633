//! Actions for type productions

use crate::common::DiagnosticKind;
use crate::node::{Node, Production};
use crate::types::{LayoutError, Primitive, Type};

use super::Context;

impl Context {
    /// Node describing `ty`, sized through the type table
    pub(super) fn type_node(&self, production: Production, line: usize, ty: Type) -> Node {
        let size = self.size_of(&ty);
        Node::of_type(production, line, ty, size)
    }

    pub fn primitive_type(&mut self, line: usize, kind: Primitive) -> Node {
        self.type_node(Production::PrimitiveType, line, Type::from(kind))
    }

    /// Type written as an identifier
    pub fn type_name(&mut self, line: usize, name: &str) -> Node {
        let mut node = match self.scope().lookup_type(name) {
            Some(Some(ty)) => {
                let ty = ty.clone();
                self.type_node(Production::TypeName, line, ty)
            }
            // Definition was rejected and already reported
            Some(None) => Node::new(Production::TypeName, line),
            None if self.lookup(name).is_some() => {
                self.report(DiagnosticKind::TypeError, line, format!("{} is not a type", name));
                Node::new(Production::TypeName, line)
            }
            None => {
                self.report(DiagnosticKind::TypeError, line, format!("undefined: {}", name));
                Node::new(Production::TypeName, line)
            }
        };
        node.attrs.idents.push(name.to_string());
        node
    }

    /// `[N]T`, or `[]T` when `bound` is absent
    pub fn array_type(&mut self, line: usize, bound: Option<i64>, element: Node) -> Node {
        let production = if bound.is_some() {
            Production::ArrayType
        } else {
            Production::SliceType
        };

        let mut node = match element.ty() {
            Some(elem) => match self.type_table().array_type(elem.clone(), bound) {
                Ok(ty) => self.type_node(production, line, ty),
                Err(err @ (LayoutError::NegativeBound(_) | LayoutError::TooLarge)) => {
                    self.report(DiagnosticKind::SizeError, line, err.to_string());
                    Node::new(production, line)
                }
                Err(err) => {
                    self.report(DiagnosticKind::TypeError, line, err.to_string());
                    Node::new(production, line)
                }
            },
            None => Node::new(production, line),
        };
        node.attrs.extra.bound = bound;
        node.with_child(element)
    }

    pub fn pointer_type(&mut self, line: usize, base: Node) -> Node {
        let node = match base.ty() {
            Some(ty) => {
                let ty = Type::pointer_to(ty.clone());
                self.type_node(Production::PointerType, line, ty)
            }
            None => Node::new(Production::PointerType, line),
        };
        node.with_child(base)
    }

    /// `a, b T` inside a struct: one type entry per field name
    pub fn field_decl(&mut self, line: usize, names: Node, ty: Node) -> Node {
        let mut node = Node::new(Production::FieldDecl, line);
        node.attrs.idents = names.attrs.idents.clone();
        if let (Some(field_ty), Some(size)) = (ty.ty(), ty.size()) {
            for _ in &names.attrs.idents {
                node.attrs.types.push(field_ty.clone());
                node.attrs.sizes.push(size);
            }
        }
        node.with_children(vec![names, ty])
    }

    /// `struct { ... }`: lay out the fields, rejecting repeated names
    pub fn struct_type(&mut self, line: usize, fields: Vec<Node>) -> Node {
        let complete = fields
            .iter()
            .all(|f| f.attrs.types.len() == f.attrs.idents.len());

        let node = if complete {
            let pairs: Vec<(String, Type)> = fields
                .iter()
                .flat_map(|f| f.attrs.idents.iter().cloned().zip(f.attrs.types.iter().cloned()))
                .collect();

            match self.type_table().layout_struct(pairs) {
                Ok(layout) => {
                    let size = layout.size;
                    Node::of_type(Production::StructType, line, Type::Struct(layout), size)
                }
                Err(err @ LayoutError::DuplicateField(_)) => {
                    self.report(DiagnosticKind::RedeclareError, line, err.to_string());
                    Node::new(Production::StructType, line)
                }
                Err(err @ LayoutError::TooLarge) => {
                    self.report(DiagnosticKind::SizeError, line, err.to_string());
                    Node::new(Production::StructType, line)
                }
                Err(err) => {
                    self.report(DiagnosticKind::TypeError, line, err.to_string());
                    Node::new(Production::StructType, line)
                }
            }
        } else {
            Node::new(Production::StructType, line)
        };
        node.with_children(fields)
    }
}
