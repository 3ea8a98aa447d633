//! DOT export of the node hierarchy

use std::io::{self, Write};

use crate::node::Node;

/// Write the derivation below `root` as `strict digraph G { ... }`
///
/// Nodes are numbered in pre-order. Without a root only the empty wrapper
/// is written.
pub fn write_graph<W: Write>(root: Option<&Node>, out: &mut W) -> io::Result<()> {
    writeln!(out, "strict digraph G {{")?;
    if let Some(root) = root {
        write_nodes(root, out)?;
    }
    writeln!(out, "}}")
}

/// Each edge follows the subtree of its child
fn write_nodes<W: Write>(root: &Node, out: &mut W) -> io::Result<()> {
    // (node, its id, index of the next child to visit)
    let mut stack: Vec<(&Node, usize, usize)> = Vec::new();
    let mut next = 0;

    write_label(root, next, out)?;
    stack.push((root, next, 0));
    next += 1;

    while let Some((node, id, child)) = stack.last_mut() {
        let node: &Node = *node;
        if let Some(child_node) = node.children.get(*child) {
            *child += 1;
            write_label(child_node, next, out)?;
            stack.push((child_node, next, 0));
            next += 1;
        } else {
            let done = *id;
            stack.pop();
            if let Some((_, parent, _)) = stack.last() {
                writeln!(out, "  n{} -> n{};", parent, done)?;
            }
        }
    }
    Ok(())
}

fn write_label<W: Write>(node: &Node, id: usize, out: &mut W) -> io::Result<()> {
    writeln!(out, "  n{} [label=\"{}\"];", id, escape(&label(node)))
}

fn label(node: &Node) -> String {
    let mut label = node.production.name();
    if !node.attrs.idents.is_empty() {
        label.push(' ');
        label.push_str(&node.attrs.idents.join(", "));
    }
    if let Some(place) = node.place() {
        label.push_str(&format!(" [{}]", place));
    }
    label
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}
