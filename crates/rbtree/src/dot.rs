use crate::node::{Color, Node};
use std::fmt;
use std::io::{self, Write};
use std::ptr::NonNull;

/// The only fallible operation in this crate: writing a Graphviz dot dump of
/// the tree's current shape (for interactive debugging, analogous to the
/// dot dumpers in `causalgraph/dot.rs`/`listmerge/dot.rs` in the wider
/// teacher codebase). Never returned by `insert`/`remove`/`find`/etc.
#[derive(Debug)]
pub enum DumpError {
    Io(io::Error),
}

impl fmt::Display for DumpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DumpError::Io(e) => write!(f, "failed writing dot dump: {e}"),
        }
    }
}

impl std::error::Error for DumpError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DumpError::Io(e) => Some(e),
        }
    }
}

impl From<io::Error> for DumpError {
    fn from(e: io::Error) -> Self {
        DumpError::Io(e)
    }
}

pub(crate) unsafe fn dump_dot<T: fmt::Debug, W: Write>(
    root: Option<NonNull<Node<T>>>,
    mut out: W,
) -> Result<(), DumpError> {
    writeln!(out, "digraph rbtree {{")?;
    writeln!(out, "  node [shape=box, fontname=\"monospace\"];")?;
    if let Some(root) = root {
        dump_node(root, &mut out)?;
    }
    writeln!(out, "}}")?;
    Ok(())
}

unsafe fn dump_node<T: fmt::Debug, W: Write>(n: NonNull<Node<T>>, out: &mut W) -> Result<(), DumpError> {
    let n_ref = n.as_ref();
    let color = match n_ref.color {
        Color::Red => "red",
        Color::Black => "black",
    };
    let font = match n_ref.color {
        Color::Red => "black",
        Color::Black => "white",
    };
    writeln!(
        out,
        "  n{:p} [label=\"{:?}\", style=filled, fillcolor={color}, fontcolor={font}];",
        n.as_ptr(),
        n_ref.payload
    )?;
    if let Some(l) = n_ref.left {
        writeln!(out, "  n{:p} -> n{:p};", n.as_ptr(), l.as_ptr())?;
        dump_node(l, out)?;
    }
    if let Some(r) = n_ref.right {
        writeln!(out, "  n{:p} -> n{:p};", n.as_ptr(), r.as_ptr())?;
        dump_node(r, out)?;
    }
    Ok(())
}
