//! Type system: recursive type descriptors and the size/layout calculator

mod descriptor;
mod layout;

pub use descriptor::{Field, KindSet, Primitive, Signature, StructType, Type};
pub use layout::{LayoutError, SizeConfig, TypeTable};
