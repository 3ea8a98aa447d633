//! Intermediate Representation skeleton
//!
//! Linear three-address records accumulated as attributes flow upward.
//! Labels and jumps are left to a later lowering stage.

mod inst;
mod temps;

pub use inst::*;
pub use temps::TempAllocator;
