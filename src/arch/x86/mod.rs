//! 32-bit x86.

mod context;

pub use context::*;
