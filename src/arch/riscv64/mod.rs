//! RISC-V 64 (LP64D).

mod context;

pub use context::*;
