//! AArch64 (AAPCS64).

mod context;

pub use context::*;
