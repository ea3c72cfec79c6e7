//! 32-bit ARM (AAPCS, Thumb-2 frame pointer in r7).

mod context;

pub use context::*;
