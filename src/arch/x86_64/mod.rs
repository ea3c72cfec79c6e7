//! x86_64, both the System V AMD64 ABI and the Windows x64 ABI.

mod context;

pub use context::*;
