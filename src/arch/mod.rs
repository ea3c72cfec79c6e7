//! Per-ISA register layouts.
//!
//! Every layout of the build's pointer width is compiled so its ABI size and
//! offsets are checked on any host of that width; `ExecutionContext` names the
//! one the build target actually uses.

cfg_if::cfg_if! {
    if #[cfg(target_pointer_width = "64")] {
        mod aarch64;
        mod riscv64;
        mod x86_64;

        pub use aarch64::Arm64Context;
        pub use riscv64::RiscV64Context;
        pub use x86_64::{Amd64Context, Amd64UnixContext};
    } else if #[cfg(target_pointer_width = "32")] {
        mod arm;
        mod x86;

        pub use arm::ArmContext;
        pub use x86::X86Context;
    }
}

mod unsupported;

pub use unsupported::UnsupportedContext;

cfg_if::cfg_if! {
    if #[cfg(target_arch = "arm")] {
        pub type ExecutionContext = ArmContext;
    } else if #[cfg(target_arch = "aarch64")] {
        pub type ExecutionContext = Arm64Context;
    } else if #[cfg(all(target_arch = "x86_64", windows))] {
        pub type ExecutionContext = Amd64Context;
    } else if #[cfg(target_arch = "x86_64")] {
        pub type ExecutionContext = Amd64UnixContext;
    } else if #[cfg(target_arch = "x86")] {
        pub type ExecutionContext = X86Context;
    } else if #[cfg(target_arch = "riscv64")] {
        pub type ExecutionContext = RiscV64Context;
    } else {
        pub type ExecutionContext = UnsupportedContext;
    }
}

/// Asserts a layout's ABI size and alignment at compile time.
macro_rules! assert_layout {
    ($ty:ty, size = $size:expr, align = $align:expr) => {
        const _: () = assert!(core::mem::size_of::<$ty>() == $size);
        const _: () = assert!(core::mem::align_of::<$ty>() == $align);
    };
}

use assert_layout;
