//! The ISA-independent side of the register snapshot.
//!
//! The unwinder and the exception dispatcher only ever talk to a context through
//! [`ContextRegisters`] (and [`LinkRegister`] where the ISA has one). Only the
//! storage layout changes between architectures, never this protocol.

pub use crate::arch::ExecutionContext;

/// Registers every implemented variant can read and redirect.
///
/// Frame pointer is read-only: nothing resuming through this structure may
/// rewrite the frame chain.
pub trait ContextRegisters: Copy + Default {
    /// Resume address.
    fn ip(&self) -> usize;
    fn set_ip(&mut self, ip: usize);

    /// Stack top at capture time.
    fn sp(&self) -> usize;
    fn set_sp(&mut self, sp: usize);

    /// Frame chain pointer.
    fn fp(&self) -> usize;
}

/// Variants whose ISA keeps the return address in a dedicated register.
///
/// ISAs that push the return address on the stack do not implement this, so
/// asking them for a link register does not type-check.
pub trait LinkRegister: ContextRegisters {
    fn lr(&self) -> usize;
}

cfg_if::cfg_if! {
    if #[cfg(target_arch = "x86_64")] {
        /// 128-bit vector register save slot, stored as raw bits.
        #[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
        #[repr(C, align(16))]
        pub struct Fp128 {
            pub low: u64,
            pub high: i64,
        }
    } else {
        /// 128-bit vector register save slot, stored as raw bits.
        #[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
        #[repr(C)]
        pub struct Fp128 {
            pub low: u64,
            pub high: i64,
        }
    }
}

impl Fp128 {
    pub const fn from_bits(bits: u128) -> Self {
        Self {
            low: bits as u64,
            high: (bits >> 64) as i64,
        }
    }

    pub const fn to_bits(self) -> u128 {
        ((self.high as u64 as u128) << 64) | self.low as u128
    }
}
