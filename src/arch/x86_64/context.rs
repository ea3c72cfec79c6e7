use crate::context::{ContextRegisters, Fp128};

/// System V AMD64 ABI.
///
/// Arguments go in rdi, rsi, rdx, rcx, r8, r9; rax and rdx carry return
/// values; rbp, rbx and r12..r15 are preserved. No vector register survives a
/// call, so none is stored.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct Amd64UnixContext {
    // pc / sp
    pub ip: usize,
    pub rsp: usize,
    pub rbp: usize,
    // return value registers, rbx is callee saved
    pub rax: usize,
    pub rbx: usize,
    pub rdx: usize,
    // callee saved registers
    pub r12: usize,
    pub r13: usize,
    pub r14: usize,
    pub r15: usize,
}

crate::arch::assert_layout!(Amd64UnixContext, size = 80, align = 8);

/// Windows x64 ABI: rdi, rsi and xmm6..xmm15 are callee saved as well.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[repr(C, align(16))]
pub struct Amd64Context {
    // pc / sp
    pub ip: usize,
    pub rsp: usize,
    pub rbp: usize,
    pub rdi: usize,
    pub rsi: usize,
    pub rax: usize,
    pub rbx: usize,
    pub r12: usize,
    pub r13: usize,
    pub r14: usize,
    pub r15: usize,
    // keeps the xmm slots 16-byte aligned
    pub _padding: usize,
    pub xmm6: Fp128,
    pub xmm7: Fp128,
    pub xmm8: Fp128,
    pub xmm9: Fp128,
    pub xmm10: Fp128,
    pub xmm11: Fp128,
    pub xmm12: Fp128,
    pub xmm13: Fp128,
    pub xmm14: Fp128,
    pub xmm15: Fp128,
}

crate::arch::assert_layout!(Amd64Context, size = 256, align = 16);

impl Amd64UnixContext {
    pub fn with_ip_sp(ip: usize, sp: usize) -> Self {
        Self {
            ip,
            rsp: sp,
            ..Amd64UnixContext::default()
        }
    }
}

impl Amd64Context {
    pub fn with_ip_sp(ip: usize, sp: usize) -> Self {
        Self {
            ip,
            rsp: sp,
            ..Amd64Context::default()
        }
    }
}

impl ContextRegisters for Amd64UnixContext {
    #[inline]
    fn ip(&self) -> usize {
        self.ip
    }

    #[inline]
    fn set_ip(&mut self, ip: usize) {
        self.ip = ip;
    }

    #[inline]
    fn sp(&self) -> usize {
        self.rsp
    }

    #[inline]
    fn set_sp(&mut self, sp: usize) {
        self.rsp = sp;
    }

    #[inline]
    fn fp(&self) -> usize {
        self.rbp
    }
}

impl ContextRegisters for Amd64Context {
    #[inline]
    fn ip(&self) -> usize {
        self.ip
    }

    #[inline]
    fn set_ip(&mut self, ip: usize) {
        self.ip = ip;
    }

    #[inline]
    fn sp(&self) -> usize {
        self.rsp
    }

    #[inline]
    fn set_sp(&mut self, sp: usize) {
        self.rsp = sp;
    }

    #[inline]
    fn fp(&self) -> usize {
        self.rbp
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use memoffset::offset_of;

    #[test]
    fn unix_layout_matches_save_area() {
        assert_eq!(offset_of!(Amd64UnixContext, ip), 0);
        assert_eq!(offset_of!(Amd64UnixContext, rsp), 8);
        assert_eq!(offset_of!(Amd64UnixContext, rbp), 16);
        assert_eq!(offset_of!(Amd64UnixContext, rax), 24);
        assert_eq!(offset_of!(Amd64UnixContext, rbx), 32);
        assert_eq!(offset_of!(Amd64UnixContext, rdx), 40);
        assert_eq!(offset_of!(Amd64UnixContext, r12), 48);
        assert_eq!(offset_of!(Amd64UnixContext, r15), 72);
    }

    #[test]
    fn windows_layout_aligns_xmm_slots() {
        assert_eq!(offset_of!(Amd64Context, rbx), 48);
        assert_eq!(offset_of!(Amd64Context, r15), 80);
        assert_eq!(offset_of!(Amd64Context, _padding), 88);
        assert_eq!(offset_of!(Amd64Context, xmm6), 96);
        assert_eq!(offset_of!(Amd64Context, xmm15), 240);
        assert_eq!(offset_of!(Amd64Context, xmm6) % 16, 0);
    }

    #[test]
    fn capture_then_redirect_keeps_stack_pointer() {
        let mut ctx = Amd64UnixContext::with_ip_sp(0x1000, 0x2000);
        ctx.set_ip(0x1010);
        assert_eq!(ctx.ip(), 0x1010);
        assert_eq!(ctx.sp(), 0x2000);

        let mut ctx = Amd64Context::with_ip_sp(0x1000, 0x2000);
        ctx.set_ip(0x1010);
        assert_eq!(ctx.ip(), 0x1010);
        assert_eq!(ctx.sp(), 0x2000);
    }

    #[test]
    fn sp_round_trip() {
        let mut ctx = Amd64UnixContext::default();
        ctx.set_sp(0x7ffd_1000);
        assert_eq!(ctx.sp(), 0x7ffd_1000);
        assert_eq!(ctx.rsp, 0x7ffd_1000);
    }

    #[test]
    fn frame_pointer_survives_redirect() {
        let mut ctx = Amd64Context {
            rbp: 0x7ffd_2000,
            ..Amd64Context::default()
        };
        ctx.set_ip(0x4010);
        ctx.set_sp(0x7ffd_0ff8);
        assert_eq!(ctx.ip(), 0x4010);
        assert_eq!(ctx.sp(), 0x7ffd_0ff8);
        assert_eq!(ctx.rsp, 0x7ffd_0ff8);
        assert_eq!(ctx.fp(), 0x7ffd_2000);
    }

    #[test]
    fn xmm_slots_keep_bit_patterns() {
        let bits = 0xffff_ffff_ffff_ffff_0000_0000_0000_0000u128;
        let ctx = Amd64Context {
            xmm9: Fp128::from_bits(bits),
            ..Amd64Context::default()
        };
        let copy = ctx;
        assert_eq!(copy.xmm9.to_bits(), bits);
    }
}
