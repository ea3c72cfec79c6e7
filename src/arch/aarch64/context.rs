use crate::context::{ContextRegisters, LinkRegister};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct Arm64Context {
    // frame record
    pub fp: usize,
    pub lr: usize,
    // return value registers
    pub x0: usize,
    pub x1: usize,
    // callee saved registers x19..x28
    pub x19: usize,
    pub x20: usize,
    pub x21: usize,
    pub x22: usize,
    pub x23: usize,
    pub x24: usize,
    pub x25: usize,
    pub x26: usize,
    pub x27: usize,
    pub x28: usize,
    // pc / sp
    pub sp: usize,
    pub ip: usize,
    // low 64 bits of v8..v15, the rest of the vector file is volatile
    pub d: [u64; 8],
}

crate::arch::assert_layout!(Arm64Context, size = 192, align = 8);

impl Arm64Context {
    pub fn with_ip_sp(ip: usize, sp: usize) -> Self {
        Self {
            ip,
            sp,
            ..Arm64Context::default()
        }
    }
}

impl ContextRegisters for Arm64Context {
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
        self.sp
    }

    #[inline]
    fn set_sp(&mut self, sp: usize) {
        self.sp = sp;
    }

    #[inline]
    fn fp(&self) -> usize {
        self.fp
    }
}

impl LinkRegister for Arm64Context {
    #[inline]
    fn lr(&self) -> usize {
        self.lr
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use memoffset::offset_of;

    #[test]
    fn layout_matches_save_area() {
        assert_eq!(offset_of!(Arm64Context, fp), 0);
        assert_eq!(offset_of!(Arm64Context, lr), 8);
        assert_eq!(offset_of!(Arm64Context, x0), 16);
        assert_eq!(offset_of!(Arm64Context, x1), 24);
        assert_eq!(offset_of!(Arm64Context, x19), 32);
        assert_eq!(offset_of!(Arm64Context, x28), 104);
        assert_eq!(offset_of!(Arm64Context, sp), 112);
        assert_eq!(offset_of!(Arm64Context, ip), 120);
        assert_eq!(offset_of!(Arm64Context, d), 128);
        assert_eq!(core::mem::size_of::<Arm64Context>(), 192);
    }

    #[test]
    fn ip_and_sp_round_trip() {
        let mut ctx = Arm64Context::with_ip_sp(0x1000, 0x2000);
        ctx.set_ip(0x1010);
        assert_eq!(ctx.ip(), 0x1010);
        assert_eq!(ctx.sp(), 0x2000);
        ctx.set_sp(0x1ff0);
        assert_eq!(ctx.sp(), 0x1ff0);
        assert_eq!(ctx.ip(), 0x1010);
    }

    #[test]
    fn frame_record_is_independent_of_redirects() {
        let mut ctx = Arm64Context {
            fp: 0x7fff_0000,
            lr: 0x4000_1234,
            ..Arm64Context::with_ip_sp(0x1000, 0x2000)
        };
        ctx.set_ip(0xdead_0000);
        ctx.set_sp(0xbeef_0000);
        assert_eq!(ctx.fp(), 0x7fff_0000);
        assert_eq!(ctx.lr(), 0x4000_1234);
    }
}
