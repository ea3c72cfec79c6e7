use crate::context::{ContextRegisters, LinkRegister};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct RiscV64Context {
    // s0 doubles as the frame pointer
    pub fp: usize,
    pub ra: usize,
    // return value registers
    pub a0: usize,
    pub a1: usize,
    // callee saved registers s1..s11
    pub s: [usize; 11],
    // pc / sp
    pub sp: usize,
    pub ip: usize,
    // fs0..fs11
    pub fs: [u64; 12],
}

crate::arch::assert_layout!(RiscV64Context, size = 232, align = 8);

impl RiscV64Context {
    pub fn with_ip_sp(ip: usize, sp: usize) -> Self {
        Self {
            ip,
            sp,
            ..RiscV64Context::default()
        }
    }
}

impl ContextRegisters for RiscV64Context {
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

impl LinkRegister for RiscV64Context {
    #[inline]
    fn lr(&self) -> usize {
        self.ra
    }
}
