use crate::context::{ContextRegisters, LinkRegister};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[repr(C, align(8))]
pub struct ArmContext {
    // return value register
    pub r0: usize,
    // callee saved registers, r7 is the frame pointer
    pub r4: usize,
    pub r5: usize,
    pub r6: usize,
    pub r7: usize,
    pub r8: usize,
    pub r9: usize,
    pub r10: usize,
    pub r11: usize,
    // pc / sp / lr
    pub ip: usize,
    pub sp: usize,
    pub lr: usize,
    // d8..d15, d16..d31 are volatile
    pub d: [u64; 8],
}

crate::arch::assert_layout!(ArmContext, size = 112, align = 8);

impl ArmContext {
    pub fn with_ip_sp(ip: usize, sp: usize) -> Self {
        Self {
            ip,
            sp,
            ..ArmContext::default()
        }
    }
}

impl ContextRegisters for ArmContext {
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
        self.r7
    }
}

impl LinkRegister for ArmContext {
    #[inline]
    fn lr(&self) -> usize {
        self.lr
    }
}
