use crate::context::ContextRegisters;

/// The return address lives on the stack, so there is no link register here.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct X86Context {
    pub ip: usize,
    pub rsp: usize,
    pub rbp: usize,
    pub rdi: usize,
    pub rsi: usize,
    pub rax: usize,
    pub rbx: usize,
}

crate::arch::assert_layout!(X86Context, size = 28, align = 4);

impl X86Context {
    pub fn with_ip_sp(ip: usize, sp: usize) -> Self {
        Self {
            ip,
            rsp: sp,
            ..X86Context::default()
        }
    }
}

impl ContextRegisters for X86Context {
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
    fn layout_matches_save_area() {
        assert_eq!(offset_of!(X86Context, ip), 0);
        assert_eq!(offset_of!(X86Context, rsp), 4);
        assert_eq!(offset_of!(X86Context, rbp), 8);
        assert_eq!(offset_of!(X86Context, rdi), 12);
        assert_eq!(offset_of!(X86Context, rsi), 16);
        assert_eq!(offset_of!(X86Context, rax), 20);
        assert_eq!(offset_of!(X86Context, rbx), 24);
        assert_eq!(core::mem::size_of::<X86Context>(), 28);
    }

    #[test]
    fn ip_and_sp_round_trip() {
        let mut ctx = X86Context::with_ip_sp(0x1000, 0x2000);
        ctx.set_ip(0x1010);
        ctx.set_sp(0x1ffc);
        assert_eq!(ctx.ip(), 0x1010);
        assert_eq!(ctx.sp(), 0x1ffc);
    }
}
