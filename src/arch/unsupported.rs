//! Fallback for ISAs without a known register layout.
//!
//! Only the resume address is stored. This type does not implement
//! [`ContextRegisters`](crate::ContextRegisters), so the unwinder and the
//! dispatcher cannot be instantiated over it; the inherent accessors below
//! exist for code that has to name the type anyway, and halt on use.

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct UnsupportedContext {
    pub ip: usize,
}

impl UnsupportedContext {
    pub fn new(ip: usize) -> Self {
        Self { ip }
    }

    /// The resume address is stored, so reading and redirecting it always works.
    pub fn ip(&self) -> usize {
        self.ip
    }

    pub fn set_ip(&mut self, ip: usize) {
        self.ip = ip;
    }

    pub fn sp(&self) -> usize {
        portability_assert!("GetSp")
    }

    pub fn set_sp(&mut self, _sp: usize) {
        portability_assert!("SetSp")
    }

    pub fn fp(&self) -> usize {
        portability_assert!("GetFp")
    }

    pub fn lr(&self) -> usize {
        portability_assert!("GetLr")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ip_is_the_only_storage() {
        let mut ctx = UnsupportedContext::new(0x1000);
        ctx.set_ip(0x1010);
        assert_eq!(ctx.ip(), 0x1010);
        assert_eq!(core::mem::size_of::<UnsupportedContext>(), core::mem::size_of::<usize>());
    }

    #[test]
    #[should_panic(expected = "GetSp")]
    fn stack_pointer_is_fatal() {
        UnsupportedContext::new(0x1000).sp();
    }

    #[test]
    #[should_panic(expected = "SetSp")]
    fn redirecting_stack_is_fatal() {
        UnsupportedContext::default().set_sp(0x2000);
    }

    #[test]
    #[should_panic(expected = "GetFp")]
    fn frame_pointer_is_fatal() {
        UnsupportedContext::default().fp();
    }

    #[test]
    #[should_panic(expected = "GetLr")]
    fn link_register_is_fatal() {
        UnsupportedContext::default().lr();
    }
}
