//! Hardware exception handler registration for the signal-style fault path.
//!
//! The fault trampoline (outside this crate) builds an [`ExecutionContext`] for
//! the faulting thread and calls [`HandlerSlot::dispatch`] synchronously on that
//! thread. The slot is filled once during startup, before fault delivery is
//! enabled, and never emptied.

use crate::context::ExecutionContext;
use crate::error::{PalError, PalResult};
use spin::Once;

/// Boundary signature shared with the fault trampoline.
///
/// `arg0_reg` and `arg1_reg` let the handler hand register values back for a
/// resumed safe point. Returning [`EXCEPTION_CONTINUE_EXECUTION`] resumes at the
/// (possibly redirected) context; anything else escalates the fault.
pub type HardwareExceptionHandler = unsafe extern "C" fn(
    fault_code: usize,
    fault_address: usize,
    pal_context: *mut ExecutionContext,
    arg0_reg: *mut usize,
    arg1_reg: *mut usize,
) -> i32;

pub const EXCEPTION_CONTINUE_EXECUTION: i32 = -1;
pub const EXCEPTION_CONTINUE_SEARCH: i32 = 0;

/// Fault classification codes passed as `fault_code`.
pub mod fault_code {
    pub const DATATYPE_MISALIGNMENT: usize = 0x8000_0002;
    pub const ACCESS_VIOLATION: usize = 0xC000_0005;
    pub const ILLEGAL_INSTRUCTION: usize = 0xC000_001D;
    pub const INTEGER_DIVIDE_BY_ZERO: usize = 0xC000_0094;
    pub const INTEGER_OVERFLOW: usize = 0xC000_0095;
    pub const PRIVILEGED_INSTRUCTION: usize = 0xC000_0096;
}

/// What the trampoline should do once the handler returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultDisposition {
    /// Resume the thread from the context, loading these argument registers.
    Resume { arg0: usize, arg1: usize },
    /// Escalate to the process's default fault handling.
    Unhandled,
}

pub struct HandlerSlot {
    handler: Once<HardwareExceptionHandler>,
}

impl HandlerSlot {
    pub const fn new() -> Self {
        HandlerSlot {
            handler: Once::new(),
        }
    }

    /// Installs `handler`. Only the first registration takes effect.
    pub fn register(&self, handler: HardwareExceptionHandler) -> PalResult<()> {
        let mut installed = false;
        self.handler.call_once(|| {
            installed = true;
            handler
        });
        if installed {
            debug!("hardware exception handler registered");
            Ok(())
        } else {
            warn!("hardware exception handler already registered, ignoring");
            Err(PalError::HandlerAlreadyRegistered)
        }
    }

    pub fn get(&self) -> Option<HardwareExceptionHandler> {
        self.handler.get().copied()
    }

    pub fn is_registered(&self) -> bool {
        self.handler.is_completed()
    }

    /// Hands a fault to the registered handler. Without one, every fault is
    /// unhandled.
    pub fn dispatch(
        &self,
        fault_code: usize,
        fault_address: usize,
        context: &mut ExecutionContext,
    ) -> FaultDisposition {
        let handler = match self.get() {
            Some(handler) => handler,
            None => {
                trace!("fault {:#x} with no handler registered", fault_code);
                return FaultDisposition::Unhandled;
            }
        };
        let mut arg0 = 0;
        let mut arg1 = 0;
        // SAFETY: all three pointers come from live exclusive borrows that
        // outlast the call.
        let status = unsafe { handler(fault_code, fault_address, context, &mut arg0, &mut arg1) };
        trace!(
            "fault {:#x} at {:#x}: handler returned {}",
            fault_code,
            fault_address,
            status
        );
        if status == EXCEPTION_CONTINUE_EXECUTION {
            FaultDisposition::Resume { arg0, arg1 }
        } else {
            FaultDisposition::Unhandled
        }
    }
}

impl Default for HandlerSlot {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(all(
    test,
    any(
        target_arch = "x86_64",
        target_arch = "aarch64",
        target_arch = "riscv64",
        target_arch = "arm",
        target_arch = "x86"
    )
))]
mod tests {
    use super::*;
    use crate::context::ContextRegisters;
    use std::sync::atomic::{AtomicUsize, Ordering};

    static SEEN_CODE: AtomicUsize = AtomicUsize::new(usize::MAX);
    static SEEN_ADDRESS: AtomicUsize = AtomicUsize::new(usize::MAX);
    static SEEN_IP: AtomicUsize = AtomicUsize::new(0);

    unsafe extern "C" fn record_and_resume(
        fault_code: usize,
        fault_address: usize,
        pal_context: *mut ExecutionContext,
        arg0_reg: *mut usize,
        arg1_reg: *mut usize,
    ) -> i32 {
        let ctx = &mut *pal_context;
        SEEN_CODE.store(fault_code, Ordering::SeqCst);
        SEEN_ADDRESS.store(fault_address, Ordering::SeqCst);
        SEEN_IP.store(ctx.ip(), Ordering::SeqCst);
        // redirect to a throw helper with the faulting ip as its argument
        *arg0_reg = ctx.ip();
        *arg1_reg = fault_address;
        ctx.set_ip(0x5000);
        EXCEPTION_CONTINUE_EXECUTION
    }

    unsafe extern "C" fn decline(
        _fault_code: usize,
        _fault_address: usize,
        _pal_context: *mut ExecutionContext,
        _arg0_reg: *mut usize,
        _arg1_reg: *mut usize,
    ) -> i32 {
        EXCEPTION_CONTINUE_SEARCH
    }

    unsafe extern "C" fn execute_handler(
        _fault_code: usize,
        _fault_address: usize,
        _pal_context: *mut ExecutionContext,
        arg0_reg: *mut usize,
        _arg1_reg: *mut usize,
    ) -> i32 {
        *arg0_reg = 0xbad;
        1
    }

    #[test]
    fn unregistered_slot_leaves_faults_unhandled() {
        let slot = HandlerSlot::new();
        let mut ctx = ExecutionContext::with_ip_sp(0x1000, 0x2000);
        assert!(!slot.is_registered());
        assert_eq!(
            slot.dispatch(fault_code::ACCESS_VIOLATION, 0, &mut ctx),
            FaultDisposition::Unhandled
        );
    }

    #[test]
    fn access_violation_reaches_handler_unmodified() {
        let slot = HandlerSlot::new();
        slot.register(record_and_resume).unwrap();

        let mut ctx = ExecutionContext::with_ip_sp(0x1000, 0x2000);
        let disposition = slot.dispatch(fault_code::ACCESS_VIOLATION, 0, &mut ctx);

        assert_eq!(SEEN_CODE.load(Ordering::SeqCst), fault_code::ACCESS_VIOLATION);
        assert_eq!(SEEN_ADDRESS.load(Ordering::SeqCst), 0);
        assert_eq!(SEEN_IP.load(Ordering::SeqCst), 0x1000);
        assert_eq!(disposition, FaultDisposition::Resume { arg0: 0x1000, arg1: 0 });
        assert_eq!(ctx.ip(), 0x5000);
        assert_eq!(ctx.sp(), 0x2000);
    }

    #[test]
    fn declined_fault_is_unhandled() {
        let slot = HandlerSlot::new();
        slot.register(decline).unwrap();
        let mut ctx = ExecutionContext::with_ip_sp(0x1000, 0x2000);
        assert_eq!(
            slot.dispatch(fault_code::INTEGER_DIVIDE_BY_ZERO, 0, &mut ctx),
            FaultDisposition::Unhandled
        );
        assert_eq!(ctx.ip(), 0x1000);
    }

    #[test]
    fn only_continue_execution_resumes() {
        let slot = HandlerSlot::new();
        slot.register(execute_handler).unwrap();
        let mut ctx = ExecutionContext::default();
        assert_eq!(
            slot.dispatch(fault_code::ILLEGAL_INSTRUCTION, 0x40, &mut ctx),
            FaultDisposition::Unhandled
        );
    }

    unsafe extern "C" fn resume_with_marker(
        _fault_code: usize,
        _fault_address: usize,
        _pal_context: *mut ExecutionContext,
        arg0_reg: *mut usize,
        arg1_reg: *mut usize,
    ) -> i32 {
        *arg0_reg = 0xa11;
        *arg1_reg = 0xb22;
        EXCEPTION_CONTINUE_EXECUTION
    }

    #[test]
    fn second_registration_is_rejected() {
        let slot = HandlerSlot::new();
        assert_eq!(slot.register(resume_with_marker), Ok(()));
        assert_eq!(slot.register(decline), Err(PalError::HandlerAlreadyRegistered));
        assert!(slot.is_registered());

        let mut ctx = ExecutionContext::default();
        assert_eq!(
            slot.dispatch(fault_code::DATATYPE_MISALIGNMENT, 0x1001, &mut ctx),
            FaultDisposition::Resume { arg0: 0xa11, arg1: 0xb22 }
        );
    }
}
