//! Process-lifetime PAL state.
//!
//! Everything here is written during the single-threaded startup phase and
//! only read afterwards. The registration points do not order themselves
//! against concurrent startup code; the caller provides that happens-before
//! edge.

use crate::capability::{CapabilityProbe, CapabilityRegistry, CapabilitySet, PalCapability};
#[cfg(feature = "signal-fault-path")]
use crate::{
    context::ExecutionContext,
    error::PalResult,
    exception::{FaultDisposition, HandlerSlot, HardwareExceptionHandler},
    thread_exit::{ThreadExitCallback, ThreadExitSlot},
};
use lazy_static::*;

struct PalState {
    capabilities: CapabilityRegistry,
    #[cfg(feature = "signal-fault-path")]
    exception_handler: HandlerSlot,
    #[cfg(feature = "signal-fault-path")]
    thread_exit: ThreadExitSlot,
}

impl PalState {
    fn new() -> Self {
        PalState {
            capabilities: CapabilityRegistry::new(),
            #[cfg(feature = "signal-fault-path")]
            exception_handler: HandlerSlot::new(),
            #[cfg(feature = "signal-fault-path")]
            thread_exit: ThreadExitSlot::new(),
        }
    }
}

lazy_static! {
    static ref PAL: PalState = PalState::new();
}

/// Probes host capabilities. Must complete before any [`has_capability`] call;
/// calling it again keeps the first result.
pub fn pal_init(probe: &dyn CapabilityProbe) -> CapabilitySet {
    PAL.capabilities.init(probe)
}

/// Whether the host exposes `cap`. Stable for the life of the process.
pub fn has_capability(cap: PalCapability) -> bool {
    PAL.capabilities.has(cap)
}

/// The probed set, or `None` before [`pal_init`].
pub fn pal_capabilities() -> Option<CapabilitySet> {
    PAL.capabilities.snapshot()
}

#[cfg(feature = "signal-fault-path")]
pub fn register_hardware_exception_handler(handler: HardwareExceptionHandler) -> PalResult<()> {
    PAL.exception_handler.register(handler)
}

#[cfg(feature = "signal-fault-path")]
pub fn hardware_exception_handler() -> Option<HardwareExceptionHandler> {
    PAL.exception_handler.get()
}

/// Entry point for the fault trampoline, called on the faulting thread.
#[cfg(feature = "signal-fault-path")]
pub fn dispatch_hardware_exception(
    fault_code: usize,
    fault_address: usize,
    context: &mut ExecutionContext,
) -> FaultDisposition {
    PAL.exception_handler.dispatch(fault_code, fault_address, context)
}

#[cfg(feature = "signal-fault-path")]
pub fn set_thread_exit_callback(callback: ThreadExitCallback) -> Option<ThreadExitCallback> {
    PAL.thread_exit.set(callback)
}

/// Called by the host's thread-detach hook on the exiting thread.
#[cfg(feature = "signal-fault-path")]
pub fn notify_thread_exit() -> bool {
    PAL.thread_exit.notify_thread_exit()
}
