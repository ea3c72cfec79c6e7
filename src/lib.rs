//! Platform abstraction layer contract for a minimal managed runtime.
//!
//! Two facilities live here: the reduced register snapshot handed between a
//! fault site, the unwinder and a resumed frame ([`ExecutionContext`]), and the
//! table of optional host capabilities probed once at startup.

#![cfg_attr(not(test), no_std)]

#[macro_use]
extern crate log;

#[macro_use]
mod error;

mod arch;
mod capability;
mod context;
#[cfg(feature = "signal-fault-path")]
mod exception;
mod pal;
#[cfg(feature = "signal-fault-path")]
mod thread_exit;

pub use arch::*;
pub use capability::{CapabilityProbe, CapabilityRegistry, CapabilitySet, HostProbe, PalCapability};
pub use context::{ContextRegisters, Fp128, LinkRegister};
pub use error::{PalError, PalResult};
#[cfg(feature = "signal-fault-path")]
pub use exception::{
    fault_code, FaultDisposition, HandlerSlot, HardwareExceptionHandler,
    EXCEPTION_CONTINUE_EXECUTION, EXCEPTION_CONTINUE_SEARCH,
};
pub use pal::{has_capability, pal_capabilities, pal_init};
#[cfg(feature = "signal-fault-path")]
pub use pal::{
    dispatch_hardware_exception, hardware_exception_handler, notify_thread_exit,
    register_hardware_exception_handler, set_thread_exit_callback,
};
#[cfg(feature = "signal-fault-path")]
pub use thread_exit::{ThreadExitCallback, ThreadExitSlot};
