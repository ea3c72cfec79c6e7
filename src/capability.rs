//! Optional host features, probed once during PAL startup.
//!
//! The registry is written by the first [`CapabilityRegistry::init`] and read-only
//! afterwards. Queries issued before that are a startup ordering bug and halt.

use crate::error::PalResult;
use bit_iter::BitIter;
use core::fmt;
use spin::Once;

/// An optional feature the host may expose. The discriminants are published
/// bit values and never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum PalCapability {
    /// The host can report which pages were written since the last query.
    WriteWatch = 0x0000_0001,
    /// The host can signal system memory pressure.
    LowMemoryNotification = 0x0000_0002,
    /// The host can report the logical CPU a thread runs on.
    CurrentProcessorNumber = 0x0000_0004,
}

impl PalCapability {
    pub const ALL: [PalCapability; 3] = [
        PalCapability::WriteWatch,
        PalCapability::LowMemoryNotification,
        PalCapability::CurrentProcessorNumber,
    ];

    /// Maps a published bit value back to its capability. Combinations and
    /// unknown bits have no single capability and yield `None`.
    pub fn from_bits(bits: u32) -> Option<PalCapability> {
        Self::ALL.iter().copied().find(|cap| cap.bits() == bits)
    }

    #[inline]
    pub const fn bits(self) -> u32 {
        self as u32
    }
}

/// A set of independent capability bits.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CapabilitySet(u32);

impl CapabilitySet {
    pub const fn empty() -> Self {
        CapabilitySet(0)
    }

    pub const fn bits(&self) -> u32 {
        self.0
    }

    pub fn contains(&self, cap: PalCapability) -> bool {
        self.0 & cap.bits() != 0
    }

    pub fn insert(&mut self, cap: PalCapability) {
        self.0 |= cap.bits();
    }

    pub fn iter(&self) -> impl Iterator<Item = PalCapability> {
        BitIter::from(self.0).filter_map(|bit| PalCapability::from_bits(1 << bit))
    }
}

impl FromIterator<PalCapability> for CapabilitySet {
    fn from_iter<I: IntoIterator<Item = PalCapability>>(iter: I) -> Self {
        let mut set = CapabilitySet::empty();
        for cap in iter {
            set.insert(cap);
        }
        set
    }
}

impl fmt::Display for CapabilitySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0 {
            return write!(f, "(none)");
        }
        for (i, cap) in self.iter().enumerate() {
            if i > 0 {
                write!(f, " | ")?;
            }
            write!(f, "{:?}", cap)?;
        }
        Ok(())
    }
}

/// One-time feature detection supplied by the host layer.
///
/// Probes may be slow (OS version checks, syscall presence tests); they run
/// exactly once per process.
pub trait CapabilityProbe {
    fn probe(&self, cap: PalCapability) -> PalResult<bool>;
}

/// Built-in probe for hosts that bring no OS services of their own.
///
/// Only the processor number can be answered from the CPU itself; write
/// watching and memory notifications need an OS and are reported absent.
#[derive(Debug, Default, Clone, Copy)]
pub struct HostProbe;

impl CapabilityProbe for HostProbe {
    fn probe(&self, cap: PalCapability) -> PalResult<bool> {
        match cap {
            PalCapability::CurrentProcessorNumber => Ok(processor_number_available()),
            PalCapability::WriteWatch | PalCapability::LowMemoryNotification => Ok(false),
        }
    }
}

cfg_if::cfg_if! {
    if #[cfg(feature = "baremetal-test")] {
        fn processor_number_available() -> bool {
            false
        }
    } else if #[cfg(target_arch = "x86_64")] {
        // rdtscp returns the processor id in ecx, rdpid returns it directly
        fn processor_number_available() -> bool {
            let cpuid = raw_cpuid::CpuId::new();
            let rdtscp = cpuid
                .get_extended_processor_and_feature_identifiers()
                .map_or(false, |info| info.has_rdtscp());
            let rdpid = cpuid
                .get_extended_feature_info()
                .map_or(false, |info| info.has_rdpid());
            rdtscp || rdpid
        }
    } else {
        fn processor_number_available() -> bool {
            false
        }
    }
}

/// Process-lifetime table of probed capabilities.
pub struct CapabilityRegistry {
    caps: Once<CapabilitySet>,
}

impl CapabilityRegistry {
    pub const fn new() -> Self {
        CapabilityRegistry { caps: Once::new() }
    }

    /// Runs every probe and publishes the result. Only the first call probes;
    /// later calls return the published set unchanged.
    pub fn init(&self, probe: &dyn CapabilityProbe) -> CapabilitySet {
        if let Some(caps) = self.caps.get() {
            warn!("PAL capabilities already initialized, keeping {}", caps);
            return *caps;
        }
        let caps = *self.caps.call_once(|| probe_all(probe));
        info!("PAL capabilities: {}", caps);
        caps
    }

    pub fn is_initialized(&self) -> bool {
        self.caps.is_completed()
    }

    pub fn snapshot(&self) -> Option<CapabilitySet> {
        self.caps.get().copied()
    }

    pub fn has(&self, cap: PalCapability) -> bool {
        match self.caps.get() {
            Some(caps) => caps.contains(cap),
            None => portability_assert!("{:?} queried before PAL initialization", cap),
        }
    }

    /// Query by published bit value. Anything other than exactly one known
    /// capability bit is a caller bug.
    pub fn has_raw(&self, bits: u32) -> bool {
        match PalCapability::from_bits(bits) {
            Some(cap) => self.has(cap),
            None => portability_assert!("unknown capability {:#x}", bits),
        }
    }
}

impl Default for CapabilityRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn probe_all(probe: &dyn CapabilityProbe) -> CapabilitySet {
    let mut caps = CapabilitySet::empty();
    for cap in PalCapability::ALL {
        match probe.probe(cap) {
            Ok(true) => caps.insert(cap),
            Ok(false) => {}
            Err(err) => warn!("{:?} probe: {}, treating as absent", cap, err),
        }
    }
    caps
}
