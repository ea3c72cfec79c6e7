//! Errors and fatal assertions of the PAL boundary.

/// Recoverable failures reported by registration points and capability probes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PalError {
    /// A hardware exception handler was already installed for this process.
    HandlerAlreadyRegistered,
    /// A capability probe could not determine whether the feature exists.
    ProbeFailed,
}

impl PalError {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HandlerAlreadyRegistered => "hardware exception handler already registered",
            Self::ProbeFailed => "capability probe failed",
        }
    }
}

impl core::fmt::Display for PalError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

pub type PalResult<T> = Result<T, PalError>;

/// Halts on a platform or programming error the runtime cannot survive.
///
/// Continuing with a made-up register value would corrupt stack walking, so
/// there is no recoverable form of this.
macro_rules! portability_assert {
    ($($arg:tt)+) => {{
        error!("portability assert: {}", format_args!($($arg)+));
        panic!("portability assert: {}", format_args!($($arg)+))
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_uses_description() {
        assert_eq!(
            PalError::HandlerAlreadyRegistered.to_string(),
            "hardware exception handler already registered"
        );
        assert_eq!(PalError::ProbeFailed.to_string(), "capability probe failed");
    }

    #[test]
    #[should_panic(expected = "portability assert: GetSp")]
    fn portability_assert_panics() {
        portability_assert!("{}", "GetSp");
    }
}
