use core::fmt;

/// Why a controller read or write produced nothing.
///
/// Neither case is fatal: callers retry later or give up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerError {
    /// No byte arrived, or the input buffer never drained, before the deadline.
    PollTimeout,
    /// A byte arrived with the parity error bit set and was discarded.
    ParityError,
}

impl fmt::Display for ControllerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControllerError::PollTimeout => write!(f, "i8042 poll timed out"),
            ControllerError::ParityError => write!(f, "i8042 parity error"),
        }
    }
}

/// Result of a fire-and-forget write.
///
/// Returned where the controller contract is "always succeeds": the unget
/// sequence and the mouse channel commands. `Dropped` is informational only
/// and must not be turned into an error by callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BestEffort {
    Delivered,
    Dropped,
}

impl BestEffort {
    pub fn delivered(self) -> bool {
        self == BestEffort::Delivered
    }

    /// `Dropped` as soon as one step of a sequence was dropped.
    pub fn and(self, next: BestEffort) -> BestEffort {
        if self.delivered() {
            next
        } else {
            BestEffort::Dropped
        }
    }
}

impl From<Result<(), ControllerError>> for BestEffort {
    fn from(result: Result<(), ControllerError>) -> BestEffort {
        match result {
            Ok(()) => BestEffort::Delivered,
            Err(_) => BestEffort::Dropped,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_dropped_step_drops_the_sequence() {
        use BestEffort::*;
        assert_eq!(Delivered.and(Delivered).and(Delivered), Delivered);
        assert_eq!(Delivered.and(Dropped).and(Delivered), Dropped);
        assert_eq!(Dropped.and(Delivered), Dropped);
    }

    #[test]
    fn timeouts_become_dropped() {
        assert_eq!(BestEffort::from(Ok(())), BestEffort::Delivered);
        assert_eq!(
            BestEffort::from(Err(ControllerError::PollTimeout)),
            BestEffort::Dropped
        );
    }
}
