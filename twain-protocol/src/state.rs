//! Protocol states.

use core::fmt;

/// The stage a session has reached in the fixed protocol progression.
///
/// States are ordered, so legal ranges can be expressed as
/// `State::SourceOpened..=State::TransferReady`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum State {
    /// Nothing loaded.
    PreSession = 1,
    /// Source manager loaded.
    DsmLoaded = 2,
    /// Source manager opened.
    DsmOpened = 3,
    /// Source opened; capabilities can be negotiated.
    SourceOpened = 4,
    /// Source enabled; waiting for the source to report data.
    SourceEnabled = 5,
    /// The source has data ready to transfer.
    TransferReady = 6,
    /// A transfer is in progress.
    Transferring = 7,
}

impl State {
    /// The numeric state, 1 to 7.
    #[inline]
    pub const fn number(self) -> u8 {
        self as u8
    }

    /// Decode a numeric state.
    pub const fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Self::PreSession),
            2 => Some(Self::DsmLoaded),
            3 => Some(Self::DsmOpened),
            4 => Some(Self::SourceOpened),
            5 => Some(Self::SourceEnabled),
            6 => Some(Self::TransferReady),
            7 => Some(Self::Transferring),
            _ => None,
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "State({})", self.number())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_ordering() {
        assert!(State::SourceOpened < State::TransferReady);
        assert!((State::TransferReady..=State::Transferring).contains(&State::Transferring));
        assert!(!(State::SourceOpened..=State::TransferReady).contains(&State::Transferring));
    }

    #[test]
    fn test_state_numbers() {
        for n in 1..=7 {
            assert_eq!(State::from_number(n).map(State::number), Some(n));
        }
        assert_eq!(State::from_number(0), None);
        assert_eq!(State::from_number(8), None);
    }
}
