//! Legal-state precondition for protocol requests.

use crate::domain::error::StateError;
use core::ops::RangeInclusive;
use twain_protocol::{DataGroups, State, Triplet};

/// Precondition check run before every protocol request.
///
/// Pure: it reads the session's state and supported groups and either lets
/// the request through or explains why it is illegal.
pub struct StateGuard;

impl StateGuard {
    /// Fail unless `current` lies in `allowed` and the triplet's data group
    /// is usable with a source supporting `supported`.
    ///
    /// Control triplets are always group-legal. Image and audio triplets
    /// require their group in `supported`.
    ///
    /// # Examples
    ///
    /// ```
    /// use twain_transfer::twain_protocol::{DataArgumentType, DataGroups, Message, State, Triplet};
    /// use twain_transfer::StateGuard;
    ///
    /// let info = Triplet::image(DataArgumentType::ImageInfo, Message::Get);
    /// let legal = State::TransferReady..=State::Transferring;
    ///
    /// assert!(StateGuard::require(State::TransferReady, legal.clone(), DataGroups::IMAGE, info).is_ok());
    /// assert!(StateGuard::require(State::SourceEnabled, legal, DataGroups::IMAGE, info).is_err());
    /// ```
    pub fn require(
        current: State,
        allowed: RangeInclusive<State>,
        supported: DataGroups,
        triplet: Triplet,
    ) -> Result<(), StateError> {
        if !allowed.contains(&current) {
            return Err(StateError::InvalidState {
                triplet,
                current,
                min: *allowed.start(),
                max: *allowed.end(),
            });
        }

        if triplet.group != DataGroups::CONTROL && !supported.contains(triplet.group) {
            return Err(StateError::UnsupportedGroup { triplet, supported });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use twain_protocol::{DataArgumentType, Message};

    const RESET: Triplet = Triplet::control(DataArgumentType::PendingXfers, Message::Reset);
    const AUDIO_INFO: Triplet = Triplet::audio(DataArgumentType::AudioInfo, Message::Get);

    #[test]
    fn test_state_in_range() {
        let range = State::TransferReady..=State::TransferReady;
        assert!(StateGuard::require(State::TransferReady, range, DataGroups::IMAGE, RESET).is_ok());
    }

    #[test]
    fn test_state_below_and_above_range() {
        for state in [State::SourceEnabled, State::Transferring] {
            let err = StateGuard::require(
                state,
                State::TransferReady..=State::TransferReady,
                DataGroups::IMAGE,
                RESET,
            )
            .unwrap_err();

            assert_eq!(
                err,
                StateError::InvalidState {
                    triplet: RESET,
                    current: state,
                    min: State::TransferReady,
                    max: State::TransferReady,
                }
            );
        }
    }

    #[test]
    fn test_control_group_always_allowed() {
        let range = State::SourceOpened..=State::Transferring;
        assert!(StateGuard::require(State::TransferReady, range, DataGroups::empty(), RESET).is_ok());
    }

    #[test]
    fn test_unsupported_group_rejected() {
        let range = State::TransferReady..=State::Transferring;
        let err =
            StateGuard::require(State::TransferReady, range, DataGroups::IMAGE, AUDIO_INFO).unwrap_err();
        assert!(matches!(err, StateError::UnsupportedGroup { .. }));
    }

    #[test]
    fn test_state_checked_before_group() {
        let range = State::TransferReady..=State::Transferring;
        let err =
            StateGuard::require(State::SourceOpened, range, DataGroups::IMAGE, AUDIO_INFO).unwrap_err();
        assert!(matches!(err, StateError::InvalidState { .. }));
    }
}
