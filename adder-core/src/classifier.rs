//! Failure classifier: folds raw platform outcomes into the three classes
//! the worker acts on.
//!
//! `NonResult` is kept separate from `Fatal` so that definitive per-user
//! rejections (privacy, already a member) never count against an account's
//! health, while ambiguous failures still do.

use crate::error::PlatformError;

/// Fixed pause applied on a peer-flood signal, matching the platform's
/// informal two-minute cooldown.
const PEER_FLOOD_PAUSE_SECS: u64 = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Account-scoped rate limit; the account must rest for `seconds`.
    FloodWait(u64),
    /// Ambiguous failure; counts against the account's error threshold.
    NonResult,
    /// Definitive, user-specific rejection; no account-health impact.
    Fatal,
}

pub fn classify(err: &PlatformError) -> Outcome {
    match err {
        PlatformError::FloodWait { seconds } => Outcome::FloodWait(*seconds),
        PlatformError::PeerFlood => Outcome::FloodWait(PEER_FLOOD_PAUSE_SECS),
        PlatformError::PrivacyRestricted
        | PlatformError::NotMutualContact
        | PlatformError::UserNotFound
        | PlatformError::AlreadyParticipant => Outcome::Fatal,
        PlatformError::Network(msg) | PlatformError::Unknown(msg) => {
            match embedded_wait_seconds(msg) {
                Some(seconds) => Outcome::FloodWait(seconds),
                None => Outcome::NonResult,
            }
        }
    }
}

/// Some transports only surface flood waits as text of the form
/// "A wait of N seconds is required". Recover N when present.
fn embedded_wait_seconds(msg: &str) -> Option<u64> {
    let rest = msg.split("A wait of").nth(1)?;
    let num = rest.split("seconds is required").next()?;
    num.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flood_wait_passes_seconds_through() {
        assert_eq!(
            classify(&PlatformError::FloodWait { seconds: 77 }),
            Outcome::FloodWait(77)
        );
    }

    #[test]
    fn peer_flood_maps_to_fixed_pause() {
        assert_eq!(
            classify(&PlatformError::PeerFlood),
            Outcome::FloodWait(PEER_FLOOD_PAUSE_SECS)
        );
    }

    #[test]
    fn user_specific_rejections_are_fatal() {
        for err in [
            PlatformError::PrivacyRestricted,
            PlatformError::NotMutualContact,
            PlatformError::UserNotFound,
            PlatformError::AlreadyParticipant,
        ] {
            assert_eq!(classify(&err), Outcome::Fatal);
        }
    }

    #[test]
    fn ambiguous_errors_are_non_result() {
        assert_eq!(
            classify(&PlatformError::Network("connection reset".into())),
            Outcome::NonResult
        );
        assert_eq!(
            classify(&PlatformError::Unknown("RPC_CALL_FAIL".into())),
            Outcome::NonResult
        );
    }

    #[test]
    fn embedded_wait_is_recovered_from_text() {
        let err = PlatformError::Unknown(
            "RPCError 420: A wait of 1815 seconds is required (caused by InviteToChannelRequest)"
                .into(),
        );
        assert_eq!(classify(&err), Outcome::FloodWait(1815));
    }

    #[test]
    fn malformed_wait_text_stays_non_result() {
        let err = PlatformError::Unknown("A wait of forever seconds is required".into());
        assert_eq!(classify(&err), Outcome::NonResult);
    }
}
