//! The pure admission decision.

use studiohub_core::error::AppError;
use studiohub_core::result::AppResult;
use studiohub_entity::booking::BookingStatus;
use studiohub_entity::configuration::EffectiveConfiguration;

/// Capacity rejection shown to end users.
pub const SESSION_FULL: &str = "Session is full";
/// Waitlist rejection shown to end users.
pub const WAITLIST_FULL: &str = "Waitlist is full for this session";

/// Decide the admission outcome for one booking request, given the current
/// counts and the session's stamped configuration.
///
/// Callers must hold the session row lock while counting and while acting
/// on the returned status, which is what makes the check-then-insert
/// sequence atomic against concurrent requests for the last seat.
pub fn decide_admission(
    confirmed: i64,
    waitlisted: i64,
    cfg: &EffectiveConfiguration,
) -> AppResult<BookingStatus> {
    if confirmed < cfg.max_participants as i64 {
        return Ok(BookingStatus::Confirmed);
    }
    if !cfg.waitlist_enabled {
        return Err(AppError::conflict(SESSION_FULL));
    }
    if waitlisted < cfg.waitlist_max_size as i64 {
        return Ok(BookingStatus::Waitlisted);
    }
    Err(AppError::conflict(WAITLIST_FULL))
}

#[cfg(test)]
mod tests {
    use super::*;
    use studiohub_core::error::ErrorKind;
    use studiohub_entity::configuration::WaitlistStrategy;

    fn cfg(max: i32, waitlist_enabled: bool, waitlist_max: i32) -> EffectiveConfiguration {
        EffectiveConfiguration {
            max_participants: max,
            waitlist_enabled,
            waitlist_max_size: waitlist_max,
            waitlist_strategy: WaitlistStrategy::Fifo,
            cancellation_min_hours_before_start: 0,
            cancellation_allow_late_cancel: true,
        }
    }

    #[test]
    fn test_confirms_below_capacity() {
        assert_eq!(
            decide_admission(0, 0, &cfg(1, false, 0)).unwrap(),
            BookingStatus::Confirmed
        );
        assert_eq!(
            decide_admission(9, 0, &cfg(10, false, 0)).unwrap(),
            BookingStatus::Confirmed
        );
    }

    #[test]
    fn test_rejects_full_session_without_waitlist() {
        let err = decide_admission(1, 0, &cfg(1, false, 0)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
        assert_eq!(err.message, SESSION_FULL);
    }

    #[test]
    fn test_waitlists_when_enabled() {
        assert_eq!(
            decide_admission(1, 0, &cfg(1, true, 3)).unwrap(),
            BookingStatus::Waitlisted
        );
        assert_eq!(
            decide_admission(1, 2, &cfg(1, true, 3)).unwrap(),
            BookingStatus::Waitlisted
        );
    }

    #[test]
    fn test_rejects_full_waitlist() {
        let err = decide_admission(1, 3, &cfg(1, true, 3)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
        assert_eq!(err.message, WAITLIST_FULL);
    }

    #[test]
    fn test_capacity_takes_priority_over_waitlist() {
        // A free seat confirms even when the waitlist has room.
        assert_eq!(
            decide_admission(0, 0, &cfg(2, true, 5)).unwrap(),
            BookingStatus::Confirmed
        );
    }
}
