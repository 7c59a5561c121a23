//! The reservation engine: booking admission, cancellation, and waitlist
//! promotion under the session row lock.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::info;

use studiohub_core::error::{AppError, ErrorKind};
use studiohub_core::result::AppResult;
use studiohub_database::repositories::{BookingRepository, SessionRepository};
use studiohub_entity::booking::{Booking, BookingStatus, CreateBooking};

use crate::configuration::resolver::require_positive;
use crate::credit::CreditLedger;

use super::admission::decide_admission;

/// Duplicate-booking rejection shown to end users.
const DUPLICATE_BOOKING: &str = "User already has an active booking for this session";

/// Result of a cancellation: the cancelled booking plus the waitlisted
/// booking promoted into the freed seat, if any.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelOutcome {
    /// The booking that was cancelled.
    pub cancelled: Booking,
    /// The booking promoted off the waitlist, when the cancellation freed
    /// a confirmed seat and the waitlist was non-empty.
    pub promoted: Option<Booking>,
}

/// Admits, waitlists, cancels, and promotes bookings against a session's
/// stamped capacity limits.
///
/// Every capacity-affecting step runs inside one transaction holding a
/// `SELECT ... FOR UPDATE` lock on the session row, so no two admission
/// decisions for the same session interleave — including across server
/// replicas. Retried requests are deduplicated through the caller-supplied
/// idempotency keys before any work happens.
#[derive(Debug, Clone)]
pub struct ReservationEngine {
    /// Pool for the engine's transaction boundaries.
    pool: PgPool,
    /// Session store.
    session_repo: Arc<SessionRepository>,
    /// Booking store.
    booking_repo: Arc<BookingRepository>,
    /// Credit ledger for entitlement.
    credits: Arc<CreditLedger>,
}

impl ReservationEngine {
    /// Create a new reservation engine.
    pub fn new(
        pool: PgPool,
        session_repo: Arc<SessionRepository>,
        booking_repo: Arc<BookingRepository>,
        credits: Arc<CreditLedger>,
    ) -> Self {
        Self {
            pool,
            session_repo,
            booking_repo,
            credits,
        }
    }

    /// Book a seat (or waitlist spot) on a session for a user.
    ///
    /// A blank or absent `request_id` means "no idempotency": the
    /// operation always executes. With a key, a replay returns the
    /// original booking without re-evaluating capacity or consuming
    /// another credit.
    pub async fn create(
        &self,
        session_id: i64,
        user_id: i64,
        request_id: Option<&str>,
    ) -> AppResult<Booking> {
        require_positive(session_id, "session_id")?;
        require_positive(user_id, "user_id")?;
        let request_id = normalize_key(request_id);

        if let Some(key) = request_id {
            if let Some(existing) = self.booking_repo.find_by_create_request_id(key).await? {
                info!(booking_id = existing.id, request_id = key, "Replayed booking create");
                return Ok(existing);
            }
        }

        // Lazy package expiry happens outside the locked section; the
        // consume below only sees packages that are still active.
        self.credits.expire_lapsed(user_id).await?;

        let mut tx = self.pool.begin().await?;

        let session = self
            .session_repo
            .find_by_id_for_update(tx.as_mut(), session_id)
            .await?
            .ok_or_else(|| AppError::not_found("Session not found"))?;
        if !session.is_open() {
            return Err(AppError::conflict("Session is not open for booking"));
        }

        if let Some(existing) = self
            .booking_repo
            .find_active_by_session_and_user(tx.as_mut(), session_id, user_id)
            .await?
        {
            // A same-key retry can race the original past the replay lookup
            // and land here once the original commits. Return the original's
            // booking instead of a conflict.
            if request_id.is_some() && existing.create_request_id.as_deref() == request_id {
                info!(
                    booking_id = existing.id,
                    request_id = request_id.unwrap_or_default(),
                    "Replayed booking create"
                );
                return Ok(existing);
            }
            return Err(AppError::conflict(DUPLICATE_BOOKING));
        }

        let confirmed = self
            .booking_repo
            .count_by_status(tx.as_mut(), session_id, BookingStatus::Confirmed)
            .await?;
        let waitlisted = self
            .booking_repo
            .count_by_status(tx.as_mut(), session_id, BookingStatus::Waitlisted)
            .await?;
        let status = decide_admission(confirmed, waitlisted, &session.stamped_configuration())?;

        let package_id = self
            .credits
            .consume_in(tx.as_mut(), user_id, session.activity_id)
            .await?;

        let insert = self
            .booking_repo
            .insert(
                tx.as_mut(),
                &CreateBooking {
                    session_id,
                    user_id,
                    status,
                    consumed_package_id: Some(package_id),
                    create_request_id: request_id.map(str::to_string),
                },
            )
            .await;

        let booking = match insert {
            Ok(booking) => booking,
            // Two in-flight requests with the same key can both miss the
            // replay lookup; the unique index breaks the tie and the loser
            // returns the winner's booking.
            Err(e) if e.kind == ErrorKind::Conflict && request_id.is_some() => {
                drop(tx);
                return self
                    .booking_repo
                    .find_by_create_request_id(request_id.unwrap_or_default())
                    .await?
                    .ok_or(e);
            }
            Err(e) => return Err(e),
        };

        tx.commit().await?;

        info!(
            booking_id = booking.id,
            session_id,
            user_id,
            status = %booking.status,
            consumed_package_id = package_id,
            "Booking created"
        );
        Ok(booking)
    }

    /// Cancel a booking, refunding its credit and promoting the oldest
    /// waitlisted booking when a confirmed seat was freed.
    pub async fn cancel(
        &self,
        booking_id: i64,
        request_id: Option<&str>,
    ) -> AppResult<CancelOutcome> {
        require_positive(booking_id, "booking_id")?;
        let request_id = normalize_key(request_id);

        if let Some(key) = request_id {
            if let Some(cancelled) = self.booking_repo.find_by_cancel_request_id(key).await? {
                let promoted = self.booking_repo.find_promoted_from(cancelled.id).await?;
                info!(booking_id = cancelled.id, request_id = key, "Replayed booking cancel");
                return Ok(CancelOutcome { cancelled, promoted });
            }
        }

        let booking = self
            .booking_repo
            .find_by_id(booking_id)
            .await?
            .ok_or_else(|| AppError::not_found("Booking not found"))?;

        let mut tx = self.pool.begin().await?;

        let session = self
            .session_repo
            .find_by_id_for_update(tx.as_mut(), booking.session_id)
            .await?
            .ok_or_else(|| AppError::not_found("Session not found"))?;

        // Re-read under the session lock; a concurrent cancel that already
        // committed is visible here.
        let booking = self
            .booking_repo
            .find_by_id_in(tx.as_mut(), booking_id)
            .await?
            .ok_or_else(|| AppError::not_found("Booking not found"))?;
        match booking.status {
            BookingStatus::Cancelled => {
                // A same-key retry that lost the race to the original sees
                // the already-cancelled row here; hand back the original
                // outcome rather than a conflict.
                if request_id.is_some() && booking.cancel_request_id.as_deref() == request_id {
                    let promoted = self.booking_repo.find_promoted_from(booking.id).await?;
                    info!(
                        booking_id = booking.id,
                        request_id = request_id.unwrap_or_default(),
                        "Replayed booking cancel"
                    );
                    return Ok(CancelOutcome {
                        cancelled: booking,
                        promoted,
                    });
                }
                return Err(AppError::conflict("Booking is already cancelled"));
            }
            BookingStatus::Confirmed | BookingStatus::Waitlisted => {}
            _ => {
                return Err(AppError::conflict(
                    "Only confirmed or waitlisted bookings can be cancelled",
                ));
            }
        }

        if !session.cancellation_allow_late_cancel && session.in_cancellation_window(Utc::now()) {
            return Err(AppError::conflict(format!(
                "Cancellations close {} hours before the session starts",
                session.cancellation_min_hours_before_start
            )));
        }

        let was_confirmed = booking.status == BookingStatus::Confirmed;
        let cancelled = self
            .booking_repo
            .mark_cancelled(tx.as_mut(), booking_id, request_id)
            .await?;

        if let Some(package_id) = cancelled.consumed_package_id {
            self.credits
                .refund_in(
                    tx.as_mut(),
                    cancelled.user_id,
                    session.activity_id,
                    Some(package_id),
                )
                .await?;
        }

        // Cancelling a waitlisted booking frees no seat, so nobody moves.
        let promoted = if was_confirmed {
            match self
                .booking_repo
                .find_oldest_waitlisted(tx.as_mut(), cancelled.session_id)
                .await?
            {
                Some(next) => Some(
                    self.booking_repo
                        .promote(tx.as_mut(), next.id, cancelled.id)
                        .await?,
                ),
                None => None,
            }
        } else {
            None
        };

        tx.commit().await?;

        info!(
            booking_id = cancelled.id,
            session_id = cancelled.session_id,
            user_id = cancelled.user_id,
            promoted_booking_id = promoted.as_ref().map(|b| b.id),
            "Booking cancelled"
        );
        Ok(CancelOutcome { cancelled, promoted })
    }
}

/// Treat blank or absent idempotency keys as "no idempotency".
fn normalize_key(request_id: Option<&str>) -> Option<&str> {
    request_id.map(str::trim).filter(|k| !k.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_key() {
        assert_eq!(normalize_key(None), None);
        assert_eq!(normalize_key(Some("")), None);
        assert_eq!(normalize_key(Some("   ")), None);
        assert_eq!(normalize_key(Some("k1")), Some("k1"));
        assert_eq!(normalize_key(Some(" k1 ")), Some("k1"));
    }
}
