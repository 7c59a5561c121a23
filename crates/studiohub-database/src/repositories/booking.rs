//! Booking repository implementation.

use sqlx::{PgConnection, PgPool};

use studiohub_core::error::{AppError, ErrorKind};
use studiohub_core::result::AppResult;
use studiohub_entity::booking::{Booking, BookingStatus, CreateBooking};

/// Repository for booking CRUD and capacity-count operations.
///
/// The transaction-scoped methods participate in the session row lock held
/// by the reservation engine; they never open their own connections.
#[derive(Debug, Clone)]
pub struct BookingRepository {
    pool: PgPool,
}

impl BookingRepository {
    /// Create a new booking repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a booking by ID.
    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<Booking>> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find booking", e))
    }

    /// Find a booking by ID inside the caller's transaction.
    ///
    /// Booking rows only mutate under the session row lock, so a read here
    /// is serialized against every concurrent cancel/promotion once the
    /// caller holds that lock.
    pub async fn find_by_id_in(
        &self,
        conn: &mut PgConnection,
        id: i64,
    ) -> AppResult<Option<Booking>> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1")
            .bind(id)
            .fetch_optional(conn)
            .await
            .map_err(AppError::from)
    }

    /// Find the booking created under a given idempotency key.
    pub async fn find_by_create_request_id(&self, request_id: &str) -> AppResult<Option<Booking>> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE create_request_id = $1")
            .bind(request_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find booking by request id", e)
            })
    }

    /// Find the booking cancelled under a given idempotency key.
    pub async fn find_by_cancel_request_id(&self, request_id: &str) -> AppResult<Option<Booking>> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE cancel_request_id = $1")
            .bind(request_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find booking by request id", e)
            })
    }

    /// Find the booking that was promoted by the cancellation of `booking_id`.
    pub async fn find_promoted_from(&self, booking_id: i64) -> AppResult<Option<Booking>> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE promoted_from_booking_id = $1")
            .bind(booking_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find promoted booking", e)
            })
    }

    /// List a user's bookings, newest first.
    pub async fn find_by_user(&self, user_id: i64) -> AppResult<Vec<Booking>> {
        sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list bookings", e))
    }

    /// Find a user's active (confirmed or waitlisted) booking for a session.
    pub async fn find_active_by_session_and_user(
        &self,
        conn: &mut PgConnection,
        session_id: i64,
        user_id: i64,
    ) -> AppResult<Option<Booking>> {
        sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings \
             WHERE session_id = $1 AND user_id = $2 AND status IN ('confirmed', 'waitlisted')",
        )
        .bind(session_id)
        .bind(user_id)
        .fetch_optional(conn)
        .await
        .map_err(AppError::from)
    }

    /// Count a session's bookings in a given status.
    pub async fn count_by_status(
        &self,
        conn: &mut PgConnection,
        session_id: i64,
        status: BookingStatus,
    ) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM bookings WHERE session_id = $1 AND status = $2",
        )
        .bind(session_id)
        .bind(status)
        .fetch_one(conn)
        .await
        .map_err(AppError::from)
    }

    /// Find the single oldest waitlisted booking for a session.
    ///
    /// `created_at` ascending (id as tiebreak) is the FIFO promotion order.
    pub async fn find_oldest_waitlisted(
        &self,
        conn: &mut PgConnection,
        session_id: i64,
    ) -> AppResult<Option<Booking>> {
        sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE session_id = $1 AND status = 'waitlisted' \
             ORDER BY created_at ASC, id ASC LIMIT 1",
        )
        .bind(session_id)
        .fetch_optional(conn)
        .await
        .map_err(AppError::from)
    }

    /// Insert a new booking inside the caller's transaction.
    pub async fn insert(
        &self,
        conn: &mut PgConnection,
        data: &CreateBooking,
    ) -> AppResult<Booking> {
        sqlx::query_as::<_, Booking>(
            "INSERT INTO bookings (session_id, user_id, status, consumed_package_id, create_request_id) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(data.session_id)
        .bind(data.user_id)
        .bind(data.status)
        .bind(data.consumed_package_id)
        .bind(&data.create_request_id)
        .fetch_one(conn)
        .await
        .map_err(AppError::from)
    }

    /// Mark a booking cancelled, stamping the cancellation time and the
    /// idempotency key of the cancel request.
    pub async fn mark_cancelled(
        &self,
        conn: &mut PgConnection,
        booking_id: i64,
        cancel_request_id: Option<&str>,
    ) -> AppResult<Booking> {
        sqlx::query_as::<_, Booking>(
            "UPDATE bookings \
             SET status = 'cancelled', cancelled_at = NOW(), cancel_request_id = $2 \
             WHERE id = $1 RETURNING *",
        )
        .bind(booking_id)
        .bind(cancel_request_id)
        .fetch_one(conn)
        .await
        .map_err(AppError::from)
    }

    /// Promote a waitlisted booking to confirmed, recording which
    /// cancellation made room for it.
    pub async fn promote(
        &self,
        conn: &mut PgConnection,
        booking_id: i64,
        promoted_from_booking_id: i64,
    ) -> AppResult<Booking> {
        sqlx::query_as::<_, Booking>(
            "UPDATE bookings SET status = 'confirmed', promoted_from_booking_id = $2 \
             WHERE id = $1 AND status = 'waitlisted' RETURNING *",
        )
        .bind(booking_id)
        .bind(promoted_from_booking_id)
        .fetch_one(conn)
        .await
        .map_err(AppError::from)
    }
}
