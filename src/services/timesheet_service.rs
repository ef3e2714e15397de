//! Timesheet service
//!
//! Authorization and user lookups around the [`TimesheetLedger`]. The ledger
//! itself trusts the user id it is given.

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::AppResult,
    ledger::{TimesheetLedger, WorkedTime},
    middleware::AuthenticatedUser,
    models::{TimeRange, TimesheetEntry},
    services::UserService,
};

/// Timesheet service for business logic
pub struct TimesheetService;

impl TimesheetService {
    /// Clock the authenticated user in
    pub async fn clock_in(ledger: &TimesheetLedger, user: &AuthenticatedUser) -> AppResult<TimesheetEntry> {
        Ok(ledger.clock_in(user.id).await?)
    }

    /// Clock the authenticated user out
    pub async fn clock_out(ledger: &TimesheetLedger, user: &AuthenticatedUser) -> AppResult<TimesheetEntry> {
        Ok(ledger.clock_out(user.id).await?)
    }

    /// Worked time of `target_id`, visible to that user and to admins
    pub async fn total_worked(
        pool: &PgPool,
        ledger: &TimesheetLedger,
        requester: &AuthenticatedUser,
        target_id: &Uuid,
        range: TimeRange,
    ) -> AppResult<WorkedTime> {
        Self::authorize(pool, requester, target_id).await?;
        Ok(ledger.total_worked_duration(*target_id, range).await?)
    }

    /// Timesheet entries of `target_id`, visible to that user and to admins
    pub async fn entries(
        pool: &PgPool,
        ledger: &TimesheetLedger,
        requester: &AuthenticatedUser,
        target_id: &Uuid,
        range: TimeRange,
    ) -> AppResult<Vec<TimesheetEntry>> {
        Self::authorize(pool, requester, target_id).await?;
        Ok(ledger.entries(*target_id, range).await?)
    }

    async fn authorize(pool: &PgPool, requester: &AuthenticatedUser, target_id: &Uuid) -> AppResult<()> {
        requester.require_self_or_admin(target_id)?;
        if &requester.id != target_id {
            // Unknown users are a 404, not an empty timesheet
            UserService::get_user_by_id(pool, target_id).await?;
        }
        Ok(())
    }
}
