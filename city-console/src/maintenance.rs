//! Maintenance schedule form submission
//!
//! Status changes are checked locally first: role, then whether the
//! schedule is still editable, then the remark rule. Any of those failing
//! means nothing is sent.

use city_client::AssetApi;
use shared::capability::{self, Action};
use shared::models::{MaintenanceSchedule, ScheduleStatus, ScheduleStatusUpdate, User};
use shared::validation::validate_schedule_transition;

use crate::error::{ConsoleError, ConsoleResult};

/// Build the status update for `schedule`, or say why it may not be sent
pub fn prepare_status_change(
    user: &User,
    schedule: &MaintenanceSchedule,
    new_status: ScheduleStatus,
    remark: Option<&str>,
) -> ConsoleResult<ScheduleStatusUpdate> {
    capability::check(user.role, Action::ManageSchedules)?;
    if !schedule.is_editable() {
        return Err(ConsoleError::ScheduleFrozen(schedule.id));
    }
    validate_schedule_transition(new_status, remark)?;

    let remark = remark.map(str::trim).filter(|r| !r.is_empty()).map(str::to_string);
    Ok(ScheduleStatusUpdate {
        status: new_status,
        remark,
    })
}

/// Change the status of `schedule` on behalf of `user`
pub async fn submit_status_change<A: AssetApi + ?Sized>(
    api: &A,
    user: &User,
    schedule: &MaintenanceSchedule,
    new_status: ScheduleStatus,
    remark: Option<&str>,
) -> ConsoleResult<MaintenanceSchedule> {
    let update = match prepare_status_change(user, schedule, new_status, remark) {
        Ok(update) => update,
        Err(err) => {
            tracing::debug!(schedule = schedule.id, error = %err, "status change rejected locally");
            return Err(err);
        }
    };

    let updated = api.update_schedule_status(schedule.id, &update).await?;
    tracing::info!(
        schedule = schedule.id,
        from = %schedule.status,
        to = %updated.status,
        "schedule status changed"
    );
    Ok(updated)
}
