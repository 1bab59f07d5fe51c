//! Flows that combine a state transition with a data-service call.
//!
//! Each flow runs to completion on the caller's thread; a failure is scoped to
//! the one action and leaves the collection as it was before the action.
//!
use tracing::{debug, error, info, warn};

use super::DashboardState;
use super::form::{FormMode, validate_values};
use crate::error::DashboardError;
use crate::service::{Record, UserService};

pub const USER_CREATED: &str = "User created successfully";
pub const USER_UPDATED: &str = "User updated successfully";
pub const USER_DELETED: &str = "User deleted successfully";

/// Fetch the full collection once. On failure the table stays empty.
pub fn load(state: &mut DashboardState, service: &dyn UserService) -> Result<usize, DashboardError> {
    match service.list() {
        Ok(records) => {
            let count = records.len();
            info!(count, "loaded users");
            state.set_records(records);
            Ok(count)
        }
        Err(e) => {
            error!(error = %e, "failed to load users");
            state.set_load_error(e.to_string());
            Err(e.into())
        }
    }
}

/// Validate the form, then create or update. The form resets only on success.
pub fn submit(state: &mut DashboardState, service: &dyn UserService) -> Result<&'static str, DashboardError> {
    let errors = validate_values(&state.form.values);
    let valid = errors.is_empty();
    state.form.errors = errors;
    if !valid {
        debug!(errors = ?state.form.errors, "form rejected");
        return Err(DashboardError::Validation);
    }

    let values = state.form.values.trimmed();
    let notice = match (state.form.mode, state.form.edit_target) {
        (FormMode::Edit, Some(id)) => {
            let mutation = state
                .apply_update(id, &values)
                .ok_or(DashboardError::NotFound(id))?;
            let body = Record::new(id, values.name.clone(), values.email.clone());
            if let Err(e) = service.update(id, &body) {
                warn!(id, error = %e, "update failed, reverting");
                state.revert(mutation);
                return Err(e.into());
            }
            info!(id, "updated user");
            USER_UPDATED
        }
        _ => {
            let body = Record::new(state.next_local_id(), values.name.clone(), values.email.clone());
            let echoed = service.create(&body).inspect_err(|e| {
                warn!(error = %e, "create failed");
            })?;
            let created = state.apply_create(echoed.id, &values);
            info!(id = created.id, "created user");
            USER_CREATED
        }
    };
    state.reset_form();
    Ok(notice)
}

/// Remove `id` locally right away, then ask the server; put it back if the server refuses.
pub fn delete(state: &mut DashboardState, service: &dyn UserService, id: i64) -> Result<&'static str, DashboardError> {
    let mutation = state.apply_delete(id).ok_or(DashboardError::NotFound(id))?;
    if let Err(e) = service.delete(id) {
        warn!(id, error = %e, "delete failed, restoring record");
        state.revert(mutation);
        return Err(e.into());
    }
    if state.form.edit_target == Some(id) {
        state.reset_form();
    }
    info!(id, "deleted user");
    Ok(USER_DELETED)
}
