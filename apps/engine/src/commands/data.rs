//! Learner data maintenance.

use crate::state::AppState;

use super::CommandError;

/// Delete every stored collection. Static content is untouched.
pub async fn clear_all_data(state: &AppState) -> Result<(), CommandError> {
    state.store.lock().await.clear_all().map_err(Into::into)
}
