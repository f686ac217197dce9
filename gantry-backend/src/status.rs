//! Status translation
//!
//! Maps scheduler-native terminal states to the uniform [`RunStatus`]
//! enumeration. The mapping is exhaustive over the four known native states;
//! anything else is an error naming the application and the offending value,
//! never a silent default.

use gantry_core::domain::report::FinalStatus;
use gantry_core::domain::run::RunStatus;

use crate::error::{BackendError, Result};

/// Translates a scheduler-native final status into a [`RunStatus`]
///
/// An undefined final status covers both queued and actively-running
/// applications; both translate to `Running`.
pub fn translate(app_id: &str, status: &FinalStatus) -> Result<RunStatus> {
    match status {
        FinalStatus::Succeeded => Ok(RunStatus::Finished),
        FinalStatus::Killed => Ok(RunStatus::Killed),
        FinalStatus::Failed => Ok(RunStatus::Failed),
        FinalStatus::Undefined => Ok(RunStatus::Running),
        FinalStatus::Other(state) => Err(BackendError::UnknownState {
            app_id: app_id.to_string(),
            state: state.clone(),
        }),
    }
}
