//! Building status indicator collaborator.

use crate::errors::BeaconError;

#[derive(Debug, thiserror::Error)]
pub enum IndicatorError {
    #[error("Failed to update build indicator: {message}")]
    UpdateFailed { message: String },
}

impl BeaconError for IndicatorError {
    fn error_code(&self) -> &'static str {
        match self {
            IndicatorError::UpdateFailed { .. } => "INDICATOR_UPDATE_FAILED",
        }
    }
}

/// Shows whether anything is building (a tray icon, a status line).
///
/// Called after every completed refresh with the name of the most recent
/// in-flight deployment, if any.
pub trait BuildIndicator: Send + Sync {
    fn update(&self, is_building: bool, building_name: Option<&str>) -> Result<(), IndicatorError>;
}

/// Indicator for sessions without a status surface.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopIndicator;

impl BuildIndicator for NoopIndicator {
    fn update(&self, _is_building: bool, _building_name: Option<&str>) -> Result<(), IndicatorError> {
        Ok(())
    }
}
