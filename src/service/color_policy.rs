use thiserror::Error;

use crate::constants::API_NAME;
use crate::models::Automobile;

#[derive(Debug, Error)]
#[error("color change from '{from}' to '{to}' rejected: {reason}")]
pub struct ColorRejection {
    pub from: String,
    pub to: String,
    pub reason: String,
}

/// Check run against every refresh before any field is touched.
pub trait ColorPolicy: Send + Sync {
    fn check(&self, current: &Automobile, patch: &Automobile) -> Result<(), ColorRejection>;
}

/// Permits every change and records color transitions.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogColorChange;

impl ColorPolicy for LogColorChange {
    fn check(&self, current: &Automobile, patch: &Automobile) -> Result<(), ColorRejection> {
        if current.color != patch.color {
            tracing::info!(
                "{} Automobile {:?} color changes from {} to {}",
                API_NAME,
                current.id,
                current.color,
                patch.color
            );
        }
        Ok(())
    }
}
