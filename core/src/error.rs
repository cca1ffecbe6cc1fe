//! Errors shared by materials, fonts, spectra and tessellations.

use thiserror::Error;

use crate::manager::ManagerError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Manager(#[from] ManagerError),
}

pub type CoreResult<T> = Result<T, CoreError>;

/// Log and build an [`CoreError::InvalidArgument`].
pub(crate) fn invalid_argument(message: impl Into<String>) -> CoreError {
    let message = message.into();
    log::error!("{message}");
    CoreError::InvalidArgument(message)
}
