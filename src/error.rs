use crate::os::usb_raw::{RawError, RawStatus};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Unknown configuration, interface or endpoint, or a transfer that is
    /// no longer in flight.
    #[error("entity not found")]
    NotFound,
    /// Interface already claimed, or claims outstanding during a
    /// configuration switch.
    #[error("resource busy")]
    Busy,
    #[error("transfer failed")]
    TransferFailure,
    #[error("initialization failed: {0}")]
    InitializationFailure(String),
    #[error("internal error: {0}")]
    Internal(&'static str),
    #[error("invalid parameter: {0}")]
    InvalidParam(&'static str),
    #[error("device returned status {0}")]
    Status(RawStatus),
    #[error("raw command failed: {0}")]
    Io(nix::Error),
}

impl From<RawError> for Error {
    fn from(err: RawError) -> Self {
        match err {
            RawError::Io(errno) => Error::Io(errno),
            RawError::Status(status) => Error::Status(status),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
