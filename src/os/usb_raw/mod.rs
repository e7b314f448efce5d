//! The raw USB device node protocol.
//!
//! Every operation is one synchronous command against the node: the caller
//! fills a command struct, the driver performs the request and writes back a
//! status code plus command specific output fields. [`RawDevice`] is that
//! command set; [`RawNode`] issues it through `ioctl` on an opened node.

pub mod command;
pub mod constants;
#[cfg(unix)]
pub mod node;

use crate::control_transfer::ControlSetup;
use crate::descriptors::{
    ConfigurationDescriptor, DeviceDescriptor, EndpointDescriptor, InterfaceDescriptor,
};
use constants::*;
#[cfg(unix)]
pub use node::RawNode;
use std::fmt;

pub use command::IsoPacketDescriptor;

/// Status code written back by the driver into every command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RawStatus {
    Success,
    Failed,
    Aborted,
    Stalled,
    CrcError,
    Timeout,
    InvalidConfiguration,
    InvalidInterface,
    InvalidEndpoint,
    InvalidString,
    NotSupported,
    DeviceDescriptorError,
    NoMemory,
    Unknown(i32),
}

impl From<i32> for RawStatus {
    fn from(status: i32) -> Self {
        match status {
            USB_RAW_STATUS_SUCCESS => RawStatus::Success,
            USB_RAW_STATUS_FAILED => RawStatus::Failed,
            USB_RAW_STATUS_ABORTED => RawStatus::Aborted,
            USB_RAW_STATUS_STALLED => RawStatus::Stalled,
            USB_RAW_STATUS_CRC_ERROR => RawStatus::CrcError,
            USB_RAW_STATUS_TIMEOUT => RawStatus::Timeout,
            USB_RAW_STATUS_INVALID_CONFIGURATION => RawStatus::InvalidConfiguration,
            USB_RAW_STATUS_INVALID_INTERFACE => RawStatus::InvalidInterface,
            USB_RAW_STATUS_INVALID_ENDPOINT => RawStatus::InvalidEndpoint,
            USB_RAW_STATUS_INVALID_STRING => RawStatus::InvalidString,
            USB_RAW_STATUS_NOT_SUPPORTED => RawStatus::NotSupported,
            USB_RAW_STATUS_DEVICE_DESCRIPTOR_ERROR => RawStatus::DeviceDescriptorError,
            USB_RAW_STATUS_NO_MEMORY => RawStatus::NoMemory,
            n => RawStatus::Unknown(n),
        }
    }
}

impl From<RawStatus> for i32 {
    fn from(status: RawStatus) -> i32 {
        match status {
            RawStatus::Success => USB_RAW_STATUS_SUCCESS,
            RawStatus::Failed => USB_RAW_STATUS_FAILED,
            RawStatus::Aborted => USB_RAW_STATUS_ABORTED,
            RawStatus::Stalled => USB_RAW_STATUS_STALLED,
            RawStatus::CrcError => USB_RAW_STATUS_CRC_ERROR,
            RawStatus::Timeout => USB_RAW_STATUS_TIMEOUT,
            RawStatus::InvalidConfiguration => USB_RAW_STATUS_INVALID_CONFIGURATION,
            RawStatus::InvalidInterface => USB_RAW_STATUS_INVALID_INTERFACE,
            RawStatus::InvalidEndpoint => USB_RAW_STATUS_INVALID_ENDPOINT,
            RawStatus::InvalidString => USB_RAW_STATUS_INVALID_STRING,
            RawStatus::NotSupported => USB_RAW_STATUS_NOT_SUPPORTED,
            RawStatus::DeviceDescriptorError => USB_RAW_STATUS_DEVICE_DESCRIPTOR_ERROR,
            RawStatus::NoMemory => USB_RAW_STATUS_NO_MEMORY,
            RawStatus::Unknown(n) => n,
        }
    }
}

impl fmt::Display for RawStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?} ({})", self, i32::from(*self))
    }
}

impl RawStatus {
    /// Turns the status written back by the driver into a result.
    pub fn check(status: i32) -> RawResult<()> {
        match RawStatus::from(status) {
            RawStatus::Success => Ok(()),
            other => Err(RawError::Status(other)),
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
pub enum RawError {
    #[error("raw command failed: {0}")]
    Io(#[from] nix::Error),
    #[error("raw command returned status {0}")]
    Status(RawStatus),
}

pub type RawResult<T> = std::result::Result<T, RawError>;

/// The command set of a raw device node. Indexes are positions as the
/// driver enumerates them, not the values advertised in descriptors.
pub trait RawDevice: Send + Sync {
    fn device_descriptor(&self) -> RawResult<DeviceDescriptor>;

    /// Short configuration descriptor (header only) at `config_index`.
    fn configuration_descriptor(&self, config_index: u32) -> RawResult<ConfigurationDescriptor>;

    fn alternate_count(&self, config_index: u32, interface_index: u32) -> RawResult<u32>;

    fn active_alternate(&self, config_index: u32, interface_index: u32) -> RawResult<u32>;

    fn interface_descriptor(
        &self,
        config_index: u32,
        interface_index: u32,
        alternate_index: u32,
    ) -> RawResult<InterfaceDescriptor>;

    fn endpoint_descriptor(
        &self,
        config_index: u32,
        interface_index: u32,
        alternate_index: u32,
        endpoint_index: u32,
    ) -> RawResult<EndpointDescriptor>;

    fn set_configuration(&self, config_index: u32) -> RawResult<()>;

    fn set_alternate(&self, config_index: u32, interface_index: u32, alternate: u32)
        -> RawResult<()>;

    /// Runs a control transfer with `data` as the data phase. Returns the
    /// number of bytes the driver reports as transferred.
    fn control_transfer(&self, setup: &ControlSetup, data: &mut [u8]) -> RawResult<usize>;

    fn bulk_transfer(&self, interface: u32, endpoint: u32, data: &mut [u8]) -> RawResult<usize>;

    fn interrupt_transfer(&self, interface: u32, endpoint: u32, data: &mut [u8])
        -> RawResult<usize>;

    /// `packets` carries the requested lengths in and the actual lengths and
    /// per packet statuses out.
    fn isochronous_transfer(
        &self,
        interface: u32,
        endpoint: u32,
        data: &mut [u8],
        packets: &mut [IsoPacketDescriptor],
    ) -> RawResult<usize>;
}
