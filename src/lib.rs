//! USB host backend over a raw USB device node.
//!
//! A [`Device`] is enumerated once and caches every descriptor. A
//! [`DeviceHandle`] opens the node, tracks interface claims and runs
//! submitted [`Transfer`]s one at a time on its own worker thread, handing
//! each finished transfer back through [`TransferDispatch`].

pub mod claims;
pub mod control_transfer;
pub mod descriptors;
pub mod device;
pub mod endpoint;
pub mod error;
pub mod handle;
pub mod os;
mod queue;
pub mod transfer;
pub mod usb_transfer;

pub use claims::InterfaceClaims;
pub use control_transfer::{ControlSetup, CONTROL_SETUP_SIZE};
pub use device::{Device, EndpointLocation};
pub use endpoint::Endpoint;
pub use error::{Error, Result};
pub use handle::{DeviceHandle, HandleOptions};
pub use os::usb_raw::{IsoPacketDescriptor, RawDevice, RawError, RawResult, RawStatus};
#[cfg(unix)]
pub use os::usb_raw::RawNode;
pub use transfer::TransferObject;
pub use usb_transfer::{
    IsoPacket, PacketStatus, Transfer, TransferDispatch, TransferId, TransferStatus, TransferType,
};
