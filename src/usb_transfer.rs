//! The generic transfer record shared with the dispatch layer, and the
//! completion seam through which finished transfers are handed back.

use crate::control_transfer::{ControlSetup, CONTROL_SETUP_SIZE};
use crate::endpoint::Endpoint;
#[cfg(feature = "serde")]
use serde::Serialize;
use std::fmt;

/// Identifies one submitted transfer for the lifetime of its handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TransferId(pub(crate) u64);

impl fmt::Display for TransferId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransferType {
    Control,
    Isochronous,
    Bulk,
    Interrupt,
    /// A type code this backend has no command for.
    Unknown(u8),
}

impl From<u8> for TransferType {
    fn from(code: u8) -> Self {
        match code {
            0 => TransferType::Control,
            1 => TransferType::Isochronous,
            2 => TransferType::Bulk,
            3 => TransferType::Interrupt,
            n => TransferType::Unknown(n),
        }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransferStatus {
    /// Not completed yet.
    Pending,
    Completed { transferred: usize },
    Failed,
    /// Cancelled before any I/O was issued.
    Cancelled,
}

#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PacketStatus {
    Pending,
    Completed,
    Error,
}

#[derive(Clone, Debug, PartialEq)]
pub struct IsoPacket {
    /// Requested length.
    pub length: u32,
    pub actual_length: u32,
    pub status: PacketStatus,
}

impl IsoPacket {
    pub fn new(length: u32) -> Self {
        IsoPacket {
            length,
            actual_length: 0,
            status: PacketStatus::Pending,
        }
    }
}

/// One request as seen by the dispatch layer. The backend owns it from
/// submission until completion, then hands it back through
/// [`TransferDispatch`].
#[derive(Clone, Debug)]
pub struct Transfer {
    kind: TransferType,
    endpoint: Endpoint,
    buffer: Vec<u8>,
    iso_packets: Vec<IsoPacket>,
    status: TransferStatus,
    id: Option<TransferId>,
}

impl Transfer {
    pub fn new(kind: TransferType, endpoint: Endpoint, buffer: Vec<u8>) -> Self {
        Transfer {
            kind,
            endpoint,
            buffer,
            iso_packets: vec![],
            status: TransferStatus::Pending,
            id: None,
        }
    }

    /// Control transfer on endpoint 0. The setup packet is written in front
    /// of `data`; for IN requests `data` should be `setup.length` bytes of
    /// room.
    pub fn control(setup: ControlSetup, data: &[u8]) -> Self {
        let mut buffer = Vec::with_capacity(CONTROL_SETUP_SIZE + data.len());
        buffer.extend_from_slice(&setup.to_bytes());
        buffer.extend_from_slice(data);
        Self::new(TransferType::Control, Endpoint::new(0), buffer)
    }

    pub fn bulk(endpoint: Endpoint, buffer: Vec<u8>) -> Self {
        Self::new(TransferType::Bulk, endpoint, buffer)
    }

    pub fn interrupt(endpoint: Endpoint, buffer: Vec<u8>) -> Self {
        Self::new(TransferType::Interrupt, endpoint, buffer)
    }

    pub fn isochronous(endpoint: Endpoint, buffer: Vec<u8>, packet_lengths: &[u32]) -> Self {
        let mut transfer = Self::new(TransferType::Isochronous, endpoint, buffer);
        transfer.iso_packets = packet_lengths.iter().map(|len| IsoPacket::new(*len)).collect();
        transfer
    }

    pub fn kind(&self) -> TransferType {
        self.kind
    }

    pub fn endpoint(&self) -> Endpoint {
        self.endpoint
    }

    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut [u8] {
        &mut self.buffer
    }

    /// Requested length.
    pub fn length(&self) -> usize {
        self.buffer.len()
    }

    pub fn into_buffer(self) -> Vec<u8> {
        self.buffer
    }

    pub fn iso_packets(&self) -> &[IsoPacket] {
        &self.iso_packets
    }

    pub fn status(&self) -> TransferStatus {
        self.status
    }

    /// Transferred byte count, `-1` on failure.
    pub fn transferred(&self) -> i64 {
        match self.status {
            TransferStatus::Completed { transferred } => transferred as i64,
            TransferStatus::Failed => -1,
            TransferStatus::Pending | TransferStatus::Cancelled => 0,
        }
    }

    pub fn id(&self) -> Option<TransferId> {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: TransferId) {
        self.id = Some(id);
    }

    pub(crate) fn set_status(&mut self, status: TransferStatus) {
        self.status = status;
    }

    /// Splits the record into the pieces an execution needs mutably at once.
    pub(crate) fn io_parts(&mut self) -> (&mut [u8], &mut [IsoPacket]) {
        (&mut self.buffer, &mut self.iso_packets)
    }
}

/// Receives every transfer exactly once when its outcome is final. Called
/// from the handle's worker thread, or from the thread that cancelled or
/// closed while the transfer was still queued.
pub trait TransferDispatch: Send + Sync {
    fn transfer_completed(&self, id: TransferId, transfer: Transfer);
}

impl<F> TransferDispatch for F
where
    F: Fn(TransferId, Transfer) + Send + Sync,
{
    fn transfer_completed(&self, id: TransferId, transfer: Transfer) {
        self(id, transfer)
    }
}
