use crate::control_transfer::{ControlSetup, CONTROL_SETUP_SIZE};
use crate::device::{Device, EndpointLocation};
use crate::error::{Error, Result};
use crate::os::usb_raw::constants::PACKET_STATUS_OK;
use crate::os::usb_raw::{IsoPacketDescriptor, RawDevice, RawError};
use crate::usb_transfer::{PacketStatus, Transfer, TransferId, TransferStatus, TransferType};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// One submitted request together with the state the backend keeps for it.
///
/// Executing translates the generic [`Transfer`] into the matching raw
/// command and writes the outcome back into it. A cancelled object skips
/// the I/O and completes as [`TransferStatus::Cancelled`]; cancellation
/// cannot interrupt a command that is already running.
#[derive(Debug)]
pub struct TransferObject {
    transfer: Transfer,
    device: Arc<Device>,
    cancelled: Arc<AtomicBool>,
}

impl TransferObject {
    pub fn new(transfer: Transfer, device: Arc<Device>) -> Self {
        TransferObject {
            transfer,
            device,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn id(&self) -> Option<TransferId> {
        self.transfer.id()
    }

    pub fn transfer(&self) -> &Transfer {
        &self.transfer
    }

    pub fn into_transfer(self) -> Transfer {
        self.transfer
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Shared flag, so a cancel request can reach the object after the
    /// worker has taken it off the queue.
    pub(crate) fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }

    pub(crate) fn set_id(&mut self, id: TransferId) {
        self.transfer.set_id(id);
    }

    /// Completes the object without running it.
    pub(crate) fn mark_cancelled(&mut self) {
        self.transfer.set_status(TransferStatus::Cancelled);
    }

    pub fn execute<R: RawDevice + ?Sized>(&mut self, raw: &R) -> Result<()> {
        match self.transfer.kind() {
            TransferType::Control => self.execute_control(raw),
            kind @ TransferType::Bulk | kind @ TransferType::Interrupt => {
                self.execute_bulk(raw, kind)
            }
            TransferType::Isochronous => self.execute_isochronous(raw),
            TransferType::Unknown(code) => {
                log::error!("Unknown type of transfer: {}", code);
                self.transfer.set_status(TransferStatus::Failed);
                Err(Error::Internal("unknown transfer type"))
            }
        }
    }

    fn execute_control<R: RawDevice + ?Sized>(&mut self, raw: &R) -> Result<()> {
        let setup = match ControlSetup::parse(self.transfer.buffer()) {
            Some(setup) => setup,
            None => return self.reject(Error::InvalidParam("control buffer shorter than setup packet")),
        };
        let end = CONTROL_SETUP_SIZE + setup.length as usize;
        if self.transfer.length() < end {
            return self.reject(Error::InvalidParam("control buffer shorter than wLength"));
        }
        if self.skip_cancelled() {
            return Ok(());
        }

        let (buffer, _) = self.transfer.io_parts();
        match raw.control_transfer(&setup, &mut buffer[CONTROL_SETUP_SIZE..end]) {
            Ok(len) => self.complete(len),
            Err(e) => self.failed("control", e),
        }
    }

    fn execute_bulk<R: RawDevice + ?Sized>(&mut self, raw: &R, kind: TransferType) -> Result<()> {
        let location = match self.resolve_endpoint() {
            Ok(location) => location,
            Err(e) => return self.reject(e),
        };
        if self.skip_cancelled() {
            return Ok(());
        }

        let interface = location.interface as u32;
        let endpoint = location.index as u32;
        let (buffer, _) = self.transfer.io_parts();
        let (what, res) = if kind == TransferType::Bulk {
            ("bulk", raw.bulk_transfer(interface, endpoint, buffer))
        } else {
            ("interrupt", raw.interrupt_transfer(interface, endpoint, buffer))
        };
        match res {
            Ok(len) => self.complete(len),
            Err(e) => self.failed(what, e),
        }
    }

    fn execute_isochronous<R: RawDevice + ?Sized>(&mut self, raw: &R) -> Result<()> {
        let location = match self.resolve_endpoint() {
            Ok(location) => location,
            Err(e) => return self.reject(e),
        };
        let packets: std::result::Result<Vec<_>, u32> = self
            .transfer
            .iso_packets()
            .iter()
            .map(|p| {
                u16::try_from(p.length)
                    .map(IsoPacketDescriptor::new)
                    .map_err(|_| p.length)
            })
            .collect();
        let mut packets = match packets {
            Ok(packets) => packets,
            Err(length) => {
                log::error!(
                    "failed isochronous transfer on {}: packet length {} does not fit the packet descriptor",
                    self.transfer.endpoint(),
                    length
                );
                self.transfer.set_status(TransferStatus::Failed);
                return Err(Error::TransferFailure);
            }
        };
        if self.skip_cancelled() {
            return Ok(());
        }

        let (buffer, iso) = self.transfer.io_parts();
        let res = raw.isochronous_transfer(
            location.interface as u32,
            location.index as u32,
            buffer,
            &mut packets,
        );
        match res {
            Ok(len) => {
                for (packet, raw_packet) in iso.iter_mut().zip(&packets) {
                    packet.actual_length = raw_packet.actual_length as u32;
                    packet.status = if raw_packet.status == PACKET_STATUS_OK {
                        PacketStatus::Completed
                    } else {
                        PacketStatus::Error
                    };
                }
                self.complete(len)
            }
            Err(e) => self.failed("isochronous", e),
        }
    }

    fn resolve_endpoint(&self) -> Result<EndpointLocation> {
        let endpoint = self.transfer.endpoint();
        self.device.endpoint_location(endpoint.address()).ok_or_else(|| {
            log::error!("{} is not part of the active configuration", endpoint);
            Error::NotFound
        })
    }

    /// Checked right before the raw command is issued.
    fn skip_cancelled(&mut self) -> bool {
        if !self.is_cancelled() {
            return false;
        }
        log::debug!("transfer on {} cancelled before I/O", self.transfer.endpoint());
        self.mark_cancelled();
        true
    }

    fn complete(&mut self, transferred: usize) -> Result<()> {
        self.transfer.set_status(TransferStatus::Completed { transferred });
        Ok(())
    }

    fn failed(&mut self, what: &str, err: RawError) -> Result<()> {
        log::error!("failed {} transfer on {}: {}", what, self.transfer.endpoint(), err);
        self.transfer.set_status(TransferStatus::Failed);
        Err(Error::TransferFailure)
    }

    fn reject(&mut self, err: Error) -> Result<()> {
        log::error!("rejected transfer on {}: {}", self.transfer.endpoint(), err);
        self.transfer.set_status(TransferStatus::Failed);
        Err(err)
    }
}
