//! Open sessions on a [`Device`].
//!
//! Every handle owns its raw node and one worker thread. Submitted
//! transfers are queued and executed strictly one at a time, in submission
//! order, by that worker. Configuration and alternate setting changes run
//! synchronously on the caller's thread and bypass the queue, so callers
//! must not mix them with in-flight transfers without their own
//! coordination.

use crate::claims::InterfaceClaims;
use crate::device::Device;
use crate::error::{Error, Result};
#[cfg(unix)]
use crate::os::usb_raw::RawNode;
use crate::os::usb_raw::RawDevice;
use crate::queue::WorkQueue;
use crate::transfer::TransferObject;
use crate::usb_transfer::{Transfer, TransferDispatch, TransferId};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

#[derive(Clone, Debug)]
pub struct HandleOptions {
    /// Name given to the transfer worker thread.
    pub worker_name: String,
}

impl Default for HandleOptions {
    fn default() -> Self {
        HandleOptions {
            worker_name: "usb-transfer-worker".to_string(),
        }
    }
}

/// State shared between the handle and its worker.
struct Shared {
    queue: WorkQueue<(TransferId, TransferObject)>,
    /// Cancel flags of every queued or executing transfer.
    in_flight: Mutex<HashMap<TransferId, Arc<AtomicBool>>>,
    dispatch: Box<dyn TransferDispatch>,
}

impl Shared {
    fn in_flight(&self) -> MutexGuard<'_, HashMap<TransferId, Arc<AtomicBool>>> {
        self.in_flight.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Whoever took `object` off the queue calls this, exactly once.
    fn finish(&self, id: TransferId, object: TransferObject) {
        self.in_flight().remove(&id);
        self.dispatch.transfer_completed(id, object.into_transfer());
    }
}

fn transfers_worker<R: RawDevice + ?Sized>(raw: &R, shared: &Shared) {
    log::debug!("transfer worker started");
    while let Some((id, mut object)) = shared.queue.pop() {
        if let Err(e) = object.execute(raw) {
            log::debug!("transfer {} finished with error: {}", id, e);
        }
        shared.finish(id, object);
    }
    log::debug!("transfer worker stopped");
}

pub struct DeviceHandle<R: RawDevice + 'static> {
    device: Arc<Device>,
    raw: Arc<R>,
    shared: Arc<Shared>,
    claims: Mutex<InterfaceClaims>,
    next_id: AtomicU64,
    worker: Option<JoinHandle<()>>,
}

#[cfg(unix)]
impl DeviceHandle<RawNode> {
    /// Opens the raw node at the device's location.
    pub fn open<D: TransferDispatch + 'static>(device: Arc<Device>, dispatch: D) -> Result<Self> {
        let raw = RawNode::open(device.location()).map_err(|e| {
            log::error!("{}: failed to open device: {}", device.location(), e);
            Error::InitializationFailure(format!("failed to open device: {}", e))
        })?;
        Self::new(device, raw, dispatch)
    }
}

impl<R: RawDevice + 'static> DeviceHandle<R> {
    pub fn new<D: TransferDispatch + 'static>(device: Arc<Device>, raw: R, dispatch: D) -> Result<Self> {
        Self::with_options(device, raw, dispatch, HandleOptions::default())
    }

    pub fn with_options<D: TransferDispatch + 'static>(
        device: Arc<Device>,
        raw: R,
        dispatch: D,
        options: HandleOptions,
    ) -> Result<Self> {
        let raw = Arc::new(raw);
        let shared = Arc::new(Shared {
            queue: WorkQueue::new(),
            in_flight: Mutex::new(HashMap::new()),
            dispatch: Box::new(dispatch),
        });

        let worker = {
            let raw = Arc::clone(&raw);
            let shared = Arc::clone(&shared);
            thread::Builder::new()
                .name(options.worker_name)
                .spawn(move || transfers_worker(&*raw, &shared))
                .map_err(|e| {
                    log::error!("{}: failed to spawn transfer worker: {}", device.location(), e);
                    Error::InitializationFailure(format!("failed to spawn transfer worker: {}", e))
                })?
        };

        Ok(DeviceHandle {
            device,
            raw,
            shared,
            claims: Mutex::new(InterfaceClaims::new()),
            next_id: AtomicU64::new(1),
            worker: Some(worker),
        })
    }

    pub fn device(&self) -> &Arc<Device> {
        &self.device
    }

    pub fn raw(&self) -> &R {
        &self.raw
    }

    fn claims(&self) -> MutexGuard<'_, InterfaceClaims> {
        self.claims.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Interfaces claimed through this handle.
    pub fn claimed_interfaces(&self) -> InterfaceClaims {
        *self.claims()
    }

    /// Transfers queued and not yet picked up by the worker.
    pub fn pending_transfers(&self) -> usize {
        self.shared.queue.len()
    }

    /// Queues `transfer` for the worker. The returned id is also stored in
    /// the transfer itself and identifies it to [`DeviceHandle::cancel`]
    /// and to the completion callback.
    pub fn submit(&self, transfer: Transfer) -> Result<TransferId> {
        let id = TransferId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let mut object = TransferObject::new(transfer, Arc::clone(&self.device));
        object.set_id(id);

        self.shared.in_flight().insert(id, object.cancel_flag());
        if self.shared.queue.push((id, object)).is_err() {
            self.shared.in_flight().remove(&id);
            return Err(Error::Internal("transfer queue closed"));
        }
        log::debug!("queued transfer {}", id);
        Ok(id)
    }

    /// Requests cancellation of an in-flight transfer.
    ///
    /// A transfer still in the queue is removed and completed as cancelled
    /// right here, on the calling thread. One the worker already picked up
    /// is left to the worker, which completes it exactly once: cancelled if
    /// its I/O had not started yet, with its real outcome otherwise.
    pub fn cancel(&self, id: TransferId) -> Result<()> {
        let flag = self
            .shared
            .in_flight()
            .get(&id)
            .cloned()
            .ok_or(Error::NotFound)?;
        flag.store(true, Ordering::SeqCst);

        match self.shared.queue.remove(|(queued, _)| *queued == id) {
            Some((_, mut object)) => {
                log::debug!("cancelled queued transfer {}", id);
                object.mark_cancelled();
                self.shared.finish(id, object);
            }
            None => log::debug!("transfer {} already picked up by the worker", id),
        }
        Ok(())
    }

    pub fn claim_interface(&self, interface: u8) -> Result<()> {
        self.device.claim_interface(interface)?;
        self.claims().insert(interface);
        Ok(())
    }

    pub fn release_interface(&self, interface: u8) -> Result<()> {
        self.device.release_interface(interface);
        self.claims().remove(interface);
        Ok(())
    }

    /// Switches to the configuration advertising `value`. Only allowed
    /// while no interface is claimed.
    pub fn set_configuration(&self, value: u8) -> Result<()> {
        let index = self.device.check_interfaces_free(value)?;
        self.raw.set_configuration(index as u32).map_err(|e| {
            log::error!("{}: failed to set configuration {}: {}", self.device.location(), value, e);
            Error::from(e)
        })?;
        self.device.set_active_configuration(index)
    }

    pub fn set_alternate_setting(&self, interface: u8, alternate: u8) -> Result<()> {
        let config_index = self.device.active_configuration_index() as u32;
        let active = self
            .raw
            .active_alternate(config_index, interface as u32)
            .map_err(|e| {
                log::error!("Error retrieving active alternate interface: {}", e);
                Error::from(e)
            })?;
        if active == alternate as u32 {
            log::debug!("alternate setting {} already active on interface {}", alternate, interface);
            return Ok(());
        }

        self.raw
            .set_alternate(config_index, interface as u32, alternate as u32)
            .map_err(|e| {
                log::error!("Error setting alternate interface: {}", e);
                Error::from(e)
            })?;
        log::debug!("Setting alternate interface successful");
        Ok(())
    }
}

impl<R: RawDevice + 'static> Drop for DeviceHandle<R> {
    fn drop(&mut self) {
        let claims = std::mem::take(self.claims.get_mut().unwrap_or_else(PoisonError::into_inner));
        for interface in claims.iter() {
            self.device.release_interface(interface);
        }

        for (id, mut object) in self.shared.queue.close() {
            log::debug!("cancelling transfer {} on close", id);
            object.mark_cancelled();
            self.shared.finish(id, object);
        }

        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::error!("{}: transfer worker panicked", self.device.location());
            }
        }
        // the raw node closes with the last reference, which is ours now
    }
}
