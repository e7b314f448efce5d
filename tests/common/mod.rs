#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use usbraw::descriptors::descriptor::{
    DESCRIPTOR_TYPE_CONFIGURATION, DESCRIPTOR_TYPE_ENDPOINT, DESCRIPTOR_TYPE_INTERFACE,
};
use usbraw::descriptors::{
    ConfigurationDescriptor, DeviceDescriptor, EndpointDescriptor, InterfaceDescriptor,
    CONFIGURATION_DESCRIPTOR_SIZE, ENDPOINT_DESCRIPTOR_SIZE, INTERFACE_DESCRIPTOR_SIZE,
};
use usbraw::{
    ControlSetup, Device, DeviceHandle, IsoPacketDescriptor, RawDevice, RawError, RawResult,
    RawStatus, Transfer, TransferDispatch, TransferId,
};

pub const TIMEOUT: Duration = Duration::from_secs(5);

pub fn init_logger() {
    let _ = simple_logger::SimpleLogger::new().init();
}

/// Endpoint addresses per alternate setting per interface.
pub struct MockConfig {
    pub value: u8,
    pub interfaces: Vec<Vec<Vec<u8>>>,
}

impl MockConfig {
    fn blob(&self) -> Vec<u8> {
        let mut blob = vec![
            CONFIGURATION_DESCRIPTOR_SIZE as u8,
            DESCRIPTOR_TYPE_CONFIGURATION,
            0,
            0,
            self.interfaces.len() as u8,
            self.value,
            0,
            0x80,
            50,
        ];
        for (j, alternates) in self.interfaces.iter().enumerate() {
            for (k, endpoints) in alternates.iter().enumerate() {
                blob.extend_from_slice(&[
                    INTERFACE_DESCRIPTOR_SIZE as u8,
                    DESCRIPTOR_TYPE_INTERFACE,
                    j as u8,
                    k as u8,
                    endpoints.len() as u8,
                    0xff,
                    0,
                    0,
                    0,
                ]);
                for address in endpoints {
                    blob.extend_from_slice(&[
                        ENDPOINT_DESCRIPTOR_SIZE as u8,
                        DESCRIPTOR_TYPE_ENDPOINT,
                        *address,
                        2,
                        64,
                        0,
                        0,
                    ]);
                }
            }
        }
        let total = (blob.len() as u16).to_le_bytes();
        blob[2] = total[0];
        blob[3] = total[1];
        blob
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    DeviceDescriptor,
    ConfigurationDescriptor(u32),
    AlternateCount(u32, u32),
    ActiveAlternate(u32, u32),
    InterfaceDescriptor(u32, u32, u32),
    EndpointDescriptor(u32, u32, u32, u32),
    SetConfiguration(u32),
    SetAlternate(u32, u32, u32),
    Control(ControlSetup),
    /// Interface index, endpoint index and the buffer as handed in.
    Bulk(u32, u32, Vec<u8>),
    Interrupt(u32, u32, Vec<u8>),
    Isochronous(u32, u32, Vec<u16>),
}

struct Gate {
    entered: Sender<()>,
    release: Receiver<()>,
}

/// Scripted raw device. Control IN requests other than configuration
/// descriptor fetches are answered with `0x5a` bytes; bulk, interrupt and
/// isochronous requests transfer their full length.
pub struct MockDevice {
    configs: Vec<MockConfig>,
    calls: Mutex<Vec<Call>>,
    failing: Mutex<HashSet<&'static str>>,
    active_alternate: Mutex<u32>,
    iso_statuses: Mutex<Vec<i32>>,
    gate: Mutex<Option<Gate>>,
}

impl MockDevice {
    /// Configuration value 1 has interface 0 with endpoints 0x81 and 0x02
    /// plus an empty alternate setting, and interface 1 with interrupt
    /// endpoint 0x83 and isochronous endpoint 0x84. Configuration value 3
    /// has a single interface with endpoint 0x81.
    pub fn new() -> Self {
        Self::with_configs(vec![
            MockConfig {
                value: 1,
                interfaces: vec![vec![vec![0x81, 0x02], vec![]], vec![vec![0x83, 0x84]]],
            },
            MockConfig {
                value: 3,
                interfaces: vec![vec![vec![0x81]]],
            },
        ])
    }

    pub fn with_configs(configs: Vec<MockConfig>) -> Self {
        MockDevice {
            configs,
            calls: Mutex::new(vec![]),
            failing: Mutex::new(HashSet::new()),
            active_alternate: Mutex::new(0),
            iso_statuses: Mutex::new(vec![]),
            gate: Mutex::new(None),
        }
    }

    /// Makes every later call of `command` fail with `RawStatus::Failed`.
    pub fn fail_on(&self, command: &'static str) {
        self.failing.lock().unwrap().insert(command);
    }

    pub fn set_iso_statuses(&self, statuses: Vec<i32>) {
        *self.iso_statuses.lock().unwrap() = statuses;
    }

    pub fn set_active_alternate(&self, alternate: u32) {
        *self.active_alternate.lock().unwrap() = alternate;
    }

    /// Holds the next bulk or interrupt transfer inside the device until
    /// the returned sender fires. The receiver fires once it is held.
    pub fn hold_next_transfer(&self) -> (Receiver<()>, Sender<()>) {
        let (entered_tx, entered_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel();
        *self.gate.lock().unwrap() = Some(Gate {
            entered: entered_tx,
            release: release_rx,
        });
        (entered_rx, release_tx)
    }

    pub fn take_calls(&self) -> Vec<Call> {
        std::mem::take(&mut *self.calls.lock().unwrap())
    }

    fn record(&self, command: &'static str, call: Call) -> RawResult<()> {
        self.calls.lock().unwrap().push(call);
        if self.failing.lock().unwrap().contains(command) {
            return Err(RawError::Status(RawStatus::Failed));
        }
        Ok(())
    }

    fn config(&self, config_index: u32) -> RawResult<&MockConfig> {
        self.configs
            .get(config_index as usize)
            .ok_or(RawError::Status(RawStatus::InvalidConfiguration))
    }

    fn endpoints(&self, config_index: u32, interface: u32, alternate: u32) -> RawResult<&Vec<u8>> {
        self.config(config_index)?
            .interfaces
            .get(interface as usize)
            .and_then(|alternates| alternates.get(alternate as usize))
            .ok_or(RawError::Status(RawStatus::InvalidInterface))
    }

    fn pass_gate(&self) {
        let gate = self.gate.lock().unwrap().take();
        if let Some(gate) = gate {
            let _ = gate.entered.send(());
            let _ = gate.release.recv_timeout(TIMEOUT);
        }
    }
}

impl RawDevice for MockDevice {
    fn device_descriptor(&self) -> RawResult<DeviceDescriptor> {
        self.record("device_descriptor", Call::DeviceDescriptor)?;
        Ok(DeviceDescriptor {
            length: 18,
            kind: 1,
            bcd_usb: 0x0200,
            device_class: 0,
            device_sub_class: 0,
            device_protocol: 0,
            max_packet_size0: 64,
            id_vendor: 0x1209,
            id_product: 0x0001,
            bcd_device: 0x0100,
            imanufacturer: 1,
            iproduct: 2,
            iserial: 3,
            num_configurations: self.configs.len() as u8,
        })
    }

    fn configuration_descriptor(&self, config_index: u32) -> RawResult<ConfigurationDescriptor> {
        self.record(
            "configuration_descriptor",
            Call::ConfigurationDescriptor(config_index),
        )?;
        let blob = self.config(config_index)?.blob();
        Ok(ConfigurationDescriptor::from_bytes(&blob).unwrap())
    }

    fn alternate_count(&self, config_index: u32, interface_index: u32) -> RawResult<u32> {
        self.record(
            "alternate_count",
            Call::AlternateCount(config_index, interface_index),
        )?;
        self.config(config_index)?
            .interfaces
            .get(interface_index as usize)
            .map(|alternates| alternates.len() as u32)
            .ok_or(RawError::Status(RawStatus::InvalidInterface))
    }

    fn active_alternate(&self, config_index: u32, interface_index: u32) -> RawResult<u32> {
        self.record(
            "active_alternate",
            Call::ActiveAlternate(config_index, interface_index),
        )?;
        Ok(*self.active_alternate.lock().unwrap())
    }

    fn interface_descriptor(
        &self,
        config_index: u32,
        interface_index: u32,
        alternate_index: u32,
    ) -> RawResult<InterfaceDescriptor> {
        self.record(
            "interface_descriptor",
            Call::InterfaceDescriptor(config_index, interface_index, alternate_index),
        )?;
        let endpoints = self.endpoints(config_index, interface_index, alternate_index)?;
        Ok(InterfaceDescriptor::from_bytes(&[
            9,
            DESCRIPTOR_TYPE_INTERFACE,
            interface_index as u8,
            alternate_index as u8,
            endpoints.len() as u8,
            0xff,
            0,
            0,
            0,
        ])
        .unwrap())
    }

    fn endpoint_descriptor(
        &self,
        config_index: u32,
        interface_index: u32,
        alternate_index: u32,
        endpoint_index: u32,
    ) -> RawResult<EndpointDescriptor> {
        self.record(
            "endpoint_descriptor",
            Call::EndpointDescriptor(config_index, interface_index, alternate_index, endpoint_index),
        )?;
        let address = *self
            .endpoints(config_index, interface_index, alternate_index)?
            .get(endpoint_index as usize)
            .ok_or(RawError::Status(RawStatus::InvalidEndpoint))?;
        Ok(EndpointDescriptor::from_bytes(&[7, DESCRIPTOR_TYPE_ENDPOINT, address, 2, 64, 0, 0]).unwrap())
    }

    fn set_configuration(&self, config_index: u32) -> RawResult<()> {
        self.record("set_configuration", Call::SetConfiguration(config_index))
    }

    fn set_alternate(&self, config_index: u32, interface_index: u32, alternate: u32) -> RawResult<()> {
        self.record(
            "set_alternate",
            Call::SetAlternate(config_index, interface_index, alternate),
        )?;
        *self.active_alternate.lock().unwrap() = alternate;
        Ok(())
    }

    fn control_transfer(&self, setup: &ControlSetup, data: &mut [u8]) -> RawResult<usize> {
        self.record("control_transfer", Call::Control(*setup))?;
        let length = (setup.length as usize).min(data.len());
        if !setup.is_in() {
            return Ok(length);
        }
        if setup.request == 0x06 && setup.value >> 8 == DESCRIPTOR_TYPE_CONFIGURATION as u16 {
            let blob = self.config((setup.value & 0xff) as u32)?.blob();
            let length = length.min(blob.len());
            data[..length].copy_from_slice(&blob[..length]);
            return Ok(length);
        }
        data[..length].iter_mut().for_each(|b| *b = 0x5a);
        Ok(length)
    }

    fn bulk_transfer(&self, interface: u32, endpoint: u32, data: &mut [u8]) -> RawResult<usize> {
        self.record("bulk_transfer", Call::Bulk(interface, endpoint, data.to_vec()))?;
        self.pass_gate();
        Ok(data.len())
    }

    fn interrupt_transfer(&self, interface: u32, endpoint: u32, data: &mut [u8]) -> RawResult<usize> {
        self.record(
            "interrupt_transfer",
            Call::Interrupt(interface, endpoint, data.to_vec()),
        )?;
        self.pass_gate();
        Ok(data.len())
    }

    fn isochronous_transfer(
        &self,
        interface: u32,
        endpoint: u32,
        data: &mut [u8],
        packets: &mut [IsoPacketDescriptor],
    ) -> RawResult<usize> {
        let lengths = packets.iter().map(|p| p.request_length).collect();
        self.record(
            "isochronous_transfer",
            Call::Isochronous(interface, endpoint, lengths),
        )?;
        let statuses = self.iso_statuses.lock().unwrap();
        for (i, packet) in packets.iter_mut().enumerate() {
            packet.actual_length = packet.request_length;
            packet.status = statuses.get(i).copied().unwrap_or(0);
        }
        Ok(data.len())
    }
}

pub fn enumerate(mock: &MockDevice) -> Arc<Device> {
    Arc::new(Device::enumerate("/dev/bus/usb/0/1", mock).unwrap())
}

/// Dispatch that forwards every completion into a channel.
pub fn completions() -> (impl TransferDispatch, Receiver<(TransferId, Transfer)>) {
    let (tx, rx) = mpsc::channel();
    let tx = Mutex::new(tx);
    let dispatch = move |id: TransferId, transfer: Transfer| {
        let _ = tx.lock().unwrap().send((id, transfer));
    };
    (dispatch, rx)
}

pub fn open_handle() -> (
    Arc<Device>,
    DeviceHandle<MockDevice>,
    Receiver<(TransferId, Transfer)>,
) {
    init_logger();
    let device = enumerate(&MockDevice::new());
    let (dispatch, done) = completions();
    let handle = DeviceHandle::new(Arc::clone(&device), MockDevice::new(), dispatch).unwrap();
    (device, handle, done)
}
