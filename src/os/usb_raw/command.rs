//! `#[repr(C)]` layout of the raw command block. Every variant starts with
//! the status the driver writes back.
#![allow(dead_code)]

use libc::c_void;
use std::fmt;

/// One entry of the packet array handed to an isochronous command.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(C)]
pub struct IsoPacketDescriptor {
    pub request_length: u16,
    pub actual_length: u16,
    pub status: i32,
}

impl IsoPacketDescriptor {
    pub fn new(request_length: u16) -> Self {
        IsoPacketDescriptor {
            request_length,
            actual_length: 0,
            status: 0,
        }
    }
}

impl fmt::Display for IsoPacketDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "request_length: {} actual_length: {} status: {}",
            self.request_length, self.actual_length, self.status
        )
    }
}

#[derive(Clone, Copy)]
#[repr(C)]
pub struct DeviceCommand {
    pub status: i32,
    pub descriptor: *mut u8,
}

#[derive(Clone, Copy)]
#[repr(C)]
pub struct ConfigCommand {
    pub status: i32,
    pub descriptor: *mut u8,
    pub config_index: u32,
}

#[derive(Clone, Copy)]
#[repr(C)]
pub struct AlternateCommand {
    pub status: i32,
    pub alternate_info: u32,
    pub config_index: u32,
    pub interface_index: u32,
}

#[derive(Clone, Copy)]
#[repr(C)]
pub struct InterfaceEtcCommand {
    pub status: i32,
    pub descriptor: *mut u8,
    pub config_index: u32,
    pub interface_index: u32,
    pub alternate_index: u32,
}

#[derive(Clone, Copy)]
#[repr(C)]
pub struct EndpointEtcCommand {
    pub status: i32,
    pub descriptor: *mut u8,
    pub config_index: u32,
    pub interface_index: u32,
    pub alternate_index: u32,
    pub endpoint_index: u32,
}

#[derive(Clone, Copy)]
#[repr(C)]
pub struct ControlCommand {
    pub status: i32,
    pub request_type: u8,
    pub request: u8,
    pub value: u16,
    pub index: u16,
    pub length: u16,
    pub data: *mut c_void,
}

#[derive(Clone, Copy)]
#[repr(C)]
pub struct TransferCommand {
    pub status: i32,
    pub interface: u32,
    pub endpoint: u32,
    pub data: *mut c_void,
    pub length: usize,
}

#[derive(Clone, Copy)]
#[repr(C)]
pub struct IsochronousCommand {
    pub status: i32,
    pub interface: u32,
    pub endpoint: u32,
    pub data: *mut c_void,
    pub length: usize,
    pub packet_descriptors: *mut IsoPacketDescriptor,
    pub packet_count: u32,
}

#[derive(Clone, Copy)]
#[repr(C)]
pub union RawCommand {
    pub device: DeviceCommand,
    pub config: ConfigCommand,
    pub alternate: AlternateCommand,
    pub interface_etc: InterfaceEtcCommand,
    pub endpoint_etc: EndpointEtcCommand,
    pub control: ControlCommand,
    pub transfer: TransferCommand,
    pub isochronous: IsochronousCommand,
}

impl RawCommand {
    pub fn zeroed() -> Self {
        // SAFETY: every variant is plain integers and raw pointers, all of
        // which are valid when zeroed.
        unsafe { std::mem::zeroed() }
    }
}
