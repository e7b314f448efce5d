use super::command::*;
use super::constants::*;
use super::{RawDevice, RawError, RawResult, RawStatus};
use crate::control_transfer::ControlSetup;
use crate::descriptors::*;
use libc::c_void;
use nix::ioctl_readwrite_bad;
use std::fs::{File, OpenOptions};
use std::io;
use std::os::unix::fs::OpenOptionsExt;
use std::os::unix::io::AsRawFd;
use std::path::Path;

ioctl_readwrite_bad!(usb_raw_get_device_descriptor, USB_RAW_COMMAND_GET_DEVICE_DESCRIPTOR, RawCommand);
ioctl_readwrite_bad!(
    usb_raw_get_configuration_descriptor,
    USB_RAW_COMMAND_GET_CONFIGURATION_DESCRIPTOR,
    RawCommand
);
ioctl_readwrite_bad!(usb_raw_get_alt_interface_count, USB_RAW_COMMAND_GET_ALT_INTERFACE_COUNT, RawCommand);
ioctl_readwrite_bad!(
    usb_raw_get_active_alt_interface_index,
    USB_RAW_COMMAND_GET_ACTIVE_ALT_INTERFACE_INDEX,
    RawCommand
);
ioctl_readwrite_bad!(
    usb_raw_get_interface_descriptor_etc,
    USB_RAW_COMMAND_GET_INTERFACE_DESCRIPTOR_ETC,
    RawCommand
);
ioctl_readwrite_bad!(
    usb_raw_get_endpoint_descriptor_etc,
    USB_RAW_COMMAND_GET_ENDPOINT_DESCRIPTOR_ETC,
    RawCommand
);
ioctl_readwrite_bad!(usb_raw_set_configuration, USB_RAW_COMMAND_SET_CONFIGURATION, RawCommand);
ioctl_readwrite_bad!(usb_raw_set_alt_interface, USB_RAW_COMMAND_SET_ALT_INTERFACE, RawCommand);
ioctl_readwrite_bad!(usb_raw_control_transfer, USB_RAW_COMMAND_CONTROL_TRANSFER, RawCommand);
ioctl_readwrite_bad!(usb_raw_interrupt_transfer, USB_RAW_COMMAND_INTERRUPT_TRANSFER, RawCommand);
ioctl_readwrite_bad!(usb_raw_bulk_transfer, USB_RAW_COMMAND_BULK_TRANSFER, RawCommand);
ioctl_readwrite_bad!(usb_raw_isochronous_transfer, USB_RAW_COMMAND_ISOCHRONOUS_TRANSFER, RawCommand);

type Command = unsafe fn(libc::c_int, *mut RawCommand) -> nix::Result<libc::c_int>;

impl RawCommand {
    fn status(&self) -> i32 {
        // SAFETY: status is the leading i32 of every variant.
        unsafe { self.device.status }
    }
}

/// An opened raw device node.
#[derive(Debug)]
pub struct RawNode {
    handle: File,
}

impl RawNode {
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<RawNode> {
        let handle = OpenOptions::new()
            .read(true)
            .write(true)
            .custom_flags(libc::O_CLOEXEC)
            .open(path)?;
        Ok(RawNode { handle })
    }

    pub fn handle(&self) -> &File {
        &self.handle
    }

    fn issue(&self, command: Command, cmd: &mut RawCommand) -> RawResult<()> {
        // SAFETY: cmd is a complete command block and every buffer it points
        // at is borrowed by the caller for the duration of the call.
        unsafe { command(self.handle.as_raw_fd(), cmd) }?;
        RawStatus::check(cmd.status())
    }

    fn transfer(&self, command: Command, interface: u32, endpoint: u32, data: &mut [u8]) -> RawResult<usize> {
        let mut cmd = RawCommand::zeroed();
        cmd.transfer = TransferCommand {
            status: 0,
            interface,
            endpoint,
            data: data.as_mut_ptr() as *mut c_void,
            length: data.len(),
        };
        self.issue(command, &mut cmd)?;
        // SAFETY: the driver only writes back into the variant it was given.
        Ok(unsafe { cmd.transfer.length })
    }
}

fn malformed() -> RawError {
    RawError::Status(RawStatus::DeviceDescriptorError)
}

impl RawDevice for RawNode {
    fn device_descriptor(&self) -> RawResult<DeviceDescriptor> {
        let mut raw = [0u8; DEVICE_DESCRIPTOR_SIZE];
        let mut cmd = RawCommand::zeroed();
        cmd.device = DeviceCommand {
            status: 0,
            descriptor: raw.as_mut_ptr(),
        };
        self.issue(usb_raw_get_device_descriptor, &mut cmd)?;
        DeviceDescriptor::from_bytes(&raw).ok_or_else(malformed)
    }

    fn configuration_descriptor(&self, config_index: u32) -> RawResult<ConfigurationDescriptor> {
        let mut raw = [0u8; CONFIGURATION_DESCRIPTOR_SIZE];
        let mut cmd = RawCommand::zeroed();
        cmd.config = ConfigCommand {
            status: 0,
            descriptor: raw.as_mut_ptr(),
            config_index,
        };
        self.issue(usb_raw_get_configuration_descriptor, &mut cmd)?;
        ConfigurationDescriptor::from_bytes(&raw).ok_or_else(malformed)
    }

    fn alternate_count(&self, config_index: u32, interface_index: u32) -> RawResult<u32> {
        let mut cmd = RawCommand::zeroed();
        cmd.alternate = AlternateCommand {
            status: 0,
            alternate_info: 0,
            config_index,
            interface_index,
        };
        self.issue(usb_raw_get_alt_interface_count, &mut cmd)?;
        // SAFETY: see RawNode::transfer.
        Ok(unsafe { cmd.alternate.alternate_info })
    }

    fn active_alternate(&self, config_index: u32, interface_index: u32) -> RawResult<u32> {
        let mut cmd = RawCommand::zeroed();
        cmd.alternate = AlternateCommand {
            status: 0,
            alternate_info: 0,
            config_index,
            interface_index,
        };
        self.issue(usb_raw_get_active_alt_interface_index, &mut cmd)?;
        // SAFETY: see RawNode::transfer.
        Ok(unsafe { cmd.alternate.alternate_info })
    }

    fn interface_descriptor(
        &self,
        config_index: u32,
        interface_index: u32,
        alternate_index: u32,
    ) -> RawResult<InterfaceDescriptor> {
        let mut raw = [0u8; INTERFACE_DESCRIPTOR_SIZE];
        let mut cmd = RawCommand::zeroed();
        cmd.interface_etc = InterfaceEtcCommand {
            status: 0,
            descriptor: raw.as_mut_ptr(),
            config_index,
            interface_index,
            alternate_index,
        };
        self.issue(usb_raw_get_interface_descriptor_etc, &mut cmd)?;
        InterfaceDescriptor::from_bytes(&raw).ok_or_else(malformed)
    }

    fn endpoint_descriptor(
        &self,
        config_index: u32,
        interface_index: u32,
        alternate_index: u32,
        endpoint_index: u32,
    ) -> RawResult<EndpointDescriptor> {
        let mut raw = [0u8; ENDPOINT_DESCRIPTOR_SIZE];
        let mut cmd = RawCommand::zeroed();
        cmd.endpoint_etc = EndpointEtcCommand {
            status: 0,
            descriptor: raw.as_mut_ptr(),
            config_index,
            interface_index,
            alternate_index,
            endpoint_index,
        };
        self.issue(usb_raw_get_endpoint_descriptor_etc, &mut cmd)?;
        EndpointDescriptor::from_bytes(&raw).ok_or_else(malformed)
    }

    fn set_configuration(&self, config_index: u32) -> RawResult<()> {
        let mut cmd = RawCommand::zeroed();
        cmd.config = ConfigCommand {
            status: 0,
            descriptor: std::ptr::null_mut(),
            config_index,
        };
        self.issue(usb_raw_set_configuration, &mut cmd)
    }

    fn set_alternate(&self, config_index: u32, interface_index: u32, alternate: u32) -> RawResult<()> {
        let mut cmd = RawCommand::zeroed();
        cmd.alternate = AlternateCommand {
            status: 0,
            alternate_info: alternate,
            config_index,
            interface_index,
        };
        self.issue(usb_raw_set_alt_interface, &mut cmd)
    }

    fn control_transfer(&self, setup: &ControlSetup, data: &mut [u8]) -> RawResult<usize> {
        // never let the driver write past the data phase we own
        let length = (setup.length as usize).min(data.len()) as u16;
        let mut cmd = RawCommand::zeroed();
        cmd.control = ControlCommand {
            status: 0,
            request_type: setup.request_type,
            request: setup.request,
            value: setup.value,
            index: setup.index,
            length,
            data: data.as_mut_ptr() as *mut c_void,
        };
        self.issue(usb_raw_control_transfer, &mut cmd)?;
        // SAFETY: see RawNode::transfer.
        Ok(unsafe { cmd.control.length } as usize)
    }

    fn bulk_transfer(&self, interface: u32, endpoint: u32, data: &mut [u8]) -> RawResult<usize> {
        self.transfer(usb_raw_bulk_transfer, interface, endpoint, data)
    }

    fn interrupt_transfer(&self, interface: u32, endpoint: u32, data: &mut [u8]) -> RawResult<usize> {
        self.transfer(usb_raw_interrupt_transfer, interface, endpoint, data)
    }

    fn isochronous_transfer(
        &self,
        interface: u32,
        endpoint: u32,
        data: &mut [u8],
        packets: &mut [IsoPacketDescriptor],
    ) -> RawResult<usize> {
        let mut cmd = RawCommand::zeroed();
        cmd.isochronous = IsochronousCommand {
            status: 0,
            interface,
            endpoint,
            data: data.as_mut_ptr() as *mut c_void,
            length: data.len(),
            packet_descriptors: packets.as_mut_ptr(),
            packet_count: packets.len() as u32,
        };
        self.issue(usb_raw_isochronous_transfer, &mut cmd)?;
        // SAFETY: see RawNode::transfer.
        Ok(unsafe { cmd.isochronous.length })
    }
}
