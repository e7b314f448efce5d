#![allow(dead_code)]

pub(crate) const USB_RAW_COMMAND_GET_VERSION: u32 = 0x1000;

pub(crate) const USB_RAW_COMMAND_GET_DEVICE_DESCRIPTOR: u32 = 0x2000;
pub(crate) const USB_RAW_COMMAND_GET_CONFIGURATION_DESCRIPTOR: u32 = 0x2001;
pub(crate) const USB_RAW_COMMAND_GET_INTERFACE_DESCRIPTOR: u32 = 0x2002;
pub(crate) const USB_RAW_COMMAND_GET_ENDPOINT_DESCRIPTOR: u32 = 0x2003;
pub(crate) const USB_RAW_COMMAND_GET_STRING_DESCRIPTOR: u32 = 0x2004;
pub(crate) const USB_RAW_COMMAND_GET_GENERIC_DESCRIPTOR: u32 = 0x2005;
pub(crate) const USB_RAW_COMMAND_GET_ALT_INTERFACE_COUNT: u32 = 0x2006;
pub(crate) const USB_RAW_COMMAND_GET_ACTIVE_ALT_INTERFACE_INDEX: u32 = 0x2007;
pub(crate) const USB_RAW_COMMAND_GET_INTERFACE_DESCRIPTOR_ETC: u32 = 0x2008;
pub(crate) const USB_RAW_COMMAND_GET_ENDPOINT_DESCRIPTOR_ETC: u32 = 0x2009;

pub(crate) const USB_RAW_COMMAND_SET_CONFIGURATION: u32 = 0x3000;
pub(crate) const USB_RAW_COMMAND_SET_ALT_INTERFACE: u32 = 0x3005;

pub(crate) const USB_RAW_COMMAND_CONTROL_TRANSFER: u32 = 0x4000;
pub(crate) const USB_RAW_COMMAND_INTERRUPT_TRANSFER: u32 = 0x4001;
pub(crate) const USB_RAW_COMMAND_BULK_TRANSFER: u32 = 0x4002;
pub(crate) const USB_RAW_COMMAND_ISOCHRONOUS_TRANSFER: u32 = 0x4003;

pub(crate) const USB_RAW_STATUS_SUCCESS: i32 = 0;
pub(crate) const USB_RAW_STATUS_FAILED: i32 = 1;
pub(crate) const USB_RAW_STATUS_ABORTED: i32 = 2;
pub(crate) const USB_RAW_STATUS_STALLED: i32 = 3;
pub(crate) const USB_RAW_STATUS_CRC_ERROR: i32 = 4;
pub(crate) const USB_RAW_STATUS_TIMEOUT: i32 = 5;
pub(crate) const USB_RAW_STATUS_INVALID_CONFIGURATION: i32 = 6;
pub(crate) const USB_RAW_STATUS_INVALID_INTERFACE: i32 = 7;
pub(crate) const USB_RAW_STATUS_INVALID_ENDPOINT: i32 = 8;
pub(crate) const USB_RAW_STATUS_INVALID_STRING: i32 = 9;
pub(crate) const USB_RAW_STATUS_NOT_SUPPORTED: i32 = 10;
pub(crate) const USB_RAW_STATUS_DEVICE_DESCRIPTOR_ERROR: i32 = 11;
pub(crate) const USB_RAW_STATUS_NO_MEMORY: i32 = 12;

/// Per iso packet status reported by the driver on success.
pub(crate) const PACKET_STATUS_OK: i32 = 0;

pub const RECIPIENT_DEVICE: u8 = 0x00;
pub const RECIPIENT_INTERFACE: u8 = 0x01;
pub const RECIPIENT_ENDPOINT: u8 = 0x02;
pub const RECIPIENT_OTHER: u8 = 0x03;
pub const REQUEST_TYPE_STANDARD: u8 = 0x00 << 5;
pub const REQUEST_TYPE_CLASS: u8 = 0x01 << 5;
pub const REQUEST_TYPE_VENDOR: u8 = 0x02 << 5;
pub const DIRECTION_IN: u8 = 0x80;

pub const REQUEST_GET_DESCRIPTOR: u8 = 0x06;
