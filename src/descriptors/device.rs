#[cfg(feature = "serde")]
use serde::Serialize;
use std::fmt;
use std::slice::Iter;

/// Wire size of a standard device descriptor.
pub const DEVICE_DESCRIPTOR_SIZE: usize = 18;

#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct DeviceDescriptor {
    pub length: u8,
    pub kind: u8,
    pub bcd_usb: u16,
    pub device_class: u8,
    pub device_sub_class: u8,
    pub device_protocol: u8,
    pub max_packet_size0: u8,
    pub id_vendor: u16,
    pub id_product: u16,
    pub bcd_device: u16,
    pub imanufacturer: u8,
    pub iproduct: u8,
    pub iserial: u8,
    pub num_configurations: u8,
}

impl fmt::Display for DeviceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut d = format!("bLength: {}\n", self.length);
        d += &format!("bDescriptorType: {}\n", self.kind);
        d += &format!("bcdUsb: 0x{:04x}\n", self.bcd_usb);
        d += &format!("bDeviceClass: {}\n", self.device_class);
        d += &format!("bDeviceSubClass: {}\n", self.device_sub_class);
        d += &format!("bDeviceProtocol: {}\n", self.device_protocol);
        d += &format!("bMaxPacketSize: {}\n", self.max_packet_size0);
        d += &format!("idVendor: 0x{:04x}\n", self.id_vendor);
        d += &format!("idProduct: 0x{:04x}\n", self.id_product);
        d += &format!("bcdDevice: 0x{:04x}\n", self.bcd_device);
        d += &format!("iManufacturer: {}\n", self.imanufacturer);
        d += &format!("iProduct: {}\n", self.iproduct);
        d += &format!("iSerialNumber: {}\n", self.iserial);
        d += &format!("bNumConfigurations: {}\n", self.num_configurations);
        write!(f, "{}", d)
    }
}

impl DeviceDescriptor {
    pub fn new(iter: &mut Iter<u8>) -> Option<Self> {
        Some(DeviceDescriptor {
            length: *iter.next()?,
            kind: *iter.next()?,
            bcd_usb: *iter.next()? as u16 | (*iter.next()? as u16) << 8,
            device_class: *iter.next()?,
            device_sub_class: *iter.next()?,
            device_protocol: *iter.next()?,
            max_packet_size0: *iter.next()?,
            id_vendor: *iter.next()? as u16 | (*iter.next()? as u16) << 8,
            id_product: *iter.next()? as u16 | (*iter.next()? as u16) << 8,
            bcd_device: *iter.next()? as u16 | (*iter.next()? as u16) << 8,
            imanufacturer: *iter.next()?,
            iproduct: *iter.next()?,
            iserial: *iter.next()?,
            num_configurations: *iter.next()?,
        })
    }

    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        Self::new(&mut bytes.iter())
    }
}
