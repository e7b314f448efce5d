use crate::descriptors::endpoint::EndpointDescriptor;
#[cfg(feature = "serde")]
use serde::Serialize;
use std::fmt;
use std::slice::Iter;

pub const INTERFACE_DESCRIPTOR_SIZE: usize = 9;

#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct InterfaceDescriptor {
    pub length: u8,
    pub kind: u8,
    pub interface_number: u8,
    pub alternate_setting: u8,
    pub num_endpoints: u8,
    pub interface_class: u8,
    pub interface_sub_class: u8,
    pub interface_protocol: u8,
    pub iinterface: u8,
    pub endpoints: Vec<EndpointDescriptor>,
}

impl fmt::Display for InterfaceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut d = format!("bLength: {}\n", self.length);
        d += &format!("bDescriptorType: {}\n", self.kind);
        d += &format!("bInterfaceNumber: {}\n", self.interface_number);
        d += &format!("bAlternateSetting: {}\n", self.alternate_setting);
        d += &format!("bNumEndpoints: {}\n", self.num_endpoints);
        d += &format!("bInterfaceClass: {}\n", self.interface_class);
        d += &format!("bInterfaceSubClass: {}\n", self.interface_sub_class);
        d += &format!("bInterfaceProtocol: {}\n", self.interface_protocol);
        d += &format!("iInterface: {}\n", self.iinterface);
        for endpoint in &self.endpoints {
            d += &format!("{}", endpoint);
        }
        write!(f, "{}", d)
    }
}

impl InterfaceDescriptor {
    pub fn new(iter: &mut Iter<u8>) -> Option<Self> {
        Some(InterfaceDescriptor {
            length: *iter.next()?,
            kind: *iter.next()?,
            interface_number: *iter.next()?,
            alternate_setting: *iter.next()?,
            num_endpoints: *iter.next()?,
            interface_class: *iter.next()?,
            interface_sub_class: *iter.next()?,
            interface_protocol: *iter.next()?,
            iinterface: *iter.next()?,
            endpoints: vec![],
        })
    }

    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        Self::new(&mut bytes.iter())
    }
}
