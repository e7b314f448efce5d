use crate::descriptors::interface::InterfaceDescriptor;
#[cfg(feature = "serde")]
use serde::Serialize;
use std::fmt;
use std::slice::Iter;

/// Wire size of the configuration descriptor header, without the
/// interface/endpoint descriptors that follow it in the full blob.
pub const CONFIGURATION_DESCRIPTOR_SIZE: usize = 9;

#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct ConfigurationDescriptor {
    pub length: u8,
    pub kind: u8,
    pub total_length: u16,
    pub num_interfaces: u8,
    pub configuration_value: u8,
    pub iconfiguration: u8,
    pub bmattributes: u8,
    pub max_power: u8,
    /// One entry per interface descriptor found in the blob, so an
    /// interface with several alternate settings appears several times.
    pub interfaces: Vec<InterfaceDescriptor>,
}

impl fmt::Display for ConfigurationDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut d = format!("bLength: {}\n", self.length);
        d += &format!("bDescriptorType: {}\n", self.kind);
        d += &format!("bTotalLength: {}\n", self.total_length);
        d += &format!("bNumInterfaces: {}\n", self.num_interfaces);
        d += &format!("bConfigurationValue: {}\n", self.configuration_value);
        d += &format!("iConfiguration: {}\n", self.iconfiguration);
        d += &format!("bmAttributes: 0x{:02x}\n", self.bmattributes);
        d += &format!("bMaxPower: {}\n", self.max_power);
        for iface in &self.interfaces {
            d += &format!("{}", iface);
        }
        write!(f, "{}", d)
    }
}

impl ConfigurationDescriptor {
    pub fn new(iter: &mut Iter<u8>) -> Option<Self> {
        Some(ConfigurationDescriptor {
            length: *iter.next()?,
            kind: *iter.next()?,
            total_length: *iter.next()? as u16 | (*iter.next()? as u16) << 8,
            num_interfaces: *iter.next()?,
            configuration_value: *iter.next()?,
            iconfiguration: *iter.next()?,
            bmattributes: *iter.next()?,
            max_power: *iter.next()?,
            interfaces: vec![],
        })
    }

    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        Self::new(&mut bytes.iter())
    }
}
