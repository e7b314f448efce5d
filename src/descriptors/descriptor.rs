use super::configuration::ConfigurationDescriptor;
use super::device::DeviceDescriptor;
use super::endpoint::EndpointDescriptor;
use super::interface::InterfaceDescriptor;

pub const DESCRIPTOR_TYPE_DEVICE: u8 = 0x01;
pub const DESCRIPTOR_TYPE_CONFIGURATION: u8 = 0x02;
pub const DESCRIPTOR_TYPE_STRING: u8 = 0x03;
pub const DESCRIPTOR_TYPE_INTERFACE: u8 = 0x04;
pub const DESCRIPTOR_TYPE_ENDPOINT: u8 = 0x05;

/// Walks a buffer of concatenated descriptors, such as the full
/// configuration blob returned by GET_DESCRIPTOR(CONFIGURATION).
#[derive(Debug)]
pub struct Descriptor<'a> {
    descriptor: &'a [u8],
}

#[derive(Debug, PartialEq)]
pub enum DescriptorType {
    Device(DeviceDescriptor),
    Configuration(ConfigurationDescriptor),
    String(Vec<u8>),
    Interface(InterfaceDescriptor),
    Endpoint(EndpointDescriptor),
    /// Class or vendor specific descriptor, or a standard one too short to parse.
    Unknown(Vec<u8>),
}

impl<'a> Iterator for Descriptor<'a> {
    type Item = DescriptorType;
    fn next(&mut self) -> Option<DescriptorType> {
        if self.descriptor.len() < 2 {
            // We are done
            return None;
        }

        let dlength = self.descriptor[0] as usize;
        if dlength < 2 || dlength > self.descriptor.len() {
            log::debug!(
                "Invalid descriptor length {} with {} bytes left, bailout",
                dlength,
                self.descriptor.len()
            );
            self.descriptor = &[];
            return None;
        }

        let (current, rest) = self.descriptor.split_at(dlength);
        self.descriptor = rest;
        let parsed = match current[1] {
            DESCRIPTOR_TYPE_DEVICE => DeviceDescriptor::from_bytes(current).map(DescriptorType::Device),
            DESCRIPTOR_TYPE_CONFIGURATION => {
                ConfigurationDescriptor::from_bytes(current).map(DescriptorType::Configuration)
            }
            DESCRIPTOR_TYPE_STRING => Some(DescriptorType::String(current[2..].to_vec())),
            DESCRIPTOR_TYPE_INTERFACE => {
                InterfaceDescriptor::from_bytes(current).map(DescriptorType::Interface)
            }
            DESCRIPTOR_TYPE_ENDPOINT => {
                EndpointDescriptor::from_bytes(current).map(DescriptorType::Endpoint)
            }
            _ => None,
        };

        Some(parsed.unwrap_or_else(|| DescriptorType::Unknown(current.to_vec())))
    }
}

impl<'a> Descriptor<'a> {
    pub fn new(descriptor: &'a [u8]) -> Self {
        Descriptor { descriptor }
    }
}

/// Builds the configuration → interface → endpoint tree out of a full
/// configuration blob. The first descriptor must be the configuration itself.
pub fn configuration_tree(blob: &[u8]) -> Option<ConfigurationDescriptor> {
    let mut descs = Descriptor::new(blob);
    let mut configuration = match descs.next()? {
        DescriptorType::Configuration(conf) => conf,
        other => {
            log::warn!("Wrong descriptor detected: {:?} expected ConfigurationDescriptor", other);
            return None;
        }
    };

    for kind in descs {
        match kind {
            DescriptorType::Interface(iface) => configuration.interfaces.push(iface),
            DescriptorType::Endpoint(endpoint) => {
                if let Some(iface) = configuration.interfaces.last_mut() {
                    iface.endpoints.push(endpoint);
                }
            }
            _ => {
                log::debug!("Skipping descriptor: {:?}", kind);
            }
        }
    }
    Some(configuration)
}
