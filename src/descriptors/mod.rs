pub mod configuration;
pub mod descriptor;
pub mod device;
pub mod endpoint;
pub mod interface;

pub use configuration::{ConfigurationDescriptor, CONFIGURATION_DESCRIPTOR_SIZE};
pub use descriptor::{configuration_tree, Descriptor, DescriptorType};
pub use device::{DeviceDescriptor, DEVICE_DESCRIPTOR_SIZE};
pub use endpoint::{EndpointDescriptor, ENDPOINT_DESCRIPTOR_SIZE};
pub use interface::{InterfaceDescriptor, INTERFACE_DESCRIPTOR_SIZE};
