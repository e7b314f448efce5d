//! Device descriptor cache.
//!
//! A [`Device`] is enumerated once when it is discovered: every descriptor
//! the later operations need is fetched up front so that claiming
//! interfaces, switching configurations and resolving endpoints need no
//! further device I/O.

use crate::claims::{InterfaceClaims, MAX_INTERFACES};
use crate::control_transfer::ControlSetup;
use crate::descriptors::descriptor::DESCRIPTOR_TYPE_CONFIGURATION;
use crate::descriptors::{configuration_tree, ConfigurationDescriptor, DeviceDescriptor};
use crate::error::{Error, Result};
use crate::os::usb_raw::constants::{DIRECTION_IN, REQUEST_GET_DESCRIPTOR};
use crate::os::usb_raw::RawDevice;
#[cfg(feature = "serde")]
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Where an endpoint address lives inside a configuration.
#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EndpointLocation {
    /// Interface number owning the endpoint.
    pub interface: u8,
    /// Position of the endpoint within its interface.
    pub index: u8,
}

#[derive(Debug, Default)]
struct DeviceState {
    active_configuration: usize,
    claims: InterfaceClaims,
}

#[derive(Debug)]
struct ConfigurationEntry {
    /// Full configuration descriptor as returned by the device.
    blob: Vec<u8>,
    value: u8,
    num_interfaces: u8,
    /// Alternate setting count per interface number.
    alternates: Vec<u32>,
    endpoints: HashMap<u8, EndpointLocation>,
}

#[derive(Debug)]
pub struct Device {
    location: String,
    descriptor: DeviceDescriptor,
    configurations: Vec<ConfigurationEntry>,
    config_to_index: HashMap<u8, usize>,
    state: Mutex<DeviceState>,
}

fn enumeration_failed(location: &str, what: String) -> Error {
    log::error!("{}: {}", location, what);
    Error::InitializationFailure(what)
}

impl Device {
    /// Walks the whole descriptor tree of `raw`. Any failed fetch aborts
    /// enumeration; no partially enumerated device is returned.
    pub fn enumerate<R: RawDevice + ?Sized>(location: &str, raw: &R) -> Result<Device> {
        let descriptor = raw.device_descriptor().map_err(|e| {
            enumeration_failed(location, format!("failed retrieving device descriptor: {}", e))
        })?;

        let count = descriptor.num_configurations as usize;
        let mut configurations = Vec::with_capacity(count);
        let mut config_to_index = HashMap::with_capacity(count);
        for i in 0..count {
            let entry = Self::enumerate_configuration(location, raw, i)?;
            config_to_index.insert(entry.value, i);
            configurations.push(entry);
        }

        log::debug!(
            "{}: enumerated {:04x}:{:04x} with {} configuration(s)",
            location,
            descriptor.id_vendor,
            descriptor.id_product,
            count
        );
        Ok(Device {
            location: location.to_string(),
            descriptor,
            configurations,
            config_to_index,
            state: Mutex::new(DeviceState::default()),
        })
    }

    fn enumerate_configuration<R: RawDevice + ?Sized>(
        location: &str,
        raw: &R,
        i: usize,
    ) -> Result<ConfigurationEntry> {
        let config_index = i as u32;
        let short = raw.configuration_descriptor(config_index).map_err(|e| {
            enumeration_failed(
                location,
                format!("failed retrieving configuration descriptor {}: {}", i, e),
            )
        })?;

        let setup = ControlSetup::new(
            DIRECTION_IN,
            REQUEST_GET_DESCRIPTOR,
            (DESCRIPTOR_TYPE_CONFIGURATION as u16) << 8 | i as u16,
            0,
            short.total_length,
        );
        let mut blob = vec![0u8; short.total_length as usize];
        let len = raw.control_transfer(&setup, &mut blob).map_err(|e| {
            enumeration_failed(
                location,
                format!("failed retrieving full configuration descriptor {}: {}", i, e),
            )
        })?;
        if len < blob.len() {
            log::warn!(
                "{}: configuration {} is {} bytes, device returned {}",
                location,
                i,
                blob.len(),
                len
            );
            blob.truncate(len);
        }

        let mut alternates = Vec::with_capacity(short.num_interfaces as usize);
        let mut endpoints = HashMap::new();
        for j in 0..short.num_interfaces as u32 {
            let num_alternate = raw.alternate_count(config_index, j).map_err(|e| {
                enumeration_failed(
                    location,
                    format!("failed retrieving number of alternate interfaces {}/{}: {}", i, j, e),
                )
            })?;
            alternates.push(num_alternate);
            for k in 0..num_alternate {
                let iface = raw.interface_descriptor(config_index, j, k).map_err(|e| {
                    enumeration_failed(
                        location,
                        format!("failed retrieving interface descriptor {}/{}/{}: {}", i, j, k, e),
                    )
                })?;
                for l in 0..iface.num_endpoints as u32 {
                    let endpoint = raw.endpoint_descriptor(config_index, j, k, l).map_err(|e| {
                        enumeration_failed(
                            location,
                            format!(
                                "failed retrieving endpoint descriptor {}/{}/{}/{}: {}",
                                i, j, k, l, e
                            ),
                        )
                    })?;
                    endpoints.insert(
                        endpoint.endpoint_address,
                        EndpointLocation {
                            interface: j as u8,
                            index: l as u8,
                        },
                    );
                }
            }
        }

        Ok(ConfigurationEntry {
            blob,
            value: short.configuration_value,
            num_interfaces: short.num_interfaces,
            alternates,
            endpoints,
        })
    }

    /// Opens the raw node at `location`, enumerates it and closes the node
    /// again.
    #[cfg(unix)]
    pub fn open(location: &str) -> Result<Device> {
        let node = crate::os::usb_raw::RawNode::open(location).map_err(|e| {
            enumeration_failed(location, format!("failed to open device: {}", e))
        })?;
        Self::enumerate(location, &node)
    }

    fn state(&self) -> MutexGuard<'_, DeviceState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn descriptor(&self) -> &DeviceDescriptor {
        &self.descriptor
    }

    pub fn count_configurations(&self) -> usize {
        self.configurations.len()
    }

    /// Raw full configuration descriptor at `index`.
    pub fn configuration_descriptor(&self, index: usize) -> Option<&[u8]> {
        if index >= self.count_configurations() {
            return None;
        }
        Some(&self.configurations[index].blob)
    }

    /// Parsed configuration tree at `index`.
    pub fn configuration(&self, index: usize) -> Option<ConfigurationDescriptor> {
        configuration_tree(self.configuration_descriptor(index)?)
    }

    pub fn active_configuration_index(&self) -> usize {
        self.state().active_configuration
    }

    pub fn active_configuration(&self) -> Option<&[u8]> {
        self.configuration_descriptor(self.active_configuration_index())
    }

    /// Index of the configuration advertising `value` as its
    /// `bConfigurationValue`.
    pub fn configuration_index(&self, value: u8) -> Option<usize> {
        self.config_to_index.get(&value).copied()
    }

    pub fn interface_count(&self, config_index: usize) -> Option<u8> {
        self.configurations.get(config_index).map(|c| c.num_interfaces)
    }

    pub fn alternate_setting_count(&self, config_index: usize, interface: u8) -> Option<u32> {
        self.configurations
            .get(config_index)?
            .alternates
            .get(interface as usize)
            .copied()
    }

    /// Resolves an endpoint address within the active configuration.
    pub fn endpoint_location(&self, address: u8) -> Option<EndpointLocation> {
        let active = self.active_configuration_index();
        self.configurations.get(active)?.endpoints.get(&address).copied()
    }

    pub fn endpoint_to_index(&self, address: u8) -> Option<u8> {
        self.endpoint_location(address).map(|l| l.index)
    }

    pub fn endpoint_to_interface(&self, address: u8) -> Option<u8> {
        self.endpoint_location(address).map(|l| l.interface)
    }

    pub fn claimed_interfaces(&self) -> InterfaceClaims {
        self.state().claims
    }

    pub fn claim_interface(&self, interface: u8) -> Result<()> {
        let mut state = self.state();
        let num_interfaces = self
            .configurations
            .get(state.active_configuration)
            .map(|c| c.num_interfaces.min(MAX_INTERFACES))
            .unwrap_or(0);
        if interface >= num_interfaces {
            return Err(Error::NotFound);
        }
        if !state.claims.insert(interface) {
            return Err(Error::Busy);
        }
        Ok(())
    }

    /// Releasing an interface that is not claimed is not an error.
    pub fn release_interface(&self, interface: u8) {
        self.state().claims.remove(interface);
    }

    /// Returns the index of configuration `value` if switching to it is
    /// allowed right now, which requires that no interface is claimed.
    pub fn check_interfaces_free(&self, value: u8) -> Result<usize> {
        let index = self.configuration_index(value).ok_or(Error::NotFound)?;
        if !self.state().claims.is_empty() {
            return Err(Error::Busy);
        }
        Ok(index)
    }

    pub fn set_active_configuration(&self, index: usize) -> Result<()> {
        if index >= self.count_configurations() {
            return Err(Error::NotFound);
        }
        self.state().active_configuration = index;
        Ok(())
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.location)?;
        write!(f, "{}", self.descriptor)?;
        for i in 0..self.count_configurations() {
            match self.configuration(i) {
                Some(conf) => write!(f, "{}", conf)?,
                None => writeln!(f, "configuration {}: unparsable", i)?,
            }
        }
        Ok(())
    }
}
