mod common;

use common::{enumerate, init_logger, open_handle, Call, MockDevice};
use usbraw::{ControlSetup, Device, EndpointLocation, Error, RawStatus};

#[test]
fn enumeration_maps_configuration_values() {
    init_logger();
    let device = enumerate(&MockDevice::new());
    assert_eq!(device.count_configurations(), 2);
    assert_eq!(device.configuration_index(1), Some(0));
    assert_eq!(device.configuration_index(3), Some(1));
    assert_eq!(device.configuration_index(2), None);
    assert_eq!(device.descriptor().id_vendor, 0x1209);
    assert_eq!(device.active_configuration_index(), 0);
}

#[test]
fn enumeration_fetches_full_configuration_blobs() {
    init_logger();
    let mock = MockDevice::new();
    let device = Device::enumerate("/dev/bus/usb/0/1", &mock).unwrap();

    let controls: Vec<ControlSetup> = mock
        .take_calls()
        .into_iter()
        .filter_map(|call| match call {
            Call::Control(setup) => Some(setup),
            _ => None,
        })
        .collect();
    assert_eq!(controls.len(), 2);
    assert_eq!(controls[0].request_type, 0x80);
    assert_eq!(controls[0].request, 0x06);
    assert_eq!(controls[0].value, 0x0200);
    assert_eq!(controls[1].value, 0x0201);

    let blob = device.configuration_descriptor(0).unwrap();
    assert_eq!(blob.len(), controls[0].length as usize);
    let tree = device.configuration(0).unwrap();
    assert_eq!(tree.configuration_value, 1);
    // interface 0 twice (two alternate settings), interface 1 once
    assert_eq!(tree.interfaces.len(), 3);
    assert_eq!(tree.interfaces[0].endpoints.len(), 2);
}

#[test]
fn configuration_index_equal_to_count_is_rejected() {
    init_logger();
    let device = enumerate(&MockDevice::new());
    assert!(device.configuration_descriptor(1).is_some());
    assert!(device.configuration_descriptor(2).is_none());
    assert!(device.configuration(2).is_none());
    assert_eq!(device.set_active_configuration(2), Err(Error::NotFound));
}

#[test]
fn endpoints_resolve_within_active_configuration() {
    init_logger();
    let device = enumerate(&MockDevice::new());
    assert_eq!(
        device.endpoint_location(0x84),
        Some(EndpointLocation {
            interface: 1,
            index: 1
        })
    );
    assert_eq!(device.endpoint_to_interface(0x83), Some(1));
    assert_eq!(device.endpoint_to_index(0x02), Some(1));
    assert_eq!(device.endpoint_location(0x05), None);
    assert_eq!(device.interface_count(0), Some(2));
    assert_eq!(device.alternate_setting_count(0, 0), Some(2));
    assert_eq!(device.alternate_setting_count(0, 1), Some(1));

    device.set_active_configuration(1).unwrap();
    assert_eq!(device.endpoint_location(0x02), None);
    assert_eq!(device.endpoint_to_index(0x81), Some(0));
}

#[test]
fn failed_fetch_aborts_enumeration() {
    init_logger();
    for command in ["device_descriptor", "alternate_count", "endpoint_descriptor", "control_transfer"] {
        let mock = MockDevice::new();
        mock.fail_on(command);
        match Device::enumerate("/dev/bus/usb/0/1", &mock) {
            Err(Error::InitializationFailure(_)) => {}
            other => panic!("{}: unexpected {:?}", command, other.map(|d| d.to_string())),
        }
    }
}

#[test]
fn claim_and_release() {
    init_logger();
    let device = enumerate(&MockDevice::new());
    assert_eq!(device.claim_interface(0), Ok(()));
    assert_eq!(device.claim_interface(0), Err(Error::Busy));
    assert_eq!(device.claim_interface(1), Ok(()));
    // the active configuration has two interfaces
    assert_eq!(device.claim_interface(2), Err(Error::NotFound));
    assert_eq!(device.claimed_interfaces().iter().collect::<Vec<_>>(), vec![0, 1]);

    device.release_interface(0);
    device.release_interface(0);
    assert_eq!(device.claim_interface(0), Ok(()));
}

#[test]
fn set_configuration_requires_free_interfaces() {
    let (device, handle, _done) = open_handle();
    handle.claim_interface(0).unwrap();
    assert_eq!(handle.set_configuration(3), Err(Error::Busy));
    assert!(handle.raw().take_calls().is_empty());

    handle.release_interface(0).unwrap();
    assert!(handle.claimed_interfaces().is_empty());
    handle.set_configuration(3).unwrap();
    assert_eq!(handle.raw().take_calls(), vec![Call::SetConfiguration(1)]);
    assert_eq!(device.active_configuration_index(), 1);
    // configuration value 3 has a single interface
    assert_eq!(handle.claim_interface(1), Err(Error::NotFound));
}

#[test]
fn set_unknown_configuration_keeps_active_one() {
    let (device, handle, _done) = open_handle();
    assert_eq!(handle.set_configuration(2), Err(Error::NotFound));
    assert_eq!(device.active_configuration_index(), 0);
    assert!(handle.raw().take_calls().is_empty());

    handle.raw().fail_on("set_configuration");
    assert_eq!(handle.set_configuration(3), Err(Error::Status(RawStatus::Failed)));
    assert_eq!(device.active_configuration_index(), 0);
}

#[test]
fn set_alternate_setting_skips_active_one() {
    let (_device, handle, _done) = open_handle();
    handle.set_alternate_setting(0, 0).unwrap();
    assert_eq!(handle.raw().take_calls(), vec![Call::ActiveAlternate(0, 0)]);

    handle.set_alternate_setting(0, 1).unwrap();
    assert_eq!(
        handle.raw().take_calls(),
        vec![Call::ActiveAlternate(0, 0), Call::SetAlternate(0, 0, 1)]
    );
}

#[test]
fn set_alternate_setting_reports_query_failure() {
    let (_device, handle, _done) = open_handle();
    handle.raw().fail_on("active_alternate");
    assert_eq!(
        handle.set_alternate_setting(0, 1),
        Err(Error::Status(RawStatus::Failed))
    );
    assert_eq!(handle.raw().take_calls(), vec![Call::ActiveAlternate(0, 0)]);
}

#[test]
fn display_lists_configurations() {
    init_logger();
    let device = enumerate(&MockDevice::new());
    let text = device.to_string();
    assert!(text.starts_with("/dev/bus/usb/0/1\n"));
    assert!(text.contains("idVendor: 0x1209"));
    assert!(text.contains("bConfigurationValue: 3"));
}

#[cfg(feature = "serde")]
#[test]
fn descriptors_serialize() {
    init_logger();
    let device = enumerate(&MockDevice::new());
    let value = serde_json::to_value(device.descriptor()).unwrap();
    assert_eq!(value["num_configurations"], 2);
    let tree = serde_json::to_value(device.configuration(0).unwrap()).unwrap();
    assert_eq!(tree["interfaces"][0]["endpoints"][1]["endpoint_address"], 2);
}
