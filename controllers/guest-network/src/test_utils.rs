//! Test utilities for unit testing the reconciler
//!
//! Fixture builders for VMs, adapters, networks and desired entries, shared
//! by the reconciler test modules.

use adapter_spec::DesiredAdapterEntry;
use vsphere_client::{
    DistributedPortgroup, EthernetAdapter, NetworkSummary, PowerState, VirtualMachine,
};

use crate::reconciler::validate::{ValidatedEntry, validate_entry};

/// Helper to create a test VM summary
pub fn create_test_vm(id: &str, name: &str, power_state: PowerState) -> VirtualMachine {
    VirtualMachine {
        id: id.to_string(),
        name: name.to_string(),
        instance_uuid: None,
        power_state,
    }
}

/// Helper to create a test ethernet adapter, connected and starting connected
pub fn create_test_adapter(
    key: i32,
    label: &str,
    mac_address: &str,
    network_name: &str,
    device_class: &str,
) -> EthernetAdapter {
    EthernetAdapter {
        key,
        label: label.to_string(),
        device_class: device_class.to_string(),
        mac_address: mac_address.to_string(),
        network_name: network_name.to_string(),
        unit_number: Some(7),
        wake_on_lan_enabled: true,
        allow_guest_control: true,
        connected: true,
        start_connected: true,
    }
}

/// Helper to create a desired entry with only a state keyword set
pub fn create_test_entry(state: &str) -> DesiredAdapterEntry {
    DesiredAdapterEntry {
        state: Some(state.to_string()),
        ..DesiredAdapterEntry::default()
    }
}

/// Helper to create a network summary in a datacenter
pub fn create_test_network(name: &str, datacenter: &str) -> NetworkSummary {
    NetworkSummary {
        network: format!("network-{}", name.len()),
        name: name.to_string(),
        datacenter: datacenter.to_string(),
    }
}

/// Helper to create a distributed portgroup
pub fn create_test_portgroup(
    name: &str,
    vlan_id: Option<i64>,
    dvswitch_name: &str,
) -> DistributedPortgroup {
    DistributedPortgroup {
        name: name.to_string(),
        vlan_id,
        dvswitch_name: dvswitch_name.to_string(),
    }
}

/// Run an entry through the validator, panicking on rejection
pub fn validated(entry: &DesiredAdapterEntry) -> ValidatedEntry {
    validate_entry(entry).expect("test entry should validate")
}
