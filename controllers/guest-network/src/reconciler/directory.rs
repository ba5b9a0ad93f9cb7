//! Adapter directory
//!
//! Read-only view over a VM's current network adapters, built once per
//! snapshot from the backend device list. Devices whose class is not a known
//! ethernet card type are skipped, not surfaced.

use adapter_spec::DeviceType;
use tracing::warn;
use vsphere_client::EthernetAdapter;

/// Indexed view over a VM's network adapters, preserving device-list order.
#[derive(Debug)]
pub struct AdapterDirectory {
    adapters: Vec<(DeviceType, EthernetAdapter)>,
}

impl AdapterDirectory {
    /// Build the directory from the raw device list.
    pub fn new(devices: &[EthernetAdapter]) -> Self {
        let adapters = devices
            .iter()
            .filter_map(|device| {
                let device_type = DeviceType::from_backend_class(&device.device_class);
                if device_type.is_none() {
                    warn!(
                        "Skipping device '{}' with unrecognized class {}",
                        device.label, device.device_class
                    );
                }
                device_type.map(|device_type| (device_type, device.clone()))
            })
            .collect();
        Self { adapters }
    }

    /// Look up the adapter with the given MAC address. MACs are unique per
    /// VM, so at most one adapter matches.
    pub fn find_by_mac(&self, mac: &str) -> Option<&EthernetAdapter> {
        self.adapters
            .iter()
            .map(|(_, adapter)| adapter)
            .find(|adapter| adapter.mac_address == mac)
    }

    /// Look up the adapter with the given label. Labels are unique per VM.
    pub fn find_by_label(&self, label: &str) -> Option<&EthernetAdapter> {
        self.adapters
            .iter()
            .map(|(_, adapter)| adapter)
            .find(|adapter| adapter.label == label)
    }

    /// All adapters of the given device type, in device-list order.
    pub fn find_all_by_type(&self, device_type: DeviceType) -> Vec<&EthernetAdapter> {
        self.adapters
            .iter()
            .filter(|(adapter_type, _)| *adapter_type == device_type)
            .map(|(_, adapter)| adapter)
            .collect()
    }

    /// All recognized adapters with their device types, in device-list order.
    pub fn adapters(&self) -> impl Iterator<Item = (DeviceType, &EthernetAdapter)> {
        self.adapters
            .iter()
            .map(|(device_type, adapter)| (*device_type, adapter))
    }

    /// Number of recognized adapters.
    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    /// True when the VM has no recognized adapters.
    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}
