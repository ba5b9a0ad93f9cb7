//! Change planning
//!
//! Pure planning functions producing an immutable operation list. Each
//! operation carries an effectiveness flag; only effective operations are
//! submitted, so a desired list that already matches the current state plans
//! to a no-op. The planner never mutates the adapter snapshot it compares
//! against.

use adapter_spec::{AdapterState, DeviceType};
use vsphere_client::{
    AdapterChangeSpec, AddressType, DeviceChange, DeviceOperation, EthernetAdapter, PowerState,
};

use super::validate::ValidatedEntry;
use crate::error::ControllerError;

/// One planned operation against the VM's device list.
#[derive(Debug, Clone)]
pub struct ChangeOperation {
    /// Operation kind.
    pub kind: DeviceOperation,
    /// Matched adapter; present for edit/remove.
    pub target: Option<EthernetAdapter>,
    /// Field updates; present for add/edit, covering only differing fields.
    pub spec: Option<AdapterChangeSpec>,
    /// True when the operation would observably change the VM. Add and
    /// remove are inherently effective; an edit is effective only when at
    /// least one field differs.
    pub is_effective: bool,
}

impl ChangeOperation {
    /// Wire form for submission.
    pub fn to_device_change(&self) -> DeviceChange {
        DeviceChange {
            operation: self.kind,
            device_key: self.target.as_ref().map(|adapter| adapter.key),
            spec: self.spec.clone(),
        }
    }
}

/// Plan the add operation for a `new` entry.
///
/// Device type defaults to VMXNET3; connectivity flags default to true. The
/// address is manual when the entry assigns one, generated otherwise.
pub fn plan_add(entry: &ValidatedEntry) -> ChangeOperation {
    let device_type = entry.device_type.unwrap_or(DeviceType::Vmxnet3);
    let (address_type, mac_address) = match &entry.manual_mac {
        Some(mac) => (AddressType::Manual, Some(mac.clone())),
        None => (AddressType::Generated, None),
    };

    ChangeOperation {
        kind: DeviceOperation::Add,
        target: None,
        spec: Some(AdapterChangeSpec {
            device_class: Some(device_type.backend_class().to_string()),
            network_name: entry.name.clone(),
            address_type: Some(address_type),
            mac_address,
            connected: Some(entry.connected.unwrap_or(true)),
            start_connected: Some(entry.start_connected.unwrap_or(true)),
            allow_guest_control: Some(true),
        }),
        is_effective: true,
    }
}

/// Plan the edit or remove operation for one matched adapter.
///
/// For `present`, all differing fields are folded into a single edit. A MAC
/// reassignment additionally requires the VM to be powered off; requesting
/// one against a running VM fails the whole entry.
pub fn plan_for_adapter(
    entry: &ValidatedEntry,
    adapter: &EthernetAdapter,
    power_state: PowerState,
) -> Result<ChangeOperation, ControllerError> {
    match entry.state {
        AdapterState::Absent => Ok(ChangeOperation {
            kind: DeviceOperation::Remove,
            target: Some(adapter.clone()),
            spec: None,
            is_effective: true,
        }),
        AdapterState::Present => {
            let mut spec = AdapterChangeSpec::default();
            let mut effective = false;

            if let Some(start_connected) = entry.start_connected {
                if adapter.start_connected != start_connected {
                    spec.start_connected = Some(start_connected);
                    effective = true;
                }
            }
            if let Some(connected) = entry.connected {
                if adapter.connected != connected {
                    spec.connected = Some(connected);
                    effective = true;
                }
            }
            if let Some(name) = &entry.name {
                if adapter.network_name != *name {
                    spec.network_name = Some(name.clone());
                    effective = true;
                }
            }
            if let Some(manual_mac) = &entry.manual_mac {
                if adapter.mac_address != *manual_mac {
                    if power_state != PowerState::PoweredOff {
                        return Err(ControllerError::PowerStateViolation);
                    }
                    spec.address_type = Some(AddressType::Manual);
                    spec.mac_address = Some(manual_mac.clone());
                    effective = true;
                }
            }

            Ok(ChangeOperation {
                kind: DeviceOperation::Edit,
                target: Some(adapter.clone()),
                spec: Some(spec),
                is_effective: effective,
            })
        }
        AdapterState::New => Err(ControllerError::InvalidConfig(
            "new entries are planned as add operations, not against an existing adapter".to_string(),
        )),
    }
}
