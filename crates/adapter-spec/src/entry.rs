//! Desired-state input types
//!
//! One reconciliation request targets a single virtual machine and carries an
//! ordered list of desired adapter entries. Entries arrive loosely typed
//! (state and device-type as free-form strings); the controller's validator
//! turns them into the checked keyword enums defined here.

use serde::{Deserialize, Serialize};

/// One reconciliation request: VM locator plus the desired adapter list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ReconcileRequest {
    /// Name of the virtual machine. Required unless `uuid` is given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Instance UUID of the virtual machine. Required unless `name` is given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,

    /// Folder path used to disambiguate VMs with the same name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,

    /// Datacenter scope for network and portgroup resolution.
    #[serde(default = "default_datacenter")]
    pub datacenter: String,

    /// If true, skip reconciliation entirely and only report adapter facts.
    #[serde(default)]
    pub gather_network_facts: bool,

    /// Desired adapter entries, processed in order.
    #[serde(default)]
    pub networks: Vec<DesiredAdapterEntry>,
}

fn default_datacenter() -> String {
    "ha-datacenter".to_string()
}

/// One desired adapter entry, as supplied by the caller.
///
/// All fields are optional at this level; required-field and keyword checks
/// happen in the controller's validator. Unknown keys in the input document
/// are ignored for forward compatibility.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DesiredAdapterEntry {
    /// Desired state keyword: `new`, `present` or `absent` (case-insensitive).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    /// Name of the portgroup or distributed virtual portgroup to back this
    /// adapter. Filled in by the resolver when `vlan` is used instead.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// VLAN number (or portgroup name used as an alternate match) for this
    /// adapter, resolved against distributed portgroups in the datacenter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vlan: Option<VlanRef>,

    /// Distributed vSwitch name, used to disambiguate same-named portgroups.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dvswitch_name: Option<String>,

    /// Adapter device-type keyword, e.g. `vmxnet3` (the default for new
    /// adapters). Also usable as a match key for existing adapters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_type: Option<String>,

    /// MAC address of an existing adapter - match key only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mac: Option<String>,

    /// Label of an existing adapter, e.g. "Network adapter 1" - match key only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// MAC address to assign on creation or reassignment. Distinct from
    /// `mac`, which only locates an adapter. Reassignment requires the VM to
    /// be powered off.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manual_mac: Option<String>,

    /// Desired runtime connectivity of the adapter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connected: Option<bool>,

    /// Whether the adapter connects when the VM powers on.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_connected: Option<bool>,
}

/// VLAN reference: a numeric VLAN ID, or a string compared against portgroup
/// names as an alternate match.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VlanRef {
    /// Numeric VLAN ID, matched against the portgroup's configured VLAN.
    Id(i64),
    /// Plain-text value, matched against portgroup names.
    Name(String),
}

impl VlanRef {
    /// Text form used for portgroup-name matching and error messages.
    pub fn as_text(&self) -> String {
        match self {
            VlanRef::Id(id) => id.to_string(),
            VlanRef::Name(name) => name.clone(),
        }
    }
}

/// Validated desired-state keyword for one adapter entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdapterState {
    /// Add a new adapter.
    New,
    /// Reconfigure an existing adapter.
    Present,
    /// Remove an existing adapter.
    Absent,
}

impl AdapterState {
    /// Parse a state keyword, case-insensitively.
    pub fn parse(keyword: &str) -> Option<Self> {
        match keyword.to_lowercase().as_str() {
            "new" => Some(AdapterState::New),
            "present" => Some(AdapterState::Present),
            "absent" => Some(AdapterState::Absent),
            _ => None,
        }
    }
}

/// Closed set of supported virtual ethernet card types.
///
/// Replaces the backend's per-class runtime type inspection with a tagged
/// enum plus lookup tables: one mapping to the caller-facing keyword, one to
/// the backend device class, one to the facts reporting tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    /// AMD PCnet32 legacy adapter.
    Pcnet32,
    /// VMXNET generation 2 paravirtual adapter.
    Vmxnet2,
    /// VMXNET generation 3 paravirtual adapter (default for new adapters).
    Vmxnet3,
    /// Intel E1000 emulated adapter.
    E1000,
    /// Intel E1000e emulated adapter.
    E1000e,
    /// SR-IOV passthrough ethernet card.
    Sriov,
}

impl DeviceType {
    /// All known device types, in keyword order.
    pub const ALL: [DeviceType; 6] = [
        DeviceType::Pcnet32,
        DeviceType::Vmxnet2,
        DeviceType::Vmxnet3,
        DeviceType::E1000,
        DeviceType::E1000e,
        DeviceType::Sriov,
    ];

    /// Parse a caller-supplied device-type keyword.
    pub fn parse(keyword: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|device_type| device_type.keyword() == keyword)
    }

    /// Caller-facing keyword for this device type.
    pub fn keyword(&self) -> &'static str {
        match self {
            DeviceType::Pcnet32 => "pcnet32",
            DeviceType::Vmxnet2 => "vmxnet2",
            DeviceType::Vmxnet3 => "vmxnet3",
            DeviceType::E1000 => "e1000",
            DeviceType::E1000e => "e1000e",
            DeviceType::Sriov => "sriov",
        }
    }

    /// Backend device class for this type.
    pub fn backend_class(&self) -> &'static str {
        match self {
            DeviceType::Pcnet32 => "VirtualPCNet32",
            DeviceType::Vmxnet2 => "VirtualVmxnet2",
            DeviceType::Vmxnet3 => "VirtualVmxnet3",
            DeviceType::E1000 => "VirtualE1000",
            DeviceType::E1000e => "VirtualE1000e",
            DeviceType::Sriov => "VirtualSriovEthernetCard",
        }
    }

    /// Map a backend device class to a known type. Unknown classes yield
    /// `None` and are skipped when building the adapter view.
    pub fn from_backend_class(class: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|device_type| device_type.backend_class() == class)
    }

    /// Tag used in the adapter-facts result surface.
    pub fn facts_tag(&self) -> &'static str {
        match self {
            DeviceType::Pcnet32 => "PCNet32",
            DeviceType::Vmxnet2 => "VMXNET2",
            DeviceType::Vmxnet3 => "VMXNET3",
            DeviceType::E1000 => "E1000",
            DeviceType::E1000e => "E1000E",
            DeviceType::Sriov => "SriovEthernetCard",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_type_round_trips() {
        for device_type in DeviceType::ALL {
            assert_eq!(DeviceType::parse(device_type.keyword()), Some(device_type));
            assert_eq!(
                DeviceType::from_backend_class(device_type.backend_class()),
                Some(device_type)
            );
        }
        assert_eq!(DeviceType::parse("VMXNET3"), None, "keywords are lowercase");
        assert_eq!(DeviceType::from_backend_class("VirtualDisk"), None);
    }

    #[test]
    fn test_vlan_ref_accepts_number_and_text() {
        let entry: DesiredAdapterEntry = serde_yaml::from_str("state: new\nvlan: 10\n")
            .unwrap();
        assert!(matches!(entry.vlan, Some(VlanRef::Id(10))));

        let entry: DesiredAdapterEntry = serde_yaml::from_str("state: new\nvlan: uplink-pg\n")
            .unwrap();
        assert_eq!(entry.vlan.map(|vlan| vlan.as_text()), Some("uplink-pg".to_string()));
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let entry: DesiredAdapterEntry =
            serde_yaml::from_str("state: present\nmac: 00:50:56:11:22:33\nfuture_field: 1\n")
                .unwrap();
        assert_eq!(entry.state.as_deref(), Some("present"));
    }

    #[test]
    fn test_request_defaults() {
        let request: ReconcileRequest = serde_yaml::from_str("name: test-vm\n").unwrap();
        assert_eq!(request.datacenter, "ha-datacenter");
        assert!(!request.gather_network_facts);
        assert!(request.networks.is_empty());
    }
}
