//! vSphere backend models
//!
//! Flattened views over the backend object graph, as consumed by the
//! reconciler: VM summaries, ethernet adapters, network and distributed
//! portgroup summaries, and the device-change request/outcome pair.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Virtual machine summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct VirtualMachine {
    /// Backend VM identifier, e.g. "vm-1042".
    pub id: String,
    /// VM display name.
    pub name: String,
    /// Instance UUID, when the backend exposes it.
    pub instance_uuid: Option<String>,
    /// Power state inherited by every device of the VM.
    pub power_state: PowerState,
}

/// VM power state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PowerState {
    /// VM is running.
    PoweredOn,
    /// VM is powered off.
    PoweredOff,
    /// VM is suspended.
    Suspended,
}

/// One virtual ethernet adapter as reported by the backend.
///
/// Device-type filtering is deliberately not done here: `device_class` is the
/// raw backend class string, and the reconciler's adapter directory decides
/// which classes it understands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EthernetAdapter {
    /// Opaque device key, unique within the VM.
    pub key: i32,
    /// Device label, e.g. "Network adapter 1". Unique within the VM.
    pub label: String,
    /// Backend device class, e.g. "VirtualVmxnet3".
    pub device_class: String,
    /// Current MAC address. Unique within the VM.
    pub mac_address: String,
    /// Name of the backing network or portgroup.
    pub network_name: String,
    /// Unit number on the virtual controller.
    pub unit_number: Option<i32>,
    /// Wake-on-LAN enabled.
    pub wake_on_lan_enabled: bool,
    /// Guest OS may change connectivity.
    pub allow_guest_control: bool,
    /// Currently connected.
    pub connected: bool,
    /// Connects when the VM powers on.
    pub start_connected: bool,
}

/// Network summary, tagged with the datacenter the network lives in.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct NetworkSummary {
    /// Backend network identifier, e.g. "network-17".
    pub network: String,
    /// Network name.
    pub name: String,
    /// Name of the parent datacenter.
    pub datacenter: String,
}

/// Distributed virtual portgroup summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DistributedPortgroup {
    /// Configured portgroup name.
    pub name: String,
    /// Configured VLAN ID, when the default port config carries one.
    pub vlan_id: Option<i64>,
    /// Name of the owning distributed virtual switch.
    pub dvswitch_name: String,
}

/// One device change to submit to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DeviceChange {
    /// Operation to perform.
    pub operation: DeviceOperation,
    /// Target device key; present for edit/remove.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_key: Option<i32>,
    /// Field updates; present for add/edit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spec: Option<AdapterChangeSpec>,
}

/// Device change operation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceOperation {
    /// Create a new adapter.
    Add,
    /// Reconfigure an existing adapter.
    Edit,
    /// Remove an existing adapter.
    Remove,
}

/// Field updates for an add or edit operation. `None` fields are left
/// untouched by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AdapterChangeSpec {
    /// Backend device class; set on add.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_class: Option<String>,
    /// Backing network name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_name: Option<String>,
    /// MAC address assignment mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_type: Option<AddressType>,
    /// MAC address to assign; requires `address_type: manual`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mac_address: Option<String>,
    /// Desired runtime connectivity.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connected: Option<bool>,
    /// Connect when the VM powers on.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_connected: Option<bool>,
    /// Guest OS may change connectivity.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_guest_control: Option<bool>,
}

/// MAC address assignment mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressType {
    /// Backend assigns an address on creation.
    Generated,
    /// Caller-supplied address is used verbatim.
    Manual,
}

/// Outcome of a submitted device-change batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TaskOutcome {
    /// Terminal task state.
    pub state: TaskState,
    /// Backend diagnostic for failed tasks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Completion time reported by the backend.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complete_time: Option<DateTime<Utc>>,
}

/// Terminal state of a backend task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskState {
    /// All changes applied.
    Success,
    /// Task failed; see the attached message.
    Error,
}
