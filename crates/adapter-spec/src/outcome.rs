//! Reconciliation result surface
//!
//! The entire caller-facing output of a run: a changed/failed pair, an
//! optional failure message, and a flat per-adapter facts map keyed by the
//! adapter's position in the backend device list.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Result of one reconciliation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ReconcileOutcome {
    /// True iff at least one effective operation was submitted. On a failed
    /// run this reflects the locally computed intent, not what was durably
    /// applied.
    pub changed: bool,

    /// True when the backend task reported an error.
    pub failed: bool,

    /// Backend failure message, passed through verbatim.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,

    /// Adapter facts keyed by 0-based device-list index.
    pub network_data: BTreeMap<usize, AdapterFacts>,
}

impl ReconcileOutcome {
    /// Facts-only outcome: nothing attempted, nothing failed.
    pub fn facts_only(network_data: BTreeMap<usize, AdapterFacts>) -> Self {
        Self {
            changed: false,
            failed: false,
            msg: None,
            network_data,
        }
    }
}

/// Flat snapshot of one network adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AdapterFacts {
    /// Reporting tag of the device type, e.g. `VMXNET3`.
    pub device_type: String,
    /// Device label, e.g. "Network adapter 1".
    pub label: String,
    /// Backing network name.
    pub name: String,
    /// Current MAC address.
    pub mac_addr: String,
    /// Unit number on the virtual controller.
    pub unit_number: Option<i32>,
    /// Wake-on-LAN enabled.
    pub wake_onlan: bool,
    /// Guest OS may change connectivity.
    pub allow_guest_ctl: bool,
    /// Currently connected.
    pub connected: bool,
    /// Connects when the VM powers on.
    pub start_connected: bool,
}
