//! Guest network reconciliation engine
//!
//! Orchestrates validation, network resolution, adapter matching and change
//! planning across the desired list, submits the effective operations as one
//! batch, and reports adapter facts from a fresh snapshot. All local checks
//! run before anything is submitted: one bad entry aborts the whole run.

pub mod directory;
pub mod matching;
pub mod plan;
pub mod resolve;
pub mod validate;

mod driver_test;
mod matching_test;
mod resolve_test;

use std::collections::BTreeMap;
use std::sync::Arc;

use adapter_spec::{AdapterFacts, AdapterState, ReconcileOutcome, ReconcileRequest};
use tracing::{error, info};
use uuid::Uuid;
use vsphere_client::{DeviceChange, TaskState, VirtualMachine, VsphereClientTrait};

use crate::error::ControllerError;
use directory::AdapterDirectory;
use plan::ChangeOperation;

/// Reconciles a VM's network adapters against a desired-state list.
pub struct Reconciler {
    client: Arc<dyn VsphereClientTrait>,
    datacenter: String,
}

impl Reconciler {
    /// Create a reconciler bound to a backend session and datacenter scope.
    pub fn new(client: Arc<dyn VsphereClientTrait>, datacenter: impl Into<String>) -> Self {
        Self {
            client,
            datacenter: datacenter.into(),
        }
    }

    /// Run one reconciliation pass.
    ///
    /// Facts-only mode (requested explicitly, or implied by an empty desired
    /// list) skips planning and submission entirely.
    pub async fn run(&self, request: &ReconcileRequest) -> Result<ReconcileOutcome, ControllerError> {
        let vm = self.locate_vm(request).await?;
        info!("Reconciling network adapters of {} ({})", vm.name, vm.id);

        if request.gather_network_facts || request.networks.is_empty() {
            let directory = self.snapshot(&vm.id).await?;
            return Ok(ReconcileOutcome::facts_only(network_facts(&directory)));
        }

        // Validate and resolve every entry before touching the device list.
        let mut entries = Vec::with_capacity(request.networks.len());
        for raw_entry in &request.networks {
            let mut entry = validate::validate_entry(raw_entry)?;
            resolve::resolve_network(self.client.as_ref(), &self.datacenter, &mut entry).await?;
            entries.push(entry);
        }

        let directory = self.snapshot(&vm.id).await?;
        let mut operations = Vec::new();
        for entry in &entries {
            match entry.state {
                AdapterState::New => operations.push(plan::plan_add(entry)),
                AdapterState::Present | AdapterState::Absent => {
                    // Every entry plans against the snapshot taken above: a
                    // later entry matching the same adapter compares with the
                    // original state, not a prior entry's pending edit.
                    for adapter in matching::match_adapters(entry, &directory)? {
                        operations.push(plan::plan_for_adapter(entry, adapter, vm.power_state)?);
                    }
                }
            }
        }

        let effective: Vec<DeviceChange> = operations
            .iter()
            .filter(|operation| operation.is_effective)
            .map(ChangeOperation::to_device_change)
            .collect();
        let changed = !effective.is_empty();

        if changed {
            info!("Submitting {} device changes for {}", effective.len(), vm.id);
            let outcome = self.client.apply_device_changes(&vm.id, &effective).await?;
            if outcome.state == TaskState::Error {
                let message = outcome
                    .message
                    .unwrap_or_else(|| "task failed without a message".to_string());
                error!("Reconfiguration task failed: {}", message);
                return Ok(ReconcileOutcome {
                    changed,
                    failed: true,
                    msg: Some(message),
                    network_data: BTreeMap::new(),
                });
            }
        } else {
            info!("All desired entries already match, nothing to submit");
        }

        // Fresh snapshot: indices and labels may have changed after add/remove.
        let directory = self.snapshot(&vm.id).await?;
        Ok(ReconcileOutcome {
            changed,
            failed: false,
            msg: None,
            network_data: network_facts(&directory),
        })
    }

    async fn locate_vm(&self, request: &ReconcileRequest) -> Result<VirtualMachine, ControllerError> {
        if request.name.is_none() && request.uuid.is_none() {
            return Err(ControllerError::InvalidConfig(
                "either 'name' or 'uuid' of the virtual machine is required".to_string(),
            ));
        }
        if let Some(uuid) = &request.uuid {
            Uuid::parse_str(uuid).map_err(|_| {
                ControllerError::InvalidConfig(format!("'{}' is not a valid instance UUID", uuid))
            })?;
        }
        self.client
            .find_vm(
                request.name.as_deref(),
                request.uuid.as_deref(),
                request.folder.as_deref(),
            )
            .await?
            .ok_or_else(|| {
                ControllerError::VmNotFound(format!(
                    "uuid: {}, name: {}",
                    request.uuid.as_deref().unwrap_or(""),
                    request.name.as_deref().unwrap_or("")
                ))
            })
    }

    async fn snapshot(&self, vm_id: &str) -> Result<AdapterDirectory, ControllerError> {
        let devices = self.client.list_ethernet_adapters(vm_id).await?;
        Ok(AdapterDirectory::new(&devices))
    }
}

/// Flat per-adapter facts, keyed by position in the device list.
pub fn network_facts(directory: &AdapterDirectory) -> BTreeMap<usize, AdapterFacts> {
    directory
        .adapters()
        .enumerate()
        .map(|(index, (device_type, adapter))| {
            (
                index,
                AdapterFacts {
                    device_type: device_type.facts_tag().to_string(),
                    label: adapter.label.clone(),
                    name: adapter.network_name.clone(),
                    mac_addr: adapter.mac_address.clone(),
                    unit_number: adapter.unit_number,
                    wake_onlan: adapter.wake_on_lan_enabled,
                    allow_guest_ctl: adapter.allow_guest_control,
                    connected: adapter.connected,
                    start_connected: adapter.start_connected,
                },
            )
        })
        .collect()
}
