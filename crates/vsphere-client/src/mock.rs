//! Mock VsphereClient for unit testing
//!
//! In-memory implementation of `VsphereClientTrait` that stores VMs,
//! adapters, networks and portgroups in hash maps. Device-change submission
//! mutates the stored adapter list the way the backend would, so driver-level
//! tests can assert on post-submission facts. A task error can be injected
//! to exercise the failure path.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::error::VsphereError;
use crate::models::*;
use crate::vsphere_trait::VsphereClientTrait;

/// Mock VsphereClient for testing
#[derive(Debug, Clone)]
pub struct MockVsphereClient {
    base_url: String,
    // In-memory inventory
    vms: Arc<Mutex<Vec<VirtualMachine>>>,
    adapters: Arc<Mutex<HashMap<String, Vec<EthernetAdapter>>>>,
    networks: Arc<Mutex<Vec<NetworkSummary>>>,
    portgroups: Arc<Mutex<HashMap<String, Vec<DistributedPortgroup>>>>,
    // Injected task failure message
    task_error: Arc<Mutex<Option<String>>>,
    // Submitted device-change batches, in order
    submissions: Arc<Mutex<Vec<Vec<DeviceChange>>>>,
    // Counter for generated device keys
    next_key: Arc<Mutex<i32>>,
}

impl MockVsphereClient {
    /// Create a new mock client
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            vms: Arc::new(Mutex::new(Vec::new())),
            adapters: Arc::new(Mutex::new(HashMap::new())),
            networks: Arc::new(Mutex::new(Vec::new())),
            portgroups: Arc::new(Mutex::new(HashMap::new())),
            task_error: Arc::new(Mutex::new(None)),
            submissions: Arc::new(Mutex::new(Vec::new())),
            next_key: Arc::new(Mutex::new(4000)),
        }
    }

    /// Add a VM to the mock inventory (for test setup)
    pub fn add_vm(&self, vm: VirtualMachine) {
        self.adapters
            .lock()
            .unwrap()
            .entry(vm.id.clone())
            .or_default();
        self.vms.lock().unwrap().push(vm);
    }

    /// Change a VM's power state (for test setup)
    pub fn set_power_state(&self, vm_id: &str, power_state: PowerState) {
        let mut vms = self.vms.lock().unwrap();
        if let Some(vm) = vms.iter_mut().find(|vm| vm.id == vm_id) {
            vm.power_state = power_state;
        }
    }

    /// Attach an adapter to a VM (for test setup)
    pub fn add_adapter(&self, vm_id: &str, adapter: EthernetAdapter) {
        self.adapters
            .lock()
            .unwrap()
            .entry(vm_id.to_string())
            .or_default()
            .push(adapter);
    }

    /// Register a network in a datacenter (for test setup)
    pub fn add_network(&self, network: NetworkSummary) {
        self.networks.lock().unwrap().push(network);
    }

    /// Register a distributed portgroup in a datacenter (for test setup)
    pub fn add_portgroup(&self, datacenter: &str, portgroup: DistributedPortgroup) {
        self.portgroups
            .lock()
            .unwrap()
            .entry(datacenter.to_string())
            .or_default()
            .push(portgroup);
    }

    /// Make the next submission report a task error with this message
    pub fn fail_task(&self, message: impl Into<String>) {
        *self.task_error.lock().unwrap() = Some(message.into());
    }

    /// Number of device-change batches submitted so far
    pub fn submission_count(&self) -> usize {
        self.submissions.lock().unwrap().len()
    }

    /// The most recently submitted batch, if any
    pub fn last_submission(&self) -> Option<Vec<DeviceChange>> {
        self.submissions.lock().unwrap().last().cloned()
    }

    fn next_key(&self) -> i32 {
        let mut key = self.next_key.lock().unwrap();
        let current = *key;
        *key += 1;
        current
    }

    fn apply_add(&self, adapters: &mut Vec<EthernetAdapter>, spec: &AdapterChangeSpec) {
        let key = self.next_key();
        let mac_address = match (spec.address_type, &spec.mac_address) {
            (Some(AddressType::Manual), Some(mac)) => mac.clone(),
            _ => format!("00:50:56:9a:{:02x}:{:02x}", key / 256 % 256, key % 256),
        };
        adapters.push(EthernetAdapter {
            key,
            label: format!("Network adapter {}", adapters.len() + 1),
            device_class: spec
                .device_class
                .clone()
                .unwrap_or_else(|| "VirtualVmxnet3".to_string()),
            mac_address,
            network_name: spec.network_name.clone().unwrap_or_default(),
            unit_number: Some(7 + adapters.len() as i32),
            wake_on_lan_enabled: true,
            allow_guest_control: spec.allow_guest_control.unwrap_or(true),
            connected: spec.connected.unwrap_or(false),
            start_connected: spec.start_connected.unwrap_or(false),
        });
    }

    fn apply_edit(
        adapters: &mut [EthernetAdapter],
        key: i32,
        spec: &AdapterChangeSpec,
    ) -> Result<(), VsphereError> {
        let adapter = adapters
            .iter_mut()
            .find(|adapter| adapter.key == key)
            .ok_or_else(|| VsphereError::NotFound(format!("device key {} not found", key)))?;
        if let Some(network_name) = &spec.network_name {
            adapter.network_name = network_name.clone();
        }
        if let Some(mac_address) = &spec.mac_address {
            adapter.mac_address = mac_address.clone();
        }
        if let Some(connected) = spec.connected {
            adapter.connected = connected;
        }
        if let Some(start_connected) = spec.start_connected {
            adapter.start_connected = start_connected;
        }
        if let Some(allow_guest_control) = spec.allow_guest_control {
            adapter.allow_guest_control = allow_guest_control;
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl VsphereClientTrait for MockVsphereClient {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn create_session(&self) -> Result<(), VsphereError> {
        Ok(())
    }

    async fn find_vm(
        &self,
        name: Option<&str>,
        uuid: Option<&str>,
        _folder: Option<&str>,
    ) -> Result<Option<VirtualMachine>, VsphereError> {
        let vms = self.vms.lock().unwrap();
        Ok(vms
            .iter()
            .find(|vm| {
                name.is_some_and(|name| vm.name == name)
                    || uuid.is_some_and(|uuid| vm.instance_uuid.as_deref() == Some(uuid))
            })
            .cloned())
    }

    async fn list_ethernet_adapters(
        &self,
        vm_id: &str,
    ) -> Result<Vec<EthernetAdapter>, VsphereError> {
        self.adapters
            .lock()
            .unwrap()
            .get(vm_id)
            .cloned()
            .ok_or_else(|| VsphereError::NotFound(format!("VM {} not found", vm_id)))
    }

    async fn find_networks_by_name(
        &self,
        name: &str,
    ) -> Result<Vec<NetworkSummary>, VsphereError> {
        let networks = self.networks.lock().unwrap();
        Ok(networks
            .iter()
            .filter(|network| network.name == name)
            .cloned()
            .collect())
    }

    async fn list_distributed_portgroups(
        &self,
        datacenter: &str,
    ) -> Result<Vec<DistributedPortgroup>, VsphereError> {
        Ok(self
            .portgroups
            .lock()
            .unwrap()
            .get(datacenter)
            .cloned()
            .unwrap_or_default())
    }

    async fn apply_device_changes(
        &self,
        vm_id: &str,
        changes: &[DeviceChange],
    ) -> Result<TaskOutcome, VsphereError> {
        self.submissions.lock().unwrap().push(changes.to_vec());

        if let Some(message) = self.task_error.lock().unwrap().take() {
            return Ok(TaskOutcome {
                state: TaskState::Error,
                message: Some(message),
                complete_time: Some(chrono::Utc::now()),
            });
        }

        let mut all_adapters = self.adapters.lock().unwrap();
        let adapters = all_adapters
            .get_mut(vm_id)
            .ok_or_else(|| VsphereError::NotFound(format!("VM {} not found", vm_id)))?;

        for change in changes {
            match change.operation {
                DeviceOperation::Add => {
                    let spec = change.spec.as_ref().ok_or_else(|| {
                        VsphereError::InvalidRequest("add operation without a device spec".to_string())
                    })?;
                    self.apply_add(adapters, spec);
                }
                DeviceOperation::Edit => {
                    let key = change.device_key.ok_or_else(|| {
                        VsphereError::InvalidRequest("edit operation without a device key".to_string())
                    })?;
                    let spec = change.spec.as_ref().ok_or_else(|| {
                        VsphereError::InvalidRequest("edit operation without a device spec".to_string())
                    })?;
                    Self::apply_edit(adapters, key, spec)?;
                }
                DeviceOperation::Remove => {
                    let key = change.device_key.ok_or_else(|| {
                        VsphereError::InvalidRequest("remove operation without a device key".to_string())
                    })?;
                    adapters.retain(|adapter| adapter.key != key);
                }
            }
        }

        Ok(TaskOutcome {
            state: TaskState::Success,
            message: None,
            complete_time: Some(chrono::Utc::now()),
        })
    }
}
