//! vSphere REST API client
//!
//! Implements the management backend client over the vCenter Automation REST
//! surface: session-token authentication, VM lookup, ethernet adapter
//! listing, network/portgroup listing, and device-change submission.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::common::HttpClient;
use crate::error::VsphereError;
use crate::models::*;
use crate::vsphere_trait::VsphereClientTrait;

/// vSphere API client
#[derive(Debug)]
pub struct VsphereClient {
    http: HttpClient,
    username: String,
    password: String,
}

/// VM summary as returned by the VM list endpoint
#[derive(Debug, Clone, Deserialize)]
struct VmSummaryWire {
    vm: String,
    name: String,
    power_state: PowerState,
}

/// VM detail, queried for the instance UUID
#[derive(Debug, Clone, Deserialize)]
struct VmDetailWire {
    identity: Option<VmIdentityWire>,
}

#[derive(Debug, Clone, Deserialize)]
struct VmIdentityWire {
    instance_uuid: String,
}

#[derive(Debug, Clone, Deserialize)]
struct FolderWire {
    folder: String,
}

#[derive(Debug, Clone, Deserialize)]
struct DatacenterWire {
    datacenter: String,
    name: String,
}

#[derive(Debug, Clone, Deserialize)]
struct NetworkWire {
    network: String,
    name: String,
}

/// Distributed portgroup detail
#[derive(Debug, Clone, Deserialize)]
struct PortgroupDetailWire {
    name: String,
    vlan: Option<i64>,
    switch_name: String,
}

#[derive(Debug, Clone, Deserialize)]
struct NicSummaryWire {
    nic: String,
}

#[derive(Debug, Clone, Deserialize)]
struct NicDetailWire {
    label: String,
    #[serde(rename = "type")]
    nic_type: String,
    mac_address: String,
    backing: NicBackingWire,
    state: String,
    start_connected: bool,
    wake_on_lan_enabled: bool,
    allow_guest_control: bool,
    unit_number: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
struct NicBackingWire {
    network_name: String,
}

/// Map a wire adapter type tag to the backend device class
fn device_class_for_wire(nic_type: &str) -> String {
    match nic_type {
        "PCNET32" => "VirtualPCNet32".to_string(),
        "VMXNET2" => "VirtualVmxnet2".to_string(),
        "VMXNET3" => "VirtualVmxnet3".to_string(),
        "E1000" => "VirtualE1000".to_string(),
        "E1000E" => "VirtualE1000e".to_string(),
        "SRIOV" => "VirtualSriovEthernetCard".to_string(),
        other => other.to_string(),
    }
}

/// Map a backend device class back to the wire adapter type tag
fn wire_type_for_class(device_class: &str) -> String {
    match device_class {
        "VirtualPCNet32" => "PCNET32".to_string(),
        "VirtualVmxnet2" => "VMXNET2".to_string(),
        "VirtualVmxnet3" => "VMXNET3".to_string(),
        "VirtualE1000" => "E1000".to_string(),
        "VirtualE1000e" => "E1000E".to_string(),
        "VirtualSriovEthernetCard" => "SRIOV".to_string(),
        other => other.to_string(),
    }
}

impl VsphereClient {
    /// Create a new vSphere client
    ///
    /// # Arguments
    /// * `base_url` - vCenter base URL (e.g., "https://vcenter.example.com")
    /// * `username` - account used for session login
    /// * `password` - account password
    /// * `insecure` - accept invalid TLS certificates (lab environments)
    pub fn new(
        base_url: String,
        username: String,
        password: String,
        insecure: bool,
    ) -> Result<Self, VsphereError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .danger_accept_invalid_certs(insecure)
            .build()
            .map_err(VsphereError::Http)?;

        Ok(Self {
            http: HttpClient::new(client, base_url),
            username,
            password,
        })
    }

    /// List all datacenters as (id, name) pairs
    async fn list_datacenters(&self) -> Result<Vec<DatacenterWire>, VsphereError> {
        self.http.get("/api/vcenter/datacenter").await
    }

    /// Resolve a datacenter name to its identifier
    async fn datacenter_id(&self, name: &str) -> Result<Option<String>, VsphereError> {
        let datacenters = self.list_datacenters().await?;
        Ok(datacenters
            .into_iter()
            .find(|datacenter| datacenter.name == name)
            .map(|datacenter| datacenter.datacenter))
    }

    async fn vm_detail(&self, vm_id: &str) -> Result<VmDetailWire, VsphereError> {
        self.http.get(&format!("/api/vcenter/vm/{}", vm_id)).await
    }

    async fn vm_from_summary(&self, summary: VmSummaryWire) -> Result<VirtualMachine, VsphereError> {
        let detail = self.vm_detail(&summary.vm).await?;
        Ok(VirtualMachine {
            id: summary.vm,
            name: summary.name,
            instance_uuid: detail.identity.map(|identity| identity.instance_uuid),
            power_state: summary.power_state,
        })
    }

    fn change_spec_body(spec: &AdapterChangeSpec) -> serde_json::Value {
        let mut body = serde_json::Map::new();
        if let Some(device_class) = &spec.device_class {
            body.insert("type".to_string(), json!(wire_type_for_class(device_class)));
        }
        if let Some(network_name) = &spec.network_name {
            body.insert("backing".to_string(), json!({ "network_name": network_name }));
        }
        if let Some(address_type) = spec.address_type {
            let mac_type = match address_type {
                AddressType::Manual => "MANUAL",
                AddressType::Generated => "GENERATED",
            };
            body.insert("mac_type".to_string(), json!(mac_type));
        }
        if let Some(mac_address) = &spec.mac_address {
            body.insert("mac_address".to_string(), json!(mac_address));
        }
        if let Some(connected) = spec.connected {
            body.insert("connected".to_string(), json!(connected));
        }
        if let Some(start_connected) = spec.start_connected {
            body.insert("start_connected".to_string(), json!(start_connected));
        }
        if let Some(allow_guest_control) = spec.allow_guest_control {
            body.insert("allow_guest_control".to_string(), json!(allow_guest_control));
        }
        serde_json::Value::Object(body)
    }

    /// Apply one device change. Returns the backend diagnostic on rejection.
    async fn apply_one(&self, vm_id: &str, change: &DeviceChange) -> Result<(), VsphereError> {
        match change.operation {
            DeviceOperation::Add => {
                let spec = change.spec.as_ref().ok_or_else(|| {
                    VsphereError::InvalidRequest("add operation without a device spec".to_string())
                })?;
                let _nic: String = self
                    .http
                    .post(
                        &format!("/api/vcenter/vm/{}/hardware/ethernet", vm_id),
                        &Self::change_spec_body(spec),
                    )
                    .await?;
                Ok(())
            }
            DeviceOperation::Edit => {
                let key = change.device_key.ok_or_else(|| {
                    VsphereError::InvalidRequest("edit operation without a device key".to_string())
                })?;
                let spec = change.spec.as_ref().ok_or_else(|| {
                    VsphereError::InvalidRequest("edit operation without a device spec".to_string())
                })?;
                self.http
                    .patch(
                        &format!("/api/vcenter/vm/{}/hardware/ethernet/{}", vm_id, key),
                        &Self::change_spec_body(spec),
                    )
                    .await
            }
            DeviceOperation::Remove => {
                let key = change.device_key.ok_or_else(|| {
                    VsphereError::InvalidRequest("remove operation without a device key".to_string())
                })?;
                self.http
                    .delete(&format!("/api/vcenter/vm/{}/hardware/ethernet/{}", vm_id, key))
                    .await
            }
        }
    }
}

#[async_trait::async_trait]
impl VsphereClientTrait for VsphereClient {
    fn base_url(&self) -> &str {
        self.http.base_url()
    }

    async fn create_session(&self) -> Result<(), VsphereError> {
        self.http.login(&self.username, &self.password).await
    }

    async fn find_vm(
        &self,
        name: Option<&str>,
        uuid: Option<&str>,
        folder: Option<&str>,
    ) -> Result<Option<VirtualMachine>, VsphereError> {
        if let Some(name) = name {
            let mut filters = vec![("names", name)];
            let folder_id;
            if let Some(folder) = folder {
                let folders: Vec<FolderWire> = self
                    .http
                    .get(&format!(
                        "/api/vcenter/folder?{}",
                        self.http
                            .build_query_string(&[("names", folder), ("type", "VIRTUAL_MACHINE")])
                    ))
                    .await?;
                match folders.into_iter().next() {
                    Some(wire) => {
                        folder_id = wire.folder;
                        filters.push(("folders", folder_id.as_str()));
                    }
                    None => return Ok(None),
                }
            }
            let summaries: Vec<VmSummaryWire> = self
                .http
                .get(&format!(
                    "/api/vcenter/vm?{}",
                    self.http.build_query_string(&filters)
                ))
                .await?;
            match summaries.into_iter().next() {
                Some(summary) => Ok(Some(self.vm_from_summary(summary).await?)),
                None => Ok(None),
            }
        } else if let Some(uuid) = uuid {
            // The VM list endpoint has no UUID filter; walk summaries and
            // match on the detail's instance UUID.
            let summaries: Vec<VmSummaryWire> = self.http.get("/api/vcenter/vm").await?;
            for summary in summaries {
                let detail = self.vm_detail(&summary.vm).await?;
                if detail
                    .identity
                    .as_ref()
                    .is_some_and(|identity| identity.instance_uuid == uuid)
                {
                    return Ok(Some(VirtualMachine {
                        id: summary.vm,
                        name: summary.name,
                        instance_uuid: detail.identity.map(|identity| identity.instance_uuid),
                        power_state: summary.power_state,
                    }));
                }
            }
            Ok(None)
        } else {
            Err(VsphereError::InvalidRequest(
                "VM lookup requires a name or an instance UUID".to_string(),
            ))
        }
    }

    async fn list_ethernet_adapters(
        &self,
        vm_id: &str,
    ) -> Result<Vec<EthernetAdapter>, VsphereError> {
        let summaries: Vec<NicSummaryWire> = self
            .http
            .get(&format!("/api/vcenter/vm/{}/hardware/ethernet", vm_id))
            .await?;

        let mut adapters = Vec::with_capacity(summaries.len());
        for summary in summaries {
            let detail: NicDetailWire = self
                .http
                .get(&format!(
                    "/api/vcenter/vm/{}/hardware/ethernet/{}",
                    vm_id, summary.nic
                ))
                .await?;
            let key = summary.nic.parse::<i32>().map_err(|_| {
                VsphereError::Api(format!("non-numeric device key '{}'", summary.nic))
            })?;
            adapters.push(EthernetAdapter {
                key,
                label: detail.label,
                device_class: device_class_for_wire(&detail.nic_type),
                mac_address: detail.mac_address,
                network_name: detail.backing.network_name,
                unit_number: detail.unit_number,
                wake_on_lan_enabled: detail.wake_on_lan_enabled,
                allow_guest_control: detail.allow_guest_control,
                connected: detail.state == "CONNECTED",
                start_connected: detail.start_connected,
            });
        }
        debug!("Listed {} ethernet adapters for {}", adapters.len(), vm_id);
        Ok(adapters)
    }

    async fn find_networks_by_name(
        &self,
        name: &str,
    ) -> Result<Vec<NetworkSummary>, VsphereError> {
        // The list endpoint is scoped per datacenter; tag every candidate
        // with its datacenter so the resolver can apply its own scope.
        let mut candidates = Vec::new();
        for datacenter in self.list_datacenters().await? {
            let networks: Vec<NetworkWire> = self
                .http
                .get(&format!(
                    "/api/vcenter/network?{}",
                    self.http.build_query_string(&[
                        ("names", name),
                        ("datacenters", &datacenter.datacenter),
                    ])
                ))
                .await?;
            candidates.extend(networks.into_iter().map(|network| NetworkSummary {
                network: network.network,
                name: network.name,
                datacenter: datacenter.name.clone(),
            }));
        }
        Ok(candidates)
    }

    async fn list_distributed_portgroups(
        &self,
        datacenter: &str,
    ) -> Result<Vec<DistributedPortgroup>, VsphereError> {
        let Some(datacenter_id) = self.datacenter_id(datacenter).await? else {
            return Ok(Vec::new());
        };
        let networks: Vec<NetworkWire> = self
            .http
            .get(&format!(
                "/api/vcenter/network?{}",
                self.http.build_query_string(&[
                    ("types", "DISTRIBUTED_PORTGROUP"),
                    ("datacenters", &datacenter_id),
                ])
            ))
            .await?;

        let mut portgroups = Vec::with_capacity(networks.len());
        for network in networks {
            let detail: PortgroupDetailWire = self
                .http
                .get(&format!("/api/vcenter/network/{}", network.network))
                .await?;
            portgroups.push(DistributedPortgroup {
                name: detail.name,
                vlan_id: detail.vlan,
                dvswitch_name: detail.switch_name,
            });
        }
        Ok(portgroups)
    }

    async fn apply_device_changes(
        &self,
        vm_id: &str,
        changes: &[DeviceChange],
    ) -> Result<TaskOutcome, VsphereError> {
        for change in changes {
            match self.apply_one(vm_id, change).await {
                Ok(()) => {}
                // Backend rejections become a failed task outcome with the
                // diagnostic attached verbatim; transport errors propagate.
                Err(VsphereError::Api(message) | VsphereError::NotFound(message)) => {
                    return Ok(TaskOutcome {
                        state: TaskState::Error,
                        message: Some(message),
                        complete_time: Some(chrono::Utc::now()),
                    });
                }
                Err(error) => return Err(error),
            }
        }
        Ok(TaskOutcome {
            state: TaskState::Success,
            message: None,
            complete_time: Some(chrono::Utc::now()),
        })
    }
}
