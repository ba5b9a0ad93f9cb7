//! VsphereClient trait for mocking
//!
//! This trait abstracts the backend session so the reconciler can be unit
//! tested against an in-memory mock. The concrete `VsphereClient` implements
//! it over the REST API; `MockVsphereClient` implements it over hash maps.

use crate::error::VsphereError;
use crate::models::*;

/// Trait for vSphere management backend operations
///
/// All async methods must be `Send` to work with Tokio's work-stealing runtime.
#[async_trait::async_trait]
pub trait VsphereClientTrait: Send + Sync {
    /// Get the base URL
    fn base_url(&self) -> &str;

    /// Establish an authenticated session with the backend
    async fn create_session(&self) -> Result<(), VsphereError>;

    /// Locate a virtual machine by name or instance UUID, optionally
    /// restricted to a folder. Returns `None` when no VM matches.
    async fn find_vm(
        &self,
        name: Option<&str>,
        uuid: Option<&str>,
        folder: Option<&str>,
    ) -> Result<Option<VirtualMachine>, VsphereError>;

    /// List the VM's ethernet adapters in device-list order
    async fn list_ethernet_adapters(&self, vm_id: &str)
    -> Result<Vec<EthernetAdapter>, VsphereError>;

    /// Find all networks with the given name, across datacenters. Each
    /// candidate is tagged with its parent datacenter so the caller can
    /// apply its own scope.
    async fn find_networks_by_name(&self, name: &str)
    -> Result<Vec<NetworkSummary>, VsphereError>;

    /// List distributed virtual portgroups in the given datacenter
    async fn list_distributed_portgroups(
        &self,
        datacenter: &str,
    ) -> Result<Vec<DistributedPortgroup>, VsphereError>;

    /// Submit a device-change batch against the VM and wait for the
    /// resulting task. Structural rejections surface as `Err`; asynchronous
    /// task failures surface as an `Error` outcome with the backend message.
    async fn apply_device_changes(
        &self,
        vm_id: &str,
        changes: &[DeviceChange],
    ) -> Result<TaskOutcome, VsphereError>;
}
