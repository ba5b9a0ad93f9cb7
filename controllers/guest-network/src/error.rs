//! Controller-specific error types.
//!
//! Local errors (validation, resolution, matching, planning preconditions)
//! abort the whole run before anything is submitted to the backend; backend
//! errors carry the backend's own diagnostic verbatim.

use thiserror::Error;
use vsphere_client::VsphereError;

/// Errors that can occur in the guest network controller.
#[derive(Debug, Error)]
pub enum ControllerError {
    /// vSphere backend error
    #[error("vSphere error: {0}")]
    Vsphere(#[from] VsphereError),

    /// Desired entry carries no state keyword, or an unknown one
    #[error("network adapter state not specified or invalid: '{0}', valid values: new, present, absent")]
    InvalidState(String),

    /// A new adapter needs a network name or a VLAN to attach to
    #[error("please specify at least network name or VLAN for adding a new network adapter")]
    MissingNetworkReference,

    /// Unknown device-type keyword
    #[error("device type specified '{0}' is invalid, valid types: pcnet32, vmxnet2, vmxnet3, e1000, e1000e, sriov")]
    InvalidDeviceType(String),

    /// Malformed MAC address in `mac` or `manual_mac`
    #[error("device MAC address '{0}' is invalid, please provide a correct MAC address")]
    InvalidMacSyntax(String),

    /// Named network does not exist in the datacenter scope
    #[error("network '{0}' does not exist")]
    NetworkNotFound(String),

    /// No distributed portgroup matches the given VLAN
    #[error("VLAN '{0}' does not exist")]
    VlanNotFound(String),

    /// Present/absent entry without any of mac, label, device_type
    #[error("should specify 'mac', 'label' or 'device_type' parameter to reconfigure or remove a network adapter")]
    MissingMatchKey,

    /// The chosen match key selected no adapter
    #[error("unable to find the specified network adapter: {0}")]
    AdapterNotFound(String),

    /// MAC reassignment requested while the VM is not powered off
    #[error("expected power state is poweredOff to reconfigure MAC address")]
    PowerStateViolation,

    /// Target virtual machine not found
    #[error("unable to find the specified virtual machine: {0}")]
    VmNotFound(String),

    /// Invalid configuration
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
