//! Desired-entry validation
//!
//! Shape checks for one desired adapter entry: state keyword, network
//! reference requirement for new adapters, device-type keyword, and MAC
//! syntax for both the match-key address and the assign address. Pure
//! functions, no backend access.

use adapter_spec::{AdapterState, DesiredAdapterEntry, DeviceType, VlanRef};

use crate::error::ControllerError;

/// A desired entry after validation, with keywords parsed.
///
/// `name` starts as the caller-supplied network name and is filled in by the
/// resolver when the entry references a VLAN instead.
#[derive(Debug, Clone)]
pub struct ValidatedEntry {
    /// Desired state of the adapter.
    pub state: AdapterState,
    /// Backing network name, caller-supplied or resolver-populated.
    pub name: Option<String>,
    /// VLAN reference, resolved against distributed portgroups.
    pub vlan: Option<VlanRef>,
    /// Distributed vSwitch name for portgroup disambiguation.
    pub dvswitch_name: Option<String>,
    /// Parsed device type.
    pub device_type: Option<DeviceType>,
    /// Match-key MAC address.
    pub mac: Option<String>,
    /// Match-key label.
    pub label: Option<String>,
    /// MAC address to assign on creation or reassignment.
    pub manual_mac: Option<String>,
    /// Desired runtime connectivity.
    pub connected: Option<bool>,
    /// Desired boot-time connectivity.
    pub start_connected: Option<bool>,
}

/// Validate one desired entry.
pub fn validate_entry(entry: &DesiredAdapterEntry) -> Result<ValidatedEntry, ControllerError> {
    let state_keyword = entry.state.clone().unwrap_or_default();
    let state = AdapterState::parse(&state_keyword)
        .ok_or(ControllerError::InvalidState(state_keyword))?;

    if state == AdapterState::New && entry.name.is_none() && entry.vlan.is_none() {
        return Err(ControllerError::MissingNetworkReference);
    }

    let device_type = match &entry.device_type {
        Some(keyword) => Some(
            DeviceType::parse(keyword)
                .ok_or_else(|| ControllerError::InvalidDeviceType(keyword.clone()))?,
        ),
        None => None,
    };

    for mac in [&entry.mac, &entry.manual_mac].into_iter().flatten() {
        if !is_valid_mac(mac) {
            return Err(ControllerError::InvalidMacSyntax(mac.clone()));
        }
    }

    Ok(ValidatedEntry {
        state,
        name: entry.name.clone(),
        vlan: entry.vlan.clone(),
        dvswitch_name: entry.dvswitch_name.clone(),
        device_type,
        mac: entry.mac.clone(),
        label: entry.label.clone(),
        manual_mac: entry.manual_mac.clone(),
        connected: entry.connected,
        start_connected: entry.start_connected,
    })
}

/// Validate MAC address syntax: six lowercase hex octet pairs joined by a
/// single consistent delimiter, `:` or `-`.
pub fn is_valid_mac(mac: &str) -> bool {
    let bytes = mac.as_bytes();
    if bytes.len() != 17 {
        return false;
    }
    let delimiter = bytes[2];
    if delimiter != b':' && delimiter != b'-' {
        return false;
    }
    bytes.iter().enumerate().all(|(index, &byte)| {
        if index % 3 == 2 {
            byte == delimiter
        } else {
            matches!(byte, b'0'..=b'9' | b'a'..=b'f')
        }
    })
}
