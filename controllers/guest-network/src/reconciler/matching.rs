//! Adapter matching
//!
//! Selects the existing adapters a present/absent entry acts on, using a
//! fixed key precedence: `mac`, then `label`, then `device_type`. The first
//! key yielding a non-empty result wins; a device-type match may select
//! several adapters, which is intentional and lets one entry bulk-edit all
//! adapters of a type.

use vsphere_client::EthernetAdapter;

use super::directory::AdapterDirectory;
use super::validate::ValidatedEntry;
use crate::error::ControllerError;

/// Match an entry against the directory.
///
/// Fails with `MissingMatchKey` when the entry carries no key at all, and
/// with `AdapterNotFound` when every present key comes up empty.
pub fn match_adapters<'directory>(
    entry: &ValidatedEntry,
    directory: &'directory AdapterDirectory,
) -> Result<Vec<&'directory EthernetAdapter>, ControllerError> {
    if entry.mac.is_none() && entry.label.is_none() && entry.device_type.is_none() {
        return Err(ControllerError::MissingMatchKey);
    }

    let mut matched: Vec<&EthernetAdapter> = Vec::new();
    if let Some(mac) = &entry.mac {
        matched.extend(directory.find_by_mac(mac));
    }
    if matched.is_empty() {
        if let Some(label) = &entry.label {
            matched.extend(directory.find_by_label(label));
        }
    }
    if matched.is_empty() {
        if let Some(device_type) = entry.device_type {
            matched = directory.find_all_by_type(device_type);
        }
    }

    if matched.is_empty() {
        return Err(ControllerError::AdapterNotFound(describe_keys(entry)));
    }
    Ok(matched)
}

/// Human-readable rendering of the entry's match keys, for error messages.
fn describe_keys(entry: &ValidatedEntry) -> String {
    let mut keys = Vec::new();
    if let Some(mac) = &entry.mac {
        keys.push(format!("mac: {}", mac));
    }
    if let Some(label) = &entry.label {
        keys.push(format!("label: {}", label));
    }
    if let Some(device_type) = entry.device_type {
        keys.push(format!("device_type: {}", device_type.keyword()));
    }
    keys.join(", ")
}
