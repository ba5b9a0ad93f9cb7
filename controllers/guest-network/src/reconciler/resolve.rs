//! Network reference resolution
//!
//! Turns a desired entry's network reference into a concrete network name
//! within the datacenter scope. Named networks are checked for existence;
//! VLAN references are resolved against distributed portgroups and the
//! winning portgroup's name is written back into the entry for the planner.

use tracing::debug;
use vsphere_client::VsphereClientTrait;

use super::validate::ValidatedEntry;
use crate::error::ControllerError;

/// Resolve the entry's network reference, if it carries one.
///
/// Portgroup matching applies three rules per portgroup, in order: the
/// configured VLAN ID equals the requested VLAN; the owning switch matches
/// `dvswitch_name` and the portgroup name equals the VLAN value as text; the
/// portgroup name equals the VLAN value as text. The first portgroup
/// satisfying any rule wins.
pub async fn resolve_network(
    client: &dyn VsphereClientTrait,
    datacenter: &str,
    entry: &mut ValidatedEntry,
) -> Result<(), ControllerError> {
    if let Some(name) = entry.name.clone() {
        // Candidates come tagged with their datacenter, which disambiguates
        // same-named networks in other datacenters.
        let candidates = client.find_networks_by_name(&name).await?;
        if candidates
            .iter()
            .any(|candidate| candidate.datacenter == datacenter)
        {
            return Ok(());
        }
        return Err(ControllerError::NetworkNotFound(name));
    }

    let Some(vlan) = entry.vlan.clone() else {
        // Identity-only entry; nothing to resolve.
        return Ok(());
    };
    let vlan_text = vlan.as_text();

    for portgroup in client.list_distributed_portgroups(datacenter).await? {
        let vlan_id_matches = portgroup
            .vlan_id
            .is_some_and(|vlan_id| vlan_id.to_string() == vlan_text);
        let switch_matches = entry
            .dvswitch_name
            .as_deref()
            .is_some_and(|switch| switch == portgroup.dvswitch_name)
            && portgroup.name == vlan_text;
        let name_matches = portgroup.name == vlan_text;

        if vlan_id_matches || switch_matches || name_matches {
            debug!("Resolved VLAN '{}' to portgroup '{}'", vlan_text, portgroup.name);
            entry.name = Some(portgroup.name);
            return Ok(());
        }
    }

    Err(ControllerError::VlanNotFound(vlan_text))
}
