//! Unit tests for network reference resolution

#[cfg(test)]
mod tests {
    use adapter_spec::VlanRef;
    use vsphere_client::MockVsphereClient;

    use crate::error::ControllerError;
    use crate::reconciler::resolve::resolve_network;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_named_network_in_scope() {
        let mock_client = MockVsphereClient::new("https://test-vcenter");
        mock_client.add_network(create_test_network("VM Network", "dc1"));

        let mut entry = create_test_entry("new");
        entry.name = Some("VM Network".to_string());
        let mut entry = validated(&entry);

        resolve_network(&mock_client, "dc1", &mut entry)
            .await
            .expect("network should resolve");
        assert_eq!(entry.name.as_deref(), Some("VM Network"));
    }

    #[tokio::test]
    async fn test_named_network_in_other_datacenter_only() {
        let mock_client = MockVsphereClient::new("https://test-vcenter");
        mock_client.add_network(create_test_network("VM Network", "dc2"));

        let mut entry = create_test_entry("new");
        entry.name = Some("VM Network".to_string());
        let mut entry = validated(&entry);

        let result = resolve_network(&mock_client, "dc1", &mut entry).await;
        assert!(matches!(result, Err(ControllerError::NetworkNotFound(_))));
    }

    #[tokio::test]
    async fn test_vlan_id_resolves_to_portgroup_name() {
        let mock_client = MockVsphereClient::new("https://test-vcenter");
        mock_client.add_portgroup("dc1", create_test_portgroup("pg-ten", Some(10), "dvs0"));

        let mut entry = create_test_entry("new");
        entry.vlan = Some(VlanRef::Id(10));
        let mut entry = validated(&entry);

        resolve_network(&mock_client, "dc1", &mut entry)
            .await
            .expect("VLAN should resolve");
        assert_eq!(entry.name.as_deref(), Some("pg-ten"));
    }

    #[tokio::test]
    async fn test_vlan_text_matches_portgroup_name() {
        let mock_client = MockVsphereClient::new("https://test-vcenter");
        mock_client.add_portgroup("dc1", create_test_portgroup("uplink-pg", None, "dvs0"));

        let mut entry = create_test_entry("new");
        entry.vlan = Some(VlanRef::Name("uplink-pg".to_string()));
        let mut entry = validated(&entry);

        resolve_network(&mock_client, "dc1", &mut entry)
            .await
            .expect("VLAN should resolve");
        assert_eq!(entry.name.as_deref(), Some("uplink-pg"));
    }

    #[tokio::test]
    async fn test_dvswitch_name_disambiguates() {
        let mock_client = MockVsphereClient::new("https://test-vcenter");
        mock_client.add_portgroup("dc1", create_test_portgroup("shared-pg", Some(20), "dvs1"));

        let mut entry = create_test_entry("new");
        entry.vlan = Some(VlanRef::Name("shared-pg".to_string()));
        entry.dvswitch_name = Some("dvs1".to_string());
        let mut entry = validated(&entry);

        resolve_network(&mock_client, "dc1", &mut entry)
            .await
            .expect("VLAN should resolve");
        assert_eq!(entry.name.as_deref(), Some("shared-pg"));
    }

    #[tokio::test]
    async fn test_unknown_vlan_fails() {
        let mock_client = MockVsphereClient::new("https://test-vcenter");
        mock_client.add_portgroup("dc1", create_test_portgroup("pg-ten", Some(10), "dvs0"));

        let mut entry = create_test_entry("new");
        entry.vlan = Some(VlanRef::Id(99));
        let mut entry = validated(&entry);

        let result = resolve_network(&mock_client, "dc1", &mut entry).await;
        assert!(matches!(result, Err(ControllerError::VlanNotFound(_))));
    }

    #[tokio::test]
    async fn test_identity_only_entry_needs_no_resolution() {
        let mock_client = MockVsphereClient::new("https://test-vcenter");

        let mut entry = create_test_entry("absent");
        entry.mac = Some("00:50:56:11:22:33".to_string());
        let mut entry = validated(&entry);

        resolve_network(&mock_client, "dc1", &mut entry)
            .await
            .expect("identity-only entry should pass through");
        assert!(entry.name.is_none());
    }
}
