//! End-to-end tests for the reconciliation driver, against the mock backend

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use adapter_spec::ReconcileRequest;
    use vsphere_client::{DeviceOperation, MockVsphereClient, PowerState};

    use crate::error::ControllerError;
    use crate::reconciler::Reconciler;
    use crate::test_utils::*;

    fn request_for(name: &str) -> ReconcileRequest {
        ReconcileRequest {
            name: Some(name.to_string()),
            uuid: None,
            folder: None,
            datacenter: "dc1".to_string(),
            gather_network_facts: false,
            networks: Vec::new(),
        }
    }

    fn reconciler_with(mock_client: &MockVsphereClient) -> Reconciler {
        Reconciler::new(Arc::new(mock_client.clone()), "dc1")
    }

    #[tokio::test]
    async fn test_add_adapter_to_vm_without_adapters() {
        let mock_client = MockVsphereClient::new("https://test-vcenter");
        mock_client.add_vm(create_test_vm("vm-1", "test-vm", PowerState::PoweredOn));
        mock_client.add_network(create_test_network("VM Network", "dc1"));

        let mut request = request_for("test-vm");
        let mut entry = create_test_entry("new");
        entry.name = Some("VM Network".to_string());
        request.networks.push(entry);

        let outcome = reconciler_with(&mock_client)
            .run(&request)
            .await
            .expect("run should succeed");

        assert!(outcome.changed);
        assert!(!outcome.failed);
        assert_eq!(outcome.network_data.len(), 1);
        let facts = &outcome.network_data[&0];
        assert_eq!(facts.name, "VM Network");
        assert_eq!(facts.device_type, "VMXNET3");
        assert!(facts.connected);
        assert_eq!(mock_client.submission_count(), 1);
    }

    #[tokio::test]
    async fn test_absent_with_unknown_mac_submits_nothing() {
        let mock_client = MockVsphereClient::new("https://test-vcenter");
        mock_client.add_vm(create_test_vm("vm-1", "test-vm", PowerState::PoweredOn));

        let mut request = request_for("test-vm");
        let mut entry = create_test_entry("absent");
        entry.mac = Some("00:50:56:44:55:77".to_string());
        request.networks.push(entry);

        let result = reconciler_with(&mock_client).run(&request).await;
        assert!(matches!(result, Err(ControllerError::AdapterNotFound(_))));
        assert_eq!(mock_client.submission_count(), 0);
    }

    #[tokio::test]
    async fn test_facts_only_ignores_desired_list() {
        let mock_client = MockVsphereClient::new("https://test-vcenter");
        mock_client.add_vm(create_test_vm("vm-1", "test-vm", PowerState::PoweredOn));
        mock_client.add_adapter(
            "vm-1",
            create_test_adapter(4000, "Network adapter 1", "00:50:56:11:22:33", "VM Network", "VirtualE1000"),
        );

        let mut request = request_for("test-vm");
        request.gather_network_facts = true;
        let mut entry = create_test_entry("absent");
        entry.mac = Some("00:50:56:11:22:33".to_string());
        request.networks.push(entry);

        let outcome = reconciler_with(&mock_client)
            .run(&request)
            .await
            .expect("facts-only run should succeed");

        assert!(!outcome.changed);
        assert!(!outcome.failed);
        assert_eq!(outcome.network_data.len(), 1);
        assert_eq!(outcome.network_data[&0].device_type, "E1000");
        assert_eq!(mock_client.submission_count(), 0, "nothing may be submitted");
    }

    #[tokio::test]
    async fn test_empty_desired_list_reports_facts() {
        let mock_client = MockVsphereClient::new("https://test-vcenter");
        mock_client.add_vm(create_test_vm("vm-1", "test-vm", PowerState::PoweredOn));

        let outcome = reconciler_with(&mock_client)
            .run(&request_for("test-vm"))
            .await
            .expect("empty run should succeed");

        assert!(!outcome.changed);
        assert!(outcome.network_data.is_empty());
        assert_eq!(mock_client.submission_count(), 0);
    }

    #[tokio::test]
    async fn test_rerunning_a_noop_reports_unchanged() {
        let mock_client = MockVsphereClient::new("https://test-vcenter");
        mock_client.add_vm(create_test_vm("vm-1", "test-vm", PowerState::PoweredOn));
        mock_client.add_adapter(
            "vm-1",
            create_test_adapter(4000, "Network adapter 1", "00:50:56:11:22:33", "VM Network", "VirtualVmxnet3"),
        );
        mock_client.add_network(create_test_network("VM Network", "dc1"));

        let mut request = request_for("test-vm");
        let mut entry = create_test_entry("present");
        entry.mac = Some("00:50:56:11:22:33".to_string());
        entry.name = Some("VM Network".to_string());
        entry.connected = Some(true);
        entry.start_connected = Some(true);
        request.networks.push(entry);

        let outcome = reconciler_with(&mock_client)
            .run(&request)
            .await
            .expect("no-op run should succeed");

        assert!(!outcome.changed, "no-op reconciliation must not report change");
        assert_eq!(mock_client.submission_count(), 0);
    }

    #[tokio::test]
    async fn test_device_type_entry_bulk_edits_every_adapter() {
        let mock_client = MockVsphereClient::new("https://test-vcenter");
        mock_client.add_vm(create_test_vm("vm-1", "test-vm", PowerState::PoweredOn));
        for (key, mac) in [
            (4000, "00:50:56:11:22:33"),
            (4001, "00:50:56:44:55:66"),
            (4002, "00:50:56:77:88:99"),
        ] {
            mock_client.add_adapter(
                "vm-1",
                create_test_adapter(key, &format!("Network adapter {}", key - 3999), mac, "VM Network", "VirtualE1000e"),
            );
        }

        let mut request = request_for("test-vm");
        let mut entry = create_test_entry("present");
        entry.device_type = Some("e1000e".to_string());
        entry.connected = Some(false);
        request.networks.push(entry);

        let outcome = reconciler_with(&mock_client)
            .run(&request)
            .await
            .expect("bulk edit should succeed");

        assert!(outcome.changed);
        let submitted = mock_client.last_submission().expect("one batch submitted");
        assert_eq!(submitted.len(), 3);
        assert!(submitted.iter().all(|change| change.operation == DeviceOperation::Edit));
        assert!(outcome.network_data.values().all(|facts| !facts.connected));
    }

    #[tokio::test]
    async fn test_task_error_is_passed_through() {
        let mock_client = MockVsphereClient::new("https://test-vcenter");
        mock_client.add_vm(create_test_vm("vm-1", "test-vm", PowerState::PoweredOn));
        mock_client.add_network(create_test_network("VM Network", "dc1"));
        mock_client.fail_task("Invalid configuration for device '0'.");

        let mut request = request_for("test-vm");
        let mut entry = create_test_entry("new");
        entry.name = Some("VM Network".to_string());
        request.networks.push(entry);

        let outcome = reconciler_with(&mock_client)
            .run(&request)
            .await
            .expect("task error is a failed outcome, not a transport error");

        assert!(outcome.failed);
        assert_eq!(
            outcome.msg.as_deref(),
            Some("Invalid configuration for device '0'.")
        );
        // `changed` reflects the locally computed intent on failure.
        assert!(outcome.changed);
    }

    #[tokio::test]
    async fn test_missing_vm_fails() {
        let mock_client = MockVsphereClient::new("https://test-vcenter");

        let result = reconciler_with(&mock_client).run(&request_for("ghost-vm")).await;
        assert!(matches!(result, Err(ControllerError::VmNotFound(_))));
    }

    #[tokio::test]
    async fn test_malformed_uuid_is_rejected_before_lookup() {
        let mock_client = MockVsphereClient::new("https://test-vcenter");
        let mut request = request_for("test-vm");
        request.name = None;
        request.uuid = Some("not-a-uuid".to_string());

        let result = reconciler_with(&mock_client).run(&request).await;
        assert!(matches!(result, Err(ControllerError::InvalidConfig(_))));
    }
}
