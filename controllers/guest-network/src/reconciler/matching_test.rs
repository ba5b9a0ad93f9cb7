//! Unit tests for adapter matching

#[cfg(test)]
mod tests {
    use crate::error::ControllerError;
    use crate::reconciler::directory::AdapterDirectory;
    use crate::reconciler::matching::match_adapters;
    use crate::test_utils::*;

    fn sample_directory() -> AdapterDirectory {
        AdapterDirectory::new(&[
            create_test_adapter(4000, "Network adapter 1", "00:50:56:11:22:33", "a", "VirtualVmxnet3"),
            create_test_adapter(4001, "Network adapter 2", "00:50:56:44:55:66", "b", "VirtualE1000e"),
            create_test_adapter(4002, "Network adapter 3", "00:50:56:77:88:99", "c", "VirtualE1000e"),
        ])
    }

    #[test]
    fn test_mac_takes_precedence_over_label() {
        let directory = sample_directory();
        let mut entry = create_test_entry("present");
        // MAC points at adapter 1, label at adapter 2
        entry.mac = Some("00:50:56:11:22:33".to_string());
        entry.label = Some("Network adapter 2".to_string());
        let entry = validated(&entry);

        let matched = match_adapters(&entry, &directory).expect("should match");
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].key, 4000);
    }

    #[test]
    fn test_label_match() {
        let directory = sample_directory();
        let mut entry = create_test_entry("present");
        entry.label = Some("Network adapter 3".to_string());
        let entry = validated(&entry);

        let matched = match_adapters(&entry, &directory).expect("should match");
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].key, 4002);
    }

    #[test]
    fn test_device_type_matches_all_adapters_of_type() {
        let directory = sample_directory();
        let mut entry = create_test_entry("present");
        entry.device_type = Some("e1000e".to_string());
        let entry = validated(&entry);

        let matched = match_adapters(&entry, &directory).expect("should match");
        let keys: Vec<i32> = matched.iter().map(|adapter| adapter.key).collect();
        assert_eq!(keys, vec![4001, 4002]);
    }

    #[test]
    fn test_unmatched_mac_falls_through_to_label() {
        let directory = sample_directory();
        let mut entry = create_test_entry("present");
        entry.mac = Some("00:50:56:00:00:00".to_string());
        entry.label = Some("Network adapter 2".to_string());
        let entry = validated(&entry);

        let matched = match_adapters(&entry, &directory).expect("should match");
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].key, 4001);
    }

    #[test]
    fn test_no_match_key_is_an_error() {
        let directory = sample_directory();
        let entry = validated(&create_test_entry("present"));

        assert!(matches!(
            match_adapters(&entry, &directory),
            Err(ControllerError::MissingMatchKey)
        ));
    }

    #[test]
    fn test_unmatched_keys_are_an_error() {
        let directory = sample_directory();
        let mut entry = create_test_entry("absent");
        entry.mac = Some("00:50:56:00:00:00".to_string());
        let entry = validated(&entry);

        assert!(matches!(
            match_adapters(&entry, &directory),
            Err(ControllerError::AdapterNotFound(_))
        ));
    }
}
