#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};
    use serde_json::json;

    use crate::error::PlanningError;
    use crate::kpi::*;

    #[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
    struct Totals {
        units: u32,
        by_use: Vec<f64>,
    }

    impl KpiSection for Totals {
        const KEY: &'static str = "totals";
    }

    #[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
    struct Grade {
        letter: String,
    }

    impl KpiSection for Grade {
        const KEY: &'static str = "grade";
    }

    #[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
    struct TotalsV2 {
        units: u32,
    }

    impl KpiSection for TotalsV2 {
        const KEY: &'static str = "totals";
        const VERSION: u32 = 2;
    }

    fn totals(units: u32) -> Totals {
        Totals {
            units,
            by_use: vec![1.5, 2.5],
        }
    }

    #[test]
    fn test_merge_and_read_back() {
        let mut doc = KpiDocument::new();
        assert!(doc.is_empty());
        assert_eq!(doc.merge(&totals(10)).unwrap(), 1);
        assert_eq!(doc.section::<Totals>(), Some(totals(10)));
        assert_eq!(doc.revision("totals"), 1);
        assert_eq!(doc.revision("missing"), 0);
    }

    #[test]
    fn test_merge_replaces_only_its_key() {
        let mut doc = KpiDocument::new();
        doc.merge(&totals(10)).unwrap();
        doc.merge(&Grade {
            letter: "B".into(),
        })
        .unwrap();
        let grade_before = doc.entry("grade").cloned();

        assert_eq!(doc.merge(&totals(20)).unwrap(), 2);
        assert_eq!(doc.entry("grade").cloned(), grade_before);
        assert_eq!(doc.section::<Totals>().unwrap().units, 20);
        assert_eq!(doc.len(), 2);
        assert_eq!(doc.keys().collect::<Vec<_>>(), vec!["grade", "totals"]);
    }

    #[test]
    fn test_merge_expecting_rejects_stale_revision() {
        let mut doc = KpiDocument::new();
        assert_eq!(doc.merge_expecting(&totals(1), 0).unwrap(), 1);
        assert_eq!(doc.merge_expecting(&totals(2), 1).unwrap(), 2);

        let err = doc.merge_expecting(&totals(3), 1).unwrap_err();
        assert_eq!(
            err,
            PlanningError::StaleRevision {
                key: "totals".into(),
                expected: 1,
                found: 2,
            }
        );
        assert_eq!(doc.section::<Totals>().unwrap().units, 2);
    }

    #[test]
    fn test_section_ignores_other_version() {
        let mut doc = KpiDocument::new();
        doc.merge(&totals(5)).unwrap();
        assert!(doc.section::<TotalsV2>().is_none());
        assert!(doc.section::<Grade>().is_none());
    }

    #[test]
    fn test_get_path_walks_objects_and_arrays() {
        let mut doc = KpiDocument::new();
        doc.merge(&totals(7)).unwrap();
        assert_eq!(doc.get_path(&["totals", "units"]), Some(&json!(7)));
        assert_eq!(doc.get_path(&["totals", "by_use", "1"]), Some(&json!(2.5)));
        assert!(doc.get_path(&["totals", "by_use", "9"]).is_none());
        assert!(doc.get_path(&["totals", "units", "deeper"]).is_none());
        assert!(doc.get_path(&[]).is_none());
    }

    #[test]
    fn test_to_json_is_plain_nested_document() {
        let mut doc = KpiDocument::new();
        doc.merge(&Grade {
            letter: "A+".into(),
        })
        .unwrap();
        assert_eq!(doc.to_json(), json!({ "grade": { "letter": "A+" } }));
    }

    #[test]
    fn test_document_serde_keeps_revisions() {
        let mut doc = KpiDocument::new();
        doc.merge(&totals(1)).unwrap();
        doc.merge(&totals(2)).unwrap();
        let text = serde_json::to_string(&doc).unwrap();
        let back: KpiDocument = serde_json::from_str(&text).unwrap();
        assert_eq!(back, doc);
        assert_eq!(back.revision("totals"), 2);
    }

    // -------------------------------------------------------------------------
    // Snapshot
    // -------------------------------------------------------------------------

    fn sample_doc() -> KpiDocument {
        let mut doc = KpiDocument::new();
        doc.merge(&totals(3)).unwrap();
        doc.merge(&totals(4)).unwrap();
        doc.merge(&Grade {
            letter: "C+".into(),
        })
        .unwrap();
        doc
    }

    #[test]
    fn test_snapshot_restores_document() {
        let doc = sample_doc();
        let bytes = doc.to_snapshot_bytes().unwrap();
        assert_eq!(&bytes[..4], &SNAPSHOT_MAGIC);
        let restored = KpiDocument::from_snapshot_bytes(&bytes).unwrap();
        assert_eq!(restored, doc);
        assert_eq!(restored.revision("totals"), 2);
    }

    #[test]
    fn test_snapshot_detects_corruption() {
        let mut bytes = sample_doc().to_snapshot_bytes().unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0xFF;
        let err = KpiDocument::from_snapshot_bytes(&bytes).unwrap_err();
        assert_eq!(err.kind(), "snapshot");
        assert!(err.to_string().contains("checksum"));
    }

    #[test]
    fn test_snapshot_rejects_bad_header() {
        assert!(KpiDocument::from_snapshot_bytes(b"KPI").is_err());
        assert!(KpiDocument::from_snapshot_bytes(&[0u8; SNAPSHOT_HEADER_SIZE]).is_err());

        let mut bytes = sample_doc().to_snapshot_bytes().unwrap();
        bytes[4..8].copy_from_slice(&(SNAPSHOT_FORMAT_VERSION + 1).to_le_bytes());
        let err = KpiDocument::from_snapshot_bytes(&bytes).unwrap_err();
        assert!(err.to_string().contains("newer"));
    }

    #[test]
    fn test_snapshot_rejects_truncated_payload() {
        let bytes = sample_doc().to_snapshot_bytes().unwrap();
        let err = KpiDocument::from_snapshot_bytes(&bytes[..bytes.len() - 2]).unwrap_err();
        assert!(err.to_string().contains("length"));
    }

    #[test]
    fn test_empty_document_snapshot() {
        let bytes = KpiDocument::new().to_snapshot_bytes().unwrap();
        let restored = KpiDocument::from_snapshot_bytes(&bytes).unwrap();
        assert!(restored.is_empty());
    }
}
