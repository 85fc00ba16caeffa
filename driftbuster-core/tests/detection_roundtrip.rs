use std::collections::BTreeMap;
use std::path::PathBuf;

use driftbuster_core::DetectionMatch;

#[test]
fn detection_match_serializes_deterministically() {
    let mut metadata = BTreeMap::new();
    metadata.insert(
        "catalog_version".to_string(),
        serde_json::Value::String("1.0".to_string()),
    );
    metadata.insert(
        "bytes_sampled".to_string(),
        serde_json::Value::Number(31.into()),
    );

    let original = DetectionMatch {
        path: PathBuf::from("a/appsettings.json"),
        format_id: Some("json".to_string()),
        variant: Some("structured-settings-json".to_string()),
        confidence: 0.9,
        reasons: vec!["structural detection".to_string()],
        metadata,
    };

    let first = serde_json::to_string(&original).unwrap();
    let roundtripped: DetectionMatch = serde_json::from_str(&first).unwrap();
    let second = serde_json::to_string(&roundtripped).unwrap();

    assert_eq!(first, second);
    assert_eq!(original, roundtripped);
}
