use super::*;
use tempfile::TempDir;

const SAMPLE_JSON: &str = r#"{
    "cluster": {
        "link": "https://example.com/cluster.html",
        "subsections": {
            "KMeans": {
                "link": "https://example.com/KMeans.html",
                "class_signature": "class sklearn.cluster.KMeans(n_clusters=8)",
                "example_code": "km.fit(X)"
            },
            "DBSCAN": {
                "link": "https://example.com/DBSCAN.html"
            }
        }
    },
    "linear_model": {
        "link": "https://example.com/linear_model.html",
        "subsections": {}
    }
}"#;

#[test]
fn parses_sections_in_document_order() {
    let reference: ApiReference =
        serde_json::from_str(SAMPLE_JSON).expect("should parse sample JSON");

    let sections: Vec<&String> = reference.sections.keys().collect();
    assert_eq!(sections, ["cluster", "linear_model"]);

    let cluster = &reference.sections["cluster"];
    let subsections: Vec<&String> = cluster.subsections.keys().collect();
    assert_eq!(subsections, ["KMeans", "DBSCAN"]);
    assert_eq!(reference.entry_count(), 2);
}

#[test]
fn missing_detail_fields_default_to_empty() {
    let reference: ApiReference =
        serde_json::from_str(SAMPLE_JSON).expect("should parse sample JSON");

    let dbscan = &reference.sections["cluster"].subsections["DBSCAN"];
    assert_eq!(dbscan.class_signature, "");
    assert_eq!(dbscan.example_code, "");
    assert_eq!(dbscan.link, "https://example.com/DBSCAN.html");
}

#[test]
fn load_missing_file_is_data_unavailable() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let path = temp_dir.path().join("does-not-exist.json");

    let err = ApiReference::load(&path).expect_err("missing file should not load");
    assert!(matches!(err, ApidexError::DataUnavailable(_)));
}

#[test]
fn load_malformed_json_is_data_unavailable() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let path = temp_dir.path().join("broken.json");
    fs::write(&path, "{ not valid json").expect("should write fixture");

    let err = ApiReference::load(&path).expect_err("malformed file should not load");
    assert!(matches!(err, ApidexError::DataUnavailable(_)));
}

#[test]
fn save_and_load_round_trip_preserves_order() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let path = temp_dir.path().join("reference.json");

    let reference: ApiReference =
        serde_json::from_str(SAMPLE_JSON).expect("should parse sample JSON");
    reference.save(&path).expect("should save reference");

    let reloaded = ApiReference::load(&path).expect("should reload reference");
    assert_eq!(reloaded, reference);

    let sections: Vec<&String> = reloaded.sections.keys().collect();
    assert_eq!(sections, ["cluster", "linear_model"]);
}
