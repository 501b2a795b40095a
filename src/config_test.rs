// src/config_test.rs

use super::*;
use std::fs;

fn staged_resources(root: &Path) -> Resources {
    let data = root.join("data");
    fs::create_dir_all(&data).unwrap();
    for name in [
        "reference.fasta",
        "config_b.1.1.7.csv",
        "config_b.1.351.csv",
        "config_p.1.csv",
        "config_p.2.csv",
    ] {
        fs::write(data.join(name), b"x").unwrap();
    }
    Resources::at(root.to_owned()).unwrap()
}

fn inputs<'a>(root: &Path, resources: &'a Resources) -> ConfigInputs<'a> {
    ConfigInputs {
        query_fasta: root.join("query.post_qc.fasta"),
        outdir: root.join("out"),
        outfile: root.join("out").join("lineage_report.csv"),
        tempdir: root.join("tmp"),
        qc_fail: root.join("query.failed_qc.fasta"),
        lineages_version: "2021-01-01".to_owned(),
        pangolearn_version: "2021-02-01".to_owned(),
        resources,
    }
}

fn classifier_artifacts(root: &Path) -> ArtifactPaths {
    ArtifactPaths::Classifier {
        trained_model: root.join("decisionTree_v1.joblib"),
        header_file: root.join("decisionTreeHeaders_v1.joblib"),
        lineages_csv: root.join("lineages.metadata.csv"),
    }
}

fn to_json(config: &RunConfig) -> serde_json::Value {
    serde_json::to_value(config).unwrap()
}

#[test]
fn test_classifier_config_has_all_required_keys() {
    let dir = tempfile::tempdir().unwrap();
    let resources = staged_resources(dir.path());

    let config = RunConfig::assemble(
        inputs(dir.path(), &resources),
        &classifier_artifacts(dir.path()),
        false,
        false,
    );
    let json = to_json(&config);

    for key in [
        "query_fasta",
        "outdir",
        "outfile",
        "tempdir",
        "trim_start",
        "trim_end",
        "qc_fail",
        "lineages_version",
        "pangoLEARN_version",
        "compressed_model_size",
        "trained_model",
        "header_file",
        "reference_fasta",
        "b117_variants",
        "b1351_variants",
        "p1_variants",
        "p2_variants",
    ] {
        assert!(json.get(key).is_some(), "missing key: {key}");
    }
    // Mode-dependent keys from the other branch stay out of the mapping.
    assert!(json.get("representative_aln").is_none());
    assert!(json.get("guide_tree").is_none());
    assert!(json.get("write_tree").is_none());
    assert!(json.get("lineages_csv").is_none());
}

#[test]
fn test_fixed_values_and_versions() {
    let dir = tempfile::tempdir().unwrap();
    let resources = staged_resources(dir.path());

    let config = RunConfig::assemble(
        inputs(dir.path(), &resources),
        &classifier_artifacts(dir.path()),
        false,
        false,
    );
    let json = to_json(&config);

    assert_eq!(json["trim_start"], 265);
    assert_eq!(json["trim_end"], 29674);
    assert_eq!(json["compressed_model_size"], 569253);
    assert_eq!(json["pangoLEARN_version"], "2021-02-01");
    assert_eq!(json["lineages_version"], "2021-01-01");
}

#[test]
fn test_legacy_config_carries_tree_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let resources = staged_resources(dir.path());
    let artifacts = ArtifactPaths::Legacy {
        representative_aln: dir.path().join("aln.safe.fasta"),
        guide_tree: dir.path().join("aln.safe.fasta.treefile"),
        lineages_csv: dir.path().join("lineages.csv"),
    };

    let config = RunConfig::assemble(inputs(dir.path(), &resources), &artifacts, true, true);
    let json = to_json(&config);

    assert!(json.get("representative_aln").is_some());
    assert!(json.get("guide_tree").is_some());
    assert!(json.get("trained_model").is_none());
    assert_eq!(json["write_tree"], "True");
    assert_eq!(
        json["lineages_csv"],
        dir.path().join("lineages.csv").display().to_string()
    );
}

#[test]
fn test_replace_model_paths() {
    let dir = tempfile::tempdir().unwrap();
    let resources = staged_resources(dir.path());

    let mut config = RunConfig::assemble(
        inputs(dir.path(), &resources),
        &classifier_artifacts(dir.path()),
        false,
        false,
    );
    config.replace_model_paths(
        dir.path().join("tmp").join("decisionTree_v1.joblib"),
        dir.path().join("tmp").join("decisionTreeHeaders_v1.joblib"),
    );

    let json = to_json(&config);
    assert_eq!(
        json["trained_model"],
        dir.path()
            .join("tmp")
            .join("decisionTree_v1.joblib")
            .display()
            .to_string()
    );
}

#[test]
fn test_write_json_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let resources = staged_resources(dir.path());
    let config = RunConfig::assemble(
        inputs(dir.path(), &resources),
        &classifier_artifacts(dir.path()),
        false,
        false,
    );

    let path = dir.path().join("config.json");
    config.write_json(&path).unwrap();

    let parsed: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(parsed["trim_start"], 265);
}
