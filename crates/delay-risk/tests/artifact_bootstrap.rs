use delay_risk::artifacts::{self, ArtifactError, ArtifactKind, ArtifactSet};
use delay_risk::config::ArtifactConfig;
use delay_risk::risk::ProjectInputs;
use std::path::PathBuf;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn config(dataset: &str, model: &str) -> ArtifactConfig {
    ArtifactConfig {
        dataset_path: fixture(dataset),
        model_path: fixture(model),
    }
}

#[test]
fn loads_both_artifacts_when_present() {
    let set = ArtifactSet::load(&config("projects.csv", "linear_model.json"));

    assert!(set.is_ready());
    assert!(set.failures().is_empty());
    assert_eq!(set.dataset().expect("dataset").len(), 6);

    let options = set.estimator().expect("estimator").form_options();
    assert_eq!(options.materials, ["Concrete", "Steel"]);
    assert_eq!(options.duration_months.min, 6);
    assert_eq!(options.total_cost.max, 4_150_000.0);
}

#[test]
fn missing_model_keeps_dataset_and_blocks_inference() {
    let set = ArtifactSet::load(&config("projects.csv", "missing_model.json"));

    assert!(!set.is_ready());
    assert!(set.dataset().is_ok());

    let failure = set.estimator().expect_err("no estimator without a model");
    assert_eq!(failure.kind, ArtifactKind::Model);
    assert!(failure.message.contains("missing_model.json"));
}

#[test]
fn strict_loader_reports_missing_model_without_predicting() {
    let error = artifacts::load_estimator(&config("projects.csv", "missing_model.json"))
        .expect_err("model missing");

    match error {
        ArtifactError::Missing { kind, path } => {
            assert_eq!(kind, ArtifactKind::Model);
            assert!(path.ends_with("missing_model.json"));
        }
        other => panic!("expected missing artifact, got {other:?}"),
    }
}

#[test]
fn strict_loader_estimates_with_fixture_artifacts() {
    let estimator = artifacts::load_estimator(&config("projects.csv", "linear_model.json"))
        .expect("artifacts load");

    let estimate = estimator
        .estimate(ProjectInputs {
            construction_type: "Commercial".to_string(),
            duration_months: 24.0,
            total_cost: 2_000_000.0,
            material: "Steel".to_string(),
            climate: "Humid".to_string(),
        })
        .expect("estimate");

    assert_eq!(estimate.features.values()[1], 0.0);
    assert_eq!(estimate.features.values()[4], 1.0);
    assert_eq!(estimate.features.values()[5], 1.0);
}
