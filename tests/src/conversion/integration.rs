use std::sync::atomic::Ordering;

use onnxport_common::config::{REQUIRED_FILES, REQUIRED_PACKAGES};
use onnxport_core::pipeline::RunOutcome;

use crate::util::{config_in, FakeToolchain, Probe};

/// Nominal run: every package resolves, the export succeeds and all three
/// required files end up in the output directory.
#[tokio::test]
async fn nominal_conversion_reports_three_sizes() {
    let root = tempfile::tempdir().unwrap();
    let cfg = config_in(root.path());
    let probe = Probe::default();
    let service = FakeToolchain::default().into_service(&probe);

    let outcome = service.run(&cfg).await;

    assert_eq!(outcome.exit_code(), 0);
    let report = match outcome {
        RunOutcome::Converted(report) => report,
        other => panic!("expected a converted outcome, got {other:?}"),
    };

    assert!(cfg.output_dir.is_dir());
    let names: Vec<&str> = report.files.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, REQUIRED_FILES);
    assert!(report.files.iter().all(|f| f.is_present()));
    assert_eq!(report.files[0].mebibytes(), Some(3.0));
    assert_eq!(probe.exports(), 1);
    assert_eq!(probe.fetches(), 1);

    let labels = report.labels.expect("config.json carries id2label");
    assert_eq!(labels.len(), 4);
    assert_eq!(labels.labels[3], (3, "Invalid".to_string()));
}

#[tokio::test]
async fn steps_run_in_order() {
    let root = tempfile::tempdir().unwrap();
    let probe = Probe::default();
    let service = FakeToolchain::default().into_service(&probe);

    service.run(&config_in(root.path())).await;

    assert_eq!(
        probe.events(),
        vec![
            "deps",
            "started",
            "start:export",
            "done:export",
            "start:save",
            "done:save",
            "start:preprocessor",
            "done:preprocessor",
            "start:verify",
            "file:model.onnx",
            "file:config.json",
            "file:preprocessor_config.json",
            "done:verify",
        ]
    );
}

/// Missing `torch`: nothing is exported, fetched or written.
#[tokio::test]
async fn missing_dependency_stops_before_any_work() {
    let root = tempfile::tempdir().unwrap();
    let cfg = config_in(root.path());
    let probe = Probe::default();
    let service = FakeToolchain {
        absent: vec!["torch"],
        ..FakeToolchain::default()
    }
    .into_service(&probe);

    let outcome = service.run(&cfg).await;

    assert_eq!(outcome.exit_code(), 1);
    match outcome {
        RunOutcome::MissingDependencies(missing) => assert_eq!(missing, vec!["torch"]),
        other => panic!("expected missing dependencies, got {other:?}"),
    }
    assert_eq!(probe.resolves.load(Ordering::SeqCst), REQUIRED_PACKAGES.len());
    assert_eq!(probe.exports(), 0);
    assert_eq!(probe.fetches(), 0);
    assert!(probe.events().is_empty());
    assert!(!cfg.output_dir.exists());
}

#[tokio::test]
async fn every_missing_package_is_listed_once() {
    let root = tempfile::tempdir().unwrap();
    let probe = Probe::default();
    let service = FakeToolchain {
        absent: REQUIRED_PACKAGES.to_vec(),
        ..FakeToolchain::default()
    }
    .into_service(&probe);

    match service.run(&config_in(root.path())).await {
        RunOutcome::MissingDependencies(missing) => assert_eq!(missing, REQUIRED_PACKAGES),
        other => panic!("expected missing dependencies, got {other:?}"),
    }
}

/// Network failure inside the exporter: attempted once, reported, not retried.
#[tokio::test]
async fn export_failure_is_caught_once() {
    let root = tempfile::tempdir().unwrap();
    let probe = Probe::default();
    let service = FakeToolchain {
        export_error: Some("Connection error: failed to reach huggingface.co".into()),
        ..FakeToolchain::default()
    }
    .into_service(&probe);

    let outcome = service.run(&config_in(root.path())).await;

    assert_eq!(outcome.exit_code(), 1);
    match outcome {
        RunOutcome::Failed(err) => {
            assert!(err.to_string().contains("failed to reach huggingface.co"))
        }
        other => panic!("expected a failure, got {other:?}"),
    }
    assert_eq!(probe.exports(), 1);
    assert_eq!(probe.fetches(), 0);
}

/// A failure after saving leaves the already written model in place.
#[tokio::test]
async fn preprocessor_failure_keeps_partial_output() {
    let root = tempfile::tempdir().unwrap();
    let cfg = config_in(root.path());
    let probe = Probe::default();
    let service = FakeToolchain {
        fetch_error: Some("404 Not Found".into()),
        ..FakeToolchain::default()
    }
    .into_service(&probe);

    let outcome = service.run(&cfg).await;

    assert!(!outcome.is_success());
    assert!(cfg.output_dir.join("model.onnx").is_file());
    assert!(!cfg.output_dir.join("preprocessor_config.json").exists());
    assert!(!probe.events().iter().any(|e| e == "start:verify"));
}

/// A required file the exporter did not produce is reported but not fatal.
#[tokio::test]
async fn missing_output_file_is_only_reported() {
    let root = tempfile::tempdir().unwrap();
    let probe = Probe::default();
    let service = FakeToolchain {
        exported: vec![("model.onnx".to_string(), b"onnx".to_vec())],
        ..FakeToolchain::default()
    }
    .into_service(&probe);

    let outcome = service.run(&config_in(root.path())).await;

    assert_eq!(outcome.exit_code(), 0);
    let report = match outcome {
        RunOutcome::Converted(report) => report,
        other => panic!("expected a converted outcome, got {other:?}"),
    };
    let missing: Vec<&str> = report.missing().map(|f| f.name.as_str()).collect();
    assert_eq!(missing, vec!["config.json"]);
    assert!(report.labels.is_none());
}

#[tokio::test]
async fn serve_dir_receives_verified_files() {
    let root = tempfile::tempdir().unwrap();
    let serve_dir = root.path().join("public").join("models");
    let mut cfg = config_in(root.path());
    cfg.serve_dir = Some(serve_dir.clone());
    let probe = Probe::default();
    let service = FakeToolchain::default().into_service(&probe);

    let report = match service.run(&cfg).await {
        RunOutcome::Converted(report) => report,
        other => panic!("expected a converted outcome, got {other:?}"),
    };

    assert_eq!(report.installed.len(), 3);
    for name in REQUIRED_FILES {
        assert!(serve_dir.join(name).is_file(), "{name} not installed");
    }
    assert_eq!(probe.events().last().map(String::as_str), Some("done:install"));
}
