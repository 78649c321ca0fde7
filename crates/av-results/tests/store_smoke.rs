use av_results::*;

fn report(run_id: &str, case_id: &str, timestamp: &str) -> RunReport {
    RunReport {
        run_id: run_id.to_string(),
        case_id: case_id.to_string(),
        case_name: "Lift curve".to_string(),
        timestamp: timestamp.to_string(),
        solver: "vsp".to_string(),
        dry_run: false,
        iterations: vec![IterationRecord {
            label: "base".to_string(),
            swept_value: None,
            model_file: "validation_cs_10.vsp3".to_string(),
            solver: Some(SolverRecord {
                exit_code: Some(0),
                success: true,
                elapsed_s: 1.5,
            }),
            polar: Some(PolarResult {
                alpha: vec![0.0, 2.0],
                cl: vec![0.0, 0.12],
                cdi: vec![0.0, 0.001],
                cm: vec![0.0, -0.02],
            }),
        }],
        metrics: vec![MetricRecord {
            analysis: "lift_curve".to_string(),
            name: "cl_error_percent".to_string(),
            iteration: Some("base".to_string()),
            value: 3.2,
            reference: None,
            reference_label: Some("NACA TR".to_string()),
            error_percent: Some(3.2),
        }],
        plots: vec!["graphics/cs_10_lift.svg".to_string()],
    }
}

#[test]
fn save_and_load_report() {
    let temp_dir = std::env::temp_dir().join("av_results_test");
    let _ = std::fs::remove_dir_all(&temp_dir);

    let store = RunStore::new(temp_dir.clone()).unwrap();
    let path = store.save_report(&report("run_1", "cs_10", "2026-02-25T12:00:00Z")).unwrap();
    assert!(path.ends_with("run_1/report.json"));
    assert!(store.has_run("run_1"));

    let loaded = store.load_report("run_1").unwrap();
    assert_eq!(loaded.case_id, "cs_10");
    assert_eq!(loaded.iterations[0].polar.as_ref().unwrap().cl, vec![0.0, 0.12]);
    assert_eq!(loaded.solver_seconds(), 1.5);
    assert!(loaded.metric("cl_error_percent", Some("base")).is_some());
    assert!(loaded.metric("cl_error_percent", None).is_none());
}

#[test]
fn non_finite_error_is_stored_as_null() {
    let temp_dir = std::env::temp_dir().join("av_results_test_nan");
    let _ = std::fs::remove_dir_all(&temp_dir);
    let store = RunStore::new(temp_dir).unwrap();

    let mut r = report("run_nan", "cs_1", "2026-02-25T12:00:00Z");
    r.metrics[0].error_percent = Some(f64::INFINITY);
    store.save_report(&r).unwrap();

    let loaded = store.load_report("run_nan").unwrap();
    assert_eq!(loaded.metrics[0].error_percent, None);
}

#[test]
fn list_runs_by_case() {
    let temp_dir = std::env::temp_dir().join("av_results_test_list");
    let _ = std::fs::remove_dir_all(&temp_dir);

    let store = RunStore::for_output_dir(&temp_dir).unwrap();
    assert!(store.root_dir().ends_with("runs"));

    store.save_report(&report("run2", "cs_10", "2026-02-25T13:00:00Z")).unwrap();
    store.save_report(&report("run1", "cs_10", "2026-02-25T12:00:00Z")).unwrap();
    store.save_report(&report("run3", "cs_4", "2026-02-25T14:00:00Z")).unwrap();

    let cs_10 = store.list_runs("cs_10").unwrap();
    assert_eq!(cs_10.len(), 2);
    assert_eq!(cs_10[0].run_id, "run1");
    assert_eq!(store.list_runs("cs_4").unwrap().len(), 1);

    store.delete_run("run3").unwrap();
    assert!(store.list_runs("cs_4").unwrap().is_empty());
    assert!(matches!(
        store.load_report("run3"),
        Err(ResultsError::RunNotFound { .. })
    ));
}

#[test]
fn store_root_must_be_a_directory() {
    let file = std::env::temp_dir().join("av_results_not_a_dir");
    std::fs::write(&file, "x").unwrap();
    assert!(matches!(
        RunStore::new(file),
        Err(ResultsError::InvalidPath { .. })
    ));
}
