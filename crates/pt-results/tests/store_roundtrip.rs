use pt_core::FieldKind;
use pt_results::*;

fn manifest(run_id: &str, case_name: &str) -> RunManifest {
    RunManifest {
        run_id: run_id.to_string(),
        case_name: case_name.to_string(),
        case_hash: compute_case_hash(case_name, "test"),
        timestamp: "2026-03-04T05:06:07Z".to_string(),
        solver_version: "test".to_string(),
        scheme: "projection".to_string(),
        dimension: 2,
        num_vertices: 3,
        fields: vec![
            FieldLayout {
                kind: FieldKind::Velocity,
                value_size: 2,
                num_dofs: 6,
            },
            FieldLayout {
                kind: FieldKind::Pressure,
                value_size: 1,
                num_dofs: 3,
            },
        ],
        settings: RunSettings {
            density: 1.1766,
            viscosity: 1.81e-5,
            turbulent_viscosity: None,
            dt: 1.0,
            max_iterations: 10,
            dump_period: 1,
            convergence_tolerance: 1e-6,
        },
    }
}

fn snapshot(kind: FieldKind, value: f64) -> FieldSnapshot {
    let value_size = kind.value_size(2);
    FieldSnapshot {
        kind,
        name: format!("{}_n", kind.symbol()),
        value_size,
        values: vec![value; 3 * value_size],
    }
}

#[test]
fn write_and_load_dumps() {
    let temp_dir = std::env::temp_dir().join("pt_results_roundtrip");
    let _ = std::fs::remove_dir_all(&temp_dir);
    let store = RunStore::new(temp_dir.clone()).unwrap();

    let mut writer = store.create_run(manifest("20260304-050607_channel", "channel")).unwrap();
    for iteration in 0..3 {
        writer
            .write_dump(
                iteration,
                iteration as f64,
                vec![
                    snapshot(FieldKind::Velocity, iteration as f64),
                    snapshot(FieldKind::Pressure, -(iteration as f64)),
                ],
            )
            .unwrap();
    }
    writer
        .write_summary(&RunSummary {
            outcome: RunOutcomeKind::MaxIterationsReached,
            iterations: 2,
            pseudo_time: 2.0,
            final_residual: Some(0.5),
            dumps_written: writer.dumps_written(),
        })
        .unwrap();

    let run_id = writer.run_id().to_string();
    assert_eq!(store.list_dumps(&run_id).unwrap(), vec![0, 1, 2]);

    let dump = store.load_dump(&run_id, 2).unwrap();
    assert_eq!(dump.iteration, 2);
    assert_eq!(dump.field(FieldKind::Pressure).unwrap().values, vec![-2.0; 3]);

    let summary = store.load_summary(&run_id).unwrap().unwrap();
    assert_eq!(summary.dumps_written, 3);
    assert_eq!(store.load_manifest(&run_id).unwrap().case_name, "channel");

    assert!(matches!(
        store.load_dump(&run_id, 7),
        Err(ResultsError::DumpNotFound { index: 7, .. })
    ));
}

#[test]
fn colliding_run_ids_get_a_suffix() {
    let temp_dir = std::env::temp_dir().join("pt_results_collision");
    let _ = std::fs::remove_dir_all(&temp_dir);
    let store = RunStore::new(temp_dir.clone()).unwrap();

    let first = store.create_run(manifest("20260304-050607_a", "a")).unwrap();
    let second = store.create_run(manifest("20260304-050607_a", "a")).unwrap();
    store.create_run(manifest("20260304-050608_b", "b")).unwrap();

    assert_eq!(first.run_id(), "20260304-050607_a");
    assert_eq!(second.run_id(), "20260304-050607_a-2");
    assert_eq!(store.load_manifest(second.run_id()).unwrap().run_id, second.run_id());

    assert_eq!(store.list_runs(Some("a")).unwrap().len(), 2);
    assert_eq!(store.list_runs(None).unwrap().len(), 3);

    store.delete_run(first.run_id()).unwrap();
    assert!(!store.has_run(first.run_id()));
    assert!(store.load_summary(second.run_id()).unwrap().is_none());
}
