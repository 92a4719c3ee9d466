//! End-to-end: build a checkpoint directory on disk, diagnose it, and push
//! the result through each sink/format combination.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use iodiag::io::writers;
use iodiag::{
    create_output, BoundaryMap, Diagnoser, FileFormat, FileOutput, IodiagError, MetricTable,
    Output, OutputKind, Values,
};

fn write_checkpoint(dir: &Path) {
    fs::write(
        dir.join("_raw_stats_0.json"),
        r#"{"hosts": 2, "processes": 8, "app": "unet3d"}"#,
    )
    .unwrap();
    fs::write(
        dir.join("_flat_view_0.csv"),
        "index,cpu_pct,bw_mean,d_label\n0,0.1,50,rank0\n1,0.5,75,rank1\n2,0.8,100,rank2\n",
    )
    .unwrap();
}

fn diagnose(dir: &Path, boundaries: &BoundaryMap) -> iodiag::DiagnosisResult {
    Diagnoser::new()
        .diagnose_checkpoint(dir, boundaries)
        .unwrap()
}

#[test]
fn diagnose_scores_each_flat_view() {
    let checkpoint = TempDir::new().unwrap();
    write_checkpoint(checkpoint.path());

    let result = diagnose(checkpoint.path(), &BoundaryMap::new());
    assert_eq!(result.flat_view_paths.len(), 1);
    assert_eq!(result.scored_flat_views.len(), 1);

    let table = &result.scored_flat_views[0];
    let names: Vec<&str> = table.column_names().collect();
    assert_eq!(names, vec!["bw_mean", "cpu_pct", "cpu_pct_score", "d_label"]);
    assert_eq!(table.n_rows(), 3);

    match &table.column("cpu_pct_score").unwrap().values {
        Values::Int(v) => assert_eq!(v, &vec![Some(1), Some(2), Some(4)]),
        other => panic!("unexpected score column type: {other:?}"),
    }
}

#[test]
fn diagnose_applies_boundaries() {
    let checkpoint = TempDir::new().unwrap();
    write_checkpoint(checkpoint.path());

    let boundaries = BoundaryMap::from([("bw_mean".to_string(), 100.0)]);
    let result = diagnose(checkpoint.path(), &boundaries);
    let table = &result.scored_flat_views[0];
    match &table.column("bw_mean_score").unwrap().values {
        Values::Int(v) => assert_eq!(v, &vec![Some(2), Some(1), Some(0)]),
        other => panic!("unexpected score column type: {other:?}"),
    }
}

#[test]
fn diagnose_handles_multiple_flat_views() {
    let checkpoint = TempDir::new().unwrap();
    write_checkpoint(checkpoint.path());
    fs::write(
        checkpoint.path().join("_flat_view_1.csv"),
        "index,mem_per\n0,0.2\n1,0.95\n",
    )
    .unwrap();

    let result = diagnose(checkpoint.path(), &BoundaryMap::new());
    assert_eq!(result.flat_view_paths.len(), 2);
    // discovery order is sorted, so view 0 comes first
    assert!(result.flat_view_paths[0]
        .to_string_lossy()
        .ends_with("_flat_view_0.csv"));
    let second = &result.scored_flat_views[1];
    match &second.column("mem_per_score").unwrap().values {
        Values::Int(v) => assert_eq!(v, &vec![Some(1), Some(5)]),
        other => panic!("unexpected score column type: {other:?}"),
    }
}

#[test]
fn file_output_writes_every_format() {
    let checkpoint = TempDir::new().unwrap();
    write_checkpoint(checkpoint.path());
    let result = diagnose(checkpoint.path(), &BoundaryMap::new());

    for format in [FileFormat::Json, FileFormat::Csv, FileFormat::Binary] {
        let out = TempDir::new().unwrap();
        let sink = create_output(OutputKind::File, Some(out.path().to_path_buf()), format);
        sink.handle_result(&result).unwrap();

        let expected = out
            .path()
            .join(format!("_flat_view_0_scored.{}", format.extension()));
        let metadata = fs::metadata(&expected).unwrap();
        assert!(metadata.len() > 0, "{} is empty", expected.display());
    }
}

#[test]
fn scored_views_round_trip_through_csv_and_json() {
    let checkpoint = TempDir::new().unwrap();
    write_checkpoint(checkpoint.path());
    let result = diagnose(checkpoint.path(), &BoundaryMap::new());
    let table = &result.scored_flat_views[0];
    let source = &result.flat_view_paths[0];

    let out = TempDir::new().unwrap();

    let csv_sink = FileOutput::new(Some(out.path().to_path_buf()), FileFormat::Csv);
    csv_sink.handle_result(&result).unwrap();
    let loaded = writers::csv::read_table(&csv_sink.output_path(source)).unwrap();
    assert_tables_equivalent(&loaded, table);

    let json_sink = FileOutput::new(Some(out.path().to_path_buf()), FileFormat::Json);
    json_sink.handle_result(&result).unwrap();
    let loaded = writers::json::read_table(&json_sink.output_path(source)).unwrap();
    assert_tables_equivalent(&loaded, table);
}

/// Value-level equivalence: same columns, same index, cell-by-cell equal
/// numeric views and null positions (physical column types may differ across
/// a text round trip).
fn assert_tables_equivalent(actual: &MetricTable, expected: &MetricTable) {
    let actual_names: Vec<&str> = actual.column_names().collect();
    let expected_names: Vec<&str> = expected.column_names().collect();
    assert_eq!(actual_names, expected_names);
    assert_eq!(actual.index(), expected.index());
    for column in expected.columns() {
        let other = actual.column(&column.name).unwrap();
        for row in 0..expected.n_rows() {
            assert_eq!(
                other.values.is_null(row),
                column.values.is_null(row),
                "null mismatch at {}[{row}]",
                column.name
            );
            if column.values.is_numeric() {
                assert_eq!(
                    other.values.as_f64(row),
                    column.values.as_f64(row),
                    "value mismatch at {}[{row}]",
                    column.name
                );
            }
        }
        if let (Values::Text(actual_cells), Values::Text(expected_cells)) =
            (&other.values, &column.values)
        {
            assert_eq!(actual_cells, expected_cells, "text mismatch in {}", column.name);
        }
    }
}

#[test]
fn file_output_defaults_to_source_directory() {
    let checkpoint = TempDir::new().unwrap();
    write_checkpoint(checkpoint.path());
    let result = diagnose(checkpoint.path(), &BoundaryMap::new());

    let sink = create_output(OutputKind::File, None, FileFormat::Csv);
    sink.handle_result(&result).unwrap();

    let expected = checkpoint.path().join("_flat_view_0_scored.csv");
    assert!(expected.exists());
}

#[test]
fn console_output_writes_nothing() {
    let checkpoint = TempDir::new().unwrap();
    write_checkpoint(checkpoint.path());
    let result = diagnose(checkpoint.path(), &BoundaryMap::new());

    let before: Vec<PathBuf> = list_dir(checkpoint.path());
    let sink = create_output(OutputKind::Console, None, FileFormat::Json);
    sink.handle_result(&result).unwrap();
    assert_eq!(list_dir(checkpoint.path()), before);
}

fn list_dir(dir: &Path) -> Vec<PathBuf> {
    let mut entries: Vec<PathBuf> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    entries.sort();
    entries
}

#[test]
fn missing_checkpoint_directory_fails() {
    let err = Diagnoser::new()
        .diagnose_checkpoint(Path::new("/nonexistent/ckpt"), &BoundaryMap::new())
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<IodiagError>(),
        Some(IodiagError::CheckpointMissing(_))
    ));
}

#[test]
fn checkpoint_without_raw_stats_fails() {
    let checkpoint = TempDir::new().unwrap();
    fs::write(
        checkpoint.path().join("_flat_view_0.csv"),
        "index,cpu_pct\n0,0.5\n",
    )
    .unwrap();
    let err = Diagnoser::new()
        .diagnose_checkpoint(checkpoint.path(), &BoundaryMap::new())
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<IodiagError>(),
        Some(IodiagError::MissingRawStats(_))
    ));
}

#[test]
fn checkpoint_without_flat_views_fails() {
    let checkpoint = TempDir::new().unwrap();
    fs::write(checkpoint.path().join("_raw_stats_0.json"), "{}").unwrap();
    let err = Diagnoser::new()
        .diagnose_checkpoint(checkpoint.path(), &BoundaryMap::new())
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<IodiagError>(),
        Some(IodiagError::MissingFlatViews(_))
    ));
}

#[test]
fn unknown_boundary_metric_fails() {
    let checkpoint = TempDir::new().unwrap();
    write_checkpoint(checkpoint.path());
    let boundaries = BoundaryMap::from([("gpu_util_mean".to_string(), 1.0)]);
    let err = Diagnoser::new()
        .diagnose_checkpoint(checkpoint.path(), &boundaries)
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<IodiagError>(),
        Some(IodiagError::UnknownBoundaryMetric(_))
    ));
}

#[test]
fn malformed_raw_stats_fails() {
    let checkpoint = TempDir::new().unwrap();
    write_checkpoint(checkpoint.path());
    fs::write(checkpoint.path().join("_raw_stats_0.json"), "not json").unwrap();
    let err = Diagnoser::new()
        .diagnose_checkpoint(checkpoint.path(), &BoundaryMap::new())
        .unwrap_err();
    assert!(err.to_string().contains("raw stats"));
}
