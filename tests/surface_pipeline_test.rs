//! End-to-end tests: CSV file on disk to rendered surface.
//!
//! Run: cargo test --test surface_pipeline_test

#![allow(clippy::unwrap_used, clippy::float_cmp)]

use std::io::Write;
use std::path::Path;

use approx::assert_relative_eq;
use proptest::prelude::*;

use bench_surface::prelude::*;
use bench_surface::viewer::FileViewer;

fn write_csv(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    path
}

fn to_csv(rows: &[Vec<f64>]) -> String {
    to_csv_with_width(rows.first().map_or(0, Vec::len), rows)
}

fn to_csv_with_width(cols: usize, rows: &[Vec<f64>]) -> String {
    let header: Vec<String> = (0..cols).map(|c| format!("s{c}")).collect();
    let mut out = header.join(",");
    out.push('\n');
    for row in rows {
        let cells: Vec<String> = row.iter().map(f64::to_string).collect();
        out.push_str(&cells.join(","));
        out.push('\n');
    }
    out
}

// ============================================================================
// Loading
// ============================================================================

#[test]
fn two_by_three_example_reaches_builder_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(dir.path(), "bench-results.csv", "a,b,c\n1,2,3\n4,5,6\n");

    let surface = BenchChart::from_csv(&path).unwrap().surface().unwrap();
    assert_eq!(surface.z_values(), vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]);
    assert_eq!((surface.rows(), surface.cols()), (2, 3));
}

#[test]
fn real_benchmark_timings_parse() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(
        dir.path(),
        "bench-results.csv",
        "100, 200, 400\n 0.0012, 0.0021,0.0043 \n2.5e-3,0.0049,9.1E-3\n\n",
    );

    let grid = Grid::from_path(&path).unwrap();
    assert_eq!((grid.rows(), grid.cols()), (2, 3));
    assert_relative_eq!(grid.get(0, 0).unwrap(), 0.0012);
    assert_relative_eq!(grid.get(1, 0).unwrap(), 0.0025);
    assert_relative_eq!(grid.get(1, 2).unwrap(), 0.0091);

    let (min, max) = grid.extent();
    assert_relative_eq!(min, 0.0012);
    assert_relative_eq!(max, 0.0091);
}

#[test]
fn missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let result = BenchChart::from_csv(dir.path().join("bench-results.csv"));
    assert!(matches!(result, Err(Error::Io(_))));
}

#[test]
fn non_rectangular_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let short = write_csv(dir.path(), "short.csv", "a,b,c\n1,2,3\n4,5\n");
    assert!(matches!(
        Grid::from_path(&short),
        Err(Error::NonRectangular { line: 3, expected: 3, found: 2 })
    ));

    let long = write_csv(dir.path(), "long.csv", "a,b\n1,2,3\n");
    assert!(matches!(
        Grid::from_path(&long),
        Err(Error::NonRectangular { line: 2, expected: 2, found: 3 })
    ));
}

#[test]
fn non_numeric_cell_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(dir.path(), "bad.csv", "a,b\n1,2\n3,fast\n");
    match Grid::from_path(&path) {
        Err(Error::NonNumeric { line, column, value }) => {
            assert_eq!((line, column), (3, 2));
            assert_eq!(value, "fast");
        }
        other => panic!("expected NonNumeric, got {other:?}"),
    }
}

#[test]
fn invalid_utf8_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("latin1.csv");
    std::fs::write(&path, b"a,b\n1,\xff\n").unwrap();

    let result = BenchChart::from_csv(&path);
    assert!(matches!(result, Err(Error::Csv { line: 2, .. })), "{result:?}");
}

#[test]
fn header_only_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(dir.path(), "empty.csv", "a,b,c\n");
    assert!(matches!(Grid::from_path(&path), Err(Error::EmptyData)));
}

// ============================================================================
// Rendering
// ============================================================================

#[test]
fn rendering_twice_is_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(dir.path(), "bench-results.csv", "a,b,c,d\n1,3,2,5\n4,1,6,2\n0.5,2,3,7\n");

    let first = BenchChart::from_csv(&path).unwrap().surface().unwrap();
    let second = BenchChart::from_csv(&path).unwrap().surface().unwrap();

    assert_eq!(first.to_svg().render(), second.to_svg().render());
    assert_eq!(first.to_framebuffer().unwrap().pixels(), second.to_framebuffer().unwrap().pixels());
    assert_eq!(first.to_png().unwrap(), second.to_png().unwrap());
}

#[test]
fn default_chart_layout() {
    let grid = Grid::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
    let surface = BenchChart::new(grid, ChartConfig::default()).surface().unwrap();
    let svg = surface.to_svg().render();

    assert!(svg.contains("Sprite Tweening Frame Update Performance"));
    assert!(svg.contains(">Sprites<"));
    assert!(svg.contains(">Tweens<"));
    assert!(svg.contains(">Time (s)<"));
    assert!(svg.contains("width=\"1000\""));
    assert!(svg.contains("height=\"1000\""));

    let fb = surface.to_framebuffer().unwrap();
    assert_eq!((fb.width(), fb.height()), (1000, 1000));
    // Surface, panes and colorbar leave plenty of non-white pixels.
    assert!(fb.count_not(Rgba::WHITE) > 10_000);
}

#[test]
fn file_viewer_writes_loaded_chart() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write_csv(dir.path(), "bench-results.csv", "a,b\n1,2\n3,4\n");
    let out = dir.path().join("chart.svg");

    let displayed = BenchChart::from_csv(&csv).unwrap().show(&FileViewer::new(&out)).unwrap();

    assert_eq!(std::fs::read_to_string(&out).unwrap(), displayed.surface().to_svg().render());
}

// ============================================================================
// Properties
// ============================================================================

fn grid_strategy() -> impl Strategy<Value = Vec<Vec<f64>>> {
    (1usize..7, 1usize..7).prop_flat_map(|(rows, cols)| {
        prop::collection::vec(prop::collection::vec(-1.0e6f64..1.0e6, cols), rows)
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// R data rows and C columns load as exactly R x C equal values.
    #[test]
    fn prop_csv_round_trips_through_grid(rows in grid_strategy()) {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(dir.path(), "grid.csv", &to_csv(&rows));

        let grid = Grid::from_path(&path).unwrap();
        prop_assert_eq!(grid.rows(), rows.len());
        prop_assert_eq!(grid.cols(), rows[0].len());
        prop_assert_eq!(grid.to_rows(), rows);
    }

    /// Canvas size never depends on the grid.
    #[test]
    fn prop_canvas_is_always_1000_square(rows in grid_strategy()) {
        let surface = SurfacePlot::new().z_rows(&rows).build().unwrap();
        prop_assert_eq!(surface.canvas_size(), (1000, 1000));

        let expected_faces = (rows.len() - 1) * (rows[0].len() - 1);
        prop_assert_eq!(surface.scene().faces().len(), expected_faces);
        if expected_faces == 0 {
            prop_assert_eq!(surface.scene().markers().len(), rows.len() * rows[0].len());
        }
    }

    /// Dropping a cell from any row is rejected.
    #[test]
    fn prop_ragged_rows_rejected(rows in grid_strategy(), victim in any::<prop::sample::Index>()) {
        prop_assume!(rows[0].len() > 1);
        let mut ragged = rows.clone();
        let r = victim.index(ragged.len());
        ragged[r].pop();

        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(dir.path(), "ragged.csv", &to_csv_with_width(rows[0].len(), &ragged));

        let is_non_rectangular = matches!(
            Grid::from_path(&path),
            Err(Error::NonRectangular { line, .. }) if line == r as u64 + 2
        );
        prop_assert!(is_non_rectangular);
    }
}
