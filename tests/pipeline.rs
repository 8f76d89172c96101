//! End-to-end pipeline tests through the library API

use std::io::Write;
use std::path::Path;

use tabchart::config::Config;
use tabchart::model::CellValue;
use tabchart::render::{render_to_file, ChartKind, ChartSpec};
use tabchart::transform::{self, Transform};
use tabchart::{run_pipeline, TabError};

fn write_csv(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    let mut f = std::fs::File::create(&path).unwrap();
    f.write_all(content.as_bytes()).unwrap();
    path
}

#[test]
fn load_matches_file_shape() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_csv(dir.path(), "data.csv", "a,b,c\n1,2,3\n4,5,6\n7,8,9\n8,9,10\n");

    let table = run_pipeline(&Config::new(&input)).unwrap();
    assert_eq!(table.column_count(), 3);
    assert_eq!(table.row_count(), 4);
}

#[test]
fn scatter_from_three_row_csv_writes_an_svg() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_csv(dir.path(), "points.csv", "x,y\n1,2\n3,4\n5,6\n");
    let out = dir.path().join("points.svg");

    let table = run_pipeline(&Config::new(&input)).unwrap();
    let spec = ChartSpec::new(ChartKind::Scatter, "x").with_y("y");
    render_to_file(&table, &spec, &out).unwrap();

    let svg = std::fs::read_to_string(&out).unwrap();
    assert!(svg.starts_with("<svg"));
    assert!(svg.trim_end().ends_with("</svg>"));
    assert_eq!(svg.matches("<circle").count(), 3);
}

#[test]
fn filtered_rows_all_satisfy_the_predicate() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_csv(
        dir.path(),
        "apps.csv",
        "app,rating\nmaps,4.5\nmail,3.9\ncalc,2.1\nnotes,4.8\n",
    );

    let pred: transform::Predicate = "rating >= 4".parse().unwrap();
    let config = Config::new(&input).with_transform(Transform::Filter(pred.clone()));

    let table = run_pipeline(&config).unwrap();
    assert_eq!(table.row_count(), 2);
    for cell in table.column_values("rating").unwrap() {
        assert!(pred.matches(cell));
    }
}

#[test]
fn grouping_under_first_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_csv(
        dir.path(),
        "sales.csv",
        "region,amount\nwest,10\neast,20\nwest,30\nnorth,5\n",
    );

    let group = Transform::GroupBy {
        keys: vec!["region".into()],
        aggregates: vec!["first:amount".parse().unwrap()],
    };

    let once = run_pipeline(&Config::new(&input).with_transform(group.clone())).unwrap();
    let twice = transform::apply(once.clone(), &[group]).unwrap();

    assert_eq!(once.column_names(), twice.column_names());
    assert_eq!(once.row_count(), twice.row_count());
    for r in 0..once.row_count() {
        assert_eq!(once.row(r), twice.row(r));
    }
}

#[test]
fn column_lengths_stay_equal_through_a_long_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_csv(
        dir.path(),
        "apps.csv",
        "app,category,size_kb,rating\nmaps,travel,2048,4.5\nmail,work,1024,\ncalc,work,512,3.0\nchat,social,4096,4.1\n",
    );

    let config = Config::new(&input)
        .with_transform(Transform::FillNulls {
            column: "rating".into(),
            value: CellValue::Float(0.0),
        })
        .with_transform(Transform::Derive("size_mb = size_kb / 1024".parse().unwrap()))
        .with_transform(Transform::Filter("size_mb >= 1".parse().unwrap()))
        .with_transform(Transform::GroupBy {
            keys: vec!["category".into()],
            aggregates: vec!["mean:rating".parse().unwrap(), "count:app".parse().unwrap()],
        })
        .with_transform(Transform::Sort {
            column: "mean_rating".into(),
            descending: true,
        });

    let table = run_pipeline(&config).unwrap();
    assert!(table.row_count() > 0);
    for i in 0..table.column_count() {
        assert_eq!(table.values(i).len(), table.row_count());
    }
    // Highest mean rating first
    assert_eq!(
        table.cell(0, 0),
        Some(&CellValue::Str("travel".into()))
    );
}

#[test]
fn rendering_an_empty_filtered_table_fails_with_render() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_csv(dir.path(), "points.csv", "x,y\n1,2\n3,4\n");

    let config =
        Config::new(&input).with_transform(Transform::Filter("x > 100".parse().unwrap()));
    let table = run_pipeline(&config).unwrap();
    assert!(table.is_empty());

    let out = dir.path().join("never.svg");
    let err = render_to_file(&table, &ChartSpec::new(ChartKind::Scatter, "x").with_y("y"), &out)
        .unwrap_err();
    assert!(matches!(err, TabError::Render { .. }));
    assert!(!out.exists());
}

#[test]
fn missing_input_fails_with_not_found() {
    let err = run_pipeline(&Config::new("does/not/exist.csv")).unwrap_err();
    assert!(matches!(err, TabError::NotFound { .. }));
}

#[test]
fn malformed_json_fails_with_parse() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_csv(dir.path(), "bad.json", "{not json");

    let err = run_pipeline(&Config::new(&input)).unwrap_err();
    assert!(matches!(err, TabError::Parse { .. }));
}

#[test]
fn unknown_transform_column_fails_with_key_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_csv(dir.path(), "data.csv", "a,b\n1,2\n");

    let config = Config::new(&input).with_transform(Transform::Select {
        columns: vec!["zzz".into()],
    });
    let err = run_pipeline(&config).unwrap_err();
    assert!(matches!(err, TabError::KeyNotFound { column } if column == "zzz"));
}
