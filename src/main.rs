//! tabchart - load, transform, and chart tabular data

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use tabchart::config::Config;
use tabchart::model::CellValue;
use tabchart::render::{self, ChartKind, ChartSpec};
use tabchart::transform::Transform;
use tabchart::{export, report};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliChartKind {
    Scatter,
    Line,
    Bar,
    Heatmap,
}

impl From<CliChartKind> for ChartKind {
    fn from(k: CliChartKind) -> Self {
        match k {
            CliChartKind::Scatter => ChartKind::Scatter,
            CliChartKind::Line => ChartKind::Line,
            CliChartKind::Bar => ChartKind::Bar,
            CliChartKind::Heatmap => ChartKind::Heatmap,
        }
    }
}

/// Load, transform, and chart small tabular datasets
#[derive(Parser, Debug)]
#[command(name = "tabchart")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input file (csv, tsv, json, xlsx)
    input: PathBuf,

    /// Columns to keep, in order (comma-separated)
    #[arg(long, value_delimiter = ',')]
    select: Vec<String>,

    /// Row filter, e.g. "rating >= 4.2" (repeatable)
    #[arg(long = "filter")]
    filters: Vec<String>,

    /// Derived column, e.g. "size_mb = size_kb / 1024" (repeatable)
    #[arg(long = "derive")]
    derives: Vec<String>,

    /// Columns to group by (comma-separated)
    #[arg(long, value_delimiter = ',')]
    group_by: Vec<String>,

    /// Aggregate applied when grouping, e.g. "mean:rating" (repeatable)
    #[arg(long = "agg")]
    aggregates: Vec<String>,

    /// Column to sort by
    #[arg(long)]
    sort_by: Option<String>,

    /// Sort descending
    #[arg(long, requires = "sort_by")]
    desc: bool,

    /// Keep only the first N rows
    #[arg(long, value_name = "N")]
    head: Option<usize>,

    /// Drop rows with a null in COLUMN, or in any column if none given
    #[arg(long, num_args = 0..=1, value_name = "COLUMN", default_missing_value = "")]
    drop_nulls: Option<String>,

    /// Replace nulls in a column, e.g. "rating=0" (repeatable)
    #[arg(long = "fill-nulls", value_name = "COLUMN=VALUE")]
    fill_nulls: Vec<String>,

    /// Chart kind to render
    #[arg(long, value_enum)]
    chart: Option<CliChartKind>,

    /// Column for the x axis
    #[arg(short = 'x', value_name = "COLUMN")]
    x: Option<String>,

    /// Column for the y axis
    #[arg(short = 'y', value_name = "COLUMN")]
    y: Option<String>,

    /// Value column for heatmap cells
    #[arg(long, value_name = "COLUMN")]
    value: Option<String>,

    /// Chart title
    #[arg(long)]
    title: Option<String>,

    /// X axis label (defaults to the x column name)
    #[arg(long)]
    x_label: Option<String>,

    /// Y axis label (defaults to the y column name)
    #[arg(long)]
    y_label: Option<String>,

    /// Chart width in pixels
    #[arg(long, default_value_t = 800)]
    width: u32,

    /// Chart height in pixels
    #[arg(long, default_value_t = 500)]
    height: u32,

    /// Output path for the chart artifact
    #[arg(short = 'o', long, default_value = "chart.svg")]
    out: PathBuf,

    /// Write an HTML report embedding the chart instead of a bare SVG
    #[arg(long, requires = "chart")]
    html: bool,

    /// Print the first N rows of the (transformed) table
    #[arg(long, num_args = 0..=1, value_name = "N", default_missing_value = "10")]
    preview: Option<usize>,

    /// Print per-column summary statistics
    #[arg(long)]
    describe: bool,

    /// Write the transformed table to a file (.csv or .json)
    #[arg(long, value_name = "PATH")]
    export: Option<PathBuf>,

    /// For workbooks: which sheet to read
    #[arg(long)]
    sheet: Option<String>,
}

fn main() -> ExitCode {
    env_logger::init();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let transforms = build_transforms(&cli)?;
    let config = Config::new(&cli.input)
        .with_sheet(cli.sheet.clone())
        .with_transforms(transforms);

    let table = tabchart::run_pipeline(&config)?;

    let mut acted = false;

    if let Some(path) = &cli.export {
        export::export(&table, path)?;
        println!("wrote {}", path.display());
        acted = true;
    }

    if let Some(kind) = cli.chart {
        let x = cli.x.clone().context("--chart requires -x")?;
        let mut spec = ChartSpec::new(kind.into(), x)
            .with_labels(cli.x_label.clone(), cli.y_label.clone())
            .with_size(cli.width, cli.height);
        if let Some(ref y) = cli.y {
            spec = spec.with_y(y);
        }
        if let Some(ref value) = cli.value {
            spec = spec.with_value(value);
        }
        if let Some(ref title) = cli.title {
            spec = spec.with_title(title);
        }

        if cli.html {
            render::render_html_report(&table, &spec, &cli.input, &cli.out)?;
        } else {
            render::render_to_file(&table, &spec, &cli.out)?;
        }
        println!("wrote {}", cli.out.display());
        acted = true;
    }

    if cli.describe {
        report::print_describe(&table);
        acted = true;
    }

    if let Some(rows) = cli.preview {
        report::print_preview(&table, &cli.input, rows)?;
        acted = true;
    }

    // With nothing else requested, show a preview
    if !acted {
        report::print_preview(&table, &cli.input, 10)?;
    }

    Ok(())
}

/// Assemble the transform pipeline in a fixed order: null handling, then
/// filters, derives, grouping, selection, sort, head.
fn build_transforms(cli: &Cli) -> Result<Vec<Transform>> {
    let mut transforms = Vec::new();

    for spec in &cli.fill_nulls {
        let (column, raw) = spec
            .split_once('=')
            .with_context(|| format!("--fill-nulls must be COLUMN=VALUE, got '{}'", spec))?;
        transforms.push(Transform::FillNulls {
            column: column.trim().to_string(),
            value: CellValue::parse(raw),
        });
    }

    if let Some(column) = &cli.drop_nulls {
        transforms.push(Transform::DropNulls {
            column: (!column.is_empty()).then(|| column.clone()),
        });
    }

    for expr in &cli.filters {
        let pred = expr.parse().map_err(anyhow::Error::msg)?;
        transforms.push(Transform::Filter(pred));
    }

    for expr in &cli.derives {
        let spec = expr.parse().map_err(anyhow::Error::msg)?;
        transforms.push(Transform::Derive(spec));
    }

    if !cli.group_by.is_empty() {
        let aggregates = cli
            .aggregates
            .iter()
            .map(|a| a.parse().map_err(anyhow::Error::msg))
            .collect::<Result<Vec<_>>>()?;
        if aggregates.is_empty() {
            anyhow::bail!("--group-by requires at least one --agg");
        }
        transforms.push(Transform::GroupBy {
            keys: cli.group_by.clone(),
            aggregates,
        });
    } else if !cli.aggregates.is_empty() {
        anyhow::bail!("--agg requires --group-by");
    }

    if !cli.select.is_empty() {
        transforms.push(Transform::Select {
            columns: cli.select.clone(),
        });
    }

    if let Some(column) = &cli.sort_by {
        transforms.push(Transform::Sort {
            column: column.clone(),
            descending: cli.desc,
        });
    }

    if let Some(rows) = cli.head {
        transforms.push(Transform::Head { rows });
    }

    Ok(transforms)
}
