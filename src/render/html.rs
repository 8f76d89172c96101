//! HTML report output: the chart embedded in a small summary page

use std::path::Path;

use tera::{Context, Tera};

use crate::error::{Result, TabError};
use crate::model::Table;

use super::{render_svg, ChartSpec};

const REPORT_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <title>{{ title }}</title>
  <style>
    body { font-family: -apple-system, "Segoe UI", sans-serif; margin: 2rem auto; max-width: 64rem; color: #222; }
    h1 { font-size: 1.4rem; }
    .meta { color: #666; font-size: 0.9rem; margin-bottom: 1.5rem; }
    .chart { border: 1px solid #ddd; border-radius: 4px; padding: 0.5rem; }
    table.schema { border-collapse: collapse; margin-top: 1.5rem; font-size: 0.9rem; }
    table.schema th, table.schema td { border: 1px solid #ddd; padding: 0.3rem 0.8rem; text-align: left; }
    table.schema th { background: #f5f5f5; }
  </style>
</head>
<body>
  <h1>{{ title }}</h1>
  <p class="meta">{{ source }} &mdash; {{ rows }} rows &times; {{ cols }} columns &mdash; generated {{ generated }}</p>
  <div class="chart">{{ svg }}</div>
  <table class="schema">
    <tr><th>column</th><th>type</th></tr>
    {% for col in columns %}<tr><td>{{ col.name }}</td><td>{{ col.ctype }}</td></tr>
    {% endfor %}
  </table>
</body>
</html>
"#;

/// Render the chart and write it into an HTML report at `out`
pub fn render_html_report(
    table: &Table,
    spec: &ChartSpec,
    source: &Path,
    out: &Path,
) -> Result<()> {
    let svg = render_svg(table, spec)?;

    let mut context = Context::new();
    context.insert(
        "title",
        spec.title.as_deref().unwrap_or("tabchart report"),
    );
    context.insert("source", &source.display().to_string());
    context.insert("rows", &table.row_count());
    context.insert("cols", &table.column_count());
    context.insert(
        "generated",
        &chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
    );
    context.insert("svg", &svg);
    let columns: Vec<_> = table
        .columns()
        .iter()
        .map(|c| {
            let mut m = std::collections::BTreeMap::new();
            m.insert("name", c.name.clone());
            m.insert("ctype", c.ctype.to_string());
            m
        })
        .collect();
    context.insert("columns", &columns);

    // Autoescape stays off so the SVG embeds as markup
    let html = Tera::one_off(REPORT_TEMPLATE, &context, false)
        .map_err(|e| TabError::render(format!("report template failed: {}", e)))?;

    std::fs::write(out, html)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CellValue, Column};
    use crate::render::ChartKind;

    #[test]
    fn report_embeds_svg_and_schema() {
        let mut t = Table::new(vec![Column::new("x"), Column::new("y")]);
        t.push_row(vec![CellValue::Int(1), CellValue::Int(2)]);
        t.push_row(vec![CellValue::Int(3), CellValue::Int(4)]);
        t.infer_types();

        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("report.html");
        let spec = ChartSpec::new(ChartKind::Scatter, "x")
            .with_y("y")
            .with_title("demo");

        render_html_report(&t, &spec, Path::new("data.csv"), &out).unwrap();

        let html = std::fs::read_to_string(&out).unwrap();
        assert!(html.contains("<svg"));
        assert!(html.contains("demo"));
        assert!(html.contains("<td>x</td><td>int</td>"));
    }
}
