//! Aligned terminal preview of the first rows of a table

use std::io::Write;
use std::path::Path;

use tabled::builder::Builder;
use tabled::settings::Style;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::error::Result;
use crate::model::Table;

const MAX_CELL_WIDTH: usize = 32;

/// Print the first `rows` rows of the table to stdout
pub fn print_preview(table: &Table, source: &Path, rows: usize) -> Result<()> {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    stdout.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true))?;
    write!(stdout, "{}", source.display())?;
    stdout.reset()?;
    writeln!(
        stdout,
        ": {} rows x {} columns",
        table.row_count(),
        table.column_count()
    )?;

    let mut builder = Builder::default();
    builder.push_record(
        table
            .columns()
            .iter()
            .map(|c| format!("{} ({})", c.name, c.ctype)),
    );
    for row in table.rows().take(rows) {
        builder.push_record(row.iter().map(|cell| clip(&cell.to_string())));
    }

    let mut rendered = builder.build();
    rendered.with(Style::sharp());
    writeln!(stdout, "{}", rendered)?;

    let shown = table.row_count().min(rows);
    if shown < table.row_count() {
        writeln!(stdout, "({} of {} rows shown)", shown, table.row_count())?;
    }
    Ok(())
}

fn clip(s: &str) -> String {
    if s.chars().count() <= MAX_CELL_WIDTH {
        s.to_string()
    } else {
        let clipped: String = s.chars().take(MAX_CELL_WIDTH - 1).collect();
        format!("{}…", clipped)
    }
}
