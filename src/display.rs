//! Display collaborator: tables and text panels on the terminal.

use crate::types::ResultSet;
use colored::Colorize;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Cell, ContentArrangement, Table};

/// Styling hint for text output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Plain,
    Heading,
    Success,
    Suggestion,
    Warning,
    Error,
}

/// Write-only sink for everything a turn shows the user.
pub trait Renderer: Send {
    /// Tabular result with a title.
    fn table(&mut self, title: &str, result: &ResultSet);

    /// Boxed block of text with a title.
    fn panel(&mut self, title: &str, body: &str, tone: Tone);

    /// One styled line.
    fn text(&mut self, tone: Tone, text: &str);
}

/// Build a comfy table for a result set.
pub fn build_table(result: &ResultSet) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);

    let headers: Vec<Cell> = result
        .columns()
        .iter()
        .map(|c| Cell::new(c).fg(comfy_table::Color::Green))
        .collect();
    table.set_header(headers);

    for row in result.rows() {
        let cells: Vec<Cell> = row.iter().map(|v| Cell::new(v.to_string())).collect();
        table.add_row(cells);
    }

    table
}

fn styled(tone: Tone, text: &str) -> String {
    match tone {
        Tone::Plain => text.to_string(),
        Tone::Heading => text.green().bold().to_string(),
        Tone::Success => text.green().to_string(),
        Tone::Suggestion => text.magenta().bold().to_string(),
        Tone::Warning => text.yellow().to_string(),
        Tone::Error => text.red().bold().to_string(),
    }
}

/// Renders to stdout.
#[derive(Debug, Default)]
pub struct TerminalRenderer;

impl Renderer for TerminalRenderer {
    fn table(&mut self, title: &str, result: &ResultSet) {
        let row_count = result.len();
        println!("{}", styled(Tone::Heading, title));
        println!("{}", build_table(result));
        println!("({} row{})", row_count, if row_count != 1 { "s" } else { "" });
    }

    fn panel(&mut self, title: &str, body: &str, tone: Tone) {
        let mut panel = Table::new();
        panel
            .load_preset(UTF8_FULL)
            .apply_modifier(UTF8_ROUND_CORNERS)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![Cell::new(styled(tone, title))]);
        if !body.is_empty() {
            panel.add_row(vec![Cell::new(body)]);
        }
        println!("{}", panel);
    }

    fn text(&mut self, tone: Tone, text: &str) {
        println!("{}", styled(tone, text));
    }
}
