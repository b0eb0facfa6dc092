//! Input summary table: current form values under their clinical labels.

use ratatui::{
    layout::{Constraint, Rect},
    text::Span,
    widgets::{Block, Borders, Cell, Row, Table},
    Frame,
};

use crate::application::collector::parse_value;
use crate::ports::InputSource;
use crate::tui::styles::MedicalTheme;
use crate::tui::ui::form::SidebarForm;

/// One table row: clinical label and the value the collector would use.
fn summary_row(form: &SidebarForm, index: usize) -> Row<'static> {
    let def = form.fields[index].def;
    let raw = form.raw_value(def.key);

    let (value, style) = match parse_value(def, raw) {
        Ok(v) => (def.format_value(v), MedicalTheme::text()),
        Err(_) => (
            format!("{} (invalid)", raw.unwrap_or_default().trim()),
            MedicalTheme::danger(),
        ),
    };

    Row::new(vec![
        Cell::from(Span::styled(def.label, MedicalTheme::text_secondary())),
        Cell::from(Span::styled(value, style)),
        Cell::from(Span::styled(
            format!("{} – {}", def.format_value(def.min), def.format_value(def.max)),
            MedicalTheme::text_muted(),
        )),
    ])
}

/// Render the "Input Summary" table
pub fn render_input_summary(f: &mut Frame, area: Rect, form: &SidebarForm) {
    let rows: Vec<Row> = (0..form.fields.len())
        .map(|i| summary_row(form, i))
        .collect();

    let header = Row::new(vec!["Parameter", "Value", "Range"]).style(MedicalTheme::focused());

    let table = Table::new(
        rows,
        [
            Constraint::Length(24),
            Constraint::Length(14),
            Constraint::Min(10),
        ],
    )
    .header(header)
    .column_spacing(1)
    .block(
        Block::default()
            .title(Span::styled(" Input Summary ", MedicalTheme::subtitle()))
            .borders(Borders::ALL)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(table, area);
}
