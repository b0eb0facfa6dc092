//! UI module: View components for the TUI.

pub mod form;
pub mod result;
pub mod summary;

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::tui::styles::MedicalTheme;

/// Page title, model fingerprint and model provenance.
pub fn render_header(
    f: &mut Frame,
    area: Rect,
    model_fingerprint: &str,
    model_description: Option<&str>,
) {
    let short_fp: String = model_fingerprint.chars().take(12).collect();

    let provenance = match model_description {
        Some(description) => Span::styled(description.to_string(), MedicalTheme::danger()),
        None => Span::styled("no provenance recorded", MedicalTheme::danger()),
    };

    let text = vec![
        Line::from(vec![
            Span::styled(" ", MedicalTheme::text()),
            Span::styled("28-day Mortality Risk Predictor", MedicalTheme::title()),
        ]),
        Line::from(vec![
            Span::styled(" This tool predicts the ", MedicalTheme::text_secondary()),
            Span::styled("28-day mortality risk", MedicalTheme::focused()),
            Span::styled(
                " in critically ill IS patients with SIRS.",
                MedicalTheme::text_secondary(),
            ),
        ]),
        Line::from(vec![
            Span::styled(format!(" model sha256 {short_fp}"), MedicalTheme::text_muted()),
            Span::styled(" │ ", MedicalTheme::text_muted()),
            provenance,
        ]),
    ];

    let header = Paragraph::new(text).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(header, area);
}

/// Key hints, or the current validation error.
pub fn render_footer(f: &mut Frame, area: Rect, error: Option<&str>) {
    let content = if let Some(err) = error {
        Line::from(vec![
            Span::styled("! ", MedicalTheme::danger()),
            Span::styled(err.to_string(), MedicalTheme::danger()),
        ])
    } else {
        Line::from(vec![
            Span::styled("[↑↓] ", MedicalTheme::key_hint()),
            Span::styled("Navigate ", MedicalTheme::key_desc()),
            Span::styled("[Space] ", MedicalTheme::key_hint()),
            Span::styled("Toggle ", MedicalTheme::key_desc()),
            Span::styled("[Enter/P] ", MedicalTheme::key_hint()),
            Span::styled("Predict ", MedicalTheme::key_desc()),
            Span::styled("[R] ", MedicalTheme::key_hint()),
            Span::styled("Reset ", MedicalTheme::key_desc()),
            Span::styled("[Esc] ", MedicalTheme::key_hint()),
            Span::styled("Quit", MedicalTheme::key_desc()),
        ])
    };

    let footer = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(footer, area);
}

pub fn render_disclaimer(f: &mut Frame, area: Rect) {
    let text = vec![Line::from(vec![Span::styled(
        "DISCLAIMER: This tool provides indicative estimates and does not replace professional medical evaluation.",
        MedicalTheme::text_muted(),
    )])];

    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(MedicalTheme::border());

    let p = Paragraph::new(text).block(block).wrap(Wrap { trim: true });

    f.render_widget(p, area);
}
