//! Prediction result view: metric, risk bar and progress line.

use chrono::{DateTime, Local};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    symbols,
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, LineGauge, Paragraph},
    Frame,
};

use crate::domain::{PredictionResult, RiskDisplay};
use crate::tui::styles::MedicalTheme;

/// Resolution of the risk bar (ticks per unit probability).
const BAR_SCALE: u64 = 1000;

/// Result area state
#[derive(Debug, Clone, Default)]
pub enum ResultState {
    /// Form visible, nothing scored yet (or inputs edited since)
    #[default]
    Idle,
    /// Last prediction, rendered until the form changes
    Displayed {
        result: PredictionResult,
        scored_at: DateTime<Local>,
    },
    /// Prediction failed; the form stays usable
    Failed { message: String },
}

/// Render the result area
pub fn render_result(f: &mut Frame, area: Rect, state: &ResultState) {
    match state {
        ResultState::Idle => render_idle(f, area),
        ResultState::Displayed { result, scored_at } => {
            render_prediction(f, area, &result.display(), scored_at)
        }
        ResultState::Failed { message } => render_error(f, area, message),
    }
}

fn render_idle(f: &mut Frame, area: Rect) {
    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            "Adjust the patient parameters, then press [Enter] to predict",
            MedicalTheme::text_muted(),
        )),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(content, area);
}

fn render_prediction(f: &mut Frame, area: Rect, display: &RiskDisplay, scored_at: &DateTime<Local>) {
    let block = Block::default()
        .title(Span::styled(" Prediction Result ", MedicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border_focused());

    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Metric
            Constraint::Length(4), // Risk bar
            Constraint::Length(1), // Axis
            Constraint::Length(3), // Progress
            Constraint::Min(0),
        ])
        .split(inner);

    let band_style = MedicalTheme::risk_band(display.band);

    let metric = Paragraph::new(vec![
        Line::from(vec![
            Span::styled("Predicted 28-day Mortality Risk: ", MedicalTheme::text_secondary()),
            Span::styled(
                display.percent.clone(),
                band_style.add_modifier(ratatui::style::Modifier::BOLD),
            ),
            Span::styled(format!("  [{}]", display.band), band_style),
        ]),
        Line::from(Span::styled(
            format!("Scored at {}", scored_at.format("%H:%M:%S")),
            MedicalTheme::text_muted(),
        )),
    ]);
    f.render_widget(metric, chunks[0]);

    let bar = Bar::default()
        .label(Line::from("Risk"))
        .value((display.ratio * BAR_SCALE as f64).round() as u64)
        .text_value(display.percent.clone())
        .style(band_style)
        .value_style(MedicalTheme::text());

    let chart = BarChart::default()
        .block(
            Block::default()
                .title(Span::styled(" Risk Visualization ", MedicalTheme::text_secondary()))
                .borders(Borders::ALL)
                .border_style(MedicalTheme::border()),
        )
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(0)
        .max(BAR_SCALE)
        .data(BarGroup::default().bars(&[bar]));
    f.render_widget(chart, chunks[1]);

    let axis_width = usize::from(chunks[2].width).saturating_sub(6);
    let axis = Paragraph::new(Line::from(Span::styled(
        format!("0.0{:^axis_width$}1.0", "Probability"),
        MedicalTheme::text_muted(),
    )));
    f.render_widget(axis, chunks[2]);

    let progress = LineGauge::default()
        .block(
            Block::default()
                .title(Span::styled(" Progress ", MedicalTheme::text_secondary()))
                .borders(Borders::ALL)
                .border_style(MedicalTheme::border()),
        )
        .filled_style(band_style)
        .unfilled_style(MedicalTheme::track())
        .line_set(symbols::line::THICK)
        .ratio(display.ratio)
        .label(display.percent.clone());
    f.render_widget(progress, chunks[3]);
}

fn render_error(f: &mut Frame, area: Rect, message: &str) {
    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled("! Prediction failed", MedicalTheme::danger())),
        Line::from(""),
        Line::from(Span::styled(message, MedicalTheme::text())),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(MedicalTheme::danger()),
    );

    f.render_widget(content, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RiskBand;
    use ratatui::{backend::TestBackend, buffer::Buffer, style::Color, Terminal};

    fn rendered_buffer(state: &ResultState) -> Buffer {
        let mut terminal = Terminal::new(TestBackend::new(70, 16)).expect("terminal");
        terminal
            .draw(|f| render_result(f, f.area(), state))
            .expect("draw");
        terminal.backend().buffer().clone()
    }

    fn band_color(band: RiskBand) -> Color {
        let (r, g, b) = band.color();
        Color::Rgb(r, g, b)
    }

    /// Foreground colors of every cell drawn with `symbol`.
    fn colors_of(buffer: &Buffer, symbol: &str) -> Vec<Color> {
        buffer
            .content()
            .iter()
            .filter(|cell| cell.symbol() == symbol)
            .map(|cell| cell.fg)
            .collect()
    }

    fn rendered_text(state: &ResultState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(70, 16)).expect("terminal");
        terminal
            .draw(|f| render_result(f, f.area(), state))
            .expect("draw");
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_renders_percentage() {
        let state = ResultState::Displayed {
            result: PredictionResult::new(0.42),
            scored_at: Local::now(),
        };
        let text = rendered_text(&state);
        assert!(text.contains("42.00%"));
        assert!(text.contains("HIGH"));
        assert!(text.contains("Risk"));
    }

    #[test]
    fn test_rerender_is_identical() {
        let state = ResultState::Displayed {
            result: PredictionResult::new(0.12),
            scored_at: Local::now(),
        };
        let first = rendered_text(&state);
        assert_eq!(first, rendered_text(&state));
        assert!(first.contains("12.00%"));
        assert!(first.contains("LOW"));
    }

    #[test]
    fn test_band_colors_bar_and_progress() {
        for (probability, band, other) in [
            (0.41, RiskBand::High, RiskBand::Low),
            (0.40, RiskBand::Low, RiskBand::High),
        ] {
            let buffer = rendered_buffer(&ResultState::Displayed {
                result: PredictionResult::new(probability),
                scored_at: Local::now(),
            });

            let bar = colors_of(&buffer, symbols::bar::FULL);
            assert!(!bar.is_empty(), "bar drawn for {probability}");
            assert!(bar.iter().all(|&c| c == band_color(band)));

            let line = colors_of(&buffer, symbols::line::THICK.horizontal);
            assert!(line.contains(&band_color(band)));
            assert!(!line.contains(&band_color(other)));
        }
    }

    #[test]
    fn test_renders_failure_message() {
        let state = ResultState::Failed {
            message: "shape mismatch".into(),
        };
        assert!(rendered_text(&state).contains("shape mismatch"));
    }
}
