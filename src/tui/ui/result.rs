//! Prediction result view.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::domain::{Assessment, Prediction};
use crate::tui::styles::MedicalTheme;

/// Result screen state
#[derive(Debug, Clone, Default)]
pub enum ResultState {
    /// Nothing submitted yet
    #[default]
    Idle,
    /// Classifier answered
    Complete { assessment: Assessment },
    /// Classifier failed or broke its contract
    Error { message: String },
}

pub fn render_result(f: &mut Frame, area: Rect, state: &ResultState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(3), // Footer
        ])
        .split(area);

    render_result_header(f, chunks[0]);
    match state {
        ResultState::Idle => render_idle(f, chunks[1]),
        ResultState::Complete { assessment } => render_assessment(f, chunks[1], assessment),
        ResultState::Error { message } => render_error(f, chunks[1], message),
    }
    render_result_footer(f, chunks[2], state);
}

fn render_result_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", MedicalTheme::text()),
        Span::styled("Prediction Result", MedicalTheme::title()),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(header, area);
}

fn render_idle(f: &mut Frame, area: Rect) {
    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            "Fill out the form and press Enter to predict",
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

fn render_assessment(f: &mut Frame, area: Rect, assessment: &Assessment) {
    let style = MedicalTheme::prediction(assessment.prediction);
    let block = Block::default()
        .title(Span::styled(" Verdict ", MedicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(style.remove_modifier(Modifier::BOLD));

    let icon = match assessment.prediction {
        Prediction::Positive => "!",
        Prediction::Negative => "OK",
    };

    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("{icon} {}", assessment.prediction),
            style,
        )),
        Line::from(""),
        Line::from(Span::styled(
            assessment.prediction.message(),
            MedicalTheme::text(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!(
                "Assessed {}",
                assessment.assessed_at.format("%Y-%m-%d %H:%M:%S UTC")
            ),
            MedicalTheme::text_muted(),
        )),
    ])
    .alignment(Alignment::Center)
    .block(block);

    f.render_widget(content, area);
}

fn render_error(f: &mut Frame, area: Rect, message: &str) {
    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled("! Error", MedicalTheme::danger())),
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

fn render_result_footer(f: &mut Frame, area: Rect, state: &ResultState) {
    let content = match state {
        ResultState::Error { .. } => Line::from(vec![
            Span::styled("[Enter] ", MedicalTheme::key_hint()),
            Span::styled("Back to Form ", MedicalTheme::key_desc()),
            Span::styled("[Esc] ", MedicalTheme::key_hint()),
            Span::styled("Quit", MedicalTheme::key_desc()),
        ]),
        _ => Line::from(vec![
            Span::styled("[Enter] ", MedicalTheme::key_hint()),
            Span::styled("New Prediction ", MedicalTheme::key_desc()),
            Span::styled("[?] ", MedicalTheme::key_hint()),
            Span::styled("Feature Descriptions ", MedicalTheme::key_desc()),
            Span::styled("[Esc] ", MedicalTheme::key_hint()),
            Span::styled("Quit", MedicalTheme::key_desc()),
        ]),
    };

    let footer = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(footer, area);
}
