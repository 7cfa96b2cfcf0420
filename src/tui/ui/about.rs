//! Feature descriptions and model details.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::tui::styles::MedicalTheme;

/// What the about screen shows besides the static descriptions.
#[derive(Debug, Clone, Default)]
pub struct AboutState {
    pub model_path: String,
    pub model_fingerprint: Option<String>,
}

const DESCRIPTIONS: &[(&str, &[&str])] = &[
    ("Age", &["Age of the person (in years)"]),
    ("Sex", &["1 = Male, 0 = Female"]),
    (
        "Chest Pain Type (cp)",
        &[
            "0: Typical angina",
            "1: Atypical angina",
            "2: Non-anginal pain",
            "3: Asymptomatic",
        ],
    ),
    ("Resting Blood Pressure (trestbps)", &["In mm Hg"]),
    ("Serum Cholesterol (chol)", &["In mg/dl"]),
    ("Fasting Blood Sugar > 120 (fbs)", &["1 = True, 0 = False"]),
    (
        "Resting ECG results (restecg)",
        &[
            "0: Normal",
            "1: Having ST-T wave abnormality",
            "2: Showing probable/definite left ventricular hypertrophy",
        ],
    ),
    ("Max Heart Rate Achieved (thalach)", &["Beats per minute"]),
    ("Exercise Induced Angina (exang)", &["1 = Yes, 0 = No"]),
    ("Oldpeak", &["ST depression induced by exercise relative to rest"]),
    ("Slope", &["The slope of the peak exercise ST segment (0-2)"]),
    ("ca", &["Number of major vessels colored by fluoroscopy (0-3)"]),
    (
        "thal",
        &["1: Normal", "2: Fixed defect", "3: Reversible defect"],
    ),
];

pub fn render_about(f: &mut Frame, area: Rect, state: &AboutState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Descriptions
            Constraint::Length(4), // Model
            Constraint::Length(3), // Footer
        ])
        .split(area);

    let mut lines = Vec::new();
    for (name, details) in DESCRIPTIONS {
        if details.len() == 1 {
            lines.push(Line::from(vec![
                Span::styled(format!(" {name}: "), MedicalTheme::focused()),
                Span::styled(details[0], MedicalTheme::text()),
            ]));
        } else {
            lines.push(Line::from(Span::styled(
                format!(" {name}:"),
                MedicalTheme::focused(),
            )));
            for d in *details {
                lines.push(Line::from(Span::styled(
                    format!("     {d}"),
                    MedicalTheme::text_secondary(),
                )));
            }
        }
    }

    let descriptions = Paragraph::new(lines)
        .block(
            Block::default()
                .title(Span::styled(" Feature Descriptions ", MedicalTheme::subtitle()))
                .borders(Borders::ALL)
                .border_style(MedicalTheme::border()),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(descriptions, chunks[0]);

    let model = Paragraph::new(vec![
        Line::from(vec![
            Span::styled(" Artifact: ", MedicalTheme::text_secondary()),
            Span::styled(state.model_path.as_str(), MedicalTheme::text()),
        ]),
        Line::from(vec![
            Span::styled(" SHA-256:  ", MedicalTheme::text_secondary()),
            Span::styled(
                state.model_fingerprint.as_deref().unwrap_or("unknown"),
                MedicalTheme::text_muted(),
            ),
        ]),
    ])
    .block(
        Block::default()
            .title(Span::styled(" Model ", MedicalTheme::subtitle()))
            .borders(Borders::ALL)
            .border_style(MedicalTheme::border()),
    );
    f.render_widget(model, chunks[1]);

    let footer = Paragraph::new(Line::from(vec![
        Span::styled("[Esc] ", MedicalTheme::key_hint()),
        Span::styled("Back", MedicalTheme::key_desc()),
    ]))
    .block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(MedicalTheme::border()),
    );
    f.render_widget(footer, chunks[2]);
}
