//! Patient data entry form.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use zeroize::Zeroize;

use crate::domain::{
    Choice, ChestPainType, Field, MajorVessels, PatientAnswers, RawAnswers, RestingEcg, Sex,
    StSlope, Thalassemia, YesNo,
};
use crate::tui::styles::MedicalTheme;

/// How a field is answered.
#[derive(Debug, Clone)]
pub enum FieldInput {
    /// Free-form numeric text
    Text { value: String, hint: &'static str },
    /// One label out of a closed set
    Select {
        options: Vec<&'static str>,
        selected: usize,
    },
}

#[derive(Debug, Clone)]
pub struct FormField {
    pub field: Field,
    pub input: FieldInput,
}

fn text(field: Field, value: impl ToString, hint: &'static str) -> FormField {
    FormField {
        field,
        input: FieldInput::Text {
            value: value.to_string(),
            hint,
        },
    }
}

fn select<C: Choice>(field: Field, current: C) -> FormField {
    FormField {
        field,
        input: FieldInput::Select {
            options: C::labels(),
            selected: current.position(),
        },
    }
}

/// Patient form state
pub struct PatientFormState {
    pub fields: Vec<FormField>,
    pub selected_field: usize,
    pub error_message: Option<String>,
}

impl Default for PatientFormState {
    fn default() -> Self {
        Self::from_answers(&PatientAnswers::default())
    }
}

impl PatientFormState {
    /// Pre-fill the form from typed answers.
    #[must_use]
    pub fn from_answers(a: &PatientAnswers) -> Self {
        let fields = vec![
            text(Field::Age, a.age, "years (1-120)"),
            select::<Sex>(Field::Sex, a.sex),
            select::<ChestPainType>(Field::ChestPain, a.chest_pain),
            text(Field::RestingBloodPressure, a.resting_bp, "mm Hg"),
            text(Field::Cholesterol, a.cholesterol, "mg/dl"),
            select::<YesNo>(Field::FastingBloodSugar, a.fasting_blood_sugar),
            select::<RestingEcg>(Field::RestingEcg, a.resting_ecg),
            text(Field::MaxHeartRate, a.max_heart_rate, "beats per minute"),
            select::<YesNo>(Field::ExerciseAngina, a.exercise_angina),
            text(Field::Oldpeak, format!("{:.1}", a.oldpeak), "ST depression"),
            select::<StSlope>(Field::Slope, a.slope),
            select::<MajorVessels>(Field::MajorVessels, a.major_vessels),
            select::<Thalassemia>(Field::Thalassemia, a.thalassemia),
        ];

        Self {
            fields,
            selected_field: 0,
            error_message: None,
        }
    }

    /// Move to the next field
    pub fn next_field(&mut self) {
        self.selected_field = (self.selected_field + 1) % self.fields.len();
    }

    /// Move to the previous field
    pub fn prev_field(&mut self) {
        if self.selected_field == 0 {
            self.selected_field = self.fields.len() - 1;
        } else {
            self.selected_field -= 1;
        }
    }

    /// Focus a specific question.
    pub fn focus(&mut self, field: Field) {
        if let Some(i) = self.fields.iter().position(|f| f.field == field) {
            self.selected_field = i;
        }
    }

    fn current(&mut self) -> &mut FieldInput {
        &mut self.fields[self.selected_field].input
    }

    /// Type a character into the current text field. Ignored on selects.
    pub fn input_char(&mut self, c: char) {
        if !(c.is_ascii_digit() || c == '.' || c == '-') {
            return;
        }
        if let FieldInput::Text { value, .. } = self.current() {
            value.push(c);
            self.error_message = None;
        }
    }

    /// Delete the last character
    pub fn delete_char(&mut self) {
        if let FieldInput::Text { value, .. } = self.current() {
            value.pop();
        }
    }

    /// Clear the current field
    pub fn clear_field(&mut self) {
        if let FieldInput::Text { value, .. } = self.current() {
            value.zeroize();
        }
    }

    /// Cycle the current select forward (`forward`) or backward.
    pub fn cycle_option(&mut self, forward: bool) {
        if let FieldInput::Select { options, selected } = self.current() {
            let n = options.len();
            *selected = if forward {
                (*selected + 1) % n
            } else {
                (*selected + n - 1) % n
            };
            self.error_message = None;
        }
    }

    /// Wipe text buffers and restore the initial values.
    ///
    /// Called right after a submission so typed measurements do not linger in
    /// UI state.
    pub fn clear_sensitive(&mut self) {
        for field in &mut self.fields {
            if let FieldInput::Text { value, .. } = &mut field.input {
                value.zeroize();
            }
        }
        *self = Self::default();
    }

    /// Collect the current inputs as untyped answers.
    #[must_use]
    pub fn to_raw_answers(&self) -> RawAnswers {
        let mut raw = RawAnswers::default();
        for f in &self.fields {
            let value = match &f.input {
                FieldInput::Text { value, .. } => value.clone(),
                FieldInput::Select { options, selected } => options[*selected].to_string(),
            };
            raw = raw.with(f.field, value);
        }
        raw
    }
}

/// Render the patient data input form
pub fn render_patient_form(f: &mut Frame, area: Rect, state: &PatientFormState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Form
            Constraint::Length(3), // Footer/error
        ])
        .split(area);

    render_form_header(f, chunks[0]);
    render_form_fields(f, chunks[1], state);
    render_form_footer(f, chunks[2], state);
}

fn render_form_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", MedicalTheme::text()),
        Span::styled("Heart Disease Prediction", MedicalTheme::title()),
        Span::styled(" │ Enter Patient Details", MedicalTheme::text_secondary()),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(header, area);
}

fn render_form_fields(f: &mut Frame, area: Rect, state: &PatientFormState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .margin(1)
        .split(area);

    // Six questions on the left, seven on the right.
    let mid = 6.min(state.fields.len());

    render_field_column(f, columns[0], &state.fields[..mid], 0, state.selected_field);
    render_field_column(
        f,
        columns[1],
        &state.fields[mid..],
        mid,
        state.selected_field,
    );
}

fn render_field_column(
    f: &mut Frame,
    area: Rect,
    fields: &[FormField],
    offset: usize,
    selected: usize,
) {
    let constraints: Vec<Constraint> = fields
        .iter()
        .map(|_| Constraint::Length(3))
        .chain(std::iter::once(Constraint::Min(0)))
        .collect();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (i, field) in fields.iter().enumerate() {
        let is_selected = offset + i == selected;
        let (border_style, title_style) = if is_selected {
            (MedicalTheme::border_focused(), MedicalTheme::focused())
        } else {
            (MedicalTheme::border(), MedicalTheme::text_secondary())
        };

        let block = Block::default()
            .title(Span::styled(format!(" {} ", field.field.label()), title_style))
            .borders(Borders::ALL)
            .border_style(border_style);

        let mut spans = vec![Span::raw(" ")];
        match &field.input {
            FieldInput::Text { value, hint } => {
                if value.is_empty() {
                    spans.push(Span::styled(*hint, MedicalTheme::text_muted()));
                } else {
                    spans.push(Span::styled(value.as_str(), MedicalTheme::text()));
                }
                if is_selected {
                    spans.push(Span::styled("▌", MedicalTheme::cursor()));
                }
            }
            FieldInput::Select { options, selected } => {
                if is_selected {
                    spans.push(Span::styled("◀ ", MedicalTheme::key_hint()));
                }
                spans.push(Span::styled(options[*selected], MedicalTheme::text()));
                if is_selected {
                    spans.push(Span::styled(" ▶", MedicalTheme::key_hint()));
                }
            }
        }

        f.render_widget(Paragraph::new(Line::from(spans)).block(block), chunks[i]);
    }
}

fn render_form_footer(f: &mut Frame, area: Rect, state: &PatientFormState) {
    let content = if let Some(err) = &state.error_message {
        Line::from(vec![
            Span::styled("! ", MedicalTheme::danger()),
            Span::styled(err.clone(), MedicalTheme::danger()),
        ])
    } else {
        Line::from(vec![
            Span::styled("[↑↓] ", MedicalTheme::key_hint()),
            Span::styled("Navigate ", MedicalTheme::key_desc()),
            Span::styled("[←→] ", MedicalTheme::key_hint()),
            Span::styled("Choose ", MedicalTheme::key_desc()),
            Span::styled("[Enter] ", MedicalTheme::key_hint()),
            Span::styled("Predict ", MedicalTheme::key_desc()),
            Span::styled("[?] ", MedicalTheme::key_hint()),
            Span::styled("Feature Descriptions ", MedicalTheme::key_desc()),
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
