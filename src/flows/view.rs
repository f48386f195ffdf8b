use crate::core::errors::WizardErrors;
use crate::core::step::StepKind;
use crate::input::{Input, KeyResult};
use crate::terminal::{CursorPos, KeyCode, KeyEvent};
use crate::ui::renderer::RenderFrame;
use crate::ui::span::{Span, SpanLine};
use crate::ui::theme::Theme;

pub struct StepProps<'a, D> {
    pub data: &'a D,
    pub can_proceed: bool,
    pub is_loading: bool,
    pub can_skip: bool,
    pub errors: &'a WizardErrors,
    pub theme: &'a Theme,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StepResponse<D> {
    Ignored,
    Handled,
    /// Partial record to merge into the wizard data.
    Change(D),
    Next,
    Back,
    Skip,
}

/// Draws a step body and answers key presses. Data changes leave as a
/// partial record in [`StepResponse::Change`]; the runner applies them.
pub trait StepView<D> {
    fn render(&self, props: &StepProps<'_, D>) -> RenderFrame;
    fn handle_key(&mut self, key: KeyEvent, props: &StepProps<'_, D>) -> StepResponse<D>;
}

/// Steps that know how to build their own view.
pub trait ViewedStep: StepKind {
    fn view(&self, data: &Self::Data) -> Box<dyn StepView<Self::Data>>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldEvent {
    Ignored,
    Handled,
    Changed { id: String, value: String },
    /// Enter on the last field.
    Submit,
}

/// Vertical stack of inputs with one focused field. Tab and the arrow keys
/// move focus when the field itself does not use them.
pub struct FieldStack {
    fields: Vec<Box<dyn Input>>,
    focus: usize,
}

impl FieldStack {
    pub fn new(mut fields: Vec<Box<dyn Input>>) -> Self {
        if let Some(first) = fields.first_mut() {
            first.set_focused(true);
        }
        Self { fields, focus: 0 }
    }

    pub fn focused_id(&self) -> Option<&str> {
        self.fields.get(self.focus).map(|field| field.id())
    }

    pub fn set_value(&mut self, id: &str, value: String) {
        if let Some(field) = self.fields.iter_mut().find(|field| field.id() == id) {
            field.set_value(value);
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> FieldEvent {
        let Some(field) = self.fields.get_mut(self.focus) else {
            return FieldEvent::Ignored;
        };
        match field.handle_key(key) {
            KeyResult::Changed => FieldEvent::Changed {
                id: field.id().to_string(),
                value: field.value(),
            },
            KeyResult::Handled => FieldEvent::Handled,
            KeyResult::Submit => {
                if self.focus + 1 >= self.fields.len() {
                    FieldEvent::Submit
                } else {
                    self.move_focus(1);
                    FieldEvent::Handled
                }
            }
            KeyResult::NotHandled => match key.code {
                KeyCode::Tab | KeyCode::Down => {
                    self.move_focus(1);
                    FieldEvent::Handled
                }
                KeyCode::BackTab | KeyCode::Up => {
                    self.move_focus(-1);
                    FieldEvent::Handled
                }
                _ => FieldEvent::Ignored,
            },
        }
    }

    /// Renders every field, followed by any engine error reported for it.
    pub fn render(&self, theme: &Theme, errors: &WizardErrors) -> RenderFrame {
        let mut lines: Vec<SpanLine> = Vec::new();
        let mut cursor = None;
        for (idx, field) in self.fields.iter().enumerate() {
            if idx > 0 {
                lines.push(SpanLine::new());
            }
            let (field_lines, field_cursor) = field.render(theme);
            if let Some(pos) = field_cursor {
                cursor = Some(CursorPos {
                    col: pos.col,
                    row: pos.row.saturating_add(lines.len() as u16),
                });
            }
            lines.extend(field_lines);
            if let Some(message) = errors.get(field.id()) {
                lines.push(vec![Span::styled(format!("    ! {message}"), theme.error)]);
            }
        }
        RenderFrame { lines, cursor }
    }

    fn move_focus(&mut self, delta: isize) {
        let len = self.fields.len();
        if len < 2 {
            return;
        }
        if let Some(field) = self.fields.get_mut(self.focus) {
            field.set_focused(false);
        }
        self.focus = (self.focus as isize + delta).rem_euclid(len as isize) as usize;
        if let Some(field) = self.fields.get_mut(self.focus) {
            field.set_focused(true);
        }
    }
}

/// Body for steps without inputs: Enter continues.
pub fn read_only_key<D>(key: KeyEvent) -> StepResponse<D> {
    match key.code {
        KeyCode::Enter => StepResponse::Next,
        _ => StepResponse::Ignored,
    }
}

/// `label: value` row used by the summary screens.
pub fn summary_row(label: &str, value: impl Into<String>, theme: &Theme) -> SpanLine {
    vec![
        Span::styled(format!("  {label}: "), theme.muted),
        Span::styled(value.into(), theme.focused),
    ]
}
