use crate::terminal::{CursorPos, KeyEvent};
use crate::ui::span::{Span, SpanLine};
use crate::ui::theme::Theme;
use crate::validation::Validator;
use unicode_width::UnicodeWidthStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyResult {
    Handled,
    /// Handled and the value changed.
    Changed,
    NotHandled,
    Submit,
}

/// Form widget hosted by a step view.
pub trait Input {
    fn base(&self) -> &InputBase;
    fn base_mut(&mut self) -> &mut InputBase;

    fn id(&self) -> &str {
        &self.base().id
    }

    fn label(&self) -> &str {
        &self.base().label
    }

    fn value(&self) -> String;
    fn set_value(&mut self, value: String);

    fn is_focused(&self) -> bool {
        self.base().focused
    }

    fn set_focused(&mut self, focused: bool) {
        self.base_mut().focused = focused;
    }

    fn validate(&self) -> Result<(), String> {
        for validator in &self.base().validators {
            validator(&self.value())?;
        }
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) -> KeyResult;

    /// Rendered rows plus the cursor position within them when focused.
    fn render(&self, theme: &Theme) -> (Vec<SpanLine>, Option<CursorPos>);
}

pub struct InputBase {
    pub id: String,
    pub label: String,
    pub focused: bool,
    pub validators: Vec<Validator>,
    pub placeholder: Option<String>,
    pub hint: Option<String>,
}

impl InputBase {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            focused: false,
            validators: Vec::new(),
            placeholder: None,
            hint: None,
        }
    }

    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validators.push(validator);
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// `› Label: ` when focused, aligned blank marker otherwise.
    pub(crate) fn label_spans(&self, theme: &Theme) -> (SpanLine, usize) {
        let marker = if self.focused { "› " } else { "  " };
        let label = format!("{}: ", self.label);
        let width = marker.width() + label.width();
        let label_style = if self.focused { theme.focused } else { theme.subtitle };
        (
            vec![Span::styled(marker, theme.accent), Span::styled(label, label_style)],
            width,
        )
    }
}
