use crate::input::{Input, InputBase, KeyResult};
use crate::terminal::{CursorPos, KeyCode, KeyEvent};
use crate::ui::span::{Span, SpanLine};
use crate::ui::theme::Theme;
use crate::validation::Validator;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceOption {
    pub id: String,
    pub label: String,
    pub description: String,
}

impl ChoiceOption {
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            description: description.into(),
        }
    }
}

/// Checkbox list. Space toggles the highlighted option; the value is the
/// selected ids in the order they were picked.
pub struct ChoiceInput {
    base: InputBase,
    options: Vec<ChoiceOption>,
    selected: Vec<String>,
    highlighted: usize,
}

impl ChoiceInput {
    pub fn new(id: impl Into<String>, label: impl Into<String>, options: Vec<ChoiceOption>) -> Self {
        Self {
            base: InputBase::new(id, label),
            options,
            selected: Vec::new(),
            highlighted: 0,
        }
    }

    pub fn with_selected(mut self, ids: &[String]) -> Self {
        self.set_selected(ids);
        self
    }

    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.base = self.base.with_validator(validator);
        self
    }

    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    /// Keeps only ids that name a known option.
    pub fn set_selected(&mut self, ids: &[String]) {
        self.selected = ids
            .iter()
            .filter(|id| self.options.iter().any(|opt| &opt.id == *id))
            .cloned()
            .collect();
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.iter().any(|s| s == id)
    }

    fn toggle_highlighted(&mut self) -> bool {
        let Some(option) = self.options.get(self.highlighted) else {
            return false;
        };
        let id = option.id.clone();
        if let Some(pos) = self.selected.iter().position(|s| *s == id) {
            self.selected.remove(pos);
        } else {
            self.selected.push(id);
        }
        true
    }

    fn move_up(&mut self) {
        if self.options.is_empty() {
            return;
        }
        let len = self.options.len();
        self.highlighted = (self.highlighted + len - 1) % len;
    }

    fn move_down(&mut self) {
        if self.options.is_empty() {
            return;
        }
        self.highlighted = (self.highlighted + 1) % self.options.len();
    }
}

impl Input for ChoiceInput {
    fn base(&self) -> &InputBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut InputBase {
        &mut self.base
    }

    fn value(&self) -> String {
        self.selected.join(",")
    }

    fn set_value(&mut self, value: String) {
        let ids: Vec<String> = value
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(ToOwned::to_owned)
            .collect();
        self.set_selected(&ids);
    }

    fn handle_key(&mut self, key: KeyEvent) -> KeyResult {
        match key.code {
            KeyCode::Up => {
                self.move_up();
                KeyResult::Handled
            }
            KeyCode::Down => {
                self.move_down();
                KeyResult::Handled
            }
            KeyCode::Char(' ') => {
                if self.toggle_highlighted() {
                    KeyResult::Changed
                } else {
                    KeyResult::Handled
                }
            }
            KeyCode::Enter => KeyResult::Submit,
            _ => KeyResult::NotHandled,
        }
    }

    fn render(&self, theme: &Theme) -> (Vec<SpanLine>, Option<CursorPos>) {
        let (header, _) = self.base.label_spans(theme);
        let mut lines = vec![header];

        for (idx, option) in self.options.iter().enumerate() {
            let highlighted = self.base.focused && idx == self.highlighted;
            let marker = if highlighted { "  › " } else { "    " };
            let (check, check_style) = if self.is_selected(&option.id) {
                ("[x] ", theme.success)
            } else {
                ("[ ] ", theme.muted)
            };
            let label_style = if highlighted { theme.focused } else { Default::default() };
            lines.push(vec![
                Span::styled(marker, theme.accent).no_wrap(),
                Span::styled(check, check_style).no_wrap(),
                Span::styled(option.label.clone(), label_style),
                Span::styled(format!("  {}", option.description), theme.muted),
            ]);
        }

        (lines, None)
    }
}
