use crate::input::{Input, InputBase, KeyResult};
use crate::terminal::{CursorPos, KeyCode, KeyEvent, KeyModifiers};
use crate::ui::span::{Span, SpanLine};
use crate::ui::theme::Theme;
use crate::validation::Validator;
use unicode_width::UnicodeWidthStr;

pub struct TextInput {
    base: InputBase,
    value: String,
    cursor_pos: usize,
    max_chars: Option<usize>,
}

impl TextInput {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            base: InputBase::new(id, label),
            value: String::new(),
            cursor_pos: 0,
            max_chars: None,
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.set_value(value.into());
        self
    }

    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.base = self.base.with_validator(validator);
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.base = self.base.with_placeholder(placeholder);
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.base = self.base.with_hint(hint);
        self
    }

    /// Shows a `n/max` counter after the value.
    pub fn with_counter(mut self, max_chars: usize) -> Self {
        self.max_chars = Some(max_chars);
        self
    }

    fn byte_pos(&self) -> usize {
        self.value
            .char_indices()
            .nth(self.cursor_pos)
            .map_or(self.value.len(), |(idx, _)| idx)
    }

    fn handle_char(&mut self, ch: char) {
        let at = self.byte_pos();
        self.value.insert(at, ch);
        self.cursor_pos += 1;
    }

    fn handle_backspace(&mut self) -> bool {
        if self.cursor_pos == 0 {
            return false;
        }
        self.cursor_pos -= 1;
        let at = self.byte_pos();
        self.value.remove(at);
        true
    }

    fn handle_delete(&mut self) -> bool {
        if self.cursor_pos >= self.value.chars().count() {
            return false;
        }
        let at = self.byte_pos();
        self.value.remove(at);
        true
    }

    fn is_separator(ch: char) -> bool {
        ch.is_whitespace() || matches!(ch, '.' | '/' | ',' | '-' | '@')
    }

    fn delete_word(&mut self) -> bool {
        if self.cursor_pos == 0 {
            return false;
        }
        let mut chars: Vec<char> = self.value.chars().collect();
        let mut pos = self.cursor_pos;
        while pos > 0 && Self::is_separator(chars[pos - 1]) {
            chars.remove(pos - 1);
            pos -= 1;
        }
        while pos > 0 && !Self::is_separator(chars[pos - 1]) {
            chars.remove(pos - 1);
            pos -= 1;
        }
        self.value = chars.into_iter().collect();
        self.cursor_pos = pos;
        true
    }

    fn move_left(&mut self) {
        self.cursor_pos = self.cursor_pos.saturating_sub(1);
    }

    fn move_right(&mut self) {
        if self.cursor_pos < self.value.chars().count() {
            self.cursor_pos += 1;
        }
    }

    fn cursor_offset(&self) -> usize {
        self.value
            .chars()
            .take(self.cursor_pos)
            .map(|c| c.to_string().width())
            .sum()
    }
}

impl Input for TextInput {
    fn base(&self) -> &InputBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut InputBase {
        &mut self.base
    }

    fn value(&self) -> String {
        self.value.clone()
    }

    fn set_value(&mut self, value: String) {
        self.cursor_pos = value.chars().count();
        self.value = value;
    }

    fn handle_key(&mut self, key: KeyEvent) -> KeyResult {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('w') if ctrl => changed(self.delete_word()),
            KeyCode::Char(_) if ctrl => KeyResult::NotHandled,
            KeyCode::Char(ch) => {
                self.handle_char(ch);
                KeyResult::Changed
            }
            KeyCode::Backspace if ctrl => changed(self.delete_word()),
            KeyCode::Backspace => changed(self.handle_backspace()),
            KeyCode::Delete => changed(self.handle_delete()),
            KeyCode::Left => {
                self.move_left();
                KeyResult::Handled
            }
            KeyCode::Right => {
                self.move_right();
                KeyResult::Handled
            }
            KeyCode::Home => {
                self.cursor_pos = 0;
                KeyResult::Handled
            }
            KeyCode::End => {
                self.cursor_pos = self.value.chars().count();
                KeyResult::Handled
            }
            KeyCode::Enter => KeyResult::Submit,
            _ => KeyResult::NotHandled,
        }
    }

    fn render(&self, theme: &Theme) -> (Vec<SpanLine>, Option<CursorPos>) {
        let (mut line, label_width) = self.base.label_spans(theme);
        match (&self.base.placeholder, self.value.is_empty()) {
            (Some(placeholder), true) => {
                line.push(Span::styled(placeholder.clone(), theme.placeholder));
            }
            _ => line.push(Span::new(self.value.clone())),
        }
        if let Some(max) = self.max_chars {
            let count = self.value.chars().count();
            let style = if count > max { theme.error } else { theme.muted };
            line.push(Span::styled(format!("  {count}/{max}"), style).no_wrap());
        }

        let mut lines = vec![line];
        let error = if self.value.is_empty() {
            None
        } else {
            self.validate().err()
        };
        if let Some(message) = error {
            lines.push(vec![Span::styled(format!("    {message}"), theme.error)]);
        } else if let Some(hint) = &self.base.hint {
            lines.push(vec![Span::styled(format!("    {hint}"), theme.hint)]);
        }

        let cursor = self.base.focused.then(|| CursorPos {
            col: (label_width + self.cursor_offset()) as u16,
            row: 0,
        });
        (lines, cursor)
    }
}

fn changed(did_change: bool) -> KeyResult {
    if did_change {
        KeyResult::Changed
    } else {
        KeyResult::Handled
    }
}
