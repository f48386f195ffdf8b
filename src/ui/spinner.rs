use crate::ui::span::Span;
use crate::ui::theme::Theme;

const DOTS: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// Busy indicator shown on the primary button while completion runs.
#[derive(Debug, Clone, Default)]
pub struct Spinner {
    frame: usize,
}

impl Spinner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick(&mut self) {
        self.frame = (self.frame + 1) % DOTS.len();
    }

    pub fn reset(&mut self) {
        self.frame = 0;
    }

    pub fn glyph(&self) -> char {
        DOTS[self.frame % DOTS.len()]
    }

    pub fn span(&self, theme: &Theme) -> Span {
        Span::styled(self.glyph().to_string(), theme.accent).no_wrap()
    }
}
