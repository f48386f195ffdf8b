use crate::ui::style::Style;
use unicode_width::UnicodeWidthChar;
use unicode_width::UnicodeWidthStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrapMode {
    NoWrap,
    Wrap,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub style: Style,
    pub wrap_mode: WrapMode,
}

impl Span {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: Style::default(),
            wrap_mode: WrapMode::Wrap,
        }
    }

    pub fn styled(text: impl Into<String>, style: Style) -> Self {
        Self {
            text: text.into(),
            style,
            wrap_mode: WrapMode::Wrap,
        }
    }

    pub fn no_wrap(mut self) -> Self {
        self.wrap_mode = WrapMode::NoWrap;
        self
    }

    pub fn width(&self) -> usize {
        self.text.width()
    }

    /// Splits so the head is at most `width` columns wide.
    pub fn split_at_width(self, width: usize) -> (Span, Option<Span>) {
        let mut used = 0usize;
        let mut cut = self.text.len();
        for (idx, ch) in self.text.char_indices() {
            let w = ch.width().unwrap_or(0);
            if used + w > width {
                cut = idx;
                break;
            }
            used += w;
        }
        if cut >= self.text.len() {
            return (self, None);
        }
        let tail = Span {
            text: self.text[cut..].to_string(),
            style: self.style,
            wrap_mode: self.wrap_mode,
        };
        let head = Span {
            text: self.text[..cut].to_string(),
            style: self.style,
            wrap_mode: self.wrap_mode,
        };
        (head, Some(tail))
    }
}

pub type SpanLine = Vec<Span>;

pub fn line_width(line: &[Span]) -> usize {
    line.iter().map(Span::width).sum()
}

/// Plain text of a line, styles dropped.
pub fn line_text(line: &[Span]) -> String {
    line.iter().map(|span| span.text.as_str()).collect()
}
