use crate::terminal::CursorPos;
use crate::ui::span::{Span, SpanLine, WrapMode, line_width};

/// Fits logical lines into the terminal width. Wrapping spans flow onto
/// continuation lines, no-wrap spans move to a fresh line and are clipped.
pub struct Layout;

impl Layout {
    pub fn compose(lines: &[SpanLine], width: u16) -> Vec<SpanLine> {
        Self::compose_with_cursor(lines, None, width).0
    }

    /// Like [`Layout::compose`], also mapping a cursor given in logical
    /// coordinates onto the wrapped output.
    pub fn compose_with_cursor(
        lines: &[SpanLine],
        cursor: Option<CursorPos>,
        width: u16,
    ) -> (Vec<SpanLine>, Option<CursorPos>) {
        let width = width as usize;
        let mut out: Vec<SpanLine> = Vec::with_capacity(lines.len());
        let mut mapped = None;

        for (idx, line) in lines.iter().enumerate() {
            let first_row = out.len();
            if width == 0 || line_width(line) <= width {
                out.push(line.clone());
            } else {
                out.extend(wrap_line(line, width));
            }

            if let Some(pos) = cursor.filter(|pos| pos.row as usize == idx) {
                let col = pos.col as usize;
                let (row, col) = if width == 0 {
                    (first_row, col)
                } else {
                    (first_row + col / width, col % width)
                };
                mapped = Some(CursorPos {
                    col: col as u16,
                    row: row as u16,
                });
            }
        }

        (out, mapped)
    }
}

fn wrap_line(line: &[Span], width: usize) -> Vec<SpanLine> {
    let mut rows: Vec<SpanLine> = vec![Vec::new()];
    let mut current = 0usize;

    for span in line.iter().cloned() {
        if span.text.is_empty() {
            continue;
        }
        match span.wrap_mode {
            WrapMode::NoWrap => {
                if current > 0 && span.width() > width - current {
                    rows.push(Vec::new());
                    current = 0;
                }
                let (head, _) = span.split_at_width(width - current);
                current += head.width();
                push(&mut rows, head);
            }
            WrapMode::Wrap => {
                let mut rest = Some(span);
                while let Some(span) = rest.take() {
                    if current >= width {
                        rows.push(Vec::new());
                        current = 0;
                    }
                    let (mut head, mut tail) = span.split_at_width(width - current);
                    if head.text.is_empty() {
                        // A wide glyph that does not fit an empty row is emitted as is.
                        if current > 0 {
                            rows.push(Vec::new());
                            current = 0;
                            rest = tail;
                            continue;
                        }
                        if let Some(full) = tail.take() {
                            (head, tail) = split_first_char(full);
                        }
                    }
                    current += head.width();
                    push(&mut rows, head);
                    if tail.is_some() {
                        rows.push(Vec::new());
                        current = 0;
                    }
                    rest = tail;
                }
            }
        }
    }

    rows
}

fn split_first_char(span: Span) -> (Span, Option<Span>) {
    let cut = span.text.chars().next().map_or(0, char::len_utf8);
    let piece = |text: &str| Span {
        text: text.to_string(),
        style: span.style,
        wrap_mode: span.wrap_mode,
    };
    let tail = (cut < span.text.len()).then(|| piece(&span.text[cut..]));
    (piece(&span.text[..cut]), tail)
}

fn push(rows: &mut [SpanLine], span: Span) {
    if span.text.is_empty() {
        return;
    }
    if let Some(row) = rows.last_mut() {
        row.push(span);
    }
}

#[cfg(test)]
mod tests {
    use super::Layout;
    use crate::terminal::CursorPos;
    use crate::ui::span::{Span, line_text};

    #[test]
    fn short_lines_pass_through() {
        let lines = vec![vec![Span::new("Bedrag")], Vec::new()];
        assert_eq!(Layout::compose(&lines, 20), lines);
    }

    #[test]
    fn long_lines_wrap_by_width() {
        let lines = vec![vec![Span::new("Omschrijving: "), Span::new("Oppassen")]];
        let out = Layout::compose(&lines, 10);
        let text: Vec<String> = out.iter().map(|l| line_text(l)).collect();
        assert_eq!(text, vec!["Omschrijvi", "ng: Oppass", "en"]);
    }

    #[test]
    fn no_wrap_spans_start_a_new_row() {
        let lines = vec![vec![Span::new("abcdef"), Span::new("[Volgende]").no_wrap()]];
        let out = Layout::compose(&lines, 8);
        let text: Vec<String> = out.iter().map(|l| line_text(l)).collect();
        assert_eq!(text, vec!["abcdef", "[Volgend"]);
    }

    #[test]
    fn cursor_follows_wrapping() {
        let lines = vec![vec![Span::new("kop")], vec![Span::new("x".repeat(25))]];
        let (_, cursor) = Layout::compose_with_cursor(&lines, Some(CursorPos { col: 22, row: 1 }), 10);
        assert_eq!(cursor, Some(CursorPos { col: 2, row: 3 }));
    }
}
