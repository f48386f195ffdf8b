use crate::terminal::input_event::{
    CursorPos, KeyCode, KeyEvent, KeyModifiers, TerminalEvent, TerminalSize,
};
use crate::ui::renderer::RenderFrame;
use crate::ui::span::SpanLine;
use crate::ui::style::{Color, Style};
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{
    self, Event as CrosstermEvent, KeyCode as CrosstermKeyCode, KeyEvent as CrosstermKeyEvent,
    KeyEventKind, KeyModifiers as CrosstermKeyModifiers,
};
use crossterm::style::{
    Attribute, Color as CrosstermColor, ContentStyle, Print, PrintStyledContent, StyledContent,
};
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, queue};
use std::io::{self, Stdout, Write};
use std::time::Duration;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Alternate-screen terminal. The last drawn frame is echoed to the normal
/// screen on exit so the final wizard state stays visible.
pub struct Terminal {
    stdout: Stdout,
    size: TerminalSize,
    last_frame: Vec<SpanLine>,
    entered: bool,
}

impl Terminal {
    pub fn new() -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        Ok(Self {
            stdout: io::stdout(),
            size: TerminalSize { width, height },
            last_frame: Vec::new(),
            entered: false,
        })
    }

    pub fn enter(&mut self) -> io::Result<()> {
        self.refresh_size()?;
        terminal::enable_raw_mode()?;
        execute!(self.stdout, EnterAlternateScreen, Hide)?;
        self.entered = true;
        Ok(())
    }

    pub fn exit(&mut self) -> io::Result<()> {
        if !self.entered {
            return Ok(());
        }
        self.entered = false;
        terminal::disable_raw_mode()?;
        execute!(self.stdout, LeaveAlternateScreen, Show)?;

        let last_frame = std::mem::take(&mut self.last_frame);
        let width = self.size.width;
        for line in &last_frame {
            self.write_span_line(line, width)?;
            self.stdout.write_all(b"\r\n")?;
        }
        self.stdout.flush()
    }

    pub fn size(&self) -> TerminalSize {
        self.size
    }

    pub fn set_size(&mut self, size: TerminalSize) {
        self.size = size;
    }

    pub fn refresh_size(&mut self) -> io::Result<()> {
        let (width, height) = terminal::size()?;
        self.size = TerminalSize { width, height };
        Ok(())
    }

    /// Waits up to `timeout` for input. Key releases and unsupported events
    /// read as [`TerminalEvent::Tick`].
    pub fn poll_event(&mut self, timeout: Duration) -> io::Result<TerminalEvent> {
        if !event::poll(timeout)? {
            return Ok(TerminalEvent::Tick);
        }
        match event::read()? {
            CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => {
                Ok(TerminalEvent::Key(map_key_event(key)))
            }
            CrosstermEvent::Resize(width, height) => {
                Ok(TerminalEvent::Resize(TerminalSize { width, height }))
            }
            _ => Ok(TerminalEvent::Tick),
        }
    }

    pub fn render_frame(&mut self, frame: &RenderFrame) -> io::Result<()> {
        let height = self.size.height as usize;
        let width = self.size.width;
        if height == 0 || width == 0 {
            return Ok(());
        }
        self.last_frame.clone_from(&frame.lines);

        let scroll_offset = match frame.cursor {
            Some(cur) => (cur.row as usize).saturating_sub(height.saturating_sub(1)),
            None => frame.lines.len().saturating_sub(height),
        };

        queue!(self.stdout, MoveTo(0, 0), Clear(ClearType::All))?;
        for row_idx in 0..height {
            let Some(line) = frame.lines.get(scroll_offset + row_idx) else {
                break;
            };
            queue!(self.stdout, MoveTo(0, row_idx as u16))?;
            self.write_span_line(line, width)?;
        }

        match frame.cursor.and_then(|cur| visible_cursor(cur, scroll_offset, height, width)) {
            Some(CursorPos { col, row }) => queue!(self.stdout, MoveTo(col, row), Show)?,
            None => queue!(self.stdout, Hide)?,
        }
        self.stdout.flush()
    }

    fn write_span_line(&mut self, line: &SpanLine, width: u16) -> io::Result<()> {
        let mut remaining = width as usize;
        for span in line {
            let clipped = clip_to_width(&span.text, remaining);
            if clipped.is_empty() {
                continue;
            }
            remaining = remaining.saturating_sub(UnicodeWidthStr::width(clipped.as_str()));
            if span.style.is_plain() {
                queue!(self.stdout, Print(clipped))?;
            } else {
                let styled = StyledContent::new(content_style(span.style), clipped);
                queue!(self.stdout, PrintStyledContent(styled))?;
            }
        }
        Ok(())
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = self.exit();
    }
}

fn visible_cursor(cur: CursorPos, scroll_offset: usize, height: usize, width: u16) -> Option<CursorPos> {
    let row = (cur.row as usize).checked_sub(scroll_offset)?;
    if row >= height {
        return None;
    }
    Some(CursorPos {
        col: cur.col.min(width.saturating_sub(1)),
        row: row as u16,
    })
}

fn content_style(style: Style) -> ContentStyle {
    let mut content = ContentStyle::new();
    content.foreground_color = style.color.map(map_color);
    content.background_color = style.background.map(map_color);
    if style.bold {
        content.attributes.set(Attribute::Bold);
    }
    if style.dim {
        content.attributes.set(Attribute::Dim);
    }
    content
}

fn map_color(color: Color) -> CrosstermColor {
    match color {
        Color::Reset => CrosstermColor::Reset,
        Color::Black => CrosstermColor::Black,
        Color::DarkGrey => CrosstermColor::DarkGrey,
        Color::Red => CrosstermColor::Red,
        Color::Green => CrosstermColor::Green,
        Color::Yellow => CrosstermColor::DarkYellow,
        Color::Blue => CrosstermColor::DarkBlue,
        Color::Magenta => CrosstermColor::DarkMagenta,
        Color::Cyan => CrosstermColor::DarkCyan,
        Color::White => CrosstermColor::White,
    }
}

fn map_key_event(key: CrosstermKeyEvent) -> KeyEvent {
    KeyEvent {
        code: map_key_code(key.code),
        modifiers: map_key_modifiers(key.modifiers),
    }
}

fn map_key_code(code: CrosstermKeyCode) -> KeyCode {
    match code {
        CrosstermKeyCode::Char(ch) => KeyCode::Char(ch),
        CrosstermKeyCode::Backspace => KeyCode::Backspace,
        CrosstermKeyCode::Enter => KeyCode::Enter,
        CrosstermKeyCode::Esc => KeyCode::Esc,
        CrosstermKeyCode::Left => KeyCode::Left,
        CrosstermKeyCode::Right => KeyCode::Right,
        CrosstermKeyCode::Up => KeyCode::Up,
        CrosstermKeyCode::Down => KeyCode::Down,
        CrosstermKeyCode::Home => KeyCode::Home,
        CrosstermKeyCode::End => KeyCode::End,
        CrosstermKeyCode::Tab => KeyCode::Tab,
        CrosstermKeyCode::BackTab => KeyCode::BackTab,
        CrosstermKeyCode::Delete => KeyCode::Delete,
        _ => KeyCode::Other,
    }
}

fn map_key_modifiers(modifiers: CrosstermKeyModifiers) -> KeyModifiers {
    let mut mapped = KeyModifiers::NONE;
    if modifiers.contains(CrosstermKeyModifiers::SHIFT) {
        mapped |= KeyModifiers::SHIFT;
    }
    if modifiers.contains(CrosstermKeyModifiers::CONTROL) {
        mapped |= KeyModifiers::CONTROL;
    }
    if modifiers.contains(CrosstermKeyModifiers::ALT) {
        mapped |= KeyModifiers::ALT;
    }
    mapped
}

fn clip_to_width(text: &str, max_width: usize) -> String {
    let mut used = 0usize;
    let mut out = String::new();
    for ch in text.chars().filter(|ch| !matches!(ch, '\n' | '\r')) {
        let ch_width = UnicodeWidthChar::width(ch).unwrap_or(0);
        if used.saturating_add(ch_width) > max_width {
            break;
        }
        out.push(ch);
        used = used.saturating_add(ch_width);
    }
    out
}
