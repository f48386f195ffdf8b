use crate::config::WizardVariant;
use crate::core::step::StepKind;
use crate::core::wizard::Wizard;
use crate::terminal::{CursorPos, TerminalSize};
use crate::ui::layout::Layout;
use crate::ui::navigation::{NavControls, NavOptions};
use crate::ui::progress::render_progress;
use crate::ui::span::{Span, SpanLine};
use crate::ui::spinner::Spinner;
use crate::ui::theme::Theme;

const KEY_HINT: &str = "Enter: verder · Tab: volgend veld · Ctrl+B: terug · Ctrl+S: overslaan · Esc: annuleren · Ctrl+C: later verder";

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RenderFrame {
    pub lines: Vec<SpanLine>,
    pub cursor: Option<CursorPos>,
}

impl RenderFrame {
    pub fn new(lines: Vec<SpanLine>) -> Self {
        Self {
            lines,
            cursor: None,
        }
    }

    /// Appends `other`, shifting its cursor below the current lines.
    pub fn append(&mut self, other: RenderFrame) {
        let offset = self.lines.len() as u16;
        if let Some(cursor) = other.cursor {
            self.cursor = Some(CursorPos {
                col: cursor.col,
                row: cursor.row.saturating_add(offset),
            });
        }
        self.lines.extend(other.lines);
    }

    pub fn push(&mut self, line: SpanLine) {
        self.lines.push(line);
    }
}

#[derive(Debug, Clone)]
pub struct FrameOptions {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub show_progress: bool,
    pub show_step_numbers: bool,
    pub variant: WizardVariant,
    pub nav: NavOptions,
}

impl Default for FrameOptions {
    fn default() -> Self {
        Self {
            title: None,
            subtitle: None,
            show_progress: true,
            show_step_numbers: true,
            variant: WizardVariant::Default,
            nav: NavOptions::default(),
        }
    }
}

/// Assembles the whole wizard screen around a step body.
pub struct Renderer {
    pub theme: Theme,
    pub spinner: Spinner,
}

impl Renderer {
    pub fn new(theme: Theme) -> Self {
        Self {
            theme,
            spinner: Spinner::new(),
        }
    }

    pub fn render<S: StepKind>(
        &self,
        wizard: &Wizard<S>,
        body: RenderFrame,
        options: &FrameOptions,
        size: TerminalSize,
    ) -> RenderFrame {
        let theme = &self.theme;
        let step = wizard.current_step();
        let mut frame = RenderFrame::default();

        let title = options.title.as_deref().unwrap_or(step.title());
        let subtitle = options.subtitle.as_deref().or(step.description());
        match options.variant {
            WizardVariant::Minimal => {
                frame.push(vec![Span::styled(title, theme.title)]);
            }
            WizardVariant::Compact => {
                let rule = "─".repeat((size.width as usize).clamp(1, 60));
                frame.push(vec![Span::styled(rule.clone(), theme.muted).no_wrap()]);
                frame.push(vec![Span::styled(title, theme.title)]);
                if let Some(subtitle) = subtitle {
                    frame.push(vec![Span::styled(subtitle, theme.subtitle)]);
                }
                frame.push(vec![Span::styled(rule, theme.muted).no_wrap()]);
            }
            WizardVariant::Default => {
                frame.push(vec![Span::styled(title, theme.title)]);
                if let Some(subtitle) = subtitle {
                    frame.push(vec![Span::styled(subtitle, theme.subtitle)]);
                }
            }
        }
        frame.push(SpanLine::new());

        if options.show_progress {
            frame
                .lines
                .extend(render_progress(wizard, options.variant, options.show_step_numbers, theme));
            frame.push(SpanLine::new());
        }

        if let Some(message) = wizard.errors().general_message() {
            frame.push(vec![Span::styled(format!("! {message}"), theme.error)]);
            frame.push(SpanLine::new());
        }

        // Step heading only when the header did not already show it.
        if options.title.is_some() {
            frame.push(vec![Span::styled(step.title(), theme.focused)]);
            if let Some(description) = step.description() {
                frame.push(vec![Span::styled(description, theme.muted)]);
            }
            frame.push(SpanLine::new());
        }

        frame.append(body);
        frame.push(SpanLine::new());

        let controls = NavControls::derive(wizard, &options.nav);
        frame.push(controls.render(theme, &self.spinner));
        frame.push(vec![Span::styled(KEY_HINT, theme.hint)]);

        let (lines, cursor) = Layout::compose_with_cursor(&frame.lines, frame.cursor, size.width);
        RenderFrame { lines, cursor }
    }
}
