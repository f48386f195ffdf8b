use crate::config::WizardVariant;
use crate::core::step::{StepKind, StepStatus};
use crate::core::wizard::Wizard;
use crate::ui::span::{Span, SpanLine};
use crate::ui::theme::Theme;

const BAR_WIDTH: usize = 30;
const CONNECTOR: &str = "───";

/// Position indicator for the wizard, derived from engine state only.
pub fn render_progress<S: StepKind>(
    wizard: &Wizard<S>,
    variant: WizardVariant,
    show_step_numbers: bool,
    theme: &Theme,
) -> Vec<SpanLine> {
    match variant {
        WizardVariant::Default => vec![markers(wizard, show_step_numbers, theme)],
        WizardVariant::Compact => vec![dots(wizard, theme)],
        WizardVariant::Minimal => bar(wizard, theme),
    }
}

fn markers<S: StepKind>(wizard: &Wizard<S>, show_step_numbers: bool, theme: &Theme) -> SpanLine {
    let total = wizard.total_steps();
    let mut line = SpanLine::with_capacity(total * 2);
    for index in 0..total {
        let status = wizard.step_status(index);
        let glyph = match status {
            StepStatus::Completed => "(✓)".to_string(),
            _ if show_step_numbers => format!("({})", index + 1),
            _ => "(•)".to_string(),
        };
        let style = match status {
            StepStatus::Completed | StepStatus::Current => theme.accent,
            StepStatus::Upcoming => theme.muted,
        };
        line.push(Span::styled(glyph, style).no_wrap());

        if index + 1 < total {
            let style = if status == StepStatus::Completed {
                theme.success
            } else {
                theme.muted
            };
            line.push(Span::styled(CONNECTOR, style).no_wrap());
        }
    }
    line
}

fn dots<S: StepKind>(wizard: &Wizard<S>, theme: &Theme) -> SpanLine {
    let total = wizard.total_steps();
    let mut line = SpanLine::with_capacity(total + 1);
    for index in 0..total {
        let span = match wizard.step_status(index) {
            StepStatus::Upcoming => Span::styled("○ ", theme.muted),
            _ => Span::styled("● ", theme.accent),
        };
        line.push(span.no_wrap());
    }
    line.push(Span::styled(
        format!(" {}/{}", wizard.current_step_index() + 1, total),
        theme.muted,
    ));
    line
}

fn bar<S: StepKind>(wizard: &Wizard<S>, theme: &Theme) -> Vec<SpanLine> {
    let percent = wizard.progress_percent();
    let filled = (percent as usize * BAR_WIDTH + 50) / 100;
    vec![
        vec![
            Span::styled(
                format!(
                    "Stap {} van {}",
                    wizard.current_step_index() + 1,
                    wizard.total_steps()
                ),
                theme.muted,
            ),
            Span::styled(format!("  {percent}%"), theme.muted),
        ],
        vec![
            Span::styled("█".repeat(filled), theme.accent).no_wrap(),
            Span::styled("░".repeat(BAR_WIDTH - filled), theme.muted).no_wrap(),
        ],
    ]
}

#[cfg(test)]
mod tests {
    use super::render_progress;
    use crate::config::WizardVariant;
    use crate::core::step::fixtures::{ALL, TestStep};
    use crate::core::wizard::Wizard;
    use crate::ui::span::line_text;
    use crate::ui::theme::Theme;

    fn wizard_at(index: usize) -> Wizard<TestStep> {
        let mut wizard = Wizard::builder(ALL).build().expect("wizard");
        wizard.go_to_step(index);
        wizard
    }

    fn text(wizard: &Wizard<TestStep>, variant: WizardVariant, numbers: bool) -> Vec<String> {
        render_progress(wizard, variant, numbers, &Theme::default_theme())
            .iter()
            .map(|line| line_text(line))
            .collect()
    }

    #[test]
    fn default_variant_marks_completed_steps() {
        let wizard = wizard_at(1);
        assert_eq!(
            text(&wizard, WizardVariant::Default, true),
            vec!["(✓)───(2)───(3)"]
        );
        assert_eq!(
            text(&wizard, WizardVariant::Default, false),
            vec!["(✓)───(•)───(•)"]
        );
    }

    #[test]
    fn compact_variant_counts_steps() {
        let wizard = wizard_at(0);
        assert_eq!(text(&wizard, WizardVariant::Compact, true), vec!["● ○ ○  1/3"]);
    }

    #[test]
    fn minimal_variant_shows_rounded_percentage() {
        let wizard = wizard_at(0);
        let lines = text(&wizard, WizardVariant::Minimal, true);
        assert_eq!(lines[0], "Stap 1 van 3  33%");
        assert_eq!(lines[1].chars().filter(|c| *c == '█').count(), 10);
        assert_eq!(lines[1].chars().count(), 30);

        let wizard = wizard_at(2);
        let lines = text(&wizard, WizardVariant::Minimal, true);
        assert_eq!(lines[0], "Stap 3 van 3  100%");
        assert!(!lines[1].contains('░'));
    }
}
