use crate::config::WizardVariant;
use crate::core::step::StepKind;
use crate::core::wizard::Wizard;
use crate::ui::span::{Span, SpanLine};
use crate::ui::spinner::Spinner;
use crate::ui::theme::Theme;

pub const LABEL_BACK: &str = "Terug";
pub const LABEL_SKIP: &str = "Overslaan";
pub const LABEL_CANCEL: &str = "Annuleren";
pub const LABEL_NEXT: &str = "Volgende";
pub const LABEL_COMPLETE: &str = "Voltooien";
pub const LABEL_LOADING: &str = "Laden...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavAction {
    Back,
    Skip,
    Cancel,
    /// Next step, or completion on the last step.
    Primary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavOptions {
    pub allow_back_navigation: bool,
    pub show_cancel: bool,
    pub variant: WizardVariant,
}

impl Default for NavOptions {
    fn default() -> Self {
        Self {
            allow_back_navigation: true,
            show_cancel: true,
            variant: WizardVariant::Default,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavButton {
    pub action: NavAction,
    pub label: String,
    pub enabled: bool,
}

/// Buttons visible for the current wizard state, in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavControls {
    buttons: Vec<NavButton>,
    completes: bool,
    loading: bool,
}

impl NavControls {
    pub fn derive<S: StepKind>(wizard: &Wizard<S>, options: &NavOptions) -> Self {
        let loading = wizard.is_loading();
        let last = wizard.is_last_step();
        let compact = options.variant == WizardVariant::Compact;
        let label = |full: &str, icon: &str| {
            if compact { icon.to_string() } else { full.to_string() }
        };

        let back = (options.allow_back_navigation && wizard.can_go_back()).then(|| NavButton {
            action: NavAction::Back,
            label: label(LABEL_BACK, "‹"),
            enabled: !loading,
        });
        let skip = (options.variant != WizardVariant::Minimal && wizard.can_skip() && !last)
            .then(|| NavButton {
                action: NavAction::Skip,
                label: label(LABEL_SKIP, "»"),
                enabled: !loading,
            });
        let cancel = (options.variant != WizardVariant::Minimal
            && options.show_cancel
            && wizard.has_cancel_handler())
        .then(|| NavButton {
            action: NavAction::Cancel,
            label: label(LABEL_CANCEL, "✕"),
            enabled: !loading,
        });
        let primary_label = if loading {
            LABEL_LOADING
        } else if last {
            LABEL_COMPLETE
        } else {
            LABEL_NEXT
        };
        let primary = Some(NavButton {
            action: NavAction::Primary,
            label: primary_label.to_string(),
            enabled: !loading && wizard.can_proceed(),
        });

        let buttons = match options.variant {
            WizardVariant::Compact => [back, skip, primary, cancel],
            _ => [back, skip, cancel, primary],
        }
        .into_iter()
        .flatten()
        .collect();

        Self {
            buttons,
            completes: last,
            loading,
        }
    }

    pub fn buttons(&self) -> &[NavButton] {
        &self.buttons
    }

    /// Whether `action` is visible and enabled right now.
    pub fn allows(&self, action: NavAction) -> bool {
        self.buttons
            .iter()
            .any(|button| button.action == action && button.enabled)
    }

    pub fn primary_completes(&self) -> bool {
        self.completes
    }

    pub fn render(&self, theme: &Theme, spinner: &Spinner) -> SpanLine {
        let mut line = SpanLine::new();
        for (idx, button) in self.buttons.iter().enumerate() {
            if idx > 0 {
                line.push(Span::new("  ").no_wrap());
            }
            if button.action == NavAction::Primary && self.loading {
                line.push(spinner.span(theme));
                line.push(Span::new(" ").no_wrap());
            }
            let style = match (button.action, button.enabled) {
                (_, false) => theme.muted,
                (NavAction::Primary, true) => theme.accent,
                _ => theme.subtitle,
            };
            line.push(Span::styled(format!("[ {} ]", button.label), style).no_wrap());
        }
        line
    }
}

#[cfg(test)]
mod tests {
    use super::{NavAction, NavControls, NavOptions};
    use crate::config::WizardVariant;
    use crate::core::step::fixtures::{ALL, TestStep};
    use crate::core::value::FormData;
    use crate::core::wizard::Wizard;
    use crate::ui::span::line_text;
    use crate::ui::spinner::Spinner;
    use crate::ui::theme::Theme;

    fn labels(controls: &NavControls) -> Vec<&str> {
        controls
            .buttons()
            .iter()
            .map(|button| button.label.as_str())
            .collect()
    }

    fn with_cancel() -> Wizard<TestStep> {
        Wizard::builder(ALL).on_cancel(|| {}).build().expect("wizard")
    }

    #[test]
    fn first_step_has_no_back_and_gates_primary() {
        let mut wizard = with_cancel();
        let controls = NavControls::derive(&wizard, &NavOptions::default());
        assert_eq!(labels(&controls), vec!["Annuleren", "Volgende"]);
        assert!(!controls.allows(NavAction::Primary));
        assert!(!controls.allows(NavAction::Back));

        wizard.update_data(FormData::new().with("name", "Jan"));
        let controls = NavControls::derive(&wizard, &NavOptions::default());
        assert!(controls.allows(NavAction::Primary));
        assert!(!controls.primary_completes());
    }

    #[test]
    fn skippable_step_offers_skip() {
        let mut wizard = with_cancel();
        wizard.go_to_step(1);
        let controls = NavControls::derive(&wizard, &NavOptions::default());
        assert_eq!(
            labels(&controls),
            vec!["Terug", "Overslaan", "Annuleren", "Volgende"]
        );
        assert!(controls.allows(NavAction::Skip));
    }

    #[test]
    fn last_step_completes() {
        let mut wizard = Wizard::builder(ALL).build().expect("wizard");
        wizard.go_to_step(2);
        let controls = NavControls::derive(&wizard, &NavOptions::default());
        assert_eq!(labels(&controls), vec!["Terug", "Voltooien"]);
        assert!(controls.primary_completes());
        assert!(!controls.allows(NavAction::Cancel));
    }

    #[test]
    fn back_can_be_disabled_by_options() {
        let mut wizard = with_cancel();
        wizard.go_to_step(2);
        let options = NavOptions {
            allow_back_navigation: false,
            ..NavOptions::default()
        };
        let controls = NavControls::derive(&wizard, &options);
        assert!(!controls.allows(NavAction::Back));
    }

    #[test]
    fn loading_disables_everything() {
        let mut wizard = with_cancel();
        wizard.go_to_step(1);
        wizard.set_loading(true);
        let controls = NavControls::derive(&wizard, &NavOptions::default());
        assert!(controls.buttons().iter().all(|button| !button.enabled));
        assert!(labels(&controls).contains(&"Laden..."));
    }

    #[test]
    fn variants_change_layout() {
        let mut wizard = with_cancel();
        wizard.go_to_step(1);

        let compact = NavControls::derive(
            &wizard,
            &NavOptions {
                variant: WizardVariant::Compact,
                ..NavOptions::default()
            },
        );
        assert_eq!(labels(&compact), vec!["‹", "»", "Volgende", "✕"]);

        let minimal = NavControls::derive(
            &wizard,
            &NavOptions {
                variant: WizardVariant::Minimal,
                ..NavOptions::default()
            },
        );
        assert_eq!(labels(&minimal), vec!["Terug", "Volgende"]);
    }

    #[test]
    fn renders_buttons_in_a_row() {
        let mut wizard = with_cancel();
        wizard.go_to_step(2);
        let controls = NavControls::derive(&wizard, &NavOptions::default());
        let line = controls.render(&Theme::default_theme(), &Spinner::new());
        assert_eq!(line_text(&line), "[ Terug ]  [ Annuleren ]  [ Voltooien ]");
    }
}
