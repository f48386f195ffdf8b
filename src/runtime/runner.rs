use crate::core::wizard::{CompletionOutcome, Wizard};
use crate::flows::view::{StepProps, StepResponse, StepView, ViewedStep};
use crate::runtime::command::Command;
use crate::runtime::key_bindings::KeyBindings;
use crate::terminal::{KeyEvent, Terminal, TerminalEvent, TerminalSize};
use crate::ui::navigation::{NavAction, NavControls};
use crate::ui::renderer::{FrameOptions, RenderFrame, Renderer};
use crate::ui::theme::Theme;
use std::io;
use std::time::Duration;
use tracing::debug;

const IDLE_POLL: Duration = Duration::from_millis(250);
const SPINNER_INTERVAL: Duration = Duration::from_millis(80);

/// What the caller should do after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    /// Primary action on the last step: run the completion handler.
    Complete,
    Cancelled,
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Completed,
    Cancelled,
    /// Left with Ctrl+C; saved progress is kept for the next run.
    Exited,
}

/// Routes keys to the current step view, falls back to the key bindings and
/// only runs actions the navigation bar currently offers.
pub struct WizardSession<S: ViewedStep> {
    wizard: Wizard<S>,
    view: Box<dyn StepView<S::Data>>,
    view_index: usize,
    options: FrameOptions,
    bindings: KeyBindings,
    renderer: Renderer,
}

impl<S: ViewedStep> WizardSession<S> {
    pub fn new(wizard: Wizard<S>, options: FrameOptions, theme: Theme) -> Self {
        let view = wizard.current_step().view(wizard.data());
        let view_index = wizard.current_step_index();
        Self {
            wizard,
            view,
            view_index,
            options,
            bindings: KeyBindings::new(),
            renderer: Renderer::new(theme),
        }
    }

    pub fn with_key_bindings(mut self, bindings: KeyBindings) -> Self {
        self.bindings = bindings;
        self
    }

    pub fn wizard(&self) -> &Wizard<S> {
        &self.wizard
    }

    pub fn frame(&self, size: TerminalSize) -> RenderFrame {
        let props = StepProps {
            data: self.wizard.data(),
            can_proceed: self.wizard.can_proceed(),
            is_loading: self.wizard.is_loading(),
            can_skip: self.wizard.can_skip(),
            errors: self.wizard.errors(),
            theme: &self.renderer.theme,
        };
        let body = self.view.render(&props);
        self.renderer.render(&self.wizard, body, &self.options, size)
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Flow {
        if self.wizard.is_loading() {
            return Flow::Continue;
        }
        let props = StepProps {
            data: self.wizard.data(),
            can_proceed: self.wizard.can_proceed(),
            is_loading: self.wizard.is_loading(),
            can_skip: self.wizard.can_skip(),
            errors: self.wizard.errors(),
            theme: &self.renderer.theme,
        };
        let command = match self.view.handle_key(key, &props) {
            StepResponse::Change(patch) => {
                self.wizard.update_data(patch);
                return Flow::Continue;
            }
            StepResponse::Handled => return Flow::Continue,
            StepResponse::Next => Command::Primary,
            StepResponse::Back => Command::Back,
            StepResponse::Skip => Command::Skip,
            StepResponse::Ignored => match self.bindings.resolve(key) {
                Some(command) => command,
                None => return Flow::Continue,
            },
        };
        self.apply(command)
    }

    /// Runs `command` if the navigation bar currently allows it.
    pub fn apply(&mut self, command: Command) -> Flow {
        let controls = NavControls::derive(&self.wizard, &self.options.nav);
        let action = match command {
            Command::Exit => return Flow::Exit,
            Command::Primary => NavAction::Primary,
            Command::Back => NavAction::Back,
            Command::Skip => NavAction::Skip,
            Command::Cancel => NavAction::Cancel,
        };
        if !controls.allows(action) {
            debug!(?action, step = self.wizard.current_step_index(), "action not available");
            return Flow::Continue;
        }

        match action {
            NavAction::Primary if controls.primary_completes() => return Flow::Complete,
            NavAction::Primary => {
                self.wizard.next_step();
            }
            NavAction::Back => {
                self.wizard.previous_step();
            }
            NavAction::Skip => {
                self.wizard.skip_step();
            }
            NavAction::Cancel => {
                self.wizard.cancel();
                return Flow::Cancelled;
            }
        }
        self.sync_view();
        Flow::Continue
    }

    fn sync_view(&mut self) {
        let index = self.wizard.current_step_index();
        if index != self.view_index {
            self.view = self.wizard.current_step().view(self.wizard.data());
            self.view_index = index;
        }
    }
}

/// Runs the session until it completes, is cancelled or the user exits.
/// Pending progress is flushed before returning.
pub async fn run<S: ViewedStep>(
    session: &mut WizardSession<S>,
    terminal: &mut Terminal,
) -> io::Result<RunOutcome> {
    terminal.enter()?;
    let result = drive(session, terminal).await;
    session.wizard.flush_autosave();
    let exit_result = terminal.exit();
    let outcome = result?;
    exit_result?;
    Ok(outcome)
}

async fn drive<S: ViewedStep>(
    session: &mut WizardSession<S>,
    terminal: &mut Terminal,
) -> io::Result<RunOutcome> {
    loop {
        terminal.render_frame(&session.frame(terminal.size()))?;

        let timeout = session.wizard().autosave_due_in(IDLE_POLL);
        let event = terminal.poll_event(timeout)?;
        session.wizard.tick();

        match event {
            TerminalEvent::Resize(size) => terminal.set_size(size),
            TerminalEvent::Tick => {}
            TerminalEvent::Key(key) => match session.handle_key(key) {
                Flow::Continue => {}
                Flow::Complete => {
                    if complete(session, terminal).await? == CompletionOutcome::Completed {
                        terminal.render_frame(&session.frame(terminal.size()))?;
                        return Ok(RunOutcome::Completed);
                    }
                }
                Flow::Cancelled => return Ok(RunOutcome::Cancelled),
                Flow::Exit => return Ok(RunOutcome::Exited),
            },
        }
    }
}

/// Awaits the completion handler while keeping the spinner moving.
async fn complete<S: ViewedStep>(
    session: &mut WizardSession<S>,
    terminal: &mut Terminal,
) -> io::Result<CompletionOutcome> {
    let Some(mut future) = session.wizard.begin_complete() else {
        return Ok(CompletionOutcome::Skipped);
    };
    session.renderer.spinner.reset();
    let mut interval = tokio::time::interval(SPINNER_INTERVAL);

    let result = loop {
        terminal.render_frame(&session.frame(terminal.size()))?;
        tokio::select! {
            result = &mut future => break result,
            _ = interval.tick() => session.renderer.spinner.tick(),
        }
    };
    Ok(session.wizard.finish_complete(result))
}

#[cfg(test)]
mod tests {
    use super::{Flow, WizardSession};
    use crate::core::errors::CompletionError;
    use crate::core::value::FormData;
    use crate::core::wizard::{CompletionOutcome, Wizard};
    use crate::flows::catalog::PAYMENT_METHODS_FIELD;
    use crate::flows::request::{self, AMOUNT_FIELD, RequestStep};
    use crate::runtime::command::Command;
    use crate::runtime::key_bindings::{KeyBinding, KeyBindings};
    use crate::terminal::{KeyCode, KeyEvent, TerminalSize};
    use crate::ui::renderer::FrameOptions;
    use crate::ui::span::line_text;
    use crate::ui::theme::Theme;

    const SIZE: TerminalSize = TerminalSize {
        width: 120,
        height: 40,
    };

    fn session(wizard: Wizard<RequestStep>) -> WizardSession<RequestStep> {
        WizardSession::new(wizard, FrameOptions::default(), Theme::default_theme())
    }

    fn typed(session: &mut WizardSession<RequestStep>, text: &str) {
        for ch in text.chars() {
            session.handle_key(KeyEvent::plain(KeyCode::Char(ch)));
        }
    }

    fn screen(session: &WizardSession<RequestStep>) -> Vec<String> {
        session
            .frame(SIZE)
            .lines
            .iter()
            .map(|line| line_text(line))
            .collect()
    }

    #[test]
    fn typing_updates_wizard_data() {
        let mut session = session(Wizard::builder(request::STEPS).build().expect("wizard"));
        typed(&mut session, "22,50");
        assert_eq!(session.wizard().data().text(AMOUNT_FIELD), "22.50");
        assert!(session.wizard().can_proceed());
    }

    #[test]
    fn enter_is_gated_by_can_proceed() {
        let mut session = session(Wizard::builder(request::STEPS).build().expect("wizard"));
        typed(&mut session, "0");
        assert_eq!(session.handle_key(KeyEvent::plain(KeyCode::Enter)), Flow::Continue);
        assert_eq!(session.wizard().current_step_index(), 0);

        typed(&mut session, "5");
        session.handle_key(KeyEvent::plain(KeyCode::Enter));
        assert_eq!(session.wizard().current_step_index(), 1);
        assert!(screen(&session).iter().any(|line| line.contains("Omschrijving")));
    }

    #[test]
    fn back_rebuilds_view_with_current_data() {
        let mut session = session(Wizard::builder(request::STEPS).build().expect("wizard"));
        typed(&mut session, "12");
        session.handle_key(KeyEvent::plain(KeyCode::Enter));
        session.handle_key(KeyEvent::ctrl('b'));
        assert_eq!(session.wizard().current_step_index(), 0);
        assert!(screen(&session).iter().any(|line| line.contains("Bedrag (€): 12")));
    }

    #[test]
    fn primary_on_last_step_requests_completion() {
        let mut wizard = Wizard::builder(request::STEPS).build().expect("wizard");
        wizard.go_to_step(4);
        let mut session = session(wizard);
        assert_eq!(session.handle_key(KeyEvent::plain(KeyCode::Enter)), Flow::Complete);
    }

    #[test]
    fn cancel_needs_a_handler() {
        let mut session = session(Wizard::builder(request::STEPS).build().expect("wizard"));
        assert_eq!(session.handle_key(KeyEvent::plain(KeyCode::Esc)), Flow::Continue);

        let mut session = self::session(
            Wizard::builder(request::STEPS)
                .on_cancel(|| {})
                .build()
                .expect("wizard"),
        );
        assert_eq!(session.handle_key(KeyEvent::plain(KeyCode::Esc)), Flow::Cancelled);
        assert_eq!(session.handle_key(KeyEvent::ctrl('c')), Flow::Exit);
    }

    #[test]
    fn custom_bindings_replace_defaults() {
        let mut bindings = KeyBindings::new();
        bindings.bind(KeyBinding::key(KeyCode::Esc), Command::Exit);
        let mut session = session(Wizard::builder(request::STEPS).build().expect("wizard"))
            .with_key_bindings(bindings);
        assert_eq!(session.handle_key(KeyEvent::plain(KeyCode::Esc)), Flow::Exit);
    }

    #[test]
    fn skip_is_ignored_on_required_steps() {
        let mut session = session(Wizard::builder(request::STEPS).build().expect("wizard"));
        assert_eq!(session.apply(Command::Skip), Flow::Continue);
        assert_eq!(session.wizard().current_step_index(), 0);
    }

    #[test]
    fn payment_selection_flows_into_data() {
        let mut wizard = Wizard::builder(request::STEPS).build().expect("wizard");
        wizard.go_to_step(2);
        let mut session = session(wizard);
        assert!(!session.wizard().can_proceed());
        session.handle_key(KeyEvent::plain(KeyCode::Char(' ')));
        assert_eq!(
            session.wizard().data().list(PAYMENT_METHODS_FIELD),
            ["tikkie".to_string()]
        );
        assert!(session.wizard().can_proceed());
    }

    fn walk_to_last_step(session: &mut WizardSession<RequestStep>) {
        typed(session, "22,50");
        session.handle_key(KeyEvent::plain(KeyCode::Enter));
        typed(session, "Oppassen");
        session.handle_key(KeyEvent::plain(KeyCode::Enter));
        session.handle_key(KeyEvent::plain(KeyCode::Char(' ')));
        session.handle_key(KeyEvent::plain(KeyCode::Enter));
        session.handle_key(KeyEvent::plain(KeyCode::Enter));
    }

    #[test]
    fn body_follows_the_current_step() {
        let mut session = session(Wizard::builder(request::STEPS).build().expect("wizard"));
        walk_to_last_step(&mut session);
        assert_eq!(session.wizard().current_step_index(), 4);
        let lines = screen(&session);
        assert!(lines.iter().any(|line| line.contains("Verzoek aangemaakt!")));
        assert!(!lines.iter().any(|line| line.contains("Bedrag (€):")));
        typed(&mut session, "9");
        assert_eq!(session.wizard().data().text(AMOUNT_FIELD), "22.50");
    }

    #[tokio::test]
    async fn failed_completion_shows_banner() {
        let wizard = Wizard::builder(request::STEPS)
            .on_complete(|_data: FormData| async { Err(CompletionError::new("offline")) })
            .build()
            .expect("wizard");
        let mut session = session(wizard);
        walk_to_last_step(&mut session);
        assert_eq!(session.handle_key(KeyEvent::plain(KeyCode::Enter)), Flow::Complete);
        assert_eq!(session.wizard.complete().await, CompletionOutcome::Failed);
        assert_eq!(session.wizard().current_step_index(), 4);
        assert!(screen(&session).iter().any(|line| line.starts_with("! Er is een fout")));
    }
}
