use crate::core::clock::{Clock, SystemClock};
use crate::core::errors::{COMPLETION_FAILED_MESSAGE, CompletionError, WizardError, WizardErrors};
use crate::core::snapshot::{self, WizardSnapshot};
use crate::core::step::{StepKind, StepStatus, wizard_id};
use crate::core::value::FormRecord;
use crate::runtime::scheduler::{Scheduler, SchedulerCommand};
use crate::storage::KeyValueStore;
use futures::FutureExt;
use futures::future::LocalBoxFuture;
use std::collections::HashSet;
use std::future::Future;
use std::rc::Rc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

const AUTOSAVE_KEY: &str = "autosave";

pub type CompletionFuture = LocalBoxFuture<'static, Result<(), CompletionError>>;

type CompletionHandler<D> = Box<dyn FnMut(D) -> CompletionFuture>;
type CancelHandler = Box<dyn FnMut()>;
type StepObserver<D> = Box<dyn FnMut(usize, &D)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionOutcome {
    Completed,
    Failed,
    /// No handler registered, or a completion was already in flight.
    Skipped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PersistTask {
    Save,
}

struct AutoSave {
    store: Rc<dyn KeyValueStore>,
    delay: Duration,
    scheduler: Scheduler<PersistTask>,
}

/// Step cursor, accumulated record, loading flag and error map. Navigation
/// never consults the proceed predicates; gating is left to the front-end.
///
/// With [`WizardBuilder::auto_save`], every change of data or step index
/// reschedules a debounced snapshot write, performed by the first
/// [`Wizard::tick`] after the delay.
pub struct Wizard<S: StepKind> {
    steps: Vec<S>,
    wizard_id: String,
    current: usize,
    data: S::Data,
    is_loading: bool,
    errors: WizardErrors,
    clock: Rc<dyn Clock>,
    autosave: Option<AutoSave>,
    on_complete: Option<CompletionHandler<S::Data>>,
    on_cancel: Option<CancelHandler>,
    on_step_change: Option<StepObserver<S::Data>>,
}

pub struct WizardBuilder<S: StepKind> {
    steps: Vec<S>,
    initial_data: S::Data,
    autosave: Option<(Rc<dyn KeyValueStore>, Duration)>,
    clock: Option<Rc<dyn Clock>>,
    on_complete: Option<CompletionHandler<S::Data>>,
    on_cancel: Option<CancelHandler>,
    on_step_change: Option<StepObserver<S::Data>>,
}

impl<S: StepKind> WizardBuilder<S> {
    pub fn initial_data(mut self, data: S::Data) -> Self {
        self.initial_data = data;
        self
    }

    pub fn auto_save(mut self, store: Rc<dyn KeyValueStore>, delay: Duration) -> Self {
        self.autosave = Some((store, delay));
        self
    }

    pub fn clock(mut self, clock: Rc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn on_complete<F, Fut>(mut self, mut handler: F) -> Self
    where
        F: FnMut(S::Data) -> Fut + 'static,
        Fut: Future<Output = Result<(), CompletionError>> + 'static,
    {
        self.on_complete = Some(Box::new(move |data| handler(data).boxed_local()));
        self
    }

    pub fn on_cancel<F>(mut self, handler: F) -> Self
    where
        F: FnMut() + 'static,
    {
        self.on_cancel = Some(Box::new(handler));
        self
    }

    pub fn on_step_change<F>(mut self, observer: F) -> Self
    where
        F: FnMut(usize, &S::Data) + 'static,
    {
        self.on_step_change = Some(Box::new(observer));
        self
    }

    pub fn build(self) -> Result<Wizard<S>, WizardError> {
        if self.steps.is_empty() {
            return Err(WizardError::NoSteps);
        }
        let mut seen = HashSet::new();
        for step in &self.steps {
            if !seen.insert(step.id()) {
                return Err(WizardError::DuplicateStep(step.id().to_string()));
            }
        }

        let wizard_id = wizard_id(&self.steps);
        let mut data = self.initial_data;
        let mut current = 0;

        let autosave = self.autosave.map(|(store, delay)| {
            match snapshot::load::<S::Data>(store.as_ref(), &wizard_id) {
                Ok(Some(saved)) => {
                    data.merge(saved.data);
                    if saved.current_step_index < self.steps.len() {
                        current = saved.current_step_index;
                    } else {
                        warn!(
                            wizard_id = %wizard_id,
                            index = saved.current_step_index,
                            "saved step index out of range, starting at the first step"
                        );
                    }
                    info!(wizard_id = %wizard_id, step = current, "restored saved progress");
                }
                Ok(None) => {}
                Err(err) => {
                    warn!(wizard_id = %wizard_id, error = %err, "could not read saved progress");
                }
            }
            AutoSave {
                store,
                delay,
                scheduler: Scheduler::new(),
            }
        });

        Ok(Wizard {
            steps: self.steps,
            wizard_id,
            current,
            data,
            is_loading: false,
            errors: WizardErrors::new(),
            clock: self.clock.unwrap_or_else(|| Rc::new(SystemClock)),
            autosave,
            on_complete: self.on_complete,
            on_cancel: self.on_cancel,
            on_step_change: self.on_step_change,
        })
    }
}

impl<S: StepKind> Wizard<S> {
    pub fn builder(steps: impl Into<Vec<S>>) -> WizardBuilder<S> {
        WizardBuilder {
            steps: steps.into(),
            initial_data: S::Data::default(),
            autosave: None,
            clock: None,
            on_complete: None,
            on_cancel: None,
            on_step_change: None,
        }
    }

    pub fn wizard_id(&self) -> &str {
        &self.wizard_id
    }

    pub fn steps(&self) -> &[S] {
        &self.steps
    }

    pub fn total_steps(&self) -> usize {
        self.steps.len()
    }

    pub fn current_step_index(&self) -> usize {
        self.current
    }

    pub fn current_step(&self) -> S {
        self.steps[self.current]
    }

    pub fn data(&self) -> &S::Data {
        &self.data
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn errors(&self) -> &WizardErrors {
        &self.errors
    }

    pub fn can_go_back(&self) -> bool {
        self.current > 0
    }

    pub fn can_go_next(&self) -> bool {
        self.current + 1 < self.steps.len()
    }

    pub fn is_last_step(&self) -> bool {
        self.current + 1 == self.steps.len()
    }

    pub fn can_skip(&self) -> bool {
        self.current_step().can_skip()
    }

    /// Proceed predicate of the current step over the current data.
    pub fn can_proceed(&self) -> bool {
        self.current_step().can_proceed(&self.data)
    }

    pub fn has_cancel_handler(&self) -> bool {
        self.on_cancel.is_some()
    }

    pub fn step_status(&self, index: usize) -> StepStatus {
        StepStatus::for_position(index, self.current)
    }

    /// Position as a rounded percentage, counting the current step as reached.
    pub fn progress_percent(&self) -> u8 {
        let total = self.steps.len();
        let reached = self.current + 1;
        ((reached * 100 + total / 2) / total) as u8
    }

    pub fn go_to_step(&mut self, index: usize) -> bool {
        if index >= self.steps.len() {
            debug!(wizard_id = %self.wizard_id, index, "ignoring out of range step");
            return false;
        }
        self.errors.clear();
        self.set_current(index);
        true
    }

    pub fn next_step(&mut self) -> bool {
        if !self.can_go_next() {
            return false;
        }
        self.errors.clear();
        self.set_current(self.current + 1);
        true
    }

    pub fn previous_step(&mut self) -> bool {
        if !self.can_go_back() {
            return false;
        }
        self.errors.clear();
        self.set_current(self.current - 1);
        true
    }

    pub fn skip_step(&mut self) -> bool {
        if !self.can_skip() {
            debug!(step = self.current_step().id(), "step cannot be skipped");
            return false;
        }
        self.next_step()
    }

    pub fn update_data(&mut self, patch: S::Data) {
        self.data.merge(patch);
        self.errors.clear();
        self.schedule_save();
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.is_loading = loading;
    }

    pub fn set_errors(&mut self, errors: WizardErrors) {
        self.errors = errors;
    }

    /// Starts completion: marks the wizard loading and hands back the
    /// handler's future. Pass its output to [`Wizard::finish_complete`].
    pub fn begin_complete(&mut self) -> Option<CompletionFuture> {
        if self.is_loading {
            debug!(wizard_id = %self.wizard_id, "completion already in flight");
            return None;
        }
        let handler = self.on_complete.as_mut()?;
        let future = handler(self.data.clone());
        self.is_loading = true;
        info!(wizard_id = %self.wizard_id, "completing wizard");
        Some(future)
    }

    pub fn finish_complete(&mut self, result: Result<(), CompletionError>) -> CompletionOutcome {
        self.is_loading = false;
        match result {
            Ok(()) => {
                self.discard_progress();
                info!(wizard_id = %self.wizard_id, "wizard completed");
                CompletionOutcome::Completed
            }
            Err(err) => {
                error!(wizard_id = %self.wizard_id, error = %err, "wizard completion failed");
                self.errors = WizardErrors::general(COMPLETION_FAILED_MESSAGE);
                CompletionOutcome::Failed
            }
        }
    }

    pub async fn complete(&mut self) -> CompletionOutcome {
        let Some(future) = self.begin_complete() else {
            return CompletionOutcome::Skipped;
        };
        let result = future.await;
        self.finish_complete(result)
    }

    /// Drops saved progress and notifies the cancellation handler. In-memory
    /// state is left for the owner to discard.
    pub fn cancel(&mut self) {
        self.discard_progress();
        info!(wizard_id = %self.wizard_id, step = self.current, "wizard cancelled");
        if let Some(handler) = self.on_cancel.as_mut() {
            handler();
        }
    }

    /// Writes the snapshot if its debounce delay has elapsed.
    pub fn tick(&mut self) -> bool {
        let now = self.clock.now();
        let ready = match self.autosave.as_mut() {
            Some(autosave) => autosave.scheduler.drain_ready(now),
            None => return false,
        };
        if ready.is_empty() {
            return false;
        }
        self.write_snapshot();
        true
    }

    /// Writes a pending snapshot immediately.
    pub fn flush_autosave(&mut self) -> bool {
        let now = self.clock.now();
        let Some(autosave) = self.autosave.as_mut() else {
            return false;
        };
        if !autosave.scheduler.is_pending(AUTOSAVE_KEY) {
            return false;
        }
        autosave.scheduler.schedule(
            SchedulerCommand::Cancel {
                key: AUTOSAVE_KEY.to_string(),
            },
            now,
        );
        self.write_snapshot();
        true
    }

    pub fn has_pending_save(&self) -> bool {
        self.autosave
            .as_ref()
            .is_some_and(|autosave| autosave.scheduler.is_pending(AUTOSAVE_KEY))
    }

    /// Time until the pending snapshot write is due, capped at `default`.
    pub fn autosave_due_in(&self, default: Duration) -> Duration {
        match &self.autosave {
            Some(autosave) => autosave.scheduler.poll_timeout(self.clock.now(), default),
            None => default,
        }
    }

    fn set_current(&mut self, index: usize) {
        if index == self.current {
            return;
        }
        debug!(wizard_id = %self.wizard_id, from = self.current, to = index, "step changed");
        self.current = index;
        self.schedule_save();
        if let Some(observer) = self.on_step_change.as_mut() {
            observer(self.current, &self.data);
        }
    }

    fn schedule_save(&mut self) {
        let now = self.clock.now();
        if let Some(autosave) = self.autosave.as_mut() {
            autosave.scheduler.schedule(
                SchedulerCommand::Debounce {
                    key: AUTOSAVE_KEY.to_string(),
                    delay: autosave.delay,
                    event: PersistTask::Save,
                },
                now,
            );
        }
    }

    fn write_snapshot(&self) {
        let Some(autosave) = self.autosave.as_ref() else {
            return;
        };
        let saved = WizardSnapshot::new(self.wizard_id.as_str(), self.current, self.data.clone());
        match snapshot::save(autosave.store.as_ref(), &saved) {
            Ok(()) => debug!(wizard_id = %self.wizard_id, step = self.current, "progress saved"),
            Err(err) => warn!(wizard_id = %self.wizard_id, error = %err, "could not save progress"),
        }
    }

    fn discard_progress(&mut self) {
        let now = self.clock.now();
        let Some(autosave) = self.autosave.as_mut() else {
            return;
        };
        autosave.scheduler.schedule(
            SchedulerCommand::Cancel {
                key: AUTOSAVE_KEY.to_string(),
            },
            now,
        );
        if let Err(err) = snapshot::clear(autosave.store.as_ref(), &self.wizard_id) {
            warn!(wizard_id = %self.wizard_id, error = %err, "could not clear saved progress");
        }
    }
}
