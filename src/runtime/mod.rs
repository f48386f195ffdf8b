pub mod command;
pub mod key_bindings;
pub mod runner;
pub mod scheduler;

pub use command::Command;
pub use key_bindings::{KeyBinding, KeyBindings};
pub use runner::{Flow, RunOutcome, WizardSession, run};
