pub mod clock;
pub mod errors;
pub mod snapshot;
pub mod step;
pub mod value;
pub mod wizard;

pub use errors::{CompletionError, WizardError, WizardErrors};
pub use step::{StepKind, StepStatus};
pub use value::{FormData, FormRecord, Value};
pub use wizard::{CompletionOutcome, Wizard, WizardBuilder};
