/// Wizard-level actions reachable from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Next step, or completion on the last step.
    Primary,
    Back,
    Skip,
    Cancel,
    /// Leave without cancelling; saved progress is kept.
    Exit,
}
