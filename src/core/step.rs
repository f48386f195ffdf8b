use crate::core::value::FormRecord;
use std::fmt;

/// One entry of a wizard's step registry.
///
/// Concrete wizards implement this on a closed enum, one variant per step,
/// so the proceed predicate travels with the variant instead of being looked
/// up by identifier.
pub trait StepKind: Copy + Eq + fmt::Debug + 'static {
    type Data: FormRecord;

    /// Stable identifier, unique within the registry. Feeds the wizard id.
    fn id(&self) -> &'static str;

    fn title(&self) -> &'static str;

    fn description(&self) -> Option<&'static str> {
        None
    }

    fn can_skip(&self) -> bool {
        false
    }

    /// Whether `data` satisfies this step's completeness rules.
    ///
    /// Defaults to `true`: a step without rules never blocks. New steps that
    /// collect input must override this.
    fn can_proceed(&self, _data: &Self::Data) -> bool {
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Completed,
    Current,
    Upcoming,
}

impl StepStatus {
    pub fn for_position(index: usize, current: usize) -> Self {
        if index < current {
            Self::Completed
        } else if index == current {
            Self::Current
        } else {
            Self::Upcoming
        }
    }
}

/// Identifier shared by every instance built from the same step set.
pub fn wizard_id<S: StepKind>(steps: &[S]) -> String {
    let ids: Vec<&str> = steps.iter().map(StepKind::id).collect();
    format!("wizard-{}", ids.join("-"))
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::StepKind;
    use crate::core::value::FormData;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum TestStep {
        First,
        Optional,
        Last,
    }

    pub const ALL: [TestStep; 3] = [TestStep::First, TestStep::Optional, TestStep::Last];

    impl StepKind for TestStep {
        type Data = FormData;

        fn id(&self) -> &'static str {
            match self {
                Self::First => "first",
                Self::Optional => "optional",
                Self::Last => "last",
            }
        }

        fn title(&self) -> &'static str {
            match self {
                Self::First => "First",
                Self::Optional => "Optional",
                Self::Last => "Last",
            }
        }

        fn can_skip(&self) -> bool {
            matches!(self, Self::Optional)
        }

        fn can_proceed(&self, data: &FormData) -> bool {
            match self {
                Self::First => !data.text("name").is_empty(),
                _ => true,
            }
        }
    }
}
