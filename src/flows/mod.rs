pub mod catalog;
pub mod onboarding;
pub mod request;
pub mod view;

pub use onboarding::{OnboardingForm, OnboardingStep};
pub use request::{CreateRequestForm, RequestStep};
pub use view::{StepProps, StepResponse, StepView, ViewedStep};
