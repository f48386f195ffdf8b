pub mod layout;
pub mod navigation;
pub mod progress;
pub mod renderer;
pub mod span;
pub mod spinner;
pub mod style;
pub mod theme;

pub use navigation::{NavAction, NavButton, NavControls, NavOptions};
pub use progress::render_progress;
pub use renderer::{FrameOptions, RenderFrame, Renderer};
pub use theme::Theme;
