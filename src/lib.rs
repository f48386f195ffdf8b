pub mod config;
pub mod core;
pub mod flows;
pub mod input;
pub mod logging;
pub mod runtime;
pub mod storage;
pub mod terminal;
pub mod ui;
pub mod validation;

pub use core::step;
pub use core::value;
pub use core::wizard;

pub use ui::layout;
pub use ui::renderer;
pub use ui::span;
pub use ui::style;
pub use ui::theme;
