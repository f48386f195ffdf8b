pub mod input_event;
pub mod terminal;

pub use input_event::{CursorPos, KeyCode, KeyEvent, KeyModifiers, TerminalEvent, TerminalSize};
pub use terminal::Terminal;
