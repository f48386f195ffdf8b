pub mod choice_input;
pub mod input;
pub mod text_input;

pub use choice_input::{ChoiceInput, ChoiceOption};
pub use input::{Input, InputBase, KeyResult};
pub use text_input::TextInput;
