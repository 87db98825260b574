//! Built-in field extensions

mod delaying;
mod text;

pub use delaying::DelayingInput;
pub use text::TextInput;
