pub mod handler;
pub mod keyboard;
pub mod sampler;

pub use handler::{InputHandler, KeyAction};
pub use keyboard::{Keyboard, KeyboardPad};
pub use sampler::{InputSampler, InputSource};
