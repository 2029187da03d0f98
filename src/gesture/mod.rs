pub mod classify;
pub mod stability;

pub use classify::{classify, Gesture};
pub use stability::GestureWindow;
