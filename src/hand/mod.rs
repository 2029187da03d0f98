pub mod fingers;
pub mod landmark;

pub use fingers::FingerState;
pub use landmark::{HandLandmarks, Landmark, LandmarkIndex};
