pub mod one_euro;
pub mod remap;

pub use one_euro::{CursorFilter, OneEuroFilter};
pub use remap::{map_range, ActiveArea};
