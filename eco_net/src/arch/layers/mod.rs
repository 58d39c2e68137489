mod hidden;
mod input;
mod layer;
mod output;

pub use hidden::{Corrections, Hidden};
pub use input::Input;
pub use layer::Layer;
pub use output::Output;
