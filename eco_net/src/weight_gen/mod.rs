mod constant;
mod random;
mod weight_gen;

pub use constant::ConstWeightGen;
pub use random::{RandWeightGen, generate_rng};
pub use weight_gen::WeightGen;
