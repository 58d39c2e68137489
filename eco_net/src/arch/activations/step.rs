use ndarray::{Array1, ArrayBase, Data, Ix1};

/// Binary step activation: clips to `[0, 1]` and takes the ceiling, so every unit ends up
/// being exactly `0.0` or `1.0`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Step;

impl Step {
    pub fn new() -> Self {
        Self
    }

    pub fn f(&self, z: f32) -> f32 {
        z.clamp(0., 1.).ceil()
    }

    /// Applies the activation element-wise over a vector.
    ///
    /// # Arguments
    /// * `z` - The pre-activation values.
    ///
    /// # Returns
    /// A new vector of binary values.
    pub fn apply<S>(&self, z: &ArrayBase<S, Ix1>) -> Array1<f32>
    where
        S: Data<Elem = f32>,
    {
        z.mapv(|z| self.f(z))
    }

    /// Same as [`Step::apply`] but reuses the given buffer.
    pub fn apply_into(&self, z: Array1<f32>) -> Array1<f32> {
        z.mapv_into(|z| self.f(z))
    }
}
