use ndarray::{Array1, ArrayView1};

use crate::arch::activations::Step;

/// The entry layer of the network, it has no parameters and only binarizes its input.
#[derive(Clone, Debug)]
pub struct Input {
    size: usize,
    step: Step,
}

impl Input {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            step: Step::new(),
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn process(&self, x: ArrayView1<f32>) -> Array1<f32> {
        debug_assert_eq!(x.len(), self.size);
        self.step.apply(&x)
    }
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;

    #[test]
    fn binarizes_pixels() {
        let input = Input::new(4);
        let x = array![0., 0.1, 0.9, 1.];

        assert_eq!(input.process(x.view()), array![0., 1., 1., 1.]);
    }
}
