use ndarray::{Array1, ArrayBase, Data, Ix1};

use crate::{EcoErr, Result};

/// Decodes a one-hot vector into the index of its only `1.0`.
///
/// # Arguments
/// * `value` - The one-hot vector.
///
/// # Returns
/// An `InvalidOneHot` error if no position, or more than one position, equals `1.0`.
pub fn one_hot_decode<S>(value: &ArrayBase<S, Ix1>) -> Result<usize>
where
    S: Data<Elem = f32>,
{
    let mut hot = value.iter().enumerate().filter(|&(_, &v)| v == 1.0);

    match (hot.next(), hot.next()) {
        (Some((i, _)), None) => Ok(i),
        _ => Err(EcoErr::InvalidOneHot {
            value: value.to_vec(),
        }),
    }
}

/// Encodes a class index as a one-hot vector of `classes` entries.
pub fn one_hot_encode(class: usize, classes: usize) -> Array1<f32> {
    Array1::from_shape_fn(classes, |i| if i == class { 1. } else { 0. })
}

/// Returns the index of the greatest value, the first one wins on ties.
///
/// # Returns
/// `None` if the vector is empty.
pub fn argmax<S>(value: &ArrayBase<S, Ix1>) -> Option<usize>
where
    S: Data<Elem = f32>,
{
    let mut values = value.iter().enumerate();
    let (mut best, mut max) = values.next().map(|(i, &v)| (i, v))?;

    for (i, &v) in values {
        if max < v {
            best = i;
            max = v;
        }
    }

    Some(best)
}
