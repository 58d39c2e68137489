//! Loader for the MNIST handwritten digits in their IDX file format.

use std::{fs, path::Path};

use log::info;
use ndarray::{Array2, s};

use super::{Batch, InMemoryDataset, Split};
use crate::{EcoErr, Result};

pub const TRAIN_IMAGES: &str = "train-images-idx3-ubyte";
pub const TRAIN_LABELS: &str = "train-labels-idx1-ubyte";
pub const TEST_IMAGES: &str = "t10k-images-idx3-ubyte";
pub const TEST_LABELS: &str = "t10k-labels-idx1-ubyte";

pub const CLASSES: usize = 10;
pub const DEFAULT_BATCH_SIZE: usize = 100;

const IMAGES_MAGIC: u32 = 0x0803;
const LABELS_MAGIC: u32 = 0x0801;

/// Images decoded from an IDX file, one row per image with pixels scaled to `[0, 1]`.
#[derive(Debug)]
pub struct Images {
    pub pixels: Array2<f32>,
}

/// Loads the MNIST train and test splits from the four IDX files inside `dir`.
///
/// Samples keep the order they have in the files.
///
/// # Arguments
/// * `dir` - The directory holding the uncompressed IDX files.
/// * `batch_size` - The amount of samples per batch, the last batch may be smaller.
///
/// # Returns
/// A `DatasetUnavailable` error if any file is missing or malformed.
pub fn load<P: AsRef<Path>>(dir: P, batch_size: usize) -> Result<InMemoryDataset> {
    let dir = dir.as_ref();

    let train = load_split(dir, TRAIN_IMAGES, TRAIN_LABELS, batch_size)?;
    let test = load_split(dir, TEST_IMAGES, TEST_LABELS, batch_size)?;

    info!(
        train_batches = train.batch_count(),
        test_batches = test.batch_count();
        "loaded MNIST from {}", dir.display()
    );

    Ok(InMemoryDataset::new(train, test))
}

fn load_split(dir: &Path, images: &str, labels: &str, batch_size: usize) -> Result<Split> {
    let images_path = dir.join(images);
    let labels_path = dir.join(labels);

    let images = parse_images(&read(&images_path)?, &images_path.display().to_string())?;
    let labels = parse_labels(&read(&labels_path)?, &labels_path.display().to_string())?;

    batches(images, &labels, batch_size)
}

fn read(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| EcoErr::DatasetUnavailable {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// Parses an IDX3 image file.
///
/// # Arguments
/// * `bytes` - The raw file content.
/// * `path` - Where the bytes came from, used for error reporting.
pub fn parse_images(bytes: &[u8], path: &str) -> Result<Images> {
    let unavailable = |reason: String| EcoErr::DatasetUnavailable {
        path: path.to_string(),
        reason,
    };

    let header = header::<4>(bytes).ok_or_else(|| unavailable("truncated header".into()))?;
    if header[0] != IMAGES_MAGIC {
        return Err(unavailable(format!("bad magic number {:#x}", header[0])));
    }

    let count = header[1] as usize;
    let (pixels, expected) = (header[2] as usize)
        .checked_mul(header[3] as usize)
        .and_then(|pixels| Some((pixels, count.checked_mul(pixels)?)))
        .ok_or_else(|| unavailable("image dimensions overflow".into()))?;
    let data = &bytes[16..];

    if data.len() != expected {
        return Err(unavailable(format!(
            "expected {expected} bytes of pixels, got {}",
            data.len()
        )));
    }

    let pixels = Array2::from_shape_fn((count, pixels), |(i, p)| {
        data[i * pixels + p] as f32 / u8::MAX as f32
    });

    Ok(Images { pixels })
}

/// Parses an IDX1 label file.
///
/// # Arguments
/// * `bytes` - The raw file content.
/// * `path` - Where the bytes came from, used for error reporting.
pub fn parse_labels(bytes: &[u8], path: &str) -> Result<Vec<u8>> {
    let unavailable = |reason: String| EcoErr::DatasetUnavailable {
        path: path.to_string(),
        reason,
    };

    let header = header::<2>(bytes).ok_or_else(|| unavailable("truncated header".into()))?;
    if header[0] != LABELS_MAGIC {
        return Err(unavailable(format!("bad magic number {:#x}", header[0])));
    }

    let labels = &bytes[8..];
    if labels.len() != header[1] as usize {
        return Err(unavailable(format!(
            "expected {} labels, got {}",
            header[1],
            labels.len()
        )));
    }

    if let Some(label) = labels.iter().find(|&&l| l as usize >= CLASSES) {
        return Err(unavailable(format!("label {label} out of range")));
    }

    Ok(labels.to_vec())
}

/// Reads the first `N` big endian words of an IDX file.
fn header<const N: usize>(bytes: &[u8]) -> Option<[u32; N]> {
    let mut words = [0; N];

    for (i, word) in words.iter_mut().enumerate() {
        let raw = bytes.get(i * 4..i * 4 + 4)?;
        *word = u32::from_be_bytes(raw.try_into().ok()?);
    }

    Some(words)
}

/// Groups images and their one-hot labels into batches of `batch_size`.
///
/// # Returns
/// An error if the amount of images and labels differ or `batch_size` is zero.
pub fn batches(images: Images, labels: &[u8], batch_size: usize) -> Result<Split> {
    let count = images.pixels.nrows();

    if labels.len() != count {
        return Err(EcoErr::SizeMismatch {
            what: "MNIST labels",
            got: labels.len(),
            expected: count,
        });
    }

    if batch_size == 0 {
        return Err(EcoErr::EmptyBatch);
    }

    let mut batches = Vec::with_capacity(count.div_ceil(batch_size));
    for start in (0..count).step_by(batch_size) {
        let end = (start + batch_size).min(count);

        let inputs = images.pixels.slice(s![start..end, ..]).to_owned();
        let one_hot = Array2::from_shape_fn((end - start, CLASSES), |(i, c)| {
            if labels[start + i] as usize == c { 1. } else { 0. }
        });

        batches.push(Batch::new(inputs, one_hot)?);
    }

    Split::new(batches)
}
