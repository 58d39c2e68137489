use std::{
    error::Error,
    fmt::{self, Display},
};

/// The result type used in the entire crate.
pub type Result<T> = std::result::Result<T, EcoErr>;

/// The crate's error type.
#[derive(Debug, Clone, PartialEq)]
pub enum EcoErr {
    SizeMismatch {
        what: &'static str,
        got: usize,
        expected: usize,
    },
    InvalidTopology {
        what: &'static str,
        input_size: usize,
        output_size: usize,
    },
    InvalidOneHot {
        value: Vec<f32>,
    },
    DatasetUnavailable {
        path: String,
        reason: String,
    },
    InvalidDistribution(String),
    EmptyBatch,
}

impl Display for EcoErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EcoErr::SizeMismatch {
                what,
                got,
                expected,
            } => {
                format!("There's a size mismatch in {what}, got {got} and expected {expected}")
            }
            EcoErr::InvalidTopology {
                what,
                input_size,
                output_size,
            } => format!("The {what} can't map {input_size} units into {output_size} units"),
            EcoErr::InvalidOneHot { value } => {
                format!("Invalid input for one-hot decode: {value:?}")
            }
            EcoErr::DatasetUnavailable { path, reason } => {
                format!("The dataset at '{path}' is unavailable: {reason}")
            }
            EcoErr::InvalidDistribution(reason) => {
                format!("Invalid distribution parameters: {reason}")
            }
            EcoErr::EmptyBatch => "A batch must hold at least one sample".to_string(),
        };

        write!(f, "{s}")
    }
}

impl Error for EcoErr {}
