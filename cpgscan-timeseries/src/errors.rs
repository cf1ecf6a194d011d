use thiserror::Error;

#[derive(Error, Debug)]
pub enum TimeSeriesError {
    #[error("Need at least {required} days to build the seed point, found {found}")]
    NotEnoughDays { required: usize, found: usize },

    #[error("Series `{0}` is empty")]
    EmptySeries(String),

    #[error("Series `{0}` is constant; percent change is undefined")]
    ConstantSeries(String),

    #[error("Rolling window must be at least 2, got {0}")]
    InvalidWindow(usize),

    #[error("Invalid date `{0}`, expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Failed to derive the t-value: {0}")]
    TValue(String),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type TimeSeriesResult<T> = std::result::Result<T, TimeSeriesError>;
