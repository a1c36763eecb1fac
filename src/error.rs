use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid canvas width: {width}")]
    InvalidCanvas { width: f64 },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("column `{column}` required by the {axis} dimension is missing from the table")]
    MissingColumn { column: String, axis: &'static str },

    #[error("invalid data: {0}")]
    InvalidData(String),
}
