#[derive(Debug, PartialEq, thiserror::Error)]
pub enum ColonnadeScaleError {
    #[error("Available width must be positive, got {0}")]
    NonPositiveWidth(f64),
}
