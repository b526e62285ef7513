#[derive(Debug, thiserror::Error)]
pub enum ColonnadeDataError {
    #[error(
        "Highlight length ({highlight_len}) does not match value length ({value_len}) for column {column}"
    )]
    HighlightLengthMismatch {
        column: String,
        highlight_len: usize,
        value_len: usize,
    },

    #[error(
        "Value length ({value_len}) does not match category length ({category_len}) for column {column}"
    )]
    ValueLengthMismatch {
        column: String,
        value_len: usize,
        category_len: usize,
    },

    #[error("Category identity length ({identity_len}) does not match category value length ({value_len})")]
    IdentityLengthMismatch {
        identity_len: usize,
        value_len: usize,
    },

    #[error("css color parse error")]
    InvalidColor(#[from] csscolorparser::ParseColorError),
}
