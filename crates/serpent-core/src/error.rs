use thiserror::Error;

/// Failure to parse one color string of a palette descriptor.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ColorError {
    #[error("empty color string")]
    Empty,
    #[error("invalid hex color `{0}`")]
    InvalidHex(String),
    #[error("expected at least {expected} channels in `{input}`")]
    MissingChannels { input: String, expected: usize },
    #[error("invalid color channel `{0}`")]
    InvalidChannel(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PaletteError {
    #[error("palette field `{field}`: {source}")]
    Color {
        field: &'static str,
        #[source]
        source: ColorError,
    },
}
