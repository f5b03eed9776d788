use birzha::BirzhaError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Birzha(#[from] BirzhaError),

    #[error("unknown symbol '{0}' (use `birzha list` to see the catalogs)")]
    UnknownSymbol(String),
}

impl CliError {
    /// Input mistakes exit with 2, runtime failures with 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::UnknownSymbol(_) => 2,
            Self::Birzha(err) if err.is_input_error() => 2,
            Self::Birzha(_) => 1,
        }
    }
}
