use thiserror::Error;

use crate::template::ConfigError;
use crate::tmux::{ListError, ParseError};

/// Any failure that ends up as the single item of an error menu
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    List(#[from] ListError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}
