mod coordinates;
mod imprint;
pub(crate) mod settings;

pub use coordinates::{parse_xyz, read_xyz};
pub use imprint::write_header;
pub use settings::{Configuration, MoleculeConfig, SccConfig};

use crate::error::ScfError;
use thiserror::Error;

/// Errors while reading the input files of the program.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("could not access {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid configuration file: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("could not serialize the configuration: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("invalid parameter file: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("invalid xyz input, line {line}: {msg}")]
    Xyz { line: usize, msg: String },
    #[error(transparent)]
    Scf(#[from] ScfError),
}
