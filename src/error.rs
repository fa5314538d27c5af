// Crate error types
// The rendering paths are total and never fail; errors only exist at the
// fallible edges (configuration and demo-binary file IO).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read or write the config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not parse the config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("could not serialize the config: {0}")]
    Serialize(#[from] toml::ser::Error),
}
