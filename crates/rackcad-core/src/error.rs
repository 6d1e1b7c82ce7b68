use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid rack configuration")]
    Invalid(#[from] serde_json::Error),

    #[error("malformed section size {0:?}: expected \"<width>x<depth>\" with positive sides")]
    MalformedSection(String),
}
