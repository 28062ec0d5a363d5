use thiserror::Error;

/// Library errors using thiserror for structured error handling.
///
/// Load-time errors (table, bundle, config) are fatal to plugin activation.
/// Playback-time errors are recovered locally: logged, the scheduler
/// returns to idle, no retry.

#[derive(Error, Debug)]
pub enum TableError {
    #[error("Failed to read variant table")]
    Io(#[source] std::io::Error),

    #[error("Variant table is missing its header row")]
    MissingHeader,

    #[error("Unknown skill name in variant table: {0:?}")]
    UnknownSkill(String),

    #[error("Duplicate variant table row for skill: {0}")]
    DuplicateSkill(String),

    #[error("Variant table has no row for skill: {0}")]
    MissingSkill(String),

    #[error("Variant table row for {skill} has {found} level columns, expected 99")]
    WrongColumnCount { skill: String, found: usize },

    #[error("Invalid variant flag {value:?} for {skill} level {level}, expected \"0\" or \"1\"")]
    InvalidFlag {
        skill: String,
        level: u8,
        value: String,
    },
}

#[derive(Error, Debug)]
pub enum BundleError {
    #[error("Jingle resource not found: {path}")]
    MissingResource { path: String },

    #[error("Failed to read jingle resource: {path}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Error, Debug)]
pub enum PlayerError {
    #[error("Jingle resource not found: {0}")]
    ResourceNotFound(String),

    #[error("Failed to decode jingle audio")]
    UnsupportedFormat(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Failed to open audio output device")]
    DeviceUnavailable(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Jingle playback failed")]
    PlaybackFailed(#[source] Box<dyn std::error::Error + Send + Sync>),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration from {path}")]
    LoadFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Failed to save configuration to {path}")]
    SaveFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Type alias for application Results using anyhow for context chaining
pub type AppResult<T> = anyhow::Result<T>;
