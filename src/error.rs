//! Unified error type.

use std::fmt;

/// The error type returned by nbhood's fallible operations.
///
/// Routing outcomes (404, 405) are expressed as HTTP
/// [`Response`](crate::Response) values, not as `Error`s. This type surfaces
/// infrastructure failures: loading configuration, binding a port, talking to
/// the document store, or encoding a result.
#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    Config(config::ConfigError),
    Addr(std::net::AddrParseError),
    Store(mongodb::error::Error),
    Decode(mongodb::bson::de::Error),
    Json(serde_json::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e)     => write!(f, "io: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Addr(e)   => write!(f, "invalid listen address: {e}"),
            Self::Store(e)  => write!(f, "store: {e}"),
            Self::Decode(e) => write!(f, "decode: {e}"),
            Self::Json(e)   => write!(f, "json: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e)     => Some(e),
            Self::Config(e) => Some(e),
            Self::Addr(e)   => Some(e),
            Self::Store(e)  => Some(e),
            Self::Decode(e) => Some(e),
            Self::Json(e)   => Some(e),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<config::ConfigError> for Error {
    fn from(e: config::ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<std::net::AddrParseError> for Error {
    fn from(e: std::net::AddrParseError) -> Self {
        Self::Addr(e)
    }
}

impl From<mongodb::error::Error> for Error {
    fn from(e: mongodb::error::Error) -> Self {
        Self::Store(e)
    }
}

impl From<mongodb::bson::de::Error> for Error {
    fn from(e: mongodb::bson::de::Error) -> Self {
        Self::Decode(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}
