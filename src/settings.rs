//! Process configuration, read once at startup from the environment.
//!
//! | Variable | Default |
//! |---|---|
//! | `MONGODB_HOST` | `localhost` |
//! | `MONGODB_DATABASE` | `nbhood` |
//! | `MONGODB_COLLECTION` | `nbhs` |
//! | `LISTEN_ADDR` | `0.0.0.0:9999` |

use std::collections::HashMap;
use std::net::SocketAddr;

use config::{Config, Environment};
use serde::Deserialize;

use crate::error::Error;

#[derive(Clone, Debug, Deserialize)]
pub struct Settings {
    /// Bare host (`db`, `db:27017`) or a full connection string.
    pub mongodb_host: String,
    pub mongodb_database: String,
    pub mongodb_collection: String,
    pub listen_addr: String,
}

impl Settings {
    pub fn from_env() -> Result<Self, Error> {
        Self::load(Environment::default())
    }

    /// Same as [`Settings::from_env`] but reads `vars` instead of the process
    /// environment.
    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self, Error> {
        Self::load(Environment::default().source(Some(vars)))
    }

    fn load(env: Environment) -> Result<Self, Error> {
        let settings = Config::builder()
            .set_default("mongodb_host", "localhost")?
            .set_default("mongodb_database", "nbhood")?
            .set_default("mongodb_collection", "nbhs")?
            .set_default("listen_addr", "0.0.0.0:9999")?
            .add_source(env)
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Connection string for the driver.
    pub fn mongodb_uri(&self) -> String {
        let host = self.mongodb_host.trim();
        if host.starts_with("mongodb://") || host.starts_with("mongodb+srv://") {
            host.to_owned()
        } else {
            format!("mongodb://{host}")
        }
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, Error> {
        Ok(self.listen_addr.parse()?)
    }
}
