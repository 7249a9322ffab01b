use crate::error::{MissingDatabaseUrlSnafu, ParseEnvNumberSnafu, RosterResult};
use dotenvy::var;
use secrecy::{ExposeSecret, SecretString};
use snafu::{OptionExt, ResultExt};
use std::{
    net::{Ipv4Addr, SocketAddr},
    path::PathBuf,
    sync::Arc,
};

const DEFAULT_PORT: u16 = 3001;
const DEFAULT_UPLOADS_DIR: &str = "uploads";
const DEFAULT_STATIC_DIR: &str = "dist";
const DEFAULT_UPLOAD_LIMIT_BYTES: usize = 10 * 1024 * 1024;

#[derive(Clone, Debug)]
pub struct RuntimeConfiguration {
    db_config: Arc<DbConfig>,
    server_config: Arc<ServerConfig>,
}

impl RuntimeConfiguration {
    pub fn new() -> RosterResult<Self> {
        Ok(Self::with(DbConfig::new(), ServerConfig::new()?))
    }

    pub fn with(db_config: DbConfig, server_config: ServerConfig) -> Self {
        Self {
            db_config: Arc::new(db_config),
            server_config: Arc::new(server_config),
        }
    }

    pub fn db_config(&self) -> Arc<DbConfig> {
        self.db_config.clone()
    }

    pub fn server_config(&self) -> Arc<ServerConfig> {
        self.server_config.clone()
    }
}

#[derive(Debug)]
pub struct DbConfig {
    url: Option<SecretString>,
}

impl DbConfig {
    pub fn new() -> Self {
        Self::from_url(var("DATABASE_URL").ok())
    }

    pub fn from_url(url: Option<String>) -> Self {
        Self {
            url: url
                .filter(|url| !url.trim().is_empty())
                .map(SecretString::from),
        }
    }

    pub fn get_db_path(&self) -> RosterResult<&str> {
        self.url
            .as_ref()
            .map(|url| url.expose_secret())
            .context(MissingDatabaseUrlSnafu)
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub uploads_dir: PathBuf,
    pub static_dir: PathBuf,
    pub upload_limit_bytes: usize,
}

impl ServerConfig {
    pub fn new() -> RosterResult<Self> {
        Ok(Self {
            port: optional_number("PORT")?.unwrap_or(DEFAULT_PORT),
            uploads_dir: var("UPLOADS_DIR")
                .map_or_else(|_| DEFAULT_UPLOADS_DIR.into(), PathBuf::from),
            static_dir: var("STATIC_DIR").map_or_else(|_| DEFAULT_STATIC_DIR.into(), PathBuf::from),
            upload_limit_bytes: optional_number("UPLOAD_LIMIT_BYTES")?
                .unwrap_or(DEFAULT_UPLOAD_LIMIT_BYTES),
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            uploads_dir: DEFAULT_UPLOADS_DIR.into(),
            static_dir: DEFAULT_STATIC_DIR.into(),
            upload_limit_bytes: DEFAULT_UPLOAD_LIMIT_BYTES,
        }
    }
}

///unset (or unreadable) means "use the default", set-but-garbage is an error
fn optional_number<T: std::str::FromStr<Err = std::num::ParseIntError>>(
    name: &'static str,
) -> RosterResult<Option<T>> {
    match var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .context(ParseEnvNumberSnafu { name }),
        Err(_) => Ok(None),
    }
}
