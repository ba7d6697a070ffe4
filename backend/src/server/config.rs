//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use actix_web::cookie::{Key, SameSite};
use ledger::outbound::remote::RemoteServiceConfig;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) remote: Option<RemoteServiceConfig>,
    pub(crate) students_table: String,
}

impl ServerConfig {
    /// Construct a server configuration that serves the in-process fixtures.
    #[must_use]
    pub fn new(key: Key, cookie_secure: bool, same_site: SameSite, bind_addr: SocketAddr) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            remote: None,
            students_table: "students".to_owned(),
        }
    }

    /// Talk to the hosted service instead of the fixtures.
    #[must_use]
    pub fn with_remote(mut self, remote: RemoteServiceConfig, students_table: &str) -> Self {
        self.remote = Some(remote);
        self.students_table = students_table.to_owned();
        self
    }
}
