// SPDX-License-Identifier: Apache-2.0

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

pub const CONFIG_SCHEMA_VERSION: &str = "1";
pub const MIN_SECRET_KEY_BYTES: usize = 16;

#[derive(Clone)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub db_path: PathBuf,
    pub secret_key: String,
    pub csrf_ttl: Duration,
    pub max_body_bytes: usize,
    pub allow_get_delete: bool,
    pub enable_audit_log: bool,
    pub log_json: bool,
    pub shutdown_drain: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:5000".to_string(),
            db_path: PathBuf::from("cafes.db"),
            secret_key: String::new(),
            csrf_ttl: Duration::from_secs(3600),
            max_body_bytes: 16 * 1024,
            allow_get_delete: true,
            enable_audit_log: false,
            log_json: true,
            shutdown_drain: Duration::from_millis(2000),
        }
    }
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("bind_addr", &self.bind_addr)
            .field("db_path", &self.db_path)
            .field("secret_key", &"<redacted>")
            .field("csrf_ttl", &self.csrf_ttl)
            .field("max_body_bytes", &self.max_body_bytes)
            .field("allow_get_delete", &self.allow_get_delete)
            .field("enable_audit_log", &self.enable_audit_log)
            .field("log_json", &self.log_json)
            .field("shutdown_drain", &self.shutdown_drain)
            .finish()
    }
}

pub fn validate_startup_config(cfg: &ServerConfig) -> Result<(), String> {
    if cfg.bind_addr.trim().is_empty() {
        return Err("bind address must not be empty".to_string());
    }
    if cfg.db_path.as_os_str().is_empty() {
        return Err("database path must not be empty".to_string());
    }
    if cfg.max_body_bytes == 0 {
        return Err("max body bytes must be > 0".to_string());
    }
    if cfg.csrf_ttl.is_zero() {
        return Err("csrf token ttl must be > 0".to_string());
    }
    if cfg.secret_key.trim().is_empty() {
        return Err("a secret key is required for form-tamper protection".to_string());
    }
    if cfg.secret_key.len() < MIN_SECRET_KEY_BYTES {
        return Err(format!(
            "secret key must be at least {MIN_SECRET_KEY_BYTES} bytes"
        ));
    }
    Ok(())
}
