use std::{env, path::Path};

use anyhow::{ensure, Context};
use config::{Config, Environment, File, FileFormat};
use dispatcher::{DispatcherConfig, RedirectPolicy, TemplateFallback};
use serde::Deserialize;

pub const SETTINGS_FILE: &str = "server.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server_bind: String,
    pub debug: bool,
    pub views_dir: String,
    pub template_fallback: bool,
    pub permanent_redirect_status: u16,
    pub temporary_redirect_status: u16,
    pub identity_header: String,
    pub admins: Vec<String>,
    pub editors: Vec<String>,
    pub login_url: String,
    pub logout_url: String,
    pub max_body_bytes: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:8080".into(),
            debug: false,
            views_dir: "views".into(),
            template_fallback: true,
            permanent_redirect_status: 301,
            temporary_redirect_status: 302,
            identity_header: "x-user-email".into(),
            admins: Vec::new(),
            editors: Vec::new(),
            login_url: "/_auth/login".into(),
            logout_url: "/_auth/logout".into(),
            max_body_bytes: 64 * 1024,
        }
    }
}

impl Settings {
    pub fn dispatcher_config(&self) -> DispatcherConfig {
        DispatcherConfig {
            debug: self.debug,
            redirects: RedirectPolicy {
                permanent: self.permanent_redirect_status,
                temporary: self.temporary_redirect_status,
            },
        }
    }

    pub fn template_fallback(&self) -> TemplateFallback {
        TemplateFallback::from(self.template_fallback)
    }

    fn validate(self) -> anyhow::Result<Self> {
        for (name, status) in [
            ("permanent_redirect_status", self.permanent_redirect_status),
            ("temporary_redirect_status", self.temporary_redirect_status),
        ] {
            ensure!(
                (300..=399).contains(&status),
                "{name} must be a 3xx status, got {status}"
            );
        }
        ensure!(
            !self.identity_header.trim().is_empty(),
            "identity_header must not be empty"
        );
        Ok(self)
    }
}

/// The hosting platform reports `Development/x.y` when running locally.
pub fn is_development_server(server_software: &str) -> bool {
    server_software.starts_with("Development")
}

pub fn load_settings() -> anyhow::Result<Settings> {
    load_settings_from(Path::new(SETTINGS_FILE))
}

/// Defaults, then the optional TOML file, then `APP__*` variables, then the
/// legacy `SERVER_BIND` and `SERVER_SOFTWARE` variables.
pub fn load_settings_from(path: &Path) -> anyhow::Result<Settings> {
    let defaults = Settings::default();
    let path_str = path.to_string_lossy();

    let debug_from_platform = env::var("SERVER_SOFTWARE")
        .ok()
        .filter(|software| is_development_server(software))
        .map(|_| true);

    let config = Config::builder()
        .set_default("server_bind", defaults.server_bind)?
        .set_default("debug", defaults.debug)?
        .set_default("views_dir", defaults.views_dir)?
        .set_default("template_fallback", defaults.template_fallback)?
        .set_default(
            "permanent_redirect_status",
            i64::from(defaults.permanent_redirect_status),
        )?
        .set_default(
            "temporary_redirect_status",
            i64::from(defaults.temporary_redirect_status),
        )?
        .set_default("identity_header", defaults.identity_header)?
        .set_default("admins", defaults.admins)?
        .set_default("editors", defaults.editors)?
        .set_default("login_url", defaults.login_url)?
        .set_default("logout_url", defaults.logout_url)?
        .set_default("max_body_bytes", defaults.max_body_bytes as i64)?
        .add_source(File::new(&path_str, FileFormat::Toml).required(false))
        .add_source(
            Environment::with_prefix("APP")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("admins")
                .with_list_parse_key("editors"),
        )
        .set_override_option("server_bind", env::var("SERVER_BIND").ok())?
        .set_override_option("debug", debug_from_platform)?
        .build()
        .with_context(|| format!("failed to load settings from '{path_str}'"))?;

    config
        .try_deserialize::<Settings>()
        .context("invalid settings")?
        .validate()
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
