// SPDX-FileCopyrightText: 2026 Registrar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./registrar.toml` > `~/.config/registrar/registrar.toml` >
//! `/etc/registrar/registrar.toml` with environment variable overrides via `REGISTRAR_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::RegistrarConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/registrar/registrar.toml` (system-wide)
/// 3. `~/.config/registrar/registrar.toml` (user XDG config)
/// 4. `./registrar.toml` (local directory)
/// 5. `REGISTRAR_*` environment variables
pub fn load_config() -> Result<RegistrarConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env vars).
pub fn load_config_from_str(toml_content: &str) -> Result<RegistrarConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(RegistrarConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<RegistrarConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(RegistrarConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for config loading, before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(RegistrarConfig::default()))
        .merge(Toml::file("/etc/registrar/registrar.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("registrar/registrar.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("registrar.toml"))
        .merge(env_provider())
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `REGISTRAR_STORAGE_DATABASE_PATH` must map to
/// `storage.database_path`, not `storage.database.path`.
fn env_provider() -> Env {
    Env::prefixed("REGISTRAR_").map(|key| {
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("server_", "server.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("gateway_", "gateway.", 1);
        mapped.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_vars_override_file_values() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("registrar.toml", "[gateway]\nport = 7000\n")?;
            jail.set_env("REGISTRAR_GATEWAY_PORT", "7100");
            jail.set_env("REGISTRAR_STORAGE_DATABASE_PATH", "/tmp/jail.db");

            let config = load_config_from_path(Path::new("registrar.toml"))?;
            assert_eq!(config.gateway.port, 7100);
            assert_eq!(config.storage.database_path, "/tmp/jail.db");
            Ok(())
        });
    }
}
