// SPDX-FileCopyrightText: 2026 Registrar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as valid host names, non-empty paths, and unique bearer tokens.

use std::collections::HashSet;

use crate::diagnostic::ConfigError;
use crate::model::RegistrarConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every failure instead of stopping at the first one.
pub fn validate_config(config: &RegistrarConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut invalid = |message: String| errors.push(ConfigError::Validation { message });

    if !LOG_LEVELS.contains(&config.server.log_level.as_str()) {
        invalid(format!(
            "server.log_level `{}` must be one of {}",
            config.server.log_level,
            LOG_LEVELS.join(", ")
        ));
    }

    if config.storage.database_path.trim().is_empty() {
        invalid("storage.database_path must not be empty".to_string());
    }

    let host = config.gateway.host.trim();
    if host.is_empty() {
        invalid("gateway.host must not be empty".to_string());
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-');
        if !is_valid_ip && !is_valid_hostname {
            invalid(format!(
                "gateway.host `{host}` is not a valid IP address or hostname"
            ));
        }
    }

    let mut seen_tokens = HashSet::new();
    for (i, principal) in config.gateway.principals.iter().enumerate() {
        if principal.token.trim().is_empty() {
            invalid(format!("gateway.principals[{i}].token must not be empty"));
        } else if !seen_tokens.insert(principal.token.as_str()) {
            invalid(format!(
                "gateway.principals[{i}] reuses a token already bound to another principal"
            ));
        }
        if principal.user_id.trim().is_empty() {
            invalid(format!("gateway.principals[{i}].user_id must not be empty"));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use registrar_core::Role;

    use super::*;
    use crate::model::PrincipalConfig;

    fn principal(token: &str, user_id: &str, role: Role) -> PrincipalConfig {
        PrincipalConfig {
            token: token.to_string(),
            user_id: user_id.to_string(),
            role,
        }
    }

    fn messages(config: &RegistrarConfig) -> Vec<String> {
        validate_config(config)
            .unwrap_err()
            .into_iter()
            .map(|e| e.to_string())
            .collect()
    }

    #[test]
    fn default_config_validates() {
        assert!(validate_config(&RegistrarConfig::default()).is_ok());
    }

    #[test]
    fn empty_database_path_fails_validation() {
        let mut config = RegistrarConfig::default();
        config.storage.database_path = "  ".to_string();
        assert!(messages(&config).iter().any(|m| m.contains("database_path")));
    }

    #[test]
    fn unknown_log_level_fails_validation() {
        let mut config = RegistrarConfig::default();
        config.server.log_level = "verbose".to_string();
        assert!(messages(&config).iter().any(|m| m.contains("log_level")));
    }

    #[test]
    fn bad_host_fails_validation() {
        let mut config = RegistrarConfig::default();
        config.gateway.host = "not a host!".to_string();
        assert!(messages(&config).iter().any(|m| m.contains("gateway.host")));
    }

    #[test]
    fn duplicate_tokens_fail_validation() {
        let mut config = RegistrarConfig::default();
        config.gateway.principals = vec![
            principal("tok", "admin-1", Role::Admin),
            principal("tok", "S-0001", Role::Student),
        ];
        let messages = messages(&config);
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("principals[1]"));
    }

    #[test]
    fn all_failures_are_collected() {
        let mut config = RegistrarConfig::default();
        config.server.log_level = "loud".to_string();
        config.storage.database_path = String::new();
        config.gateway.principals = vec![principal("", "", Role::Admin)];
        assert_eq!(messages(&config).len(), 4);
    }
}
