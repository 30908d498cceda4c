// SPDX-FileCopyrightText: 2026 Registrar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for configuration loading, validation and diagnostics.

use registrar_config::{load_and_validate_str, load_config_from_str, ConfigError, RegistrarConfig};
use registrar_core::Role;

/// A complete config with every section parses into the expected values.
#[test]
fn full_config_parses() {
    let toml = r#"
[server]
name = "campus-records"
log_level = "debug"

[storage]
database_path = "/var/lib/registrar/records.db"
wal_mode = false

[gateway]
host = "0.0.0.0"
port = 8080

[[gateway.principals]]
token = "admin-token"
user_id = "admin-1"
role = "ADMIN"

[[gateway.principals]]
token = "student-token"
user_id = "2026010001"
role = "STUDENT"
"#;

    let config = load_and_validate_str(toml).expect("valid config should load");
    assert_eq!(config.server.name, "campus-records");
    assert_eq!(config.server.log_level, "debug");
    assert_eq!(config.storage.database_path, "/var/lib/registrar/records.db");
    assert!(!config.storage.wal_mode);
    assert_eq!(config.gateway.host, "0.0.0.0");
    assert_eq!(config.gateway.port, 8080);
    assert_eq!(config.gateway.principals.len(), 2);
    assert_eq!(config.gateway.principals[1].role, Role::Student);
    assert_eq!(config.gateway.principals[1].user_id, "2026010001");
}

/// An empty document falls back to compiled defaults.
#[test]
fn empty_config_uses_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");
    let defaults = RegistrarConfig::default();

    assert_eq!(config.server.name, "registrar");
    assert_eq!(config.server.log_level, "info");
    assert_eq!(config.storage.database_path, defaults.storage.database_path);
    assert!(config.storage.wal_mode);
    assert_eq!(config.gateway.host, "127.0.0.1");
    assert_eq!(config.gateway.port, 5000);
    assert!(config.gateway.principals.is_empty());
}

/// A misspelled key is rejected with a suggestion for the intended key.
#[test]
fn typo_in_key_yields_suggestion() {
    let toml = r#"
[storage]
databse_path = "x.db"
"#;

    let errors = load_and_validate_str(toml).expect_err("typo should be rejected");
    assert_eq!(errors.len(), 1);
    match &errors[0] {
        ConfigError::UnknownKey {
            key, suggestion, ..
        } => {
            assert_eq!(key, "databse_path");
            assert_eq!(suggestion.as_deref(), Some("database_path"));
        }
        other => panic!("expected UnknownKey, got {other:?}"),
    }
}

/// Unknown top-level sections are rejected.
#[test]
fn unknown_section_is_rejected() {
    let toml = r#"
[logging]
level = "debug"
"#;

    let err = load_config_from_str(toml).expect_err("unknown section should be rejected");
    assert!(format!("{err}").contains("logging"));
}

/// A wrongly typed value becomes an InvalidType diagnostic.
#[test]
fn wrong_type_is_reported() {
    let toml = r#"
[gateway]
port = "eighty"
"#;

    let errors = load_and_validate_str(toml).expect_err("string port should be rejected");
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::InvalidType { .. })),
        "got: {errors:?}"
    );
}

/// Roles outside the known set fail deserialization.
#[test]
fn unknown_role_is_rejected() {
    let toml = r#"
[[gateway.principals]]
token = "t"
user_id = "u"
role = "JANITOR"
"#;

    assert!(load_and_validate_str(toml).is_err());
}

/// Semantic validation runs after a successful parse.
#[test]
fn duplicate_principal_tokens_fail_validation() {
    let toml = r#"
[[gateway.principals]]
token = "same"
user_id = "admin-1"
role = "ADMIN"

[[gateway.principals]]
token = "same"
user_id = "2026010001"
role = "STUDENT"
"#;

    let errors = load_and_validate_str(toml).expect_err("duplicate tokens should fail");
    assert!(matches!(errors[0], ConfigError::Validation { .. }));
}

/// Principal tokens never appear in debug output.
#[test]
fn principal_debug_redacts_token() {
    let toml = r#"
[[gateway.principals]]
token = "super-secret-token"
user_id = "admin-1"
role = "SUPER_ADMIN"
"#;

    let config = load_and_validate_str(toml).expect("valid config");
    let debug = format!("{:?}", config.gateway.principals[0]);
    assert!(!debug.contains("super-secret-token"));
    assert!(debug.contains("admin-1"));
}
