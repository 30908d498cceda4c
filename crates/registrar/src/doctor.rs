// SPDX-FileCopyrightText: 2026 Registrar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `registrar doctor` command implementation.
//!
//! Runs diagnostic checks against the Registrar environment to identify
//! configuration issues, database problems, and an unreachable server.

use std::io::IsTerminal;
use std::path::Path;
use std::time::{Duration, Instant};

use registrar_config::RegistrarConfig;
use registrar_core::RegistrarError;

/// Status of a diagnostic check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    Pass,
    Warn,
    Fail,
}

/// Result of a single diagnostic check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub duration: Duration,
}

impl CheckResult {
    fn new(name: &str, status: CheckStatus, message: impl Into<String>, start: Instant) -> Self {
        Self {
            name: name.to_string(),
            status,
            message: message.into(),
            duration: start.elapsed(),
        }
    }
}

/// Run the `registrar doctor` command.
///
/// Runs quick diagnostic checks. With `--deep`, runs additional intensive checks.
/// With `--plain`, disables colored output.
pub async fn run_doctor(
    config: &RegistrarConfig,
    config_path: Option<&Path>,
    deep: bool,
    plain: bool,
) -> Result<(), RegistrarError> {
    let use_color = !plain && std::io::stdout().is_terminal();
    let db_path = config.storage.database_path.as_str();

    let mut results = vec![
        check_config(config_path),
        check_database(db_path).await,
        check_registration_window(db_path).await,
        check_health_endpoint(config).await,
    ];
    if deep {
        results.push(check_db_integrity(db_path).await);
        results.push(check_disk_space(db_path));
        results.push(check_memory_baseline());
    }

    println!();
    println!("  registrar doctor");
    println!("  {}", "-".repeat(50));

    let mut issues = 0;
    for result in &results {
        if result.status != CheckStatus::Pass {
            issues += 1;
        }
        println!("{}", render_line(result, use_color));
    }
    println!();

    if issues > 0 {
        let issue_word = if issues == 1 { "issue" } else { "issues" };
        println!("  {issues} {issue_word} found.");
        if !deep {
            println!("  Run with --deep for detailed diagnostics.");
        }
    } else {
        println!("  All checks passed.");
    }
    println!();

    Ok(())
}

fn render_line(result: &CheckResult, use_color: bool) -> String {
    use colored::Colorize;

    let duration_ms = result.duration.as_millis();
    if !use_color {
        let tag = match result.status {
            CheckStatus::Pass => "[OK]  ",
            CheckStatus::Warn => "[WARN]",
            CheckStatus::Fail => "[FAIL]",
        };
        return format!(
            "    {tag} {:<20} {} ({duration_ms}ms)",
            result.name, result.message
        );
    }

    let (symbol, message) = match result.status {
        CheckStatus::Pass => ("✓".green(), result.message.normal()),
        CheckStatus::Warn => ("!".yellow(), result.message.yellow()),
        CheckStatus::Fail => ("✗".red(), result.message.red()),
    };
    format!(
        "    {symbol} {:<20} {message} ({duration_ms}ms)",
        result.name
    )
}

/// Check configuration loads without errors.
fn check_config(config_path: Option<&Path>) -> CheckResult {
    let start = Instant::now();
    let loaded = match config_path {
        Some(path) => registrar_config::load_and_validate_path(path),
        None => registrar_config::load_and_validate(),
    };
    match loaded {
        Ok(_) => CheckResult::new("Configuration", CheckStatus::Pass, "valid", start),
        Err(errors) => CheckResult::new(
            "Configuration",
            CheckStatus::Fail,
            format!("{} error(s)", errors.len()),
            start,
        ),
    }
}

/// Open an existing database without creating or migrating it.
async fn open_existing(db_path: &str) -> Result<tokio_rusqlite::Connection, String> {
    tokio_rusqlite::Connection::open_with_flags(
        db_path,
        rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE | rusqlite::OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .await
    .map_err(|e| format!("open failed: {e}"))
}

/// Check the database file exists, opens, and carries the migrated schema.
async fn check_database(db_path: &str) -> CheckResult {
    const NAME: &str = "Database";
    let start = Instant::now();

    if !Path::new(db_path).exists() {
        return CheckResult::new(
            NAME,
            CheckStatus::Warn,
            format!("not found: {db_path} (run `registrar migrate` or start the server)"),
            start,
        );
    }

    let conn = match open_existing(db_path).await {
        Ok(conn) => conn,
        Err(message) => return CheckResult::new(NAME, CheckStatus::Fail, message, start),
    };
    let applied: Result<i64, tokio_rusqlite::Error<rusqlite::Error>> = conn
        .call(|conn| {
            conn.query_row("SELECT COUNT(*) FROM refinery_schema_history", [], |row| {
                row.get(0)
            })
        })
        .await;

    match applied {
        Ok(count) => CheckResult::new(
            NAME,
            CheckStatus::Pass,
            format!("connected, {count} migration(s) applied"),
            start,
        ),
        Err(e) => CheckResult::new(
            NAME,
            CheckStatus::Fail,
            format!("schema missing or unreadable: {e}"),
            start,
        ),
    }
}

/// Report the current semester and the active registration window.
async fn check_registration_window(db_path: &str) -> CheckResult {
    const NAME: &str = "Registration";
    let start = Instant::now();

    if !Path::new(db_path).exists() {
        return CheckResult::new(NAME, CheckStatus::Warn, "database not found (skipped)", start);
    }
    let conn = match open_existing(db_path).await {
        Ok(conn) => conn,
        Err(message) => return CheckResult::new(NAME, CheckStatus::Fail, message, start),
    };

    let window: Result<(bool, Vec<String>), tokio_rusqlite::Error<rusqlite::Error>> = conn
        .call(|conn| {
            let has_current: bool = conn.query_row(
                "SELECT EXISTS (SELECT 1 FROM current_academic_semester)",
                [],
                |row| row.get(0),
            )?;
            let mut stmt = conn.prepare(
                "SELECT status FROM semester_registrations
                 WHERE status IN ('UPCOMING', 'ONGOING')",
            )?;
            let active = stmt
                .query_map([], |row| row.get(0))?
                .collect::<rusqlite::Result<Vec<String>>>()?;
            Ok((has_current, active))
        })
        .await;

    match window {
        Ok((_, active)) if active.len() > 1 => CheckResult::new(
            NAME,
            CheckStatus::Fail,
            format!("{} active registrations (expected at most one)", active.len()),
            start,
        ),
        Ok((false, _)) => CheckResult::new(
            NAME,
            CheckStatus::Warn,
            "no current semester is set",
            start,
        ),
        Ok((true, active)) => {
            let message = match active.first() {
                Some(status) => format!("current semester set, registration {status}"),
                None => "current semester set, no open registration".to_string(),
            };
            CheckResult::new(NAME, CheckStatus::Pass, message, start)
        }
        Err(e) => CheckResult::new(NAME, CheckStatus::Fail, format!("query failed: {e}"), start),
    }
}

/// Check the running server answers on `/health`.
async fn check_health_endpoint(config: &RegistrarConfig) -> CheckResult {
    const NAME: &str = "Health endpoint";
    let start = Instant::now();
    let url = format!(
        "http://{}:{}/health",
        config.gateway.host, config.gateway.port
    );

    let client = match reqwest::Client::builder()
        .timeout(Duration::from_secs(3))
        .build()
    {
        Ok(c) => c,
        Err(e) => {
            return CheckResult::new(NAME, CheckStatus::Fail, format!("HTTP client error: {e}"), start);
        }
    };

    match client.get(&url).send().await {
        Ok(resp) if resp.status().is_success() => {
            CheckResult::new(NAME, CheckStatus::Pass, "reachable", start)
        }
        Ok(resp) => CheckResult::new(
            NAME,
            CheckStatus::Warn,
            format!("status {}", resp.status()),
            start,
        ),
        Err(_) => CheckResult::new(
            NAME,
            CheckStatus::Warn,
            format!("not reachable at {url} (server may not be running)"),
            start,
        ),
    }
}

/// Deep check: SQLite integrity check.
async fn check_db_integrity(db_path: &str) -> CheckResult {
    const NAME: &str = "DB integrity";
    let start = Instant::now();

    if !Path::new(db_path).exists() {
        return CheckResult::new(NAME, CheckStatus::Warn, "database not found (skipped)", start);
    }
    let conn = match open_existing(db_path).await {
        Ok(conn) => conn,
        Err(message) => return CheckResult::new(NAME, CheckStatus::Fail, message, start),
    };

    let result: Result<Vec<String>, tokio_rusqlite::Error<rusqlite::Error>> = conn
        .call(|conn| {
            let mut stmt = conn.prepare("PRAGMA integrity_check")?;
            let rows = stmt
                .query_map([], |row| row.get(0))?
                .collect::<rusqlite::Result<Vec<String>>>()?;
            Ok(rows)
        })
        .await;

    match result {
        Ok(rows) if rows.len() == 1 && rows[0] == "ok" => {
            CheckResult::new(NAME, CheckStatus::Pass, "ok", start)
        }
        Ok(rows) => CheckResult::new(
            NAME,
            CheckStatus::Fail,
            format!("{} issue(s) found", rows.len()),
            start,
        ),
        Err(e) => CheckResult::new(NAME, CheckStatus::Fail, format!("check failed: {e}"), start),
    }
}

/// Deep check: database size and directory access.
fn check_disk_space(db_path: &str) -> CheckResult {
    const NAME: &str = "Disk space";
    let start = Instant::now();
    let path = Path::new(db_path);

    if let Ok(metadata) = std::fs::metadata(path) {
        let size_mb = metadata.len() as f64 / (1024.0 * 1024.0);
        return CheckResult::new(
            NAME,
            CheckStatus::Pass,
            format!("DB size: {size_mb:.1} MB"),
            start,
        );
    }

    let parent = path.parent().unwrap_or(Path::new("."));
    match std::fs::metadata(parent) {
        Ok(_) => CheckResult::new(NAME, CheckStatus::Pass, "directory accessible", start),
        Err(e) => CheckResult::new(
            NAME,
            CheckStatus::Warn,
            format!("cannot access: {e}"),
            start,
        ),
    }
}

/// Deep check: memory baseline via jemalloc.
fn check_memory_baseline() -> CheckResult {
    const NAME: &str = "Memory baseline";
    let start = Instant::now();

    #[cfg(not(target_env = "msvc"))]
    {
        let _ = tikv_jemalloc_ctl::epoch::advance();
        let allocated = tikv_jemalloc_ctl::stats::allocated::read().unwrap_or(0);
        let resident = tikv_jemalloc_ctl::stats::resident::read().unwrap_or(0);
        let allocated_mb = allocated as f64 / (1024.0 * 1024.0);
        let resident_mb = resident as f64 / (1024.0 * 1024.0);
        CheckResult::new(
            NAME,
            CheckStatus::Pass,
            format!("heap: {allocated_mb:.1} MB, resident: {resident_mb:.1} MB"),
            start,
        )
    }

    #[cfg(target_env = "msvc")]
    {
        CheckResult::new(NAME, CheckStatus::Warn, "jemalloc not available on MSVC", start)
    }
}

#[cfg(test)]
mod tests {
    use registrar_core::types::SemesterRegistrationStatus;
    use registrar_test_utils::TestHarness;

    use super::*;

    const MISSING_DB: &str = "/tmp/nonexistent-registrar-test-xyz.db";

    #[test]
    fn plain_lines_carry_a_status_tag() {
        let result = CheckResult::new("Database", CheckStatus::Warn, "slow", Instant::now());
        let line = render_line(&result, false);
        assert!(line.contains("[WARN]"));
        assert!(line.contains("Database"));
        assert!(line.contains("slow"));
    }

    #[tokio::test]
    async fn missing_database_warns() {
        assert_eq!(check_database(MISSING_DB).await.status, CheckStatus::Warn);
        assert_eq!(check_db_integrity(MISSING_DB).await.status, CheckStatus::Warn);
        assert_eq!(
            check_registration_window(MISSING_DB).await.status,
            CheckStatus::Warn
        );
    }

    #[tokio::test]
    async fn seeded_database_passes() {
        let harness = TestHarness::builder().build().await.unwrap();
        let path = harness.config.storage.database_path.clone();

        let database = check_database(&path).await;
        assert_eq!(database.status, CheckStatus::Pass, "{}", database.message);
        assert_eq!(check_db_integrity(&path).await.status, CheckStatus::Pass);

        let window = check_registration_window(&path).await;
        assert_eq!(window.status, CheckStatus::Pass);
        assert!(window.message.contains("no open registration"));

        let registration = harness.registration(3, 18).await.unwrap();
        harness
            .force_status(&registration.id, SemesterRegistrationStatus::Ongoing)
            .await
            .unwrap();
        let window = check_registration_window(&path).await;
        assert!(window.message.contains("ONGOING"));
    }

    #[tokio::test]
    async fn missing_current_semester_warns() {
        let harness = TestHarness::builder()
            .without_current_semester()
            .build()
            .await
            .unwrap();
        let window = check_registration_window(&harness.config.storage.database_path).await;
        assert_eq!(window.status, CheckStatus::Warn);
    }

    #[test]
    fn memory_baseline_reports() {
        let result = check_memory_baseline();
        assert!(result.status == CheckStatus::Pass || result.status == CheckStatus::Warn);
    }
}
