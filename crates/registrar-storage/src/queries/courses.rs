// SPDX-FileCopyrightText: 2026 Registrar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Courses and their prerequisites.

use registrar_core::RegistrarError;
use registrar_core::types::{Course, NewCourse};
use rusqlite::params;

use crate::database::Database;
use crate::models::{new_id, now};
use crate::queries::keyed;

/// Create a course together with its prerequisite links.
///
/// Every prerequisite must already exist; the course and its links are
/// written in one transaction.
pub async fn create_course(db: &Database, new: NewCourse) -> Result<Course, RegistrarError> {
    if new.credits < 0 {
        return Err(RegistrarError::bad_request("credits must not be negative"));
    }

    db.transaction(move |tx| {
        for prerequisite_id in &new.prerequisite_ids {
            keyed::require::<Course>(tx, prerequisite_id)?;
        }

        let id = new_id();
        tx.execute(
            "INSERT INTO courses (id, title, code, credits, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![id, new.title, new.code, new.credits, now()],
        )?;
        for prerequisite_id in &new.prerequisite_ids {
            tx.execute(
                "INSERT OR IGNORE INTO course_prerequisites (course_id, prerequisite_id)
                 VALUES (?1, ?2)",
                params![id, prerequisite_id],
            )?;
        }
        keyed::require::<Course>(tx, &id)
    })
    .await
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;
    use crate::queries::keyed::find_by_id;

    fn course(code: &str, prerequisite_ids: Vec<String>) -> NewCourse {
        NewCourse {
            title: format!("Course {code}"),
            code: code.to_string(),
            credits: 3,
            prerequisite_ids,
        }
    }

    #[tokio::test]
    async fn prerequisites_round_trip_through_the_link_table() {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path().join("t.db").to_str().unwrap())
            .await
            .unwrap();

        let intro = create_course(&db, course("CSE101", vec![])).await.unwrap();
        let data = create_course(&db, course("CSE102", vec![])).await.unwrap();
        let algo = create_course(&db, course("CSE201", vec![intro.id.clone(), data.id.clone()]))
            .await
            .unwrap();

        let mut expected = vec![intro.id.clone(), data.id.clone()];
        expected.sort();
        let fetched = find_by_id::<Course>(&db, &algo.id).await.unwrap();
        assert_eq!(fetched.prerequisite_ids, expected);
        assert!(intro.prerequisite_ids.is_empty());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn unknown_prerequisite_writes_nothing() {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path().join("t.db").to_str().unwrap())
            .await
            .unwrap();

        let err = create_course(&db, course("CSE301", vec!["missing".to_string()]))
            .await
            .unwrap_err();
        assert!(matches!(err, RegistrarError::NotFound(_)));

        let count: i64 = db
            .run(|conn| conn.query_row("SELECT COUNT(*) FROM courses", [], |r| r.get(0)))
            .await
            .unwrap();
        assert_eq!(count, 0);
        db.close().await.unwrap();
    }
}
