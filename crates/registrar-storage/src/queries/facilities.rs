// SPDX-FileCopyrightText: 2026 Registrar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Buildings and rooms.

use registrar_core::RegistrarError;
use registrar_core::types::{Building, Room};
use rusqlite::params;

use crate::database::Database;
use crate::models::{new_id, now};

pub async fn create_building(db: &Database, title: &str) -> Result<Building, RegistrarError> {
    let building = Building {
        id: new_id(),
        title: title.to_string(),
        created_at: now(),
    };
    let row = building.clone();
    db.run(move |conn| {
        conn.execute(
            "INSERT INTO buildings (id, title, created_at) VALUES (?1, ?2, ?3)",
            params![row.id, row.title, row.created_at],
        )
    })
    .await?;
    Ok(building)
}

/// Create a room inside an existing building.
pub async fn create_room(
    db: &Database,
    room_number: &str,
    floor: &str,
    building_id: &str,
) -> Result<Room, RegistrarError> {
    let room = Room {
        id: new_id(),
        room_number: room_number.to_string(),
        floor: floor.to_string(),
        building_id: building_id.to_string(),
        created_at: now(),
    };
    let row = room.clone();
    db.run(move |conn| {
        conn.execute(
            "INSERT INTO rooms (id, room_number, floor, building_id, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![row.id, row.room_number, row.floor, row.building_id, row.created_at],
        )
    })
    .await?;
    Ok(room)
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;
    use crate::queries::keyed::find_by_id;

    #[tokio::test]
    async fn room_belongs_to_its_building() {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path().join("t.db").to_str().unwrap())
            .await
            .unwrap();

        let building = create_building(&db, "Engineering").await.unwrap();
        let room = create_room(&db, "301", "3", &building.id).await.unwrap();
        let fetched = find_by_id::<Room>(&db, &room.id).await.unwrap();
        assert_eq!(fetched, room);

        let duplicate = create_room(&db, "301", "3", &building.id).await;
        assert!(matches!(duplicate, Err(RegistrarError::Conflict(_))));
        db.close().await.unwrap();
    }
}
