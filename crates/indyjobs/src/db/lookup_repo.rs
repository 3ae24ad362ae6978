//! Lookup repository. Writes descriptive rows that job reads join against.
//!
//! Filled in by whatever enriches ids with names. Job reads never require
//! these rows to exist.

use rusqlite::params;

use super::{Database, DatabaseError};

/// Creates or replaces an entity such as a character or corporation.
pub fn upsert_entity(
    db: &Database,
    id: i32,
    category: &str,
    name: &str,
) -> Result<(), DatabaseError> {
    db.with_conn(|conn| {
        conn.execute(
            "INSERT INTO eve_entities (id, category, name) VALUES (?1, ?2, ?3)
             ON CONFLICT(id) DO UPDATE SET category = excluded.category, name = excluded.name",
            params![id, category, name],
        )?;
        Ok(())
    })
}

/// Creates or replaces an inventory type.
pub fn upsert_type(db: &Database, id: i32, name: &str) -> Result<(), DatabaseError> {
    db.with_conn(|conn| {
        conn.execute(
            "INSERT INTO eve_types (id, name) VALUES (?1, ?2)
             ON CONFLICT(id) DO UPDATE SET name = excluded.name",
            params![id, name],
        )?;
        Ok(())
    })
}

/// Creates or replaces a solar system.
pub fn upsert_solar_system(
    db: &Database,
    id: i32,
    name: &str,
    security_status: f32,
) -> Result<(), DatabaseError> {
    db.with_conn(|conn| {
        conn.execute(
            "INSERT INTO eve_solar_systems (id, name, security_status) VALUES (?1, ?2, ?3)
             ON CONFLICT(id) DO UPDATE SET
               name = excluded.name, security_status = excluded.security_status",
            params![id, name, f64::from(security_status)],
        )?;
        Ok(())
    })
}

/// Creates or replaces a location. Without a solar system the location has
/// no security status.
pub fn upsert_location(
    db: &Database,
    id: i64,
    name: &str,
    solar_system_id: Option<i32>,
) -> Result<(), DatabaseError> {
    db.with_conn(|conn| {
        conn.execute(
            "INSERT INTO eve_locations (id, name, solar_system_id) VALUES (?1, ?2, ?3)
             ON CONFLICT(id) DO UPDATE SET
               name = excluded.name, solar_system_id = excluded.solar_system_id",
            params![id, name, solar_system_id],
        )?;
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_db() -> Database {
        Database::open_in_memory().expect("Failed to create test database")
    }

    #[test]
    fn test_upsert_entity_replaces_name() {
        let db = test_db();
        upsert_entity(&db, 90000001, "character", "Old Name").unwrap();
        upsert_entity(&db, 90000001, "character", "New Name").unwrap();

        let name: String = db
            .with_conn(|conn| {
                Ok(conn.query_row(
                    "SELECT name FROM eve_entities WHERE id = 90000001",
                    [],
                    |r| r.get(0),
                )?)
            })
            .unwrap();
        assert_eq!(name, "New Name");
    }

    #[test]
    fn test_location_requires_known_solar_system() {
        let db = test_db();
        assert!(upsert_location(&db, 60003760, "Jita IV - Moon 4", Some(30000142)).is_err());

        upsert_solar_system(&db, 30000142, "Jita", 0.9).unwrap();
        upsert_location(&db, 60003760, "Jita IV - Moon 4", Some(30000142)).unwrap();
    }

    #[test]
    fn test_location_without_solar_system() {
        let db = test_db();
        upsert_type(&db, 35832, "Astrahus").unwrap();
        upsert_location(&db, 1022734985679, "Unknown Structure", None).unwrap();
    }
}
