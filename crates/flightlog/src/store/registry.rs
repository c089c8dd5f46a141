//! Registry queries: pilots, aircraft, and airfields.
//!
//! These tables back the pick lists a logbook entry draws from. They are
//! plain lookups; flights reference them by name rather than by id so a
//! registry removal never invalidates historical entries.

use rusqlite::{params, OptionalExtension};
use tracing::debug;

use crate::error::Result;
use crate::record::{Aircraft, Airfield, Pilot};

use super::Storage;

impl Storage {
    // === Pilots ===

    /// Insert a pilot and return the assigned id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn insert_pilot(&self, pilot: &Pilot) -> Result<i64> {
        self.conn.execute(
            r"
            INSERT INTO pilots (name, address, telephone, email)
            VALUES (?1, ?2, ?3, ?4)
            ",
            params![pilot.name, pilot.address, pilot.telephone, pilot.email],
        )?;
        let id = self.conn.last_insert_rowid();
        debug!("Inserted pilot '{}' with id {}", pilot.name, id);
        Ok(id)
    }

    /// Get all pilots, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn pilots(&self) -> Result<Vec<Pilot>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, address, telephone, email FROM pilots ORDER BY name ASC",
        )?;
        let pilots = stmt
            .query_map([], |row| {
                Ok(Pilot {
                    id: Some(row.get(0)?),
                    name: row.get(1)?,
                    address: row.get(2)?,
                    telephone: row.get(3)?,
                    email: row.get(4)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(pilots)
    }

    /// Delete a pilot by id.
    ///
    /// Returns `true` if a pilot was deleted, `false` if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn delete_pilot(&self, id: i64) -> Result<bool> {
        let affected = self.conn.execute("DELETE FROM pilots WHERE id = ?1", [id])?;
        Ok(affected > 0)
    }

    // === Aircraft ===

    /// Insert an aircraft and return the assigned id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails, including when
    /// the registration already exists.
    pub fn insert_aircraft(&self, aircraft: &Aircraft) -> Result<i64> {
        self.conn.execute(
            r"
            INSERT INTO aircraft (registration, make, model, code, engine_type)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ",
            params![
                aircraft.registration,
                aircraft.make,
                aircraft.model,
                aircraft.code,
                aircraft.engine_type,
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        debug!(
            "Inserted aircraft '{}' with id {}",
            aircraft.registration, id
        );
        Ok(id)
    }

    /// Get all aircraft, ordered by registration.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn aircraft(&self) -> Result<Vec<Aircraft>> {
        let mut stmt = self.conn.prepare(
            r"
            SELECT id, registration, make, model, code, engine_type
            FROM aircraft ORDER BY registration ASC
            ",
        )?;
        let aircraft = stmt
            .query_map([], |row| {
                Ok(Aircraft {
                    id: Some(row.get(0)?),
                    registration: row.get(1)?,
                    make: row.get(2)?,
                    model: row.get(3)?,
                    code: row.get(4)?,
                    engine_type: row.get(5)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(aircraft)
    }

    /// Look up an aircraft by registration.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn aircraft_by_registration(&self, registration: &str) -> Result<Option<Aircraft>> {
        let result = self
            .conn
            .query_row(
                r"
                SELECT id, registration, make, model, code, engine_type
                FROM aircraft WHERE registration = ?1
                ",
                [registration],
                |row| {
                    Ok(Aircraft {
                        id: Some(row.get(0)?),
                        registration: row.get(1)?,
                        make: row.get(2)?,
                        model: row.get(3)?,
                        code: row.get(4)?,
                        engine_type: row.get(5)?,
                    })
                },
            )
            .optional()?;
        Ok(result)
    }

    /// Delete an aircraft by id.
    ///
    /// Returns `true` if an aircraft was deleted, `false` if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn delete_aircraft(&self, id: i64) -> Result<bool> {
        let affected = self
            .conn
            .execute("DELETE FROM aircraft WHERE id = ?1", [id])?;
        Ok(affected > 0)
    }

    // === Airfields ===

    /// Insert an airfield and return the assigned id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails, including when
    /// the code already exists.
    pub fn insert_airfield(&self, airfield: &Airfield) -> Result<i64> {
        self.conn.execute(
            r"
            INSERT INTO airfields (code, name, county, country, telephone, website)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ",
            params![
                airfield.code,
                airfield.name,
                airfield.county,
                airfield.country,
                airfield.telephone,
                airfield.website,
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        debug!("Inserted airfield '{}' with id {}", airfield.code, id);
        Ok(id)
    }

    /// Get all airfields, ordered by code.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn airfields(&self) -> Result<Vec<Airfield>> {
        let mut stmt = self.conn.prepare(
            r"
            SELECT id, code, name, county, country, telephone, website
            FROM airfields ORDER BY code ASC
            ",
        )?;
        let airfields = stmt
            .query_map([], |row| {
                Ok(Airfield {
                    id: Some(row.get(0)?),
                    code: row.get(1)?,
                    name: row.get(2)?,
                    county: row.get(3)?,
                    country: row.get(4)?,
                    telephone: row.get(5)?,
                    website: row.get(6)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(airfields)
    }

    /// Delete an airfield by id.
    ///
    /// Returns `true` if an airfield was deleted, `false` if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn delete_airfield(&self, id: i64) -> Result<bool> {
        let affected = self
            .conn
            .execute("DELETE FROM airfields WHERE id = ?1", [id])?;
        Ok(affected > 0)
    }
}
