use diesel::prelude::*;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::location::Coordinates;
use crate::domain::ports::LocationCache;
use crate::schema::locations;

use super::models::{LocationRow, NewLocationRow};

/// `locations` table used as a permanent address -> coordinates cache.
pub struct DieselLocationCache {
    pool: DbPool,
}

impl DieselLocationCache {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl From<LocationRow> for Coordinates {
    fn from(row: LocationRow) -> Self {
        Coordinates::new(row.longitude, row.latitude)
    }
}

impl LocationCache for DieselLocationCache {
    fn find(&self, address: &str) -> Result<Option<Coordinates>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = locations::table
            .filter(locations::address.eq(address))
            .select(LocationRow::as_select())
            .first::<LocationRow>(&mut conn)
            .optional()?;

        Ok(row.map(Coordinates::from))
    }

    fn insert_if_absent(
        &self,
        address: &str,
        coordinates: Coordinates,
    ) -> Result<Coordinates, DomainError> {
        let mut conn = self.pool.get()?;

        // A concurrent resolution may have stored the address first; its row
        // wins and is what we hand back.
        diesel::insert_into(locations::table)
            .values(&NewLocationRow {
                address,
                longitude: coordinates.longitude,
                latitude: coordinates.latitude,
            })
            .on_conflict(locations::address)
            .do_nothing()
            .execute(&mut conn)?;

        let row = locations::table
            .filter(locations::address.eq(address))
            .select(LocationRow::as_select())
            .first::<LocationRow>(&mut conn)?;

        Ok(row.into())
    }
}
