use std::time::Duration;

use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool, PoolError};

pub type DbPool = Pool<ConnectionManager<PgConnection>>;

/// Handlers wait at most this long for a free connection before failing
/// with a 500.
const CHECKOUT_TIMEOUT: Duration = Duration::from_secs(5);

pub fn create_pool(database_url: &str) -> Result<DbPool, PoolError> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    Pool::builder()
        .connection_timeout(CHECKOUT_TIMEOUT)
        .build(manager)
}
