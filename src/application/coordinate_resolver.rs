use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::location::Coordinates;
use crate::domain::ports::{Geocoder, LocationCache, ResolveCoordinates};

/// Cache-first address resolution.
///
/// Successful lookups are stored forever and never refreshed. Failed lookups
/// are not stored, so an address that never resolves hits the provider on
/// every cache miss.
pub struct CoordinateResolver {
    cache: Arc<dyn LocationCache>,
    geocoder: Arc<dyn Geocoder>,
}

impl CoordinateResolver {
    pub fn new(cache: Arc<dyn LocationCache>, geocoder: Arc<dyn Geocoder>) -> Self {
        Self { cache, geocoder }
    }
}

impl ResolveCoordinates for CoordinateResolver {
    fn resolve(&self, address: &str) -> Option<Coordinates> {
        match self.cache.find(address) {
            Ok(Some(coordinates)) => {
                log::debug!("Location cache hit for '{}'", address);
                return Some(coordinates);
            }
            Ok(None) => log::debug!("Location cache miss for '{}'", address),
            Err(e) => log::warn!("Location cache read failed for '{}': {}", address, e),
        }

        let coordinates = match self.geocoder.geocode(address) {
            Ok(Some(coordinates)) => coordinates,
            Ok(None) => {
                log::warn!("Geocoder found no candidates for '{}'", address);
                return None;
            }
            Err(e) => {
                log::warn!("Geocoding '{}' failed: {}", address, e);
                return None;
            }
        };

        match self.cache.insert_if_absent(address, coordinates) {
            Ok(stored) => Some(stored),
            Err(e) => {
                log::warn!("Could not cache coordinates for '{}': {}", address, e);
                Some(coordinates)
            }
        }
    }
}

/// Request-scoped memo in front of another resolver.
///
/// Every address is looked up at most once per request, failures included,
/// so all rankings built from one request see the same coordinates.
pub struct MemoizedResolver<'a, R: ?Sized> {
    inner: &'a R,
    seen: RefCell<HashMap<String, Option<Coordinates>>>,
}

impl<'a, R: ResolveCoordinates + ?Sized> MemoizedResolver<'a, R> {
    pub fn new(inner: &'a R) -> Self {
        Self {
            inner,
            seen: RefCell::new(HashMap::new()),
        }
    }
}

impl<R: ResolveCoordinates + ?Sized> ResolveCoordinates for MemoizedResolver<'_, R> {
    fn resolve(&self, address: &str) -> Option<Coordinates> {
        if let Some(known) = self.seen.borrow().get(address) {
            return *known;
        }
        let resolved = self.inner.resolve(address);
        self.seen.borrow_mut().insert(address.to_string(), resolved);
        resolved
    }
}
