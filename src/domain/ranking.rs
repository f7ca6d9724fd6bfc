//! Matches unhandled orders to the restaurants able to cook them and ranks
//! those restaurants by delivery distance.

use std::cmp::Ordering;

use geo::{Distance as _, Geodesic, Point};

use super::index::{MenuAvailabilityIndex, OrderLineIndex};
use super::location::Coordinates;
use super::order::{Order, OrderStatus};
use super::ports::ResolveCoordinates;

/// Distance from a restaurant to the delivery address.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Distance {
    /// Geodesic distance in kilometres, rounded to two decimals.
    Km(f64),
    /// Either side of the trip could not be geocoded.
    Unknown,
}

impl Distance {
    /// Known distances ascending, unknown ones last.
    fn nearest_first(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Distance::Km(a), Distance::Km(b)) => a.total_cmp(b),
            (Distance::Km(_), Distance::Unknown) => Ordering::Less,
            (Distance::Unknown, Distance::Km(_)) => Ordering::Greater,
            (Distance::Unknown, Distance::Unknown) => Ordering::Equal,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AvailableRestaurant {
    pub restaurant_id: i32,
    pub name: String,
    pub distance: Distance,
}

/// Geodesic distance on the WGS-84 ellipsoid, in kilometres rounded to
/// two decimal places.
pub fn distance_km(from: Coordinates, to: Coordinates) -> f64 {
    let meters = Geodesic.distance(
        Point::new(from.longitude, from.latitude),
        Point::new(to.longitude, to.latitude),
    );
    round_to_cents(meters / 1000.0)
}

fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Restaurants able to fulfil `order`, nearest first.
///
/// A restaurant is feasible when every product the order requires is in
/// stock there. Geocoding failures degrade to [`Distance::Unknown`] for the
/// affected entries. Orders past `Unhandled` yield an empty list.
pub fn rank<R>(
    order: &Order,
    availability: &MenuAvailabilityIndex,
    lines: &OrderLineIndex,
    resolver: &R,
) -> Vec<AvailableRestaurant>
where
    R: ResolveCoordinates + ?Sized,
{
    if order.status != OrderStatus::Unhandled {
        return Vec::new();
    }

    let required = lines.required(order.id);
    let feasible: Vec<_> = availability
        .iter()
        .filter(|menu| required.is_subset(&menu.available))
        .collect();
    if feasible.is_empty() {
        return Vec::new();
    }

    let destination = resolver.resolve(&order.address);
    if destination.is_none() {
        log::warn!("order {}: delivery address could not be geocoded", order.id);
    }

    let mut ranked: Vec<AvailableRestaurant> = feasible
        .into_iter()
        .map(|menu| {
            let origin = resolver.resolve(&menu.restaurant.address);
            let distance = match (origin, destination) {
                (Some(from), Some(to)) => Distance::Km(distance_km(from, to)),
                _ => Distance::Unknown,
            };
            AvailableRestaurant {
                restaurant_id: menu.restaurant.id,
                name: menu.restaurant.name.clone(),
                distance,
            }
        })
        .collect();

    // Stable, so equally distant restaurants keep index order.
    ranked.sort_by(|a, b| a.distance.nearest_first(&b.distance));
    ranked
}
