//! Route catalog
//!
//! Read-only lookup from tracking number to route. Matching is case-sensitive;
//! callers normalize user input before lookup.

use crate::types::{Route, ShipmentEvent, StatusKey};
use std::collections::HashMap;

/// Tracking number used when no valid one is supplied
pub const DEFAULT_TRACKING_NUMBER: &str = "TM123456789";

/// Table of known tracking numbers
#[derive(Debug, Clone, Default)]
pub struct RouteCatalog {
    routes: HashMap<String, Route>,
}

impl RouteCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog containing the three demo shipments
    pub fn demo() -> Self {
        let mut catalog = Self::new();
        for (tracking_number, route) in demo_routes() {
            catalog.insert(tracking_number, route);
        }
        catalog
    }

    /// Add or replace a route. Returns the previous route, if any.
    pub fn insert(&mut self, tracking_number: impl Into<String>, route: Route) -> Option<Route> {
        let tracking_number = tracking_number.into();
        log::debug!(
            "Registering route {} ({}, {} events)",
            tracking_number,
            route.carrier(),
            route.events().len()
        );
        self.routes.insert(tracking_number, route)
    }

    pub fn get(&self, tracking_number: &str) -> Option<&Route> {
        self.routes.get(tracking_number)
    }

    pub fn contains(&self, tracking_number: &str) -> bool {
        self.routes.contains_key(tracking_number)
    }

    /// All known tracking numbers, sorted
    pub fn tracking_numbers(&self) -> Vec<&str> {
        let mut numbers: Vec<&str> = self.routes.keys().map(String::as_str).collect();
        numbers.sort_unstable();
        numbers
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

fn event(
    title: &str,
    offset_minutes: u32,
    latitude: f64,
    longitude: f64,
    location: &str,
    status_key: StatusKey,
) -> ShipmentEvent {
    ShipmentEvent::new(title, offset_minutes, latitude, longitude, location, status_key)
}

fn demo_routes() -> Vec<(&'static str, Route)> {
    use StatusKey::*;

    // Event lists below are non-empty literals, so Route::new cannot fail.
    let build = |carrier: &str, events: Vec<ShipmentEvent>| Route::new(carrier, events);

    let routes = [
        (
            "TM123456789",
            build(
                "MockExpress",
                vec![
                    event("Label created", 0, 34.0522, -118.2437, "Los Angeles, CA", Created),
                    event("Picked up", 60, 34.10, -118.30, "Los Angeles, CA", Picked),
                    event("In transit", 240, 36.1699, -115.1398, "Las Vegas, NV", InTransit),
                    event("Arrived at facility", 360, 39.7392, -104.9903, "Denver, CO", Facility),
                    event("Out for delivery", 1320, 39.742, -104.99, "Denver, CO", OutForDelivery),
                    event("Delivered", 1440, 39.742, -104.99, "Denver, CO", Delivered),
                ],
            ),
        ),
        (
            "TM987654321",
            build(
                "RapidShip",
                vec![
                    event("Label created", 0, 40.7128, -74.0060, "New York, NY", Created),
                    event("In transit", 180, 41.2033, -77.1945, "Pennsylvania, USA", InTransit),
                    event("Arrived at facility", 360, 39.9526, -75.1652, "Philadelphia, PA", Facility),
                    event("Out for delivery", 1260, 39.9526, -75.1652, "Philadelphia, PA", OutForDelivery),
                    event("Delivered", 1380, 39.9526, -75.1652, "Philadelphia, PA", Delivered),
                ],
            ),
        ),
        (
            "TM555000111",
            build(
                "ParcelGo",
                vec![
                    event("Label created", 0, 47.6062, -122.3321, "Seattle, WA", Created),
                    event("Picked up", 90, 47.7, -122.33, "Seattle, WA", Picked),
                    event("In transit", 360, 45.5152, -122.6784, "Portland, OR", InTransit),
                    event("Arrived at facility", 720, 44.0521, -123.0868, "Eugene, OR", Facility),
                    event("Out for delivery", 1320, 37.7749, -122.4194, "San Francisco, CA", OutForDelivery),
                    event("Delivered", 1440, 37.7749, -122.4194, "San Francisco, CA", Delivered),
                ],
            ),
        ),
    ];

    routes
        .into_iter()
        .filter_map(|(tracking_number, route)| match route {
            Ok(route) => Some((tracking_number, route)),
            Err(e) => {
                log::error!("Demo route {} is invalid: {}", tracking_number, e);
                None
            }
        })
        .collect()
}
