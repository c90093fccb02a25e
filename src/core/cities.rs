//! Destination city pool and map placement.
//!
//! Map radii are chosen once when the catalog is generated so that recomputing the city
//! safety list after a mutation keeps every circle the same size.

use crate::entities::Coordinates;
use rand::Rng;
use std::collections::HashMap;

/// Radius used for cities outside the pool, in metres
pub const DEFAULT_RADIUS: u32 = 100_000;

/// A destination the generator can place programs in
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Destination {
    /// City name
    pub city: &'static str,
    /// Country name
    pub country: &'static str,
    /// Map position
    pub coords: Coordinates,
}

const fn destination(city: &'static str, country: &'static str, lat: f64, lng: f64) -> Destination {
    Destination {
        city,
        country,
        coords: Coordinates { lat, lng },
    }
}

/// Every destination known to the generator
pub const DESTINATIONS: [Destination; 25] = [
    destination("Lisbon", "Portugal", 38.7223, -9.1393),
    destination("Tokyo", "Japan", 35.6762, 139.6503),
    destination("Berlin", "Germany", 52.5200, 13.4050),
    destination("Dublin", "Ireland", 53.3498, -6.2603),
    destination("Paris", "France", 48.8566, 2.3522),
    destination("Rome", "Italy", 41.9028, 12.4964),
    destination("Sydney", "Australia", -33.8688, 151.2093),
    destination("Buenos Aires", "Argentina", -34.6037, -58.3816),
    destination("Vancouver", "Canada", 49.2827, -123.1207),
    destination("Seoul", "South Korea", 37.5665, 126.9780),
    destination("Florence", "Italy", 43.7696, 11.2558),
    destination("Madrid", "Spain", 40.4168, -3.7038),
    destination("Amsterdam", "Netherlands", 52.3676, 4.9041),
    destination("Kyoto", "Japan", 35.0116, 135.7681),
    destination("Cape Town", "South Africa", -33.9249, 18.4241),
    destination("Prague", "Czech Republic", 50.0755, 14.4378),
    destination("Bangkok", "Thailand", 13.7563, 100.5018),
    destination("Montreal", "Canada", 45.5017, -73.5673),
    destination("London", "United Kingdom", 51.5074, -0.1278),
    destination("Barcelona", "Spain", 41.3851, 2.1734),
    destination("San Francisco", "USA", 37.7749, -122.4194),
    destination("Reykjavik", "Iceland", 64.1466, -21.9426),
    destination("Cusco", "Peru", -13.5320, -71.9675),
    destination("Bali", "Indonesia", -8.3405, 115.0920),
    destination("Queenstown", "New Zealand", -45.0312, 168.6626),
];

/// Where and how large a city is drawn on the map
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Map position
    pub coords: Coordinates,
    /// Display radius in metres
    pub radius: u32,
}

/// Lookup of map placement by (city, country)
#[derive(Debug, Clone)]
pub struct CityDirectory {
    placements: HashMap<(String, String), Placement>,
}

impl Default for CityDirectory {
    /// Every pool destination with the default radius.
    fn default() -> Self {
        Self::from_fn(|| DEFAULT_RADIUS)
    }
}

impl CityDirectory {
    /// Builds the directory with a random radius of 80 to 200 km per city.
    pub fn with_random_radii<R: Rng>(rng: &mut R) -> Self {
        Self::from_fn(|| rng.gen_range(8..=20) * 10_000)
    }

    fn from_fn(mut radius: impl FnMut() -> u32) -> Self {
        let placements = DESTINATIONS
            .iter()
            .map(|d| {
                (
                    (d.city.to_string(), d.country.to_string()),
                    Placement {
                        coords: d.coords,
                        radius: radius(),
                    },
                )
            })
            .collect();
        Self { placements }
    }

    /// Placement of a city; unknown cities sit at (0, 0) with the default radius.
    #[must_use]
    pub fn placement(&self, city: &str, country: &str) -> Placement {
        self.placements
            .get(&(city.to_string(), country.to_string()))
            .copied()
            .unwrap_or(Placement {
                coords: Coordinates::default(),
                radius: DEFAULT_RADIUS,
            })
    }

    /// Number of known cities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.placements.len()
    }

    /// Whether the directory knows no city at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }
}
