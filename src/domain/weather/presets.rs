//! Preset city locations for quick access

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PresetLocation {
    pub lat: f64,
    pub lon: f64,
    pub name: &'static str,
}

/// Preset cities keyed by their lowercase slug, in display order
pub const PRESET_LOCATIONS: [(&str, PresetLocation); 10] = [
    ("delhi", PresetLocation { lat: 28.6139, lon: 77.2090, name: "Delhi, India" }),
    ("mumbai", PresetLocation { lat: 19.0760, lon: 72.8777, name: "Mumbai, India" }),
    ("bangalore", PresetLocation { lat: 12.9716, lon: 77.5946, name: "Bangalore, India" }),
    ("chennai", PresetLocation { lat: 13.0827, lon: 80.2707, name: "Chennai, India" }),
    ("kolkata", PresetLocation { lat: 22.5726, lon: 88.3639, name: "Kolkata, India" }),
    ("patna", PresetLocation { lat: 25.5941, lon: 85.1376, name: "Patna, India" }),
    ("london", PresetLocation { lat: 51.5074, lon: -0.1278, name: "London, UK" }),
    ("newyork", PresetLocation { lat: 40.7128, lon: -74.0060, name: "New York, USA" }),
    ("tokyo", PresetLocation { lat: 35.6762, lon: 139.6503, name: "Tokyo, Japan" }),
    ("sydney", PresetLocation { lat: -33.8688, lon: 151.2093, name: "Sydney, Australia" }),
];

/// Case-insensitive lookup of a preset city
pub fn find_preset(city: &str) -> Option<PresetLocation> {
    let slug = city.to_lowercase();

    PRESET_LOCATIONS
        .iter()
        .find(|(key, _)| *key == slug)
        .map(|(_, location)| *location)
}

/// Comma-separated list of preset slugs
pub fn preset_names() -> String {
    PRESET_LOCATIONS
        .iter()
        .map(|(key, _)| *key)
        .collect::<Vec<_>>()
        .join(", ")
}
