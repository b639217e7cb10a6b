//! Links to external map and routing services for a report's location.

use crate::types::{Coordinates, MapConfig, MapProvider};

/// "View on map" link for `location`, using the configured provider.
pub fn map_url(config: &MapConfig, location: Coordinates) -> String {
    let Coordinates {
        latitude: lat,
        longitude: lon,
    } = location;

    match config.provider {
        MapProvider::OpenStreetMap => format!(
            "{}/?mlat={lat}&mlon={lon}#map={}/{lat}/{lon}",
            config.openstreetmap_base_url.trim_end_matches('/'),
            config.zoom,
        ),
        MapProvider::Google => format!(
            "{}?q={lat},{lon}",
            config.google_maps_base_url.trim_end_matches('/'),
        ),
    }
}

/// Driving directions from `from` to `to` on Google Maps.
pub fn route_url(config: &MapConfig, from: Coordinates, to: Coordinates) -> String {
    format!(
        "{}/dir/{},{}/{},{}",
        config.google_maps_base_url.trim_end_matches('/'),
        from.latitude,
        from.longitude,
        to.latitude,
        to.longitude,
    )
}

/// Directions from `from` to `to` on GraphHopper.
pub fn graphhopper_route_url(config: &MapConfig, from: Coordinates, to: Coordinates) -> String {
    format!(
        "{}/?point={},{}&point={},{}",
        config.graphhopper_url.trim_end_matches('/'),
        from.latitude,
        from.longitude,
        to.latitude,
        to.longitude,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const BERLIN: Coordinates = Coordinates {
        latitude: 52.52,
        longitude: 13.405,
    };
    const POTSDAM: Coordinates = Coordinates {
        latitude: 52.3906,
        longitude: 13.0645,
    };

    #[test]
    fn test_openstreetmap_link() {
        let config = MapConfig::default();
        assert_eq!(
            map_url(&config, BERLIN),
            "https://www.openstreetmap.org/?mlat=52.52&mlon=13.405#map=18/52.52/13.405"
        );
    }

    #[test]
    fn test_google_link() {
        let config = MapConfig {
            provider: MapProvider::Google,
            ..MapConfig::default()
        };
        assert_eq!(
            map_url(&config, BERLIN),
            "https://www.google.com/maps?q=52.52,13.405"
        );
    }

    #[test]
    fn test_route_links() {
        let config = MapConfig::default();
        assert_eq!(
            route_url(&config, POTSDAM, BERLIN),
            "https://www.google.com/maps/dir/52.3906,13.0645/52.52,13.405"
        );
        assert_eq!(
            graphhopper_route_url(&config, POTSDAM, BERLIN),
            "https://graphhopper.com/maps/?point=52.3906,13.0645&point=52.52,13.405"
        );
    }

    #[test]
    fn test_trailing_slash_in_base_url() {
        let config = MapConfig {
            google_maps_base_url: "https://maps.example/".to_string(),
            ..MapConfig::default()
        };
        assert_eq!(
            route_url(&config, POTSDAM, BERLIN),
            "https://maps.example/dir/52.3906,13.0645/52.52,13.405"
        );
    }
}
