use crate::domain::Coordinate;
use serde::{Deserialize, Serialize};

/// A location where attendance may be registered. A zone without its own
/// radius falls back to the default radius configured for the check.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct AuthorizedZone {
    #[serde(flatten)]
    pub coordinate: Coordinate,
    pub name: String,
    #[serde(default)]
    pub radius_m: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_a_zone_without_a_radius() {
        let zone: AuthorizedZone = serde_json::from_str(r#"{ "latitude": 51.0, "longitude": 4.0, "name": "Main office" }"#).unwrap();

        assert_eq!(
            zone,
            AuthorizedZone {
                coordinate: Coordinate { latitude: 51.0, longitude: 4.0 },
                name: "Main office".to_string(),
                radius_m: None,
            }
        );
    }

    #[test]
    fn deserializes_a_zone_with_its_own_radius() {
        let zone: AuthorizedZone =
            serde_json::from_str(r#"{ "latitude": 51.0, "longitude": 4.0, "name": "Warehouse", "radius_m": 250.0 }"#).unwrap();

        assert_eq!(zone.radius_m, Some(250.0));
    }
}
