use serde::de::Error;
use serde::{Deserialize, Deserializer, Serialize};

const MEAN_EARTH_RADIUS_M: f64 = 6_371_000.0;

#[derive(Clone, Copy, Default, Debug, PartialEq, Serialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Great-circle distance to `other` in meters, using the haversine formula
    /// with the mean Earth radius.
    pub fn distance_meters(&self, other: &Coordinate) -> f64 {
        let delta_latitude = (other.latitude - self.latitude).to_radians();
        let delta_longitude = (other.longitude - self.longitude).to_radians();

        let a = (delta_latitude / 2.0).sin().powi(2)
            + self.latitude.to_radians().cos() * other.latitude.to_radians().cos() * (delta_longitude / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        MEAN_EARTH_RADIUS_M * c
    }

    /// Whether `point` lies within `radius_m` meters of this coordinate. A point
    /// exactly on the boundary counts as within.
    pub fn is_within_radius(&self, point: &Coordinate, radius_m: f64) -> bool {
        self.distance_meters(point) <= radius_m
    }
}

impl<'de> Deserialize<'de> for Coordinate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Debug, Deserialize)]
        pub struct Inner {
            latitude: f64,
            longitude: f64,
        }

        let inner = Inner::deserialize(deserializer)?;
        if !(inner.latitude >= -90.0 && inner.latitude <= 90.0) {
            return Err(Error::custom(format!("invalid latitude: {}, must be between -90 and 90", inner.latitude)));
        }

        if !(inner.longitude >= -180.0 && inner.longitude <= 180.0) {
            return Err(Error::custom(format!("invalid longitude: {}, must be between -180 and 180", inner.longitude)));
        }

        Ok(Coordinate {
            latitude: inner.latitude,
            longitude: inner.longitude,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Coordinate { latitude: 0.0, longitude: 0.0 })]
    #[case(Coordinate { latitude: 51.8615899, longitude: 4.3580323 })]
    #[case(Coordinate { latitude: -89.9, longitude: 179.9 })]
    fn distance_to_itself_is_zero(#[case] coordinate: Coordinate) {
        assert_eq!(coordinate.distance_meters(&coordinate), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = Coordinate { latitude: 51.8615899, longitude: 4.3580323 };
        let b = Coordinate { latitude: 52.3675734, longitude: 4.9041389 };

        let there = a.distance_meters(&b);
        let back = b.distance_meters(&a);
        assert!((there - back).abs() < 1e-6, "expected {} == {}", there, back);
    }

    #[test]
    fn a_thousandth_of_a_degree_of_latitude_is_about_111_meters() {
        let a = Coordinate { latitude: 51.0, longitude: 4.0 };
        let b = Coordinate { latitude: 51.001, longitude: 4.0 };

        let distance = a.distance_meters(&b);
        assert!((distance - 111.0).abs() < 1.0, "expected ~111m, got {}m", distance);
    }

    #[test]
    fn a_point_exactly_on_the_radius_boundary_is_within() {
        let center = Coordinate { latitude: 51.0, longitude: 4.0 };
        let point = Coordinate { latitude: 51.001, longitude: 4.0 };

        let distance = center.distance_meters(&point);
        assert!(center.is_within_radius(&point, distance));
        assert!(!center.is_within_radius(&point, distance - 0.001));
    }

    #[test]
    fn deserializes_a_valid_coordinate() {
        let coordinate: Coordinate = serde_json::from_str(r#"{ "latitude": 51.8615899, "longitude": 4.3580323 }"#).unwrap();
        assert_eq!(
            coordinate,
            Coordinate {
                latitude: 51.8615899,
                longitude: 4.3580323
            }
        );
    }

    #[rstest]
    #[case(r#"{ "latitude": 90.1, "longitude": 0.0 }"#)]
    #[case(r#"{ "latitude": -90.1, "longitude": 0.0 }"#)]
    #[case(r#"{ "latitude": 0.0, "longitude": 180.1 }"#)]
    #[case(r#"{ "latitude": 0.0, "longitude": -180.1 }"#)]
    fn rejects_out_of_range_coordinates(#[case] json: &str) {
        let result = serde_json::from_str::<Coordinate>(json);
        assert!(result.is_err());
    }
}
