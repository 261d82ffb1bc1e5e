use crate::domain::{AuthorizedZone, LocationSample, ValidationVerdict};
use crate::geo::device::PositionError;
use tracing::{debug, info, instrument, warn};

const NO_ZONE_MATCHED: &str = "You are not at an authorized location for attendance";
const CANNOT_VERIFY: &str = "Unable to verify location. Please enable GPS and try again.";
const NO_GEOFENCE_CONFIGURED: &str = "Location captured successfully";

/// Decides whether a fix satisfies the configured geofence. With no zones
/// configured, the presence of a fix alone satisfies attendance.
#[derive(Clone, Debug)]
pub struct LocationAuthorizer {
    zones: Vec<AuthorizedZone>,
    default_radius_m: f64,
}

impl LocationAuthorizer {
    pub fn new(zones: Vec<AuthorizedZone>, default_radius_m: f64) -> Self {
        LocationAuthorizer { zones, default_radius_m }
    }

    /// Turns the outcome of a location acquisition into a verdict. An
    /// acquisition failure yields a generic denial; the underlying error is
    /// logged here, never embedded in the verdict message.
    #[instrument(skip_all)]
    pub fn authorize(&self, acquisition: Result<LocationSample, PositionError>) -> ValidationVerdict {
        match acquisition {
            Ok(sample) => self.verdict_for(&sample),
            Err(e) => {
                warn!("🚧 Cannot verify location: {}", e);
                ValidationVerdict::invalid(CANNOT_VERIFY)
            }
        }
    }

    /// The first zone containing the sample wins, in the order the zones were
    /// configured. There is deliberately no nearest-zone tie-break.
    pub fn verdict_for(&self, sample: &LocationSample) -> ValidationVerdict {
        if self.zones.is_empty() {
            debug!("🚧 No geofence configured, any fix is valid");
            return ValidationVerdict::valid(NO_GEOFENCE_CONFIGURED, None);
        }

        for zone in &self.zones {
            let radius_m = zone.radius_m.unwrap_or(self.default_radius_m);
            if zone.coordinate.is_within_radius(sample.coordinate(), radius_m) {
                info!("🚧 Location verified at zone '{}'", zone.name);
                return ValidationVerdict::valid(format!("Location verified: {}", zone.name), Some(zone.clone()));
            }
        }

        info!("🚧 No authorized zone within range");
        ValidationVerdict::invalid(NO_ZONE_MATCHED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Coordinate;
    use pretty_assertions::assert_eq;

    // ~0.001 degrees of latitude is ~111m
    fn zone(name: &str, latitude: f64, radius_m: Option<f64>) -> AuthorizedZone {
        AuthorizedZone {
            coordinate: Coordinate { latitude, longitude: 4.0 },
            name: name.to_string(),
            radius_m,
        }
    }

    fn sample_at(latitude: f64) -> LocationSample {
        LocationSample::new(Coordinate { latitude, longitude: 4.0 }, 10.0, 1_700_000_000_000)
    }

    #[test]
    fn any_fix_is_valid_without_a_geofence() {
        let authorizer = LocationAuthorizer::new(vec![], 100.0);

        let verdict = authorizer.verdict_for(&sample_at(51.0));

        assert_eq!(verdict, ValidationVerdict::valid("Location captured successfully", None));
    }

    #[test]
    fn the_first_matching_zone_wins_over_a_nearer_one() {
        // Both zones contain the sample; the second one is much closer
        let first = zone("First", 51.0005, Some(100.0));
        let nearest = zone("Nearest", 51.0, Some(100.0));
        let authorizer = LocationAuthorizer::new(vec![first.clone(), nearest], 100.0);

        let verdict = authorizer.verdict_for(&sample_at(51.0));

        assert!(verdict.valid);
        assert_eq!(verdict.message, "Location verified: First");
        assert_eq!(verdict.matched_zone, Some(first));
    }

    #[test]
    fn a_zone_without_a_radius_uses_the_default_radius() {
        let authorizer = LocationAuthorizer::new(vec![zone("Office", 51.001, None)], 150.0);

        let verdict = authorizer.verdict_for(&sample_at(51.0));

        assert!(verdict.valid, "the ~111m distance should be within the 150m default radius");
    }

    #[test]
    fn denies_a_fix_outside_every_zone() {
        let authorizer = LocationAuthorizer::new(vec![zone("Office", 51.01, Some(100.0))], 100.0);

        let verdict = authorizer.verdict_for(&sample_at(51.0));

        assert_eq!(verdict, ValidationVerdict::invalid("You are not at an authorized location for attendance"));
    }

    #[test]
    fn a_failed_acquisition_yields_a_generic_denial() {
        let authorizer = LocationAuthorizer::new(vec![zone("Office", 51.0, Some(100.0))], 100.0);

        let verdict = authorizer.authorize(Err(PositionError::PermissionDenied));

        assert_eq!(verdict, ValidationVerdict::invalid("Unable to verify location. Please enable GPS and try again."));
    }

    #[test]
    fn a_failed_acquisition_without_a_geofence_is_still_denied() {
        let authorizer = LocationAuthorizer::new(vec![], 100.0);

        let verdict = authorizer.authorize(Err(PositionError::Timeout));

        assert!(!verdict.valid);
    }
}
