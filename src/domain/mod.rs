mod coordinate;
mod location_sample;
mod verdict;
mod zone;

pub use coordinate::Coordinate;
pub use location_sample::LocationSample;
pub use verdict::ValidationVerdict;
pub use zone::AuthorizedZone;
