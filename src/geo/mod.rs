mod authorizer;
mod device;
mod geocoder;
mod provider;

pub use authorizer::LocationAuthorizer;
pub use device::{AcquisitionOptions, PositionDevice, PositionError};
pub use geocoder::reverse_lookup;
pub use provider::{LocationProvider, WatchHandle, WatchUpdate};
