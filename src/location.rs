use async_trait::async_trait;

use crate::error::LocationError;
use crate::models::Coordinates;

/// One-shot device position reading
#[async_trait]
pub trait Geolocator: Send + Sync {
    async fn current_position(&self) -> Result<Coordinates, LocationError>;
}

/// Reports a preconfigured reading: a position, or the failure the device
/// would give
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedLocation {
    reading: Result<Coordinates, LocationError>,
}

impl Default for FixedLocation {
    fn default() -> Self {
        Self::unsupported()
    }
}

impl FixedLocation {
    pub fn new(position: Option<Coordinates>) -> Self {
        Self {
            reading: position.ok_or(LocationError::Unsupported),
        }
    }

    pub fn unsupported() -> Self {
        Self {
            reading: Err(LocationError::Unsupported),
        }
    }

    pub fn denied() -> Self {
        Self {
            reading: Err(LocationError::PermissionDenied),
        }
    }
}

#[async_trait]
impl Geolocator for FixedLocation {
    async fn current_position(&self) -> Result<Coordinates, LocationError> {
        self.reading
    }
}
