use thiserror::Error;

/// Weather provider errors.
///
/// Every failure of a lookup collapses into one variant; the cause is logged
/// where it happens and not carried further.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WeatherError {
    #[error("Weather provider unavailable")]
    ProviderUnavailable,
}

/// Geolocation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LocationError {
    #[error("Geolocation not supported")]
    Unsupported,
    #[error("Location permission denied")]
    PermissionDenied,
}

/// Preference persistence errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Preference file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to encode preference: {0}")]
    Encode(#[from] serde_json::Error),
}
