use geocode_client::GeocodeError;
use shared::error::{ErrorKind, ErrorReport};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ViewError {
    #[error(transparent)]
    Geocode(#[from] GeocodeError),
    #[error("no geocoded address yet; submit an address before tracking")]
    NotGeocoded,
    #[error("map display failure: {0:#}")]
    Display(#[source] anyhow::Error),
}

impl ViewError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ViewError::Geocode(err) => err.kind(),
            ViewError::NotGeocoded => ErrorKind::NotGeocoded,
            ViewError::Display(_) => ErrorKind::Display,
        }
    }

    pub fn report(&self) -> ErrorReport {
        ErrorReport::new(self.kind(), self.to_string())
    }
}
