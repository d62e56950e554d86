use serde::{Deserialize, Serialize};

pub use tagsim_types::{ItemHandle, PropertyId, VariantKind};

/// Simulation loop lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum SimulationState {
    Running = 0,
    StoppingRequested = 1,
    Stopped = 2,
}

impl SimulationState {
    pub(crate) fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Running,
            1 => Self::StoppingRequested,
            _ => Self::Stopped,
        }
    }
}

/// Per-entry outcome reported by dispatch operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusCode {
    Good,
    BadUnknownHandle,
    BadTypeMismatch,
    BadInvalidPropertyId,
    BadNoProperties,
}

impl StatusCode {
    pub fn is_good(self) -> bool {
        matches!(self, StatusCode::Good)
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Item not found: {0}")]
    NotFound(ItemHandle),

    #[error("Invalid property id {property_id} for item {handle}")]
    InvalidPropertyId {
        handle: ItemHandle,
        property_id: PropertyId,
    },

    #[error("Item {0} has no properties")]
    NoProperties(ItemHandle),

    #[error("Duplicate item name: {0}")]
    DuplicateName(String),

    #[error("Unsupported type: {0}")]
    UnsupportedType(String),

    #[error("Type mismatch on item {handle}: expected {expected}, got {actual}")]
    TypeMismatch {
        handle: ItemHandle,
        expected: VariantKind,
        actual: String,
    },

    #[error("Property {0} already defined")]
    CatalogConflict(PropertyId),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Timeout")]
    Timeout,
}

impl Error {
    /// Client-facing status for item-level errors
    ///
    /// Startup and configuration errors have no client status.
    pub fn status_code(&self) -> Option<StatusCode> {
        match self {
            Error::NotFound(_) => Some(StatusCode::BadUnknownHandle),
            Error::InvalidPropertyId { .. } => Some(StatusCode::BadInvalidPropertyId),
            Error::NoProperties(_) => Some(StatusCode::BadNoProperties),
            Error::TypeMismatch { .. } | Error::UnsupportedType(_) => Some(StatusCode::BadTypeMismatch),
            Error::Io(_)
            | Error::DuplicateName(_)
            | Error::CatalogConflict(_)
            | Error::Config(_)
            | Error::Timeout => None,
        }
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_from_u8() {
        assert_eq!(SimulationState::from_u8(SimulationState::Running as u8), SimulationState::Running);
        assert_eq!(
            SimulationState::from_u8(SimulationState::StoppingRequested as u8),
            SimulationState::StoppingRequested
        );
        assert_eq!(SimulationState::from_u8(2), SimulationState::Stopped);
    }

    #[test]
    fn test_status_codes() {
        let handle = ItemHandle(7);
        assert_eq!(Error::NotFound(handle).status_code(), Some(StatusCode::BadUnknownHandle));
        assert_eq!(Error::NoProperties(handle).status_code(), Some(StatusCode::BadNoProperties));
        assert_eq!(
            Error::InvalidPropertyId {
                handle,
                property_id: PropertyId(1),
            }
            .status_code(),
            Some(StatusCode::BadInvalidPropertyId)
        );
        assert_eq!(Error::Timeout.status_code(), None);
        assert!(!StatusCode::BadTypeMismatch.is_good());
    }
}
