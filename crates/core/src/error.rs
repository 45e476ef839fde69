use std::fmt;

use voxsmooth_volume::VolumeError;

#[derive(Debug, Clone, PartialEq)]
pub enum SmoothError {
    SpaceMismatch,
    InvalidSubvolume(String),
    InvalidSigma(f32),
    DegenerateSpace,
    Config(String),
    Volume(VolumeError),
}

impl fmt::Display for SmoothError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SmoothError::SpaceMismatch => {
                f.write_str("volume roi space does not match input volume")
            }
            SmoothError::InvalidSubvolume(selector) => {
                write!(f, "invalid subvolume specified: '{selector}'")
            }
            SmoothError::InvalidSigma(sigma) => {
                write!(f, "smoothing sigma must be positive and finite, got {sigma}")
            }
            SmoothError::DegenerateSpace => {
                f.write_str("volume has a zero-length or non-finite voxel axis")
            }
            SmoothError::Config(message) => write!(f, "invalid smoothing settings: {message}"),
            SmoothError::Volume(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for SmoothError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SmoothError::Volume(err) => Some(err),
            _ => None,
        }
    }
}

impl From<VolumeError> for SmoothError {
    fn from(err: VolumeError) -> Self {
        SmoothError::Volume(err)
    }
}
