use serde::{Deserialize, Serialize};
use voxsmooth_volume::Volume;

use crate::error::SmoothError;

/// Which subvolumes to smooth.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubvolumeSelector {
    #[default]
    All,
    /// Zero-based index.
    Index(usize),
    /// A subvolume name, or a 1-based number written as text.
    Name(String),
}

impl SubvolumeSelector {
    /// `None` selects every subvolume.
    pub fn resolve(&self, volume: &Volume) -> Result<Option<usize>, SmoothError> {
        match self {
            SubvolumeSelector::All => Ok(None),
            SubvolumeSelector::Index(index) => {
                if *index < volume.dims.subvolumes {
                    Ok(Some(*index))
                } else {
                    Err(SmoothError::InvalidSubvolume(index.to_string()))
                }
            }
            SubvolumeSelector::Name(key) => volume
                .map_index_from_name_or_number(key)
                .map(Some)
                .ok_or_else(|| SmoothError::InvalidSubvolume(key.clone())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmoothParams {
    /// Gaussian sigma in physical units.
    pub sigma: f32,
    /// Treat zero-valued voxels as missing data.
    #[serde(default)]
    pub fix_zeros: bool,
    #[serde(default)]
    pub subvolume: SubvolumeSelector,
}

impl SmoothParams {
    pub fn new(sigma: f32) -> Self {
        Self {
            sigma,
            fix_zeros: false,
            subvolume: SubvolumeSelector::All,
        }
    }

    pub fn with_fix_zeros(mut self, fix_zeros: bool) -> Self {
        self.fix_zeros = fix_zeros;
        self
    }

    pub fn with_subvolume(mut self, subvolume: SubvolumeSelector) -> Self {
        self.subvolume = subvolume;
        self
    }

    pub(crate) fn validate_sigma(&self) -> Result<(), SmoothError> {
        if self.sigma.is_finite() && self.sigma > 0.0 {
            Ok(())
        } else {
            Err(SmoothError::InvalidSigma(self.sigma))
        }
    }
}

#[cfg(test)]
mod tests {
    use voxsmooth_volume::{VolumeDims, VolumeSpace};

    use super::*;

    fn four_maps() -> Volume {
        let mut volume = Volume::new(VolumeDims::new([1, 1, 1], 4, 1), VolumeSpace::IDENTITY)
            .expect("alloc");
        volume.map_names = vec!["a".into(), "b".into(), "c".into(), "d".into()];
        volume
    }

    #[test]
    fn selector_resolution() {
        let volume = four_maps();
        assert_eq!(SubvolumeSelector::All.resolve(&volume), Ok(None));
        assert_eq!(SubvolumeSelector::Index(3).resolve(&volume), Ok(Some(3)));
        assert_eq!(
            SubvolumeSelector::Name("2".into()).resolve(&volume),
            Ok(Some(1))
        );
        assert_eq!(
            SubvolumeSelector::Name("c".into()).resolve(&volume),
            Ok(Some(2))
        );
    }

    #[test]
    fn unresolvable_selectors_are_rejected() {
        let volume = four_maps();
        assert_eq!(
            SubvolumeSelector::Index(4).resolve(&volume),
            Err(SmoothError::InvalidSubvolume("4".into()))
        );
        assert_eq!(
            SubvolumeSelector::Name("5".into()).resolve(&volume),
            Err(SmoothError::InvalidSubvolume("5".into()))
        );
        assert!(SubvolumeSelector::Name("zz".into()).resolve(&volume).is_err());
    }

    #[test]
    fn params_deserialize_with_optional_fields() {
        let params: SmoothParams = serde_json::from_str(r#"{ "sigma": 2.5 }"#).expect("parse");
        assert_eq!(params, SmoothParams::new(2.5));

        let params: SmoothParams =
            serde_json::from_str(r#"{ "sigma": 1.0, "fix_zeros": true, "subvolume": { "Name": "task" } }"#)
                .expect("parse");
        assert!(params.fix_zeros);
        assert_eq!(params.subvolume, SubvolumeSelector::Name("task".into()));
    }

    #[test]
    fn sigma_must_be_positive() {
        assert!(SmoothParams::new(0.5).validate_sigma().is_ok());
        assert!(SmoothParams::new(0.0).validate_sigma().is_err());
        assert!(SmoothParams::new(-1.0).validate_sigma().is_err());
        assert!(SmoothParams::new(f32::NAN).validate_sigma().is_err());
        assert!(SmoothParams::new(f32::INFINITY).validate_sigma().is_err());
    }
}
