use std::fmt;

use crate::space::VolumeSpace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VolumeDims {
    pub ijk: [usize; 3],
    pub subvolumes: usize,
    pub components: usize,
}

impl VolumeDims {
    pub fn new(ijk: [usize; 3], subvolumes: usize, components: usize) -> Self {
        Self {
            ijk,
            subvolumes,
            components,
        }
    }

    /// Single subvolume, single component.
    pub fn scalar(ijk: [usize; 3]) -> Self {
        Self::new(ijk, 1, 1)
    }

    pub fn with_subvolumes(self, subvolumes: usize) -> Self {
        Self { subvolumes, ..self }
    }

    pub fn frame_len(&self) -> usize {
        self.ijk[0] * self.ijk[1] * self.ijk[2]
    }

    pub fn frame_count(&self) -> usize {
        self.subvolumes * self.components
    }

    pub fn total_len(&self) -> usize {
        self.frame_len() * self.frame_count()
    }

    /// Linear index within a frame, i fastest.
    pub fn index(&self, i: usize, j: usize, k: usize) -> usize {
        i + self.ijk[0] * (j + self.ijk[1] * k)
    }

    fn frame_slot(&self, subvolume: usize, component: usize) -> Option<usize> {
        (subvolume < self.subvolumes && component < self.components)
            .then_some(subvolume * self.components + component)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VolumeError {
    AllocationFailed { label: String, len: usize },
    FrameLength { expected: usize, actual: usize },
    FrameOutOfRange { subvolume: usize, component: usize },
    VoxelOutOfRange { ijk: [usize; 3] },
}

impl fmt::Display for VolumeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VolumeError::AllocationFailed { label, len } => {
                write!(f, "{label}: failed to allocate {len} voxels")
            }
            VolumeError::FrameLength { expected, actual } => {
                write!(f, "frame has {actual} voxels, expected {expected}")
            }
            VolumeError::FrameOutOfRange {
                subvolume,
                component,
            } => write!(
                f,
                "frame (subvolume {subvolume}, component {component}) is out of range"
            ),
            VolumeError::VoxelOutOfRange { ijk } => {
                write!(f, "voxel {ijk:?} is outside the volume")
            }
        }
    }
}

impl std::error::Error for VolumeError {}

pub fn try_alloc_f32(len: usize, label: &str) -> Result<Vec<f32>, VolumeError> {
    let mut values = Vec::new();
    values
        .try_reserve_exact(len)
        .map_err(|_| VolumeError::AllocationFailed {
            label: label.to_string(),
            len,
        })?;
    values.resize(len, 0.0);
    Ok(values)
}

/// Destination for a computed volume.
pub trait FrameSink {
    fn reinitialize(&mut self, dims: VolumeDims, space: VolumeSpace) -> Result<(), VolumeError>;

    fn set_map_name(&mut self, subvolume: usize, name: String) -> Result<(), VolumeError>;

    fn set_frame(
        &mut self,
        frame: &[f32],
        subvolume: usize,
        component: usize,
    ) -> Result<(), VolumeError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Volume {
    pub dims: VolumeDims,
    pub space: VolumeSpace,
    pub map_names: Vec<String>,
    values: Vec<f32>,
}

impl Default for Volume {
    fn default() -> Self {
        Self {
            dims: VolumeDims::new([0; 3], 0, 0),
            space: VolumeSpace::IDENTITY,
            map_names: Vec::new(),
            values: Vec::new(),
        }
    }
}

impl Volume {
    /// Zero-filled volume.
    pub fn new(dims: VolumeDims, space: VolumeSpace) -> Result<Self, VolumeError> {
        let values = try_alloc_f32(dims.total_len(), "Volume")?;
        Ok(Self {
            dims,
            space,
            map_names: vec![String::new(); dims.subvolumes],
            values,
        })
    }

    /// Wraps existing data laid out frame after frame, subvolume-major.
    pub fn from_values(
        dims: VolumeDims,
        space: VolumeSpace,
        values: Vec<f32>,
    ) -> Result<Self, VolumeError> {
        if values.len() != dims.total_len() {
            return Err(VolumeError::FrameLength {
                expected: dims.total_len(),
                actual: values.len(),
            });
        }
        Ok(Self {
            dims,
            space,
            map_names: vec![String::new(); dims.subvolumes],
            values,
        })
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn frame(&self, subvolume: usize, component: usize) -> Option<&[f32]> {
        let slot = self.dims.frame_slot(subvolume, component)?;
        let len = self.dims.frame_len();
        self.values.get(slot * len..(slot + 1) * len)
    }

    pub fn frame_mut(&mut self, subvolume: usize, component: usize) -> Option<&mut [f32]> {
        let slot = self.dims.frame_slot(subvolume, component)?;
        let len = self.dims.frame_len();
        self.values.get_mut(slot * len..(slot + 1) * len)
    }

    pub fn value(
        &self,
        i: usize,
        j: usize,
        k: usize,
        subvolume: usize,
        component: usize,
    ) -> Option<f32> {
        if i >= self.dims.ijk[0] || j >= self.dims.ijk[1] || k >= self.dims.ijk[2] {
            return None;
        }
        self.frame(subvolume, component)
            .map(|frame| frame[self.dims.index(i, j, k)])
    }

    pub fn set_value(
        &mut self,
        ijk: [usize; 3],
        subvolume: usize,
        component: usize,
        value: f32,
    ) -> Result<(), VolumeError> {
        if ijk.iter().zip(self.dims.ijk.iter()).any(|(v, n)| v >= n) {
            return Err(VolumeError::VoxelOutOfRange { ijk });
        }
        let index = self.dims.index(ijk[0], ijk[1], ijk[2]);
        let frame = self
            .frame_mut(subvolume, component)
            .ok_or(VolumeError::FrameOutOfRange {
                subvolume,
                component,
            })?;
        frame[index] = value;
        Ok(())
    }

    pub fn map_name(&self, subvolume: usize) -> &str {
        self.map_names
            .get(subvolume)
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn map_index_from_name(&self, name: &str) -> Option<usize> {
        self.map_names.iter().position(|candidate| candidate == name)
    }

    /// Integers are 1-based subvolume numbers, anything else is a name.
    pub fn map_index_from_name_or_number(&self, key: &str) -> Option<usize> {
        let key = key.trim();
        match key.parse::<i64>() {
            Ok(number) => {
                let index = number.checked_sub(1)?;
                (index >= 0 && (index as usize) < self.dims.subvolumes)
                    .then_some(index as usize)
            }
            Err(_) => self.map_index_from_name(key),
        }
    }

    /// Same (i, j, k) extents and the same index-to-space mapping.
    pub fn matches_space(&self, other: &Volume) -> bool {
        self.dims.ijk == other.dims.ijk && self.space == other.space
    }
}

impl FrameSink for Volume {
    fn reinitialize(&mut self, dims: VolumeDims, space: VolumeSpace) -> Result<(), VolumeError> {
        *self = Volume::new(dims, space)?;
        Ok(())
    }

    fn set_map_name(&mut self, subvolume: usize, name: String) -> Result<(), VolumeError> {
        let slot = self
            .map_names
            .get_mut(subvolume)
            .ok_or(VolumeError::FrameOutOfRange {
                subvolume,
                component: 0,
            })?;
        *slot = name;
        Ok(())
    }

    fn set_frame(
        &mut self,
        frame: &[f32],
        subvolume: usize,
        component: usize,
    ) -> Result<(), VolumeError> {
        let dest = self
            .frame_mut(subvolume, component)
            .ok_or(VolumeError::FrameOutOfRange {
                subvolume,
                component,
            })?;
        if dest.len() != frame.len() {
            return Err(VolumeError::FrameLength {
                expected: dest.len(),
                actual: frame.len(),
            });
        }
        dest.copy_from_slice(frame);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named_volume() -> Volume {
        let dims = VolumeDims::new([2, 2, 2], 3, 1);
        let mut volume = Volume::new(dims, VolumeSpace::IDENTITY).expect("alloc");
        volume.map_names = vec!["rest".into(), "task".into(), "12".into()];
        volume
    }

    #[test]
    fn index_is_i_fastest() {
        let dims = VolumeDims::scalar([3, 4, 5]);
        assert_eq!(dims.index(1, 0, 0), 1);
        assert_eq!(dims.index(0, 1, 0), 3);
        assert_eq!(dims.index(0, 0, 1), 12);
        assert_eq!(dims.index(2, 3, 4), dims.frame_len() - 1);
    }

    #[test]
    fn frames_are_disjoint_slices() {
        let dims = VolumeDims::new([2, 1, 1], 2, 2);
        let values = (0..8).map(|v| v as f32).collect();
        let volume = Volume::from_values(dims, VolumeSpace::IDENTITY, values).expect("volume");
        assert_eq!(volume.frame(0, 0), Some(&[0.0, 1.0][..]));
        assert_eq!(volume.frame(0, 1), Some(&[2.0, 3.0][..]));
        assert_eq!(volume.frame(1, 0), Some(&[4.0, 5.0][..]));
        assert_eq!(volume.frame(1, 1), Some(&[6.0, 7.0][..]));
        assert!(volume.frame(2, 0).is_none());
        assert!(volume.frame(0, 2).is_none());
        assert_eq!(volume.value(1, 0, 0, 1, 1), Some(7.0));
        assert_eq!(volume.value(2, 0, 0, 0, 0), None);
    }

    #[test]
    fn set_value_checks_bounds() {
        let mut volume = named_volume();
        volume.set_value([1, 0, 1], 2, 0, 4.0).expect("set");
        assert_eq!(volume.value(1, 0, 1, 2, 0), Some(4.0));
        assert_eq!(
            volume.set_value([2, 0, 0], 0, 0, 1.0),
            Err(VolumeError::VoxelOutOfRange { ijk: [2, 0, 0] })
        );
        assert!(volume.set_value([0, 0, 0], 3, 0, 1.0).is_err());
    }

    #[test]
    fn from_values_rejects_wrong_length() {
        let dims = VolumeDims::scalar([2, 2, 2]);
        let err = Volume::from_values(dims, VolumeSpace::IDENTITY, vec![0.0; 7]).unwrap_err();
        assert_eq!(
            err,
            VolumeError::FrameLength {
                expected: 8,
                actual: 7
            }
        );
    }

    #[test]
    fn numbers_are_one_based_and_names_fall_back() {
        let volume = named_volume();
        assert_eq!(volume.map_index_from_name_or_number("1"), Some(0));
        assert_eq!(volume.map_index_from_name_or_number("3"), Some(2));
        assert_eq!(volume.map_index_from_name_or_number("0"), None);
        assert_eq!(volume.map_index_from_name_or_number("4"), None);
        assert_eq!(volume.map_index_from_name_or_number("-2"), None);
        assert_eq!(volume.map_index_from_name_or_number("task"), Some(1));
        assert_eq!(volume.map_index_from_name_or_number("missing"), None);
    }

    #[test]
    fn sink_writes_frames_and_names() {
        let mut out = Volume::default();
        out.reinitialize(VolumeDims::new([2, 1, 1], 1, 2), VolumeSpace::IDENTITY)
            .expect("reinit");
        out.set_frame(&[1.0, 2.0], 0, 1).expect("frame");
        out.set_map_name(0, "smoothed".into()).expect("name");
        assert_eq!(out.frame(0, 1), Some(&[1.0, 2.0][..]));
        assert_eq!(out.frame(0, 0), Some(&[0.0, 0.0][..]));
        assert_eq!(out.map_name(0), "smoothed");
        assert!(out.set_frame(&[1.0], 0, 0).is_err());
        assert!(out.set_frame(&[1.0, 2.0], 1, 0).is_err());
        assert!(out.set_map_name(3, "x".into()).is_err());
    }

    #[test]
    fn matches_space_compares_extents_and_geometry() {
        let a = named_volume();
        let mut b = Volume::new(VolumeDims::scalar([2, 2, 2]), VolumeSpace::IDENTITY)
            .expect("alloc");
        assert!(a.matches_space(&b));
        b.space.origin.x = 0.5;
        assert!(!a.matches_space(&b));
        let c = Volume::new(VolumeDims::scalar([2, 2, 3]), VolumeSpace::IDENTITY)
            .expect("alloc");
        assert!(!a.matches_space(&c));
    }
}
