use tracing::debug;
use voxsmooth_volume::{try_alloc_f32, VolumeError, VolumeSpace};

use crate::error::SmoothError;
use crate::grid::{classify, GridShape};
use crate::settings::SmoothSettings;

// Keeps 2 * steps + 1 well inside usize and offsets inside i32.
const MAX_AXIS_STEPS: usize = 1 << 24;

/// Voxel steps covered by `reach` axis lengths, never less than one.
///
/// Windows are clipped to the grid, so no step past `extent - 1` is ever
/// read and the count is capped there.
fn axis_steps(reach: f32, extent: usize) -> usize {
    let limit = extent.saturating_sub(1).clamp(1, MAX_AXIS_STEPS);
    let steps = reach.floor();
    if !(steps >= 1.0) {
        1
    } else if steps >= limit as f32 {
        limit
    } else {
        steps as usize
    }
}

fn signed_offset(index: usize, steps: usize) -> i32 {
    (index as i64 - steps as i64) as i32
}

/// Unnormalized Gaussian of a physical distance.
fn gaussian(distance: f32, sigma: f32) -> f32 {
    let t = distance / sigma;
    (-t * t / 2.0).exp()
}

/// 1-D weights sampled at whole voxel offsets, centered at `steps`.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisWeights {
    steps: usize,
    values: Vec<f32>,
}

impl AxisWeights {
    pub fn gaussian(
        spacing: f32,
        sigma: f32,
        radius: f32,
        extent: usize,
    ) -> Result<Self, SmoothError> {
        let steps = axis_steps(radius / spacing, extent);
        let mut values = try_alloc_f32(2 * steps + 1, "Separable kernel")?;
        for (index, value) in values.iter_mut().enumerate() {
            let offset = signed_offset(index, steps) as f32;
            *value = gaussian(spacing * offset, sigma);
        }
        Ok(Self { steps, values })
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    #[cfg(test)]
    fn weight(&self, offset: isize) -> f32 {
        let index = offset + self.steps as isize;
        if index < 0 {
            return 0.0;
        }
        self.values.get(index as usize).copied().unwrap_or(0.0)
    }
}

/// Per-axis weights for grids whose axes are perpendicular.
#[derive(Debug, Clone, PartialEq)]
pub struct SeparableKernel {
    pub axes: [AxisWeights; 3],
}

impl SeparableKernel {
    pub fn new(
        space: &VolumeSpace,
        extents: [usize; 3],
        sigma: f32,
        radius: f32,
    ) -> Result<Self, SmoothError> {
        let [si, sj, sk] = space.spacing();
        let [ni, nj, nk] = extents;
        Ok(Self {
            axes: [
                AxisWeights::gaussian(si, sigma, radius, ni)?,
                AxisWeights::gaussian(sj, sigma, radius, nj)?,
                AxisWeights::gaussian(sk, sigma, radius, nk)?,
            ],
        })
    }

    pub fn steps(&self) -> [usize; 3] {
        [
            self.axes[0].steps(),
            self.axes[1].steps(),
            self.axes[2].steps(),
        ]
    }
}

/// Flattened weight cube for arbitrary grids, i fastest then j then k.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseKernel {
    steps: [usize; 3],
    values: Vec<f32>,
}

impl DenseKernel {
    /// Box enclosing the truncation sphere, zero outside the sphere.
    pub fn new(
        space: &VolumeSpace,
        extents: [usize; 3],
        sigma: f32,
        radius: f32,
    ) -> Result<Self, SmoothError> {
        Self::build(space, extents, sigma, radius, true)
    }

    /// Same box without the spherical cutoff. On an axis-aligned grid this
    /// is the outer product of the separable weights.
    pub fn full_box(
        space: &VolumeSpace,
        extents: [usize; 3],
        sigma: f32,
        radius: f32,
    ) -> Result<Self, SmoothError> {
        Self::build(space, extents, sigma, radius, false)
    }

    fn build(
        space: &VolumeSpace,
        extents: [usize; 3],
        sigma: f32,
        radius: f32,
        spherical: bool,
    ) -> Result<Self, SmoothError> {
        let [i_axis, j_axis, k_axis] = space.axes();
        // Each axis's reach is the sphere radius over that axis's component
        // normal to the plane of the other two.
        let jk_normal = j_axis.cross(k_axis).normalize();
        let ki_normal = k_axis.cross(i_axis).normalize();
        let ij_normal = i_axis.cross(j_axis).normalize();
        let steps = [
            axis_steps((radius / i_axis.dot(jk_normal)).abs(), extents[0]),
            axis_steps((radius / j_axis.dot(ki_normal)).abs(), extents[1]),
            axis_steps((radius / k_axis.dot(ij_normal)).abs(), extents[2]),
        ];
        let sizes = steps.map(|s| 2 * s + 1);
        let len = sizes[0]
            .checked_mul(sizes[1])
            .and_then(|len| len.checked_mul(sizes[2]))
            .ok_or_else(|| VolumeError::AllocationFailed {
                label: "Dense kernel".to_string(),
                len: usize::MAX,
            })?;
        let mut values = try_alloc_f32(len, "Dense kernel")?;

        for dk in 0..sizes[2] {
            let k_offset = signed_offset(dk, steps[2]);
            for dj in 0..sizes[1] {
                let j_offset = signed_offset(dj, steps[1]);
                let row = (dk * sizes[1] + dj) * sizes[0];
                for di in 0..sizes[0] {
                    let distance = space
                        .offset_to_space(signed_offset(di, steps[0]), j_offset, k_offset)
                        .length();
                    values[row + di] = if spherical && distance > radius {
                        0.0
                    } else {
                        gaussian(distance, sigma)
                    };
                }
            }
        }

        Ok(Self { steps, values })
    }

    pub fn steps(&self) -> [usize; 3] {
        self.steps
    }

    pub fn sizes(&self) -> [usize; 3] {
        self.steps.map(|s| 2 * s + 1)
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    #[cfg(test)]
    fn weight(&self, di: isize, dj: isize, dk: isize) -> f32 {
        let sizes = self.sizes();
        let local = [
            di + self.steps[0] as isize,
            dj + self.steps[1] as isize,
            dk + self.steps[2] as isize,
        ];
        if local
            .iter()
            .zip(sizes.iter())
            .any(|(idx, size)| *idx < 0 || *idx as usize >= *size)
        {
            return 0.0;
        }
        let [i, j, k] = local.map(|v| v as usize);
        self.values[(k * sizes[1] + j) * sizes[0] + i]
    }

    pub fn nonzero_count(&self) -> usize {
        self.values.iter().filter(|w| **w != 0.0).count()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SmoothingKernel {
    Separable(SeparableKernel),
    Dense(DenseKernel),
}

impl SmoothingKernel {
    /// Classifies the grid and builds the matching kernel for a grid of
    /// `extents` voxels.
    pub fn build(
        space: &VolumeSpace,
        extents: [usize; 3],
        sigma: f32,
        settings: &SmoothSettings,
    ) -> Result<Self, SmoothError> {
        let shape = classify(space, settings.orthogonal_tolerance);
        Self::for_shape(shape, space, extents, sigma, settings)
    }

    pub fn for_shape(
        shape: GridShape,
        space: &VolumeSpace,
        extents: [usize; 3],
        sigma: f32,
        settings: &SmoothSettings,
    ) -> Result<Self, SmoothError> {
        let radius = settings.truncation_radius(sigma);
        if shape == GridShape::Orthogonal && !settings.force_dense {
            let kernel = SeparableKernel::new(space, extents, sigma, radius)?;
            debug!(
                "Volume Smoothing: separable kernel, steps {:?}",
                kernel.steps()
            );
            Ok(Self::Separable(kernel))
        } else {
            let kernel = DenseKernel::new(space, extents, sigma, radius)?;
            debug!(
                "Volume Smoothing: dense kernel, steps {:?}, {} of {} weights nonzero",
                kernel.steps(),
                kernel.nonzero_count(),
                kernel.values().len()
            );
            Ok(Self::Dense(kernel))
        }
    }
}
