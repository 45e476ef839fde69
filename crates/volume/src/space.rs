use glam::Vec3;

/// Affine mapping from voxel indices to physical coordinates.
///
/// Each axis vector is the physical displacement of one step along that
/// index, so its length is the voxel spacing along the axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumeSpace {
    pub i_axis: Vec3,
    pub j_axis: Vec3,
    pub k_axis: Vec3,
    pub origin: Vec3,
}

impl Default for VolumeSpace {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl VolumeSpace {
    pub const IDENTITY: Self = Self {
        i_axis: Vec3::X,
        j_axis: Vec3::Y,
        k_axis: Vec3::Z,
        origin: Vec3::ZERO,
    };

    pub fn new(i_axis: Vec3, j_axis: Vec3, k_axis: Vec3, origin: Vec3) -> Self {
        Self {
            i_axis,
            j_axis,
            k_axis,
            origin,
        }
    }

    /// Axis-aligned grid with the given spacing along i, j and k.
    pub fn from_spacing(spacing: [f32; 3], origin: [f32; 3]) -> Self {
        Self {
            i_axis: Vec3::X * spacing[0],
            j_axis: Vec3::Y * spacing[1],
            k_axis: Vec3::Z * spacing[2],
            origin: Vec3::from(origin),
        }
    }

    pub fn axes(&self) -> [Vec3; 3] {
        [self.i_axis, self.j_axis, self.k_axis]
    }

    pub fn spacing(&self) -> [f32; 3] {
        [
            self.i_axis.length(),
            self.j_axis.length(),
            self.k_axis.length(),
        ]
    }

    /// Physical displacement of a signed index offset.
    pub fn offset_to_space(&self, di: i32, dj: i32, dk: i32) -> Vec3 {
        self.i_axis * di as f32 + self.j_axis * dj as f32 + self.k_axis * dk as f32
    }

    /// True when any axis has zero or non-finite length.
    pub fn is_degenerate(&self) -> bool {
        self.axes().iter().any(|axis| {
            let len = axis.length();
            !len.is_finite() || len <= 0.0
        })
    }
}
