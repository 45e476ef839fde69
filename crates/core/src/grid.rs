use voxsmooth_volume::VolumeSpace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridShape {
    Orthogonal,
    NonOrthogonal,
}

/// Pairwise deviation from perpendicular for (i, j), (j, k) and (k, i):
/// `|a · b̂| / |a|`, the cosine of the angle between the two axes.
pub fn orthogonality_deviation(space: &VolumeSpace) -> [f32; 3] {
    let [i, j, k] = space.axes();
    [
        i.dot(j.normalize()).abs() / i.length(),
        j.dot(k.normalize()).abs() / j.length(),
        k.dot(i.normalize()).abs() / k.length(),
    ]
}

/// Degenerate axes produce NaN deviations and classify as non-orthogonal.
pub fn classify(space: &VolumeSpace, tolerance: f32) -> GridShape {
    let orthogonal = orthogonality_deviation(space)
        .iter()
        .all(|deviation| *deviation < tolerance);
    if orthogonal {
        GridShape::Orthogonal
    } else {
        GridShape::NonOrthogonal
    }
}

#[cfg(test)]
mod tests {
    use glam::{Mat3, Vec3};

    use super::*;
    use crate::settings::DEFAULT_ORTHOGONAL_TOLERANCE;

    #[test]
    fn anisotropic_axis_aligned_grid_is_orthogonal() {
        let space = VolumeSpace::from_spacing([0.7, 2.0, 3.5], [10.0, -4.0, 2.0]);
        assert_eq!(
            classify(&space, DEFAULT_ORTHOGONAL_TOLERANCE),
            GridShape::Orthogonal
        );
    }

    #[test]
    fn rotated_grid_is_still_orthogonal() {
        let rot = Mat3::from_rotation_z(0.6) * Mat3::from_rotation_x(-0.3);
        let space = VolumeSpace::new(
            rot * Vec3::X * 2.0,
            rot * Vec3::Y * 1.5,
            rot * Vec3::Z,
            Vec3::ZERO,
        );
        assert_eq!(
            classify(&space, DEFAULT_ORTHOGONAL_TOLERANCE),
            GridShape::Orthogonal
        );
    }

    #[test]
    fn sheared_grid_is_not_orthogonal() {
        let space = VolumeSpace::new(
            Vec3::X,
            Vec3::new(0.5, 1.0, 0.0),
            Vec3::Z,
            Vec3::ZERO,
        );
        let deviation = orthogonality_deviation(&space);
        assert!(deviation[0] > 0.4);
        assert!(deviation[1].abs() < 1.0e-6);
        assert_eq!(
            classify(&space, DEFAULT_ORTHOGONAL_TOLERANCE),
            GridShape::NonOrthogonal
        );
    }

    #[test]
    fn shear_below_tolerance_is_orthogonal() {
        let space = VolumeSpace::new(
            Vec3::X,
            Vec3::new(0.0005, 1.0, 0.0),
            Vec3::Z,
            Vec3::ZERO,
        );
        assert_eq!(
            classify(&space, DEFAULT_ORTHOGONAL_TOLERANCE),
            GridShape::Orthogonal
        );
        assert_eq!(classify(&space, 0.0001), GridShape::NonOrthogonal);
    }

    #[test]
    fn zero_axis_is_not_orthogonal() {
        let space = VolumeSpace::new(Vec3::X, Vec3::ZERO, Vec3::Z, Vec3::ZERO);
        assert_eq!(
            classify(&space, DEFAULT_ORTHOGONAL_TOLERANCE),
            GridShape::NonOrthogonal
        );
    }
}
