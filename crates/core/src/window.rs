use std::ops::Range;

/// Neighbor indices `pos - steps ..= pos + steps` clipped to the grid.
pub(crate) fn window(pos: usize, steps: usize, extent: usize) -> Range<usize> {
    pos.saturating_sub(steps)..(pos + steps + 1).min(extent)
}

/// Decides which voxels take part in a weighted average.
#[derive(Clone, Copy)]
pub(crate) struct VoxelFilter<'a> {
    roi: Option<&'a [f32]>,
    fix_zeros: bool,
}

impl<'a> VoxelFilter<'a> {
    pub(crate) fn new(roi: Option<&'a [f32]>, fix_zeros: bool) -> Self {
        Self { roi, fix_zeros }
    }

    #[inline]
    pub(crate) fn in_roi(&self, index: usize) -> bool {
        self.roi.map_or(true, |roi| roi[index] > 0.0)
    }

    /// `source` is the frame the current pass reads from.
    #[inline]
    pub(crate) fn includes(&self, source: &[f32], index: usize) -> bool {
        self.in_roi(index) && (!self.fix_zeros || source[index] != 0.0)
    }
}

/// Running weighted average; empty sums resolve to zero.
#[derive(Default)]
pub(crate) struct WeightedSum {
    sum: f32,
    weight: f32,
}

impl WeightedSum {
    #[inline]
    pub(crate) fn add(&mut self, weight: f32, value: f32) {
        self.weight += weight;
        self.sum += weight * value;
    }

    #[inline]
    pub(crate) fn average(&self) -> f32 {
        if self.weight != 0.0 {
            self.sum / self.weight
        } else {
            0.0
        }
    }
}
