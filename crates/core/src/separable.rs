use crate::kernel::{AxisWeights, SeparableKernel};
use crate::parallel::for_each_chunk_mut;
use crate::window::{window, VoxelFilter, WeightedSum};

/// Smooths `frame` with three 1-D passes along i, j and k.
///
/// The result ends up in `primary`; `secondary` holds the j-pass output.
/// Each pass applies the zero rule to its own source, so after the first
/// pass it tests the previous pass's result rather than the input.
pub(crate) fn smooth_separable(
    kernel: &SeparableKernel,
    frame: &[f32],
    dims: [usize; 3],
    filter: VoxelFilter<'_>,
    primary: &mut [f32],
    secondary: &mut [f32],
) {
    smooth_axis(frame, primary, dims, 0, &kernel.axes[0], filter);
    smooth_axis(primary, secondary, dims, 1, &kernel.axes[1], filter);
    smooth_axis(secondary, primary, dims, 2, &kernel.axes[2], filter);
}

fn smooth_axis(
    source: &[f32],
    dest: &mut [f32],
    dims: [usize; 3],
    axis: usize,
    weights: &AxisWeights,
    filter: VoxelFilter<'_>,
) {
    let [nx, ny, _] = dims;
    let slab = nx * ny;
    let stride = [1, nx, slab][axis];
    let extent = dims[axis];
    let steps = weights.steps();
    let values = weights.values();

    for_each_chunk_mut(dest, slab, |k, out| {
        for j in 0..ny {
            for i in 0..nx {
                let local = i + nx * j;
                let index = local + slab * k;
                if !filter.in_roi(index) {
                    out[local] = 0.0;
                    continue;
                }
                let pos = [i, j, k][axis];
                let line_start = index - pos * stride;
                let mut acc = WeightedSum::default();
                for n in window(pos, steps, extent) {
                    let neighbor = line_start + n * stride;
                    if filter.includes(source, neighbor) {
                        acc.add(values[n + steps - pos], source[neighbor]);
                    }
                }
                out[local] = acc.average();
            }
        }
    });
}
