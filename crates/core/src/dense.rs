use crate::kernel::DenseKernel;
use crate::parallel::for_each_chunk_mut;
use crate::window::{window, VoxelFilter, WeightedSum};

/// Single 3-D pass from `frame` into `dest`.
pub(crate) fn smooth_dense(
    kernel: &DenseKernel,
    frame: &[f32],
    dims: [usize; 3],
    filter: VoxelFilter<'_>,
    dest: &mut [f32],
) {
    let [nx, ny, nz] = dims;
    let slab = nx * ny;
    let [si, sj, sk] = kernel.steps();
    let [size_i, size_j, _] = kernel.sizes();
    let weights = kernel.values();

    for_each_chunk_mut(dest, slab, |k, out| {
        let k_window = window(k, sk, nz);
        for j in 0..ny {
            let j_window = window(j, sj, ny);
            for i in 0..nx {
                let local = i + nx * j;
                if !filter.in_roi(local + slab * k) {
                    out[local] = 0.0;
                    continue;
                }
                let i_window = window(i, si, nx);
                let mut acc = WeightedSum::default();
                for kk in k_window.clone() {
                    let kernel_k = kk + sk - k;
                    for jj in j_window.clone() {
                        let kernel_row = (kernel_k * size_j + jj + sj - j) * size_i;
                        let frame_row = (kk * ny + jj) * nx;
                        for ii in i_window.clone() {
                            let weight = weights[kernel_row + ii + si - i];
                            if weight == 0.0 {
                                continue;
                            }
                            let neighbor = frame_row + ii;
                            if filter.includes(frame, neighbor) {
                                acc.add(weight, frame[neighbor]);
                            }
                        }
                    }
                }
                out[local] = acc.average();
            }
        }
    });
}
