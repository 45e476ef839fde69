#[cfg(not(target_arch = "wasm32"))]
use rayon::prelude::*;

#[cfg(not(target_arch = "wasm32"))]
const PARALLEL_THRESHOLD: usize = 4096;

/// Runs `f(chunk_index, chunk)` over consecutive `chunk_len` pieces of
/// `slice`. Chunks are disjoint, so workers never share an output index.
pub fn for_each_chunk_mut<T, F>(slice: &mut [T], chunk_len: usize, f: F)
where
    T: Send,
    F: Fn(usize, &mut [T]) + Sync + Send,
{
    if chunk_len == 0 || slice.is_empty() {
        return;
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        if slice.len() >= PARALLEL_THRESHOLD {
            slice
                .par_chunks_mut(chunk_len)
                .enumerate()
                .for_each(|(idx, chunk)| f(idx, chunk));
            return;
        }
    }

    for (idx, chunk) in slice.chunks_mut(chunk_len).enumerate() {
        f(idx, chunk);
    }
}
