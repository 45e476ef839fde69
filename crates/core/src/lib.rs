mod dense;
mod error;
mod grid;
mod kernel;
mod parallel;
mod params;
mod progress;
mod separable;
mod settings;
mod smooth;
mod window;

pub use error::SmoothError;
pub use grid::{classify, orthogonality_deviation, GridShape};
pub use kernel::{AxisWeights, DenseKernel, SeparableKernel, SmoothingKernel};
pub use parallel::for_each_chunk_mut;
pub use params::{SmoothParams, SubvolumeSelector};
pub use progress::{ProgressEvent, ProgressSink};
pub use settings::{SmoothSettings, DEFAULT_ORTHOGONAL_TOLERANCE, DEFAULT_TRUNCATION_SIGMAS};
pub use smooth::{smooth_frame, smooth_volume, smooth_volume_with, ScratchFrames};
pub use voxsmooth_volume::{FrameSink, Volume, VolumeDims, VolumeError, VolumeSpace};
