mod space;
mod volume;

pub use space::VolumeSpace;
pub use volume::{try_alloc_f32, FrameSink, Volume, VolumeDims, VolumeError};
