use tracing::{debug, warn};
use voxsmooth_volume::{try_alloc_f32, FrameSink, Volume, VolumeError};

use crate::dense::smooth_dense;
use crate::error::SmoothError;
use crate::grid::{classify, GridShape};
use crate::kernel::SmoothingKernel;
use crate::params::SmoothParams;
use crate::progress::{ProgressReporter, ProgressSink};
use crate::separable::smooth_separable;
use crate::settings::SmoothSettings;
use crate::window::VoxelFilter;

pub const NAME: &str = "Volume Smoothing";

/// Two frame-sized buffers reused for every frame of one run.
pub struct ScratchFrames {
    primary: Vec<f32>,
    secondary: Vec<f32>,
}

impl ScratchFrames {
    pub fn new(frame_len: usize) -> Result<Self, VolumeError> {
        Ok(Self {
            primary: try_alloc_f32(frame_len, NAME)?,
            secondary: try_alloc_f32(frame_len, NAME)?,
        })
    }

    pub fn frame_len(&self) -> usize {
        self.primary.len()
    }
}

/// Smooths every requested subvolume of `input` with default settings.
pub fn smooth_volume(
    input: &Volume,
    roi: Option<&Volume>,
    params: &SmoothParams,
) -> Result<Volume, SmoothError> {
    let mut output = Volume::default();
    smooth_volume_with(
        input,
        roi,
        params,
        &SmoothSettings::default(),
        None,
        &mut output,
    )?;
    Ok(output)
}

/// Validates everything up front; `sink` is untouched when this fails
/// before the first frame.
pub fn smooth_volume_with<S: FrameSink>(
    input: &Volume,
    roi: Option<&Volume>,
    params: &SmoothParams,
    settings: &SmoothSettings,
    progress: Option<&ProgressSink>,
    sink: &mut S,
) -> Result<(), SmoothError> {
    params.validate_sigma()?;
    if input.space.is_degenerate() {
        return Err(SmoothError::DegenerateSpace);
    }
    let roi_frame = match roi {
        Some(roi) => {
            if !input.matches_space(roi) {
                return Err(SmoothError::SpaceMismatch);
            }
            Some(roi.frame(0, 0).ok_or(SmoothError::SpaceMismatch)?)
        }
        None => None,
    };
    let subvolumes: Vec<usize> = match params.subvolume.resolve(input)? {
        Some(index) => vec![index],
        None => (0..input.dims.subvolumes).collect(),
    };

    let shape = classify(&input.space, settings.orthogonal_tolerance);
    if shape == GridShape::NonOrthogonal {
        warn!("{NAME}: input volume is not orthogonal, smoothing will take longer");
    }
    let kernel = SmoothingKernel::for_shape(
        shape,
        &input.space,
        input.dims.ijk,
        params.sigma,
        settings,
    )?;
    let mut scratch = ScratchFrames::new(input.dims.frame_len())?;

    let components = input.dims.components;
    let out_dims = input.dims.with_subvolumes(subvolumes.len());
    debug!(
        "{NAME}: sigma {} over {} subvolume(s) x {} component(s), dims {:?}",
        params.sigma,
        subvolumes.len(),
        components,
        input.dims.ijk
    );
    sink.reinitialize(out_dims, input.space)?;

    let mut reporter = ProgressReporter::start(progress, subvolumes.len() * components);
    for (out_index, &subvolume) in subvolumes.iter().enumerate() {
        sink.set_map_name(
            out_index,
            format!("{}, smooth {}", input.map_name(subvolume), params.sigma),
        )?;
        for component in 0..components {
            let frame = input
                .frame(subvolume, component)
                .ok_or(VolumeError::FrameOutOfRange {
                    subvolume,
                    component,
                })?;
            let smoothed = smooth_frame(
                &kernel,
                frame,
                input.dims.ijk,
                roi_frame,
                params.fix_zeros,
                &mut scratch,
            )?;
            sink.set_frame(smoothed, out_index, component)?;
            reporter.advance();
        }
    }
    reporter.finish();
    Ok(())
}

/// Smooths one frame; the returned slice borrows from `scratch`.
pub fn smooth_frame<'s>(
    kernel: &SmoothingKernel,
    frame: &[f32],
    dims: [usize; 3],
    roi: Option<&[f32]>,
    fix_zeros: bool,
    scratch: &'s mut ScratchFrames,
) -> Result<&'s [f32], SmoothError> {
    let expected = dims[0] * dims[1] * dims[2];
    for actual in [Some(frame.len()), roi.map(<[f32]>::len), Some(scratch.frame_len())]
        .into_iter()
        .flatten()
    {
        if actual != expected {
            return Err(VolumeError::FrameLength { expected, actual }.into());
        }
    }

    let filter = VoxelFilter::new(roi, fix_zeros);
    match kernel {
        SmoothingKernel::Separable(kernel) => smooth_separable(
            kernel,
            frame,
            dims,
            filter,
            &mut scratch.primary,
            &mut scratch.secondary,
        ),
        SmoothingKernel::Dense(kernel) => {
            smooth_dense(kernel, frame, dims, filter, &mut scratch.primary)
        }
    }
    Ok(&scratch.primary)
}
