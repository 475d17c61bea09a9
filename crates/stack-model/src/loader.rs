//! Reading background-subtracted TIFF stacks from disk.
//!
//! Each page of a multi-page grayscale TIFF is one frame. Integer and
//! floating-point samples are widened to `f64`; every page must have the
//! dimensions of the first.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use ndarray::Array2;
use tiff::decoder::{Decoder, DecodingResult, Limits};

use crate::error::StackError;
use crate::metadata::AcquisitionMetadata;
use crate::stack::FrameStack;

/// A frame stack together with the metadata describing its acquisition.
#[derive(Debug, Clone)]
pub struct LoadedAcquisition {
    /// Path the stack was read from.
    pub stack_path: PathBuf,

    /// The frames.
    pub stack: FrameStack,

    /// Acquisition metadata, when a metadata file was given.
    pub metadata: Option<AcquisitionMetadata>,
}

impl LoadedAcquisition {
    /// Load a stack and, optionally, its metadata file.
    pub fn load(
        stack_path: impl AsRef<Path>,
        metadata_path: Option<&Path>,
    ) -> Result<Self, StackError> {
        let stack_path = stack_path.as_ref().to_path_buf();
        let stack = load_stack(&stack_path)?;
        let metadata = metadata_path.map(AcquisitionMetadata::load).transpose()?;

        Ok(Self {
            stack_path,
            stack,
            metadata,
        })
    }
}

/// Decode every page of a grayscale TIFF into a [`FrameStack`].
pub fn load_stack(path: impl AsRef<Path>) -> Result<FrameStack, StackError> {
    let path = path.as_ref();
    let tiff_err = |source: tiff::TiffError| StackError::TiffError {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(|e| StackError::IoError {
        path: path.to_path_buf(),
        source: e,
    })?;
    let mut decoder = Decoder::new(BufReader::new(file))
        .map_err(tiff_err)?
        .with_limits(Limits::unlimited());

    let mut frames: Vec<Array2<f64>> = Vec::new();
    loop {
        let page = frames.len();
        match decoder.colortype().map_err(tiff_err)? {
            tiff::ColorType::Gray(_) => {}
            other => {
                return Err(StackError::validation(format!(
                    "{}: page {page} has color type {other:?}, expected grayscale",
                    path.display()
                )));
            }
        }

        let (width, height) = decoder.dimensions().map_err(tiff_err)?;
        let (width, height) = (width as usize, height as usize);
        if let Some(first) = frames.first() {
            if first.dim() != (height, width) {
                let (h, w) = first.dim();
                return Err(StackError::validation(format!(
                    "{}: page {page} is {height}x{width}, expected {h}x{w}",
                    path.display()
                )));
            }
        }

        let samples = widen(decoder.read_image().map_err(tiff_err)?);
        let frame = Array2::from_shape_vec((height, width), samples).map_err(|e| {
            StackError::validation(format!(
                "{}: page {page} has an unexpected sample count: {e}",
                path.display()
            ))
        })?;
        frames.push(frame);

        if !decoder.more_images() {
            break;
        }
        decoder.next_image().map_err(tiff_err)?;
    }

    let stack = FrameStack::from_frames(frames)?;
    tracing::info!(
        path = %path.display(),
        frames = stack.frame_count(),
        height = stack.height(),
        width = stack.width(),
        "Loaded frame stack"
    );
    Ok(stack)
}

fn widen(image: DecodingResult) -> Vec<f64> {
    match image {
        DecodingResult::U8(buf) => buf.into_iter().map(f64::from).collect(),
        DecodingResult::U16(buf) => buf.into_iter().map(f64::from).collect(),
        DecodingResult::U32(buf) => buf.into_iter().map(f64::from).collect(),
        DecodingResult::U64(buf) => buf.into_iter().map(|v| v as f64).collect(),
        DecodingResult::I8(buf) => buf.into_iter().map(f64::from).collect(),
        DecodingResult::I16(buf) => buf.into_iter().map(f64::from).collect(),
        DecodingResult::I32(buf) => buf.into_iter().map(f64::from).collect(),
        DecodingResult::I64(buf) => buf.into_iter().map(|v| v as f64).collect(),
        DecodingResult::F32(buf) => buf.into_iter().map(f64::from).collect(),
        DecodingResult::F64(buf) => buf,
    }
}
