use std::fmt;
use std::io;

/// Errors raised while building canvases or encoding images.
///
/// All variants except [`GraphicsError::Io`] are precondition failures
/// detected before any byte reaches the output sink.
#[derive(Debug)]
pub enum GraphicsError {
    /// The colour map has no entries.
    EmptyColourMap,
    /// A canvas pixel refers to a palette slot that does not exist.
    IndexOutOfRange {
        x: usize,
        y: usize,
        index: usize,
        palette_size: usize,
    },
    /// A colour map channel exceeds the sixel range of 0–100.
    ChannelOutOfRange { entry: usize, value: u8 },
    /// A pixel buffer does not match the requested dimensions.
    BufferSize { expected: usize, actual: usize },
    /// `width × height` does not fit in `usize`.
    DimensionOverflow { width: usize, height: usize },
    /// Magnification factor must be at least 1.
    InvalidFactor(usize),
    /// A cropped region extends past the source image.
    RegionOutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },
    Io(io::Error),
}

impl fmt::Display for GraphicsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyColourMap => write!(f, "colour map has no entries"),
            Self::IndexOutOfRange {
                x,
                y,
                index,
                palette_size,
            } => write!(
                f,
                "pixel ({x},{y}) has index {index} but the colour map holds {palette_size} entries"
            ),
            Self::ChannelOutOfRange { entry, value } => write!(
                f,
                "colour map entry {entry} has channel value {value} (expected 0-100)"
            ),
            Self::BufferSize { expected, actual } => write!(
                f,
                "pixel buffer holds {actual} values but dimensions require {expected}"
            ),
            Self::DimensionOverflow { width, height } => {
                write!(f, "image dimensions {width}x{height} overflow the address space")
            }
            Self::InvalidFactor(factor) => {
                write!(f, "magnification factor must be at least 1 (got {factor})")
            }
            Self::RegionOutOfBounds {
                x,
                y,
                width,
                height,
            } => write!(
                f,
                "region {width}x{height} at ({x},{y}) extends past the source image"
            ),
            Self::Io(err) => write!(f, "failed to write image: {err}"),
        }
    }
}

impl std::error::Error for GraphicsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for GraphicsError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}
