//! Core building blocks for termviz.
//!
//! This crate owns the data every renderer shares: colour maps, the
//! indexed-canvas traits with their adapters, the error type, and the
//! logging bootstrap. It performs no terminal output itself; see
//! `termviz-sixel` for the encoder.

pub mod canvas;
pub mod colourmap;
pub mod error;
pub mod logging;

pub use canvas::{Crop, Dimensions, Image, IndexedCanvas, Magnify, Rescale, ScalarImage, Transpose};
pub use colourmap::{gray, hot, jet, ColourMap, Rgb};
pub use error::GraphicsError;
