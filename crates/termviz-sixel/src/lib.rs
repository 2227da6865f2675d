//! Sixel output for termviz.
//!
//! Turns indexed canvases from [`termviz_core`] into sixel escape
//! sequences and writes them to any byte sink, stdout, or a given cell of
//! the terminal screen.
//!
//! ```no_run
//! use termviz_core::{gray, Image, Magnify};
//! use termviz_sixel::imshow_scaled;
//!
//! let mut image: Image<f32> = Image::new(64, 32);
//! for y in 0..32 {
//!     for x in 0..64 {
//!         image[(x, y)] = (x + y) as f32;
//!     }
//! }
//! let big = Magnify::new(&image, 2).unwrap();
//! imshow_scaled(&big, 0.0, 94.0, &gray(100), false).unwrap();
//! ```

pub mod sixel;
pub mod source;
pub mod terminal;

#[cfg(test)]
mod testing;

pub use sixel::{encode_image, imshow, imshow_scaled, write_image, write_scaled};
pub use source::LumaSource;
pub use terminal::{clear_and_home, home, render_at};
