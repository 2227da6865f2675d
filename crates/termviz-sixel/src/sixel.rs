//! Sixel graphics protocol encoder.
//!
//! Converts an [`IndexedCanvas`] plus a [`ColourMap`] into a DCS escape
//! sequence understood by sixel-capable terminals (XTerm, WezTerm, mlterm,
//! foot, iTerm2, mintty).
//!
//! The image is cut into bands of six pixel rows. Within a band each
//! palette colour that actually occurs gets one layer: a `#<index>` colour
//! select followed by one sixel character per column, where bit `k` of the
//! character marks row `k` of the band as painted. Layers are separated by
//! `$` (carriage return within the band) and each band ends with `-`.
//! Runs of more than three identical characters collapse to
//! `!<count><char>`.
//!
//! The whole sequence is assembled in memory and written in one go, so a
//! failed encode never leaves a truncated DCS string on the terminal.

use std::io::{self, Write};

use termviz_core::{ColourMap, GraphicsError, IndexedCanvas, Rescale, ScalarImage};

/// DCS introducer: `ESC P`, parameters `9;1` (1:1 pixel aspect, background
/// left untouched), then `q` for sixel mode.
pub const DCS_INTRODUCER: &[u8] = b"\x1bP9;1q";

/// String terminator `ESC \`, followed by a newline.
pub const STRING_TERMINATOR: &[u8] = b"\x1b\\\n";

/// Pixel rows covered by one sixel band.
pub const BAND_HEIGHT: usize = 6;

/// Offset added to a 6-bit mask to form a printable sixel character.
const SIXEL_OFFSET: u8 = 63;

/// Runs longer than this are written as `!<count><char>`.
const MAX_LITERAL_RUN: usize = 3;

/// Upper bound on the body bytes reserved before encoding starts.
const MAX_BODY_RESERVE: usize = 64 * 1024;

/// Encode `canvas` as a complete sixel escape sequence.
///
/// With `zero_is_transparent`, palette index 0 is never painted so the
/// terminal background shows through.
///
/// Fails with [`GraphicsError::EmptyColourMap`] for an empty palette and
/// with [`GraphicsError::IndexOutOfRange`] if any pixel refers to a slot
/// past the end of `colourmap`.
pub fn encode_image<C>(
    canvas: &C,
    colourmap: &ColourMap,
    zero_is_transparent: bool,
) -> Result<Vec<u8>, GraphicsError>
where
    C: IndexedCanvas + ?Sized,
{
    if colourmap.is_empty() {
        tracing::warn!("refusing to encode with an empty colour map");
        return Err(GraphicsError::EmptyColourMap);
    }

    let width = canvas.width();
    let height = canvas.height();
    let specifier = colourmap.specifier();

    let body_guess = (width.saturating_mul(height) / 2).min(MAX_BODY_RESERVE);
    let mut out = Vec::with_capacity(
        DCS_INTRODUCER.len() + specifier.len() + STRING_TERMINATOR.len() + body_guess,
    );
    out.extend_from_slice(DCS_INTRODUCER);
    out.extend_from_slice(specifier.as_bytes());

    let first_colour = usize::from(zero_is_transparent);
    let mut band = Band::new(width, colourmap.len());
    for y0 in (0..height).step_by(BAND_HEIGHT) {
        let rows = (height - y0).min(BAND_HEIGHT);
        band.load(canvas, y0, rows)?;
        band.encode(first_colour, &mut out);
        out.push(b'-');
    }

    out.extend_from_slice(STRING_TERMINATOR);

    tracing::debug!(
        width,
        height,
        colours = colourmap.len(),
        zero_is_transparent,
        bytes = out.len(),
        "encoded sixel image"
    );
    Ok(out)
}

/// Encode `canvas` and write it to `writer` with a single write + flush.
///
/// Nothing is written if encoding fails.
pub fn write_image<W, C>(
    writer: &mut W,
    canvas: &C,
    colourmap: &ColourMap,
    zero_is_transparent: bool,
) -> Result<(), GraphicsError>
where
    W: Write + ?Sized,
    C: IndexedCanvas + ?Sized,
{
    let encoded = encode_image(canvas, colourmap, zero_is_transparent)?;
    writer.write_all(&encoded)?;
    writer.flush()?;
    Ok(())
}

/// Display an indexed image on stdout.
pub fn imshow<C>(
    canvas: &C,
    colourmap: &ColourMap,
    zero_is_transparent: bool,
) -> Result<(), GraphicsError>
where
    C: IndexedCanvas + ?Sized,
{
    let stdout = io::stdout();
    let mut lock = stdout.lock();
    write_image(&mut lock, canvas, colourmap, zero_is_transparent)
}

/// Display a scalar image on stdout, mapping `[min, max]` onto the palette.
///
/// Values at or below `min` use the first colour, values at or above `max`
/// the last.
pub fn imshow_scaled<S>(
    image: &S,
    min: f64,
    max: f64,
    colourmap: &ColourMap,
    zero_is_transparent: bool,
) -> Result<(), GraphicsError>
where
    S: ScalarImage + ?Sized,
{
    let stdout = io::stdout();
    let mut lock = stdout.lock();
    write_scaled(&mut lock, image, min, max, colourmap, zero_is_transparent)
}

/// Rescale `image` onto `colourmap` and write it to `writer`.
///
/// Same mapping as [`imshow_scaled`], for any byte sink.
pub fn write_scaled<W, S>(
    writer: &mut W,
    image: &S,
    min: f64,
    max: f64,
    colourmap: &ColourMap,
    zero_is_transparent: bool,
) -> Result<(), GraphicsError>
where
    W: Write + ?Sized,
    S: ScalarImage + ?Sized,
{
    let rescaled = Rescale::new(image, min, max, colourmap.len())?;
    write_image(writer, &rescaled, colourmap, zero_is_transparent)
}

/// Palette indices of one band, read once and range checked.
struct Band {
    width: usize,
    rows: usize,
    indices: Vec<usize>,
    present: Vec<bool>,
}

impl Band {
    fn new(width: usize, palette_size: usize) -> Self {
        Self {
            width,
            rows: 0,
            indices: Vec::new(),
            present: vec![false; palette_size],
        }
    }

    fn load<C>(&mut self, canvas: &C, y0: usize, rows: usize) -> Result<(), GraphicsError>
    where
        C: IndexedCanvas + ?Sized,
    {
        self.rows = rows;
        self.indices.clear();
        self.indices.reserve(rows * self.width);
        self.present.fill(false);

        let palette_size = self.present.len();
        for y in y0..y0 + rows {
            for x in 0..self.width {
                let index = canvas.index_at(x, y);
                if index >= palette_size {
                    tracing::warn!(x, y, index, palette_size, "pixel outside colour map");
                    return Err(GraphicsError::IndexOutOfRange {
                        x,
                        y,
                        index,
                        palette_size,
                    });
                }
                self.present[index] = true;
                self.indices.push(index);
            }
        }
        Ok(())
    }

    /// Bit `k` is set when row `k` of column `x` holds `colour`.
    fn mask(&self, x: usize, colour: usize) -> u8 {
        (0..self.rows)
            .filter(|&row| self.indices[row * self.width + x] == colour)
            .fold(0, |mask, row| mask | (1 << row))
    }

    /// Append one layer per colour that occurs in this band.
    fn encode(&self, first_colour: usize, out: &mut Vec<u8>) {
        let mut first_layer = true;
        for colour in first_colour..self.present.len() {
            if !self.present[colour] {
                continue;
            }
            if !first_layer {
                out.push(b'$');
            }
            first_layer = false;

            out.push(b'#');
            out.extend_from_slice(colour.to_string().as_bytes());

            let mut runs = RunLength::new(out);
            for x in 0..self.width {
                runs.push(self.mask(x, colour));
            }
            runs.finish();
        }
    }
}

/// Run-length writer for one layer of sixel characters.
struct RunLength<'a> {
    out: &'a mut Vec<u8>,
    current: u8,
    repeats: usize,
}

impl<'a> RunLength<'a> {
    fn new(out: &'a mut Vec<u8>) -> Self {
        Self {
            out,
            current: 0,
            repeats: 0,
        }
    }

    fn push(&mut self, mask: u8) {
        if self.repeats > 0 && mask == self.current {
            self.repeats += 1;
            return;
        }
        self.commit();
        self.current = mask;
        self.repeats = 1;
    }

    fn commit(&mut self) {
        let ch = SIXEL_OFFSET + self.current;
        if self.repeats <= MAX_LITERAL_RUN {
            self.out.extend(std::iter::repeat(ch).take(self.repeats));
        } else {
            self.out.push(b'!');
            self.out.extend_from_slice(self.repeats.to_string().as_bytes());
            self.out.push(ch);
        }
    }

    /// Flush the trailing run, blank or not, so every layer spans the
    /// full image width.
    fn finish(mut self) {
        self.commit();
    }
}
