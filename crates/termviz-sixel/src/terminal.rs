//! Placing sixel images on the terminal screen.
//!
//! Sixel data is drawn from the current cursor position, so positioning
//! is done with plain cursor movement before the DCS string. The move and
//! the image are emitted in one write to keep them together when other
//! output shares the terminal.

use std::io::{self, Write};

use crossterm::{
    cursor::MoveTo,
    queue,
    terminal::{Clear, ClearType},
};
use ratatui::layout::Rect;
use termviz_core::{ColourMap, GraphicsError, IndexedCanvas};

use crate::sixel::encode_image;

/// Render an indexed image with its top-left corner at `area`'s origin.
///
/// `area` is in terminal cells. A zero-sized area is a no-op.
pub fn render_at<C>(
    writer: &mut impl Write,
    area: Rect,
    canvas: &C,
    colourmap: &ColourMap,
    zero_is_transparent: bool,
) -> Result<(), GraphicsError>
where
    C: IndexedCanvas + ?Sized,
{
    if area.width == 0 || area.height == 0 {
        return Ok(());
    }

    let encoded = encode_image(canvas, colourmap, zero_is_transparent)?;

    let mut out = Vec::with_capacity(encoded.len() + 16);
    queue!(out, MoveTo(area.x, area.y))?;
    out.extend_from_slice(&encoded);

    writer.write_all(&out)?;
    writer.flush()?;
    Ok(())
}

/// Move the cursor to the top-left corner of the screen.
///
/// Pair with [`clear_and_home`] to redraw a figure in place.
pub fn home(writer: &mut impl Write) -> io::Result<()> {
    queue!(writer, MoveTo(0, 0))?;
    writer.flush()
}

/// Clear the whole screen and move the cursor to the top-left corner.
pub fn clear_and_home(writer: &mut impl Write) -> io::Result<()> {
    queue!(writer, Clear(ClearType::All), MoveTo(0, 0))?;
    writer.flush()
}
