//! Colour maps and ready-made palette generators.
//!
//! A colour map associates a palette index with an RGB triple. Sixel
//! colour registers use percentages, so every channel lies in 0–100.
//! Insertion order is the palette index: entry `n` is emitted as colour
//! register `#n`.

use crate::error::GraphicsError;

/// One palette entry as `[red, green, blue]`, each channel in 0–100.
pub type Rgb = [u8; 3];

/// Highest channel value accepted by sixel colour registers.
pub const MAX_CHANNEL: u8 = 100;

/// An ordered, validated list of palette entries.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColourMap {
    entries: Vec<Rgb>,
}

impl ColourMap {
    /// Build a colour map from literal entries.
    ///
    /// Fails with [`GraphicsError::ChannelOutOfRange`] if any channel is
    /// above [`MAX_CHANNEL`].
    pub fn new(entries: Vec<Rgb>) -> Result<Self, GraphicsError> {
        for (entry, rgb) in entries.iter().enumerate() {
            if let Some(&value) = rgb.iter().find(|&&c| c > MAX_CHANNEL) {
                return Err(GraphicsError::ChannelOutOfRange { entry, value });
            }
        }
        Ok(Self { entries })
    }

    /// The eight-colour palette used for line plots.
    ///
    /// | index | colour  |
    /// |:-----:|---------|
    /// | 0     | black   |
    /// | 1     | white   |
    /// | 2     | yellow  |
    /// | 3     | magenta |
    /// | 4     | cyan    |
    /// | 5     | red     |
    /// | 6     | green   |
    /// | 7     | blue    |
    pub fn plot_default() -> Self {
        Self {
            entries: vec![
                [0, 0, 0],
                [100, 100, 100],
                [100, 100, 20],
                [100, 20, 100],
                [20, 100, 100],
                [100, 20, 20],
                [20, 100, 20],
                [20, 20, 100],
            ],
        }
    }

    /// Return a copy with every channel `c` replaced by `100 - c`.
    ///
    /// Used for terminals with a light background, so that index 0 stays
    /// the background colour and foreground colours remain legible.
    pub fn inverted(&self) -> Self {
        Self {
            entries: self
                .entries
                .iter()
                .map(|rgb| rgb.map(|c| MAX_CHANNEL - c))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Rgb> {
        self.entries.get(index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rgb> {
        self.entries.iter()
    }

    pub fn entries(&self) -> &[Rgb] {
        &self.entries
    }

    /// Serialize the palette as sixel colour register definitions.
    ///
    /// Each entry becomes `#<n>;2;<r>;<g>;<b>` (`2` selects RGB mode), with
    /// no separator between entries.
    pub fn specifier(&self) -> String {
        self.entries
            .iter()
            .enumerate()
            .map(|(n, [r, g, b])| format!("#{n};2;{r};{g};{b}"))
            .collect()
    }
}

/// Scale `value` by `100 / denom`, clamp to 0–100 and round.
fn ramp(value: f64, denom: f64) -> u8 {
    (100.0 * value / denom).clamp(0.0, 100.0).round() as u8
}

/// Denominator shared by the generators; sizes below 2 collapse to 1 so
/// degenerate maps stay finite.
fn span(number: usize) -> f64 {
    number.saturating_sub(1).max(1) as f64
}

/// Linear grayscale ramp from black (index 0) to white (index `number - 1`).
pub fn gray(number: usize) -> ColourMap {
    let denom = span(number);
    let entries = (0..number)
        .map(|n| {
            let c = ramp(n as f64, denom);
            [c, c, c]
        })
        .collect();
    ColourMap { entries }
}

/// Black → red → yellow → white ramp.
///
/// Red saturates over the first third of the map, green over the second
/// and blue over the last.
pub fn hot(number: usize) -> ColourMap {
    let denom = span(number);
    let size = number as f64;
    let entries = (0..number)
        .map(|n| {
            let n = n as f64;
            [
                ramp(3.0 * n, denom),
                ramp(3.0 * n - size, denom),
                ramp(3.0 * n - 2.0 * size, denom),
            ]
        })
        .collect();
    ColourMap { entries }
}

/// Blue → cyan → yellow → red ramp built from phase-shifted triangle waves.
pub fn jet(number: usize) -> ColourMap {
    let denom = span(number);
    let size = number as f64;
    let wave = |n: f64, phase: f64| ramp(1.5 * size - (4.0 * n - phase * size).abs(), denom);
    let entries = (0..number)
        .map(|n| {
            let n = n as f64;
            [wave(n, 3.0), wave(n, 2.0), wave(n, 1.0)]
        })
        .collect();
    ColourMap { entries }
}
