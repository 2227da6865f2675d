//! Minimal sixel decoder used to check encoder output.

type Bytes<'a> = std::iter::Peekable<std::iter::Copied<std::slice::Iter<'a, u8>>>;

fn number(bytes: &mut Bytes<'_>) -> usize {
    let mut value = 0usize;
    while let Some(digit) = bytes.next_if(u8::is_ascii_digit) {
        value = value * 10 + usize::from(digit - b'0');
    }
    value
}

fn paint(grid: &mut [Vec<Option<usize>>], x: usize, band: usize, colour: usize, ch: u8) {
    let mask = ch - 63;
    for row in 0..6 {
        let y = band * 6 + row;
        if mask & (1 << row) != 0 && y < grid.len() && x < grid[y].len() {
            grid[y][x] = Some(colour);
        }
    }
}

/// Decode a sixel stream into rows of painted palette indices.
///
/// Pixels no layer touched come back as `None`.
pub(crate) fn decode(encoded: &[u8], width: usize, height: usize) -> Vec<Vec<Option<usize>>> {
    assert!(encoded.starts_with(b"\x1bP"), "missing DCS");
    let start = encoded
        .iter()
        .position(|&b| b == b'q')
        .expect("missing sixel introducer")
        + 1;

    let mut grid = vec![vec![None; width]; height];
    let mut bytes: Bytes<'_> = encoded[start..].iter().copied().peekable();
    let mut colour = 0;
    let mut x = 0;
    let mut band = 0;

    while let Some(byte) = bytes.next() {
        match byte {
            b'#' => {
                colour = number(&mut bytes);
                // Register definition: `;2;r;g;b`.
                while bytes.next_if(|b| *b == b';' || b.is_ascii_digit()).is_some() {}
            }
            b'!' => {
                let count = number(&mut bytes);
                let ch = bytes.next().expect("repeat without character");
                for _ in 0..count {
                    paint(&mut grid, x, band, colour, ch);
                    x += 1;
                }
            }
            b'$' => x = 0,
            b'-' => {
                x = 0;
                band += 1;
            }
            b'?'..=b'~' => {
                paint(&mut grid, x, band, colour, byte);
                x += 1;
            }
            0x1b => break,
            other => panic!("unexpected byte {other:#04x} in sixel data"),
        }
    }
    grid
}

/// Expand `!<n><c>` repeats, leaving literal sixel characters untouched.
pub(crate) fn expand_runs(data: &str) -> Vec<u8> {
    let mut out = Vec::new();
    let mut bytes = data.bytes().peekable();
    while let Some(byte) = bytes.next() {
        if byte == b'!' {
            let mut count = 0usize;
            while let Some(digit) = bytes.next_if(u8::is_ascii_digit) {
                count = count * 10 + usize::from(digit - b'0');
            }
            let ch = bytes.next().expect("repeat without character");
            out.extend(std::iter::repeat(ch).take(count));
        } else {
            out.push(byte);
        }
    }
    out
}

/// Remove every layer selecting `colour` from a band body, keeping `$`
/// separators consistent.
pub(crate) fn strip_layer(body: &str, colour: usize) -> String {
    let selector = colour.to_string();
    let mut out = String::new();
    for band in body.split_terminator('-') {
        let kept: Vec<&str> = band
            .split('$')
            .filter(|layer| !layer.is_empty())
            .filter(|layer| {
                let digits: String = layer[1..].chars().take_while(char::is_ascii_digit).collect();
                digits != selector
            })
            .collect();
        out.push_str(&kept.join("$"));
        out.push('-');
    }
    out
}
