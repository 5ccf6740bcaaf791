//! Code 128 (subset B) bar patterns for local barcode rasterization.
//!
//! The printer draws `^BC` barcodes itself; this module only has to produce
//! the same bars for a preview. Subset B covers printable ASCII, which is
//! everything a SKU can contain.

/// Symbol value of the Start B character.
const START_B: usize = 104;

/// Stop pattern (includes the final two-module termination bar).
const STOP: [u8; 7] = [2, 3, 3, 1, 1, 1, 2];

/// Bar and space widths, in modules, for symbol values 0..=105.
const PATTERNS: [[u8; 6]; 106] = [
    [2, 1, 2, 2, 2, 2], [2, 2, 2, 1, 2, 2], [2, 2, 2, 2, 2, 1], [1, 2, 1, 2, 2, 3], [1, 2, 1, 3, 2, 2],
    [1, 3, 1, 2, 2, 2], [1, 2, 2, 2, 1, 3], [1, 2, 2, 3, 1, 2], [1, 3, 2, 2, 1, 2], [2, 2, 1, 2, 1, 3],
    [2, 2, 1, 3, 1, 2], [2, 3, 1, 2, 1, 2], [1, 1, 2, 2, 3, 2], [1, 2, 2, 1, 3, 2], [1, 2, 2, 2, 3, 1],
    [1, 1, 3, 2, 2, 2], [1, 2, 3, 1, 2, 2], [1, 2, 3, 2, 2, 1], [2, 2, 3, 2, 1, 1], [2, 2, 1, 1, 3, 2],
    [2, 2, 1, 2, 3, 1], [2, 1, 3, 2, 1, 2], [2, 2, 3, 1, 1, 2], [3, 1, 2, 1, 3, 1], [3, 1, 1, 2, 2, 2],
    [3, 2, 1, 1, 2, 2], [3, 2, 1, 2, 2, 1], [3, 1, 2, 2, 1, 2], [3, 2, 2, 1, 1, 2], [3, 2, 2, 2, 1, 1],
    [2, 1, 2, 1, 2, 3], [2, 1, 2, 3, 2, 1], [2, 3, 2, 1, 2, 1], [1, 1, 1, 3, 2, 3], [1, 3, 1, 1, 2, 3],
    [1, 3, 1, 3, 2, 1], [1, 1, 2, 3, 1, 3], [1, 3, 2, 1, 1, 3], [1, 3, 2, 3, 1, 1], [2, 1, 1, 3, 1, 3],
    [2, 3, 1, 1, 1, 3], [2, 3, 1, 3, 1, 1], [1, 1, 2, 1, 3, 3], [1, 1, 2, 3, 3, 1], [1, 3, 2, 1, 3, 1],
    [1, 1, 3, 1, 2, 3], [1, 1, 3, 3, 2, 1], [1, 3, 3, 1, 2, 1], [3, 1, 3, 1, 2, 1], [2, 1, 1, 3, 3, 1],
    [2, 3, 1, 1, 3, 1], [2, 1, 3, 1, 1, 3], [2, 1, 3, 3, 1, 1], [2, 1, 3, 1, 3, 1], [3, 1, 1, 1, 2, 3],
    [3, 1, 1, 3, 2, 1], [3, 3, 1, 1, 2, 1], [3, 1, 2, 1, 1, 3], [3, 1, 2, 3, 1, 1], [3, 3, 2, 1, 1, 1],
    [3, 1, 4, 1, 1, 1], [2, 2, 1, 4, 1, 1], [4, 3, 1, 1, 1, 1], [1, 1, 1, 2, 2, 4], [1, 1, 1, 4, 2, 2],
    [1, 2, 1, 1, 2, 4], [1, 2, 1, 4, 2, 1], [1, 4, 1, 1, 2, 2], [1, 4, 1, 2, 2, 1], [1, 1, 2, 2, 1, 4],
    [1, 1, 2, 4, 1, 2], [1, 2, 2, 1, 1, 4], [1, 2, 2, 4, 1, 1], [1, 4, 2, 1, 1, 2], [1, 4, 2, 2, 1, 1],
    [2, 4, 1, 2, 1, 1], [2, 2, 1, 1, 1, 4], [4, 1, 3, 1, 1, 1], [2, 4, 1, 1, 1, 2], [1, 3, 4, 1, 1, 1],
    [1, 1, 1, 2, 4, 2], [1, 2, 1, 1, 4, 2], [1, 2, 1, 2, 4, 1], [1, 1, 4, 2, 1, 2], [1, 2, 4, 1, 1, 2],
    [1, 2, 4, 2, 1, 1], [4, 1, 1, 2, 1, 2], [4, 2, 1, 1, 1, 2], [4, 2, 1, 2, 1, 1], [2, 1, 2, 1, 4, 1],
    [2, 1, 4, 1, 2, 1], [4, 1, 2, 1, 2, 1], [1, 1, 1, 1, 4, 3], [1, 1, 1, 3, 4, 1], [1, 3, 1, 1, 4, 1],
    [1, 1, 4, 1, 1, 3], [1, 1, 4, 3, 1, 1], [4, 1, 1, 1, 1, 3], [4, 1, 1, 3, 1, 1], [1, 1, 3, 1, 4, 1],
    [1, 1, 4, 1, 3, 1], [3, 1, 1, 1, 4, 1], [4, 1, 1, 1, 3, 1], [2, 1, 1, 4, 1, 2], [2, 1, 1, 2, 1, 4],
    [2, 1, 1, 2, 3, 2],
];

/// Modules in one encoded symbol.
pub const SYMBOL_MODULES: u32 = 11;

/// Encode `text` as alternating bar/space widths (starting with a bar),
/// in modules: start B, data, checksum, stop.
///
/// Returns the first character outside printable ASCII on failure.
pub fn modules(text: &str) -> Result<Vec<u8>, char> {
    let values = text
        .chars()
        .map(|ch| match ch {
            ' '..='\u{7f}' => Ok(ch as usize - 32),
            _ => Err(ch),
        })
        .collect::<Result<Vec<_>, _>>()?;

    let checksum = values
        .iter()
        .enumerate()
        .fold(START_B, |acc, (i, v)| acc + (i + 1) * v)
        % 103;

    let mut widths = Vec::with_capacity((values.len() + 2) * 6 + STOP.len());
    widths.extend_from_slice(&PATTERNS[START_B]);
    for v in values {
        widths.extend_from_slice(&PATTERNS[v]);
    }
    widths.extend_from_slice(&PATTERNS[checksum]);
    widths.extend_from_slice(&STOP);
    Ok(widths)
}

/// Total width in modules of an encoding produced by [`modules`].
pub fn total_modules(widths: &[u8]) -> u32 {
    widths.iter().map(|w| u32::from(*w)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_pattern_is_eleven_modules() {
        for (value, p) in PATTERNS.iter().enumerate() {
            let sum: u8 = p.iter().sum();
            assert_eq!(sum, 11, "symbol {value}");
        }
        assert_eq!(STOP.iter().sum::<u8>(), 13);
    }

    #[test]
    fn patterns_are_distinct() {
        for (i, a) in PATTERNS.iter().enumerate() {
            for b in &PATTERNS[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn encodes_start_data_checksum_stop() {
        // "A" = 33; checksum (104 + 33) % 103 = 34
        let widths = modules("A").unwrap();
        assert_eq!(&widths[..6], &PATTERNS[104]);
        assert_eq!(&widths[6..12], &PATTERNS[33]);
        assert_eq!(&widths[12..18], &PATTERNS[34]);
        assert_eq!(&widths[18..], &STOP);
        assert_eq!(total_modules(&widths), 3 * SYMBOL_MODULES + 13);
    }

    #[test]
    fn checksum_weights_by_position() {
        // "AB": 104 + 1*33 + 2*34 = 205 -> 205 % 103 = 102
        let widths = modules("AB").unwrap();
        assert_eq!(&widths[18..24], &PATTERNS[102]);
    }

    #[test]
    fn rejects_non_ascii() {
        assert_eq!(modules("AÄ"), Err('Ä'));
        assert_eq!(modules("A\n"), Err('\n'));
    }

    #[test]
    fn empty_text_is_start_checksum_stop() {
        let widths = modules("").unwrap();
        assert_eq!(total_modules(&widths), 2 * SYMBOL_MODULES + 13);
    }
}
