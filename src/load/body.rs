//! Value change lines of the dump body.

use crate::data::{VcdWave, WaveValue};

use log::debug;
use rug::Integer;

fn is_scalar_char(c: char) -> bool {
    matches!(c, '0' | '1' | 'x' | 'X' | 'z' | 'Z' | 'u' | 'U' | 'w' | 'W' | 'l' | 'L' | 'h' | 'H' | '-')
}

/// Bit string to value. Fully defined strings become numbers, anything else stays text.
fn bits_to_value(bits: &str) -> Option<WaveValue> {
    if bits.is_empty() {
        return None;
    }

    if bits.chars().all(|c| c == '0' || c == '1') {
        Integer::from_str_radix(bits, 2).ok().map(WaveValue::Numeric)
    } else if bits.chars().all(is_scalar_char) {
        Some(WaveValue::Sentinel(bits.to_lowercase()))
    } else {
        None
    }
}

/// Parse one value change into alias and value.
///
/// Accepted forms are `1!` (scalar), `b1010 !` (vector), `r1.5 !` (real, kept as text) and
/// `x !` (text value separated from the alias).
pub(crate) fn parse_change(line: &str) -> Option<(&str, WaveValue)> {
    let first = line.chars().next()?;
    let mut tokens = line.split_whitespace();

    match first {
        'b' | 'B' => {
            let bits = tokens.next()?;
            let alias = tokens.next()?;
            Some((alias, bits_to_value(&bits[1..])?))
        }

        'r' | 'R' => {
            let real = tokens.next()?;
            let alias = tokens.next()?;
            Some((alias, WaveValue::Sentinel(real.to_string())))
        }

        c if is_scalar_char(c) => {
            let head = tokens.next()?;

            match tokens.next() {
                Some(alias) => Some((alias, bits_to_value(head)?)),
                None => {
                    let alias = &line[c.len_utf8()..];
                    if alias.is_empty() {
                        None
                    } else {
                        Some((alias, bits_to_value(&line[..c.len_utf8()])?))
                    }
                }
            }
        }

        _ => None,
    }
}

/// Append a change, keeping ticks strictly increasing.
///
/// A second change at the same tick replaces the first. Changes that go back in time are dropped.
pub(crate) fn push_wave(waves: &mut Vec<VcdWave>, tick: u64, value: WaveValue) {
    match waves.last_mut() {
        Some(last) if last.tick == tick => last.value = value,
        Some(last) if last.tick > tick => {
            debug!("Dropping value change at tick {} before tick {}", tick, last.tick);
        }
        _ => waves.push(VcdWave { tick, value }),
    }
}
