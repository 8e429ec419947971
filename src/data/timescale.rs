use crate::error::*;

use regex::Regex;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    S, Ms, Us, Ns, Ps, Fs, As, Zs, Ys,
}

impl TimeUnit {
    /// All units, largest first.
    pub const ALL: [TimeUnit; 9] = [
        TimeUnit::S, TimeUnit::Ms, TimeUnit::Us, TimeUnit::Ns, TimeUnit::Ps,
        TimeUnit::Fs, TimeUnit::As, TimeUnit::Zs, TimeUnit::Ys,
    ];

    pub fn from_string(s: impl AsRef<str>) -> Result<Self> {
        let s = s.as_ref();

        match s {
            "s"  => Ok(Self::S ),
            "ms" => Ok(Self::Ms),
            "us" => Ok(Self::Us),
            "ns" => Ok(Self::Ns),
            "ps" => Ok(Self::Ps),
            "fs" => Ok(Self::Fs),
            "as" => Ok(Self::As),
            "zs" => Ok(Self::Zs),
            "ys" => Ok(Self::Ys),
            _    => Err(Error::InvalidTime(s.to_string()))
        }
    }

    pub fn abbrev(&self) -> &'static str {
        use TimeUnit::*;
        match self {
            S  => "s",
            Ms => "ms",
            Us => "us",
            Ns => "ns",
            Ps => "ps",
            Fs => "fs",
            As => "as",
            Zs => "zs",
            Ys => "ys",
        }
    }

    /// Power of ten dividing a magnitude in this unit down to seconds.
    pub fn exponent(&self) -> u32 {
        use TimeUnit::*;
        match self {
            S  => 0,
            Ms => 3,
            Us => 6,
            Ns => 9,
            Ps => 12,
            Fs => 15,
            As => 18,
            Zs => 21,
            Ys => 24,
        }
    }

    /// Convert a decimal magnitude in this unit to seconds.
    ///
    /// Goes through the decimal representation so that the result is the `f64` nearest to the
    /// exact value. Equal quantities written in different units map to the same `f64`.
    pub fn to_seconds(&self, magnitude: &str) -> Option<f64> {
        format!("{}e-{}", magnitude, self.exponent())
            .parse::<f64>()
            .ok()
            .filter(|secs| secs.is_finite())
    }

    fn scale(&self, seconds: f64) -> f64 {
        seconds * 10f64.powi(self.exponent() as i32)
    }
}

fn timescale_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(\d+(?:\.\d+)?)\s*(s|ms|us|ns|ps|fs|as|zs|ys)$")
            .expect("timescale pattern is valid")
    })
}

/// Parse a timescale payload such as `1ns`, `10 ps` or `1.5us` to seconds per tick.
///
/// Returns `None` for anything that does not describe a positive duration.
pub fn parse_timescale(text: &str) -> Option<f64> {
    let caps = timescale_pattern().captures(text.trim())?;
    let unit = TimeUnit::from_string(&caps[2]).ok()?;

    unit.to_seconds(&caps[1])
        .filter(|secs| *secs > 0.0)
}

fn trim_fraction(mut s: String) -> String {
    if s.contains('.') {
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
    }
    s
}

/// Render seconds per tick with the largest unit in which the magnitude is at least one and
/// needs no more than three fractional digits.
///
/// The result parses back to exactly `timescale` with [`parse_timescale`]. Values that need
/// more digits even in yoctoseconds are rounded to three fractional digits.
pub fn timescale_to_string(timescale: f64) -> String {
    for unit in TimeUnit::ALL {
        let text = trim_fraction(format!("{:.3}", unit.scale(timescale)));
        let large_enough = text.parse::<f64>().map_or(false, |m| m >= 1.0);

        if large_enough && unit.to_seconds(&text) == Some(timescale) {
            return format!("{}{}", text, unit.abbrev());
        }
    }

    let magnitude = trim_fraction(format!("{:.3}", TimeUnit::Ys.scale(timescale)));
    format!("{}{}", magnitude, TimeUnit::Ys.abbrev())
}

/// Largest unit in which one tick is at least one unit long.
fn display_unit(timescale: f64) -> TimeUnit {
    TimeUnit::ALL.iter()
        .copied()
        .find(|unit| unit.scale(timescale) >= 1.0 - 1e-9)
        .unwrap_or(TimeUnit::Ys)
}

/// Render a tick as time, in the unit of the timescale.
pub fn tick_to_string(tick: u64, timescale: f64) -> String {
    let unit = display_unit(timescale);
    let value = tick as f64 * unit.scale(timescale);

    format!("{}{}", trim_fraction(format!("{:.3}", value)), unit.abbrev())
}


#[cfg(test)]
mod test {
    use super::*;
    use test_case::test_case;

    #[test_case("1ns", 1e-9)]
    #[test_case("10 ps", 10e-12)]
    #[test_case("100fs", 100e-15)]
    #[test_case("1s", 1.0)]
    #[test_case("1ys", 1e-24)]
    #[test_case("1.5us", 1.5e-6)]
    fn test_parse_timescale(text: &str, expected: f64) {
        assert_eq!(Some(expected), parse_timescale(text));
    }

    #[test]
    fn test_parse_invalid_timescale() {
        assert_eq!(None, parse_timescale("1 minute"));
        assert_eq!(None, parse_timescale("ns"));
        assert_eq!(None, parse_timescale("0ns"));
        assert_eq!(None, parse_timescale(""));
    }

    #[test]
    fn test_timescale_to_string() {
        assert_eq!("1ns", timescale_to_string(1e-9));
        assert_eq!("100ps", timescale_to_string(1e-10));
        assert_eq!("1.5us", timescale_to_string(1.5e-6));
        assert_eq!("1.25ns", timescale_to_string(1250e-12));
        assert_eq!("1500s", timescale_to_string(1500.0));
        assert_eq!("123.456us", timescale_to_string(123456e-9));
        assert_eq!("1234.5ps", timescale_to_string(1234.5e-12));
        assert_eq!("10s", timescale_to_string(10.0));
        assert_eq!("1ys", timescale_to_string(1e-24));
    }

    #[test]
    fn test_timescale_round_trip() {
        for unit in TimeUnit::ALL {
            for magnitude in [1u64, 2, 10, 100, 250, 1000, 1500, 123456] {
                let secs = unit.to_seconds(&magnitude.to_string()).unwrap();
                let text = timescale_to_string(secs);

                assert_eq!(Some(secs), parse_timescale(&text), "{}{} -> {}", magnitude, unit.abbrev(), text);
            }
        }
    }

    #[test]
    fn test_tick_to_string() {
        assert_eq!("5ns", tick_to_string(5, 1e-9));
        assert_eq!("0ns", tick_to_string(0, 1e-9));
        assert_eq!("1500ps", tick_to_string(15, 100e-12));
    }
}
