//! Tick based queries on a single variable. All of them rely on strictly increasing ticks.

use super::*;

fn active_index(waves: &[VcdWave], tick: u64) -> Option<usize> {
    waves.partition_point(|w| w.tick <= tick)
        .checked_sub(1)
}

/// The wave whose value holds at `tick`.
pub fn value_at(variable: &VcdVariable, tick: u64) -> Option<&VcdWave> {
    active_index(&variable.waves, tick)
        .map(|i| &variable.waves[i])
}

/// The wave holding at `tick`, with its neighbouring values if it starts exactly there.
pub fn extended_wave_at(variable: &VcdVariable, tick: u64) -> Option<ExtendedWave> {
    let waves = &variable.waves;
    let i = active_index(waves, tick)?;
    let wave = waves[i].clone();

    let (previous, next) = if wave.tick == tick {
        let previous = i.checked_sub(1).map(|p| waves[p].value.clone());
        let next = waves.get(i + 1).map(|w| w.value.clone());
        (previous, next)
    } else {
        (None, None)
    };

    Some(ExtendedWave { wave, previous, next })
}

/// Waves visible in the window `start..end`: the one holding at `start` followed by every
/// change before `end`.
pub fn waves_in_range(variable: &VcdVariable, start: u64, end: u64) -> &[VcdWave] {
    let waves = &variable.waves;
    let lo = active_index(waves, start).unwrap_or(0);
    let hi = waves.partition_point(|w| w.tick < end);

    if hi > lo {
        &waves[lo..hi]
    } else {
        &[]
    }
}

/// Waves from the one holding at `start` to the end of the capture.
pub fn waves_from(variable: &VcdVariable, start: u64) -> &[VcdWave] {
    let waves = &variable.waves;
    &waves[active_index(waves, start).unwrap_or(0)..]
}

/// Find the next transition of a variable
///
/// Tick of the first value change after `tick`.
pub fn next_transition(variable: &VcdVariable, tick: u64) -> Option<u64> {
    let waves = &variable.waves;
    waves.get(waves.partition_point(|w| w.tick <= tick))
        .map(|w| w.tick)
}

/// Find the previous transition of a variable
///
/// Tick of the last value change before `tick`.
pub fn prev_transition(variable: &VcdVariable, tick: u64) -> Option<u64> {
    let waves = &variable.waves;
    waves.partition_point(|w| w.tick < tick)
        .checked_sub(1)
        .map(|i| waves[i].tick)
}
