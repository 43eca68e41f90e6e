//! Mapping between the normalized fader used by the UI and the DAW's linear
//! engine volume (0..=4, where 1.0 is 0 dB and 4.0 is roughly +12 dB).
//!
//! The fader curve is piecewise:
//!
//! ```text
//! fader  0 ─────────────── 0.716 ──────── 1.0
//! engine 0   (f / 0.716)²    1.0   linear   4.0
//! ```

/// Fader position of 0 dB (engine volume 1.0).
pub const ZERO_DB_FADER: f64 = 0.716;

/// Engine volume at the top of the fader.
pub const MAX_ENGINE_VOLUME: f64 = 4.0;

/// Anything at or below this is treated as silence on either side of the mapping.
pub const SILENCE_FLOOR: f64 = 0.0001;

/// Convert a fader position (0..1) to engine volume (0..4).
pub fn fader_to_engine(fader: f64) -> f64 {
    if fader <= SILENCE_FLOOR {
        0.0
    } else if fader < ZERO_DB_FADER {
        (fader / ZERO_DB_FADER).powi(2)
    } else {
        1.0 + ((fader - ZERO_DB_FADER) / (1.0 - ZERO_DB_FADER)) * (MAX_ENGINE_VOLUME - 1.0)
    }
}

/// Convert an engine volume (0..4) back to a fader position (0..1).
///
/// Exact inverse of [`fader_to_engine`] on each branch.
pub fn engine_to_fader(volume: f64) -> f64 {
    if volume <= SILENCE_FLOOR {
        0.0
    } else if volume <= 1.0 {
        volume.sqrt() * ZERO_DB_FADER
    } else {
        ZERO_DB_FADER + ((volume - 1.0) / (MAX_ENGINE_VOLUME - 1.0)) * (1.0 - ZERO_DB_FADER)
    }
}

pub fn linear_to_db(linear: f64) -> f64 {
    if linear <= 0.0 {
        return f64::NEG_INFINITY;
    }
    20.0 * linear.log10()
}

pub fn db_to_linear(db: f64) -> f64 {
    if db == f64::NEG_INFINITY {
        return 0.0;
    }
    10f64.powf(db / 20.0)
}

/// Render a fader position as a dB label, e.g. `-6.0 dB`, `0.0 dB`, `+12.0 dB`.
pub fn format_db(fader: f64) -> String {
    if fader <= SILENCE_FLOOR {
        return "-∞ dB".to_string();
    }

    let db = linear_to_db(fader_to_engine(fader));

    if db.abs() < 0.1 {
        "0.0 dB".to_string()
    } else if db > 0.0 {
        format!("+{db:.1} dB")
    } else {
        format!("{db:.1} dB")
    }
}

/// Render a pan value (-1..1) as `C`, `50L`, `30R`.
pub fn format_pan(pan: f64) -> String {
    if pan.abs() < 0.01 {
        return "C".to_string();
    }

    let percent = (pan * 100.0).abs().round() as i64;
    if pan < 0.0 {
        format!("{percent}L")
    } else {
        format!("{percent}R")
    }
}
