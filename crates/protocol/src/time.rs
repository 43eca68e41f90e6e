#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSignature {
    pub numerator: u32,
    pub denominator: u32,
}

impl TimeSignature {
    pub fn new(numerator: u32, denominator: u32) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    pub fn beats_per_bar(&self) -> u32 {
        self.numerator
    }
}

impl Default for TimeSignature {
    fn default() -> Self {
        Self::new(4, 4)
    }
}

impl From<(u32, u32)> for TimeSignature {
    fn from((numerator, denominator): (u32, u32)) -> Self {
        Self::new(numerator, denominator)
    }
}

impl From<TimeSignature> for (u32, u32) {
    fn from(ts: TimeSignature) -> Self {
        (ts.numerator, ts.denominator)
    }
}

/// Tempo and meter used to reason about bar boundaries in seconds.
///
/// A beat is one quarter note regardless of the denominator, matching how the
/// DAW reports tempo.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TempoContext {
    pub tempo: f64,
    pub time_signature: TimeSignature,
}

impl TempoContext {
    pub fn new(tempo: f64, time_signature: impl Into<TimeSignature>) -> Self {
        Self {
            tempo,
            time_signature: time_signature.into(),
        }
    }

    pub fn beat_duration(&self) -> f64 {
        60.0 / self.tempo
    }

    pub fn bar_duration(&self) -> f64 {
        self.beat_duration() * self.time_signature.beats_per_bar() as f64
    }

    pub fn seconds_to_beats(&self, seconds: f64) -> f64 {
        seconds / self.beat_duration()
    }

    /// Seconds from `pos` until the next bar line. A position exactly on a bar
    /// line waits a whole bar.
    pub fn time_to_next_bar(&self, pos: f64) -> f64 {
        let bar = self.bar_duration();
        bar - pos.rem_euclid(bar)
    }

    pub fn format_position(&self, seconds: f64) -> MusicalPosition {
        let total_beats = self.seconds_to_beats(seconds.max(0.0));
        let beats_per_bar = self.time_signature.beats_per_bar() as f64;

        let bar = (total_beats / beats_per_bar).floor() as u32 + 1;
        let beat = (total_beats % beats_per_bar).floor() as u32 + 1;
        let hundredths = ((total_beats.fract()) * 100.0).floor() as u32;

        MusicalPosition {
            bar,
            beat,
            hundredths,
        }
    }
}

impl Default for TempoContext {
    fn default() -> Self {
        Self::new(120.0, TimeSignature::default())
    }
}

/// Bar.beat.hundredths, the way the DAW prints musical positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MusicalPosition {
    pub bar: u32,
    pub beat: u32,
    pub hundredths: u32,
}

impl std::fmt::Display for MusicalPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{:02}", self.bar, self.beat, self.hundredths)
    }
}

/// `M:SS`. NaN and negative positions render as `0:00`.
pub fn format_time(seconds: f64) -> String {
    if seconds.is_nan() || seconds < 0.0 {
        return "0:00".to_string();
    }

    let mins = (seconds / 60.0).floor() as u64;
    let secs = (seconds % 60.0).floor() as u64;
    format!("{mins}:{secs:02}")
}

/// `H:MM:SS` once past an hour, otherwise `M:SS`.
pub fn format_time_long(seconds: f64) -> String {
    if seconds.is_nan() || seconds < 0.0 {
        return "0:00:00".to_string();
    }

    let hours = (seconds / 3600.0).floor() as u64;
    let mins = ((seconds % 3600.0) / 60.0).floor() as u64;
    let secs = (seconds % 60.0).floor() as u64;

    if hours > 0 {
        format!("{hours}:{mins:02}:{secs:02}")
    } else {
        format!("{mins}:{secs:02}")
    }
}
