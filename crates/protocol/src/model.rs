use std::fmt;
use std::str::FromStr;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MarkerId(pub i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionId(pub i64);

/// 1-based mixer channel index. Index 0 is the master and never appears in a track list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(pub i64);

impl fmt::Display for MarkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named instant on the timeline. Shown as a section of a song.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub id: MarkerId,
    pub name: String,
    /// Position in seconds.
    pub pos: f64,
}

/// A named time span on the timeline. Shown as a song.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub id: RegionId,
    pub name: String,
    pub start: f64,
    pub end: f64,
}

impl Region {
    /// Half-open containment test, `[start, end)`.
    pub fn contains(&self, pos: f64) -> bool {
        pos >= self.start && pos < self.end
    }
}

bitflags! {
    /// Flag word of a `TRACK` line.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct TrackFlags: u32 {
        const FOLDER = 1 << 0;
        const SELECTED = 1 << 1;
        const HAS_FX = 1 << 2;
        const MUTED = 1 << 3;
        const SOLOED = 1 << 4;
        const SOLO_IN_PLACE = 1 << 5;
        const REC_ARMED = 1 << 6;
        const REC_MONITOR_ON = 1 << 7;
        const REC_MONITOR_AUTO = 1 << 8;
        const HIDDEN_TCP = 1 << 9;
        const HIDDEN_MCP = 1 << 10;
    }
}

fn default_visible() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: TrackId,
    pub name: String,
    /// Normalized fader position, 0..1 (0 dB sits at [`crate::ZERO_DB_FADER`]).
    pub vol: f64,
    /// -1 (hard left) ..= 1 (hard right).
    pub pan: f64,
    pub mute: bool,
    #[serde(default)]
    pub solo: bool,
    /// False when the DAW hides the track from its mixer.
    #[serde(default = "default_visible")]
    pub visible: bool,
}

/// Raw play state code reported on the `TRANSPORT` line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayState {
    #[default]
    Stopped,
    Playing,
    Paused,
    Recording,
    Other(i64),
}

impl PlayState {
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => PlayState::Stopped,
            1 => PlayState::Playing,
            2 => PlayState::Paused,
            5 => PlayState::Recording,
            other => PlayState::Other(other),
        }
    }

    pub fn code(&self) -> i64 {
        match self {
            PlayState::Stopped => 0,
            PlayState::Playing => 1,
            PlayState::Paused => 2,
            PlayState::Recording => 5,
            PlayState::Other(code) => *code,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TransportState {
    pub play_state: PlayState,
    /// Play cursor in seconds.
    pub pos: f64,
    pub repeat: bool,
    /// The DAW's own rendering of the position, e.g. `1:23.456`.
    pub position_text: Option<String>,
    /// Position in musical units, e.g. `12.3.00`.
    pub beats_text: Option<String>,
}

impl TransportState {
    /// Only an explicit "playing" state counts; recording and paused do not.
    pub fn is_playing(&self) -> bool {
        matches!(self.play_state, PlayState::Playing)
    }
}

/// How a section tap moves the play cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JumpMode {
    /// Seek right away.
    #[default]
    Immediate,
    /// Let the companion script jump on a bar boundary.
    Bar,
    /// Let the companion script jump when the current region ends.
    RegionEnd,
}

impl JumpMode {
    pub const ALL: [JumpMode; 3] = [JumpMode::Immediate, JumpMode::Bar, JumpMode::RegionEnd];

    pub fn as_str(&self) -> &'static str {
        match self {
            JumpMode::Immediate => "immediate",
            JumpMode::Bar => "bar",
            JumpMode::RegionEnd => "region-end",
        }
    }

    /// Deferred modes hand the jump to the companion script.
    pub fn is_deferred(&self) -> bool {
        !matches!(self, JumpMode::Immediate)
    }
}

impl fmt::Display for JumpMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownJumpMode(pub String);

impl fmt::Display for UnknownJumpMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown jump mode '{}'", self.0)
    }
}

impl std::error::Error for UnknownJumpMode {}

impl FromStr for JumpMode {
    type Err = UnknownJumpMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JumpMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| UnknownJumpMode(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_contains_is_half_open() {
        let region = Region {
            id: RegionId(1),
            name: "Intro".to_string(),
            start: 0.0,
            end: 10.0,
        };

        assert!(region.contains(0.0));
        assert!(region.contains(9.999));
        assert!(!region.contains(10.0));
        assert!(!region.contains(-0.1));
    }

    #[test]
    fn test_play_state_codes() {
        assert_eq!(PlayState::from_code(0), PlayState::Stopped);
        assert_eq!(PlayState::from_code(1), PlayState::Playing);
        assert_eq!(PlayState::from_code(2), PlayState::Paused);
        assert_eq!(PlayState::from_code(5), PlayState::Recording);
        assert_eq!(PlayState::from_code(6), PlayState::Other(6));
        assert_eq!(PlayState::Recording.code(), 5);
    }

    #[test]
    fn test_only_playing_counts_as_playing() {
        let mut transport = TransportState::default();
        assert!(!transport.is_playing());

        transport.play_state = PlayState::Recording;
        assert!(!transport.is_playing());

        transport.play_state = PlayState::Playing;
        assert!(transport.is_playing());
    }

    #[test]
    fn test_jump_mode_strings() {
        for mode in JumpMode::ALL {
            assert_eq!(mode.as_str().parse::<JumpMode>(), Ok(mode));
        }
        assert_eq!("region-end".parse::<JumpMode>(), Ok(JumpMode::RegionEnd));
        assert!("later".parse::<JumpMode>().is_err());
        assert!(!JumpMode::Immediate.is_deferred());
        assert!(JumpMode::Bar.is_deferred());
        assert!(JumpMode::RegionEnd.is_deferred());
    }
}
