//! Request paths understood by the DAW's control endpoint.
//!
//! Every request is a GET; the whole command lives in the path. Several
//! commands can be chained with `;`, which is how play/stop/seek also ask for
//! a fresh `TRANSPORT` line in the same round trip.

use std::fmt;

use crate::model::{JumpMode, TrackId};

/// Root of every control path.
pub const PATH_PREFIX: &str = "/_/";

/// Namespace in the external state store shared with the companion script.
pub const EXT_STATE_NAMESPACE: &str = "LiveRemote";

/// Built-in action id of "Transport: Play".
pub const ACTION_PLAY: u32 = 1007;
/// Built-in action id of "Transport: Stop".
pub const ACTION_STOP: u32 = 40667;

/// Keys the companion script reads from the external state store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtStateKey {
    DeferredJumpPos,
    SmoothSeekingAction,
    JumpMode,
    BarCount,
}

impl ExtStateKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtStateKey::DeferredJumpPos => "deferred_jump_pos",
            ExtStateKey::SmoothSeekingAction => "smooth_seeking_action",
            ExtStateKey::JumpMode => "jump_mode",
            ExtStateKey::BarCount => "bar_count",
        }
    }
}

/// Values of the `smooth_seeking_action` key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptAction {
    RequestJump,
    Cancel,
    AutoConfig,
    Status,
}

impl ScriptAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScriptAction::RequestJump => "request_jump",
            ScriptAction::Cancel => "cancel",
            ScriptAction::AutoConfig => "auto_config",
            ScriptAction::Status => "status",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    ListMarkers,
    ListRegions,
    ListTracks,
    Transport,
    Play,
    Stop,
    /// Seek to an absolute position in seconds.
    Seek(f64),
    /// Engine volume, 0..4.
    SetVolume(TrackId, f64),
    SetPan(TrackId, f64),
    SetMute(TrackId, bool),
    SetExtState { key: ExtStateKey, value: String },
    /// Run an action by command id, e.g. a registered script.
    RunAction(String),
}

impl Command {
    pub fn set_action(action: ScriptAction) -> Self {
        Command::SetExtState {
            key: ExtStateKey::SmoothSeekingAction,
            value: action.as_str().to_string(),
        }
    }

    pub fn set_jump_mode(mode: JumpMode) -> Self {
        Command::SetExtState {
            key: ExtStateKey::JumpMode,
            value: mode.as_str().to_string(),
        }
    }

    pub fn set_bar_count(count: u32) -> Self {
        Command::SetExtState {
            key: ExtStateKey::BarCount,
            value: count.to_string(),
        }
    }

    pub fn set_deferred_target(seconds: f64) -> Self {
        Command::SetExtState {
            key: ExtStateKey::DeferredJumpPos,
            value: seconds.to_string(),
        }
    }

    pub fn path(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(PATH_PREFIX)?;
        match self {
            Command::ListMarkers => f.write_str("MARKER"),
            Command::ListRegions => f.write_str("REGION"),
            Command::ListTracks => f.write_str("TRACK"),
            Command::Transport => f.write_str("TRANSPORT"),
            Command::Play => write!(f, "{ACTION_PLAY};TRANSPORT"),
            Command::Stop => write!(f, "{ACTION_STOP};TRANSPORT"),
            Command::Seek(seconds) => write!(f, "SET/POS/{seconds};TRANSPORT"),
            Command::SetVolume(id, volume) => write!(f, "SET/TRACK/{id}/VOL/{volume:.6}"),
            Command::SetPan(id, pan) => write!(f, "SET/TRACK/{id}/PAN/{pan:.6}"),
            Command::SetMute(id, muted) => write!(f, "SET/TRACK/{id}/MUTE/{}", u8::from(*muted)),
            Command::SetExtState { key, value } => write!(
                f,
                "SET/EXTSTATE/{EXT_STATE_NAMESPACE}/{}/{value}",
                key.as_str()
            ),
            Command::RunAction(id) => f.write_str(id),
        }
    }
}
