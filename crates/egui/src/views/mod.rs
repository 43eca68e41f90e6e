mod mixer;
mod navigation;
mod sections;
mod settings;
mod songs;
mod transport;

pub use mixer::{StripState, mixer_panel};
pub use navigation::jump_controls;
pub use sections::sections_panel;
pub use settings::{SettingsForm, SettingsOutcome};
pub use songs::songs_panel;
pub use transport::transport_bar;

use remote_protocol::{JumpMode, MarkerId, RegionId, TrackId};

/// What the user asked for during one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UiAction {
    SelectSong(RegionId),
    ClickSection(MarkerId),
    Play,
    Stop,
    GoToSongStart,
    SetJumpMode(JumpMode),
    SetBarCount(u32),
    CancelPendingJump,
    ToggleMute(TrackId),
    OpenSettings,
}
