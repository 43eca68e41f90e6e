//! Read-only views of the session for the rendering layer.
//!
//! A snapshot is a copy taken at one point in time; the view layer renders it
//! and never writes back into the session through it.

use serde::{Deserialize, Serialize};

use remote_protocol::{
    JumpMode, MarkerId, RegionId, TrackId, format_db, format_pan, format_time, truncate,
};

use crate::navigation::SectionState;
use crate::session::Session;

/// Track names longer than this are shortened in mixer strips.
pub const TRACK_NAME_CHARS: usize = 12;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub songs: Vec<SongView>,
    pub current_song: Option<RegionId>,
    /// The song under the playhead, which may differ from the one selected.
    pub playing_song: Option<RegionId>,
    pub sections: Vec<SectionView>,
    pub transport: TransportView,
    pub faders: Vec<FaderView>,
    pub jump_mode: JumpMode,
    pub bar_count: u32,
    pub has_pending_jump: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongView {
    pub id: RegionId,
    /// 1-based position in the setlist.
    pub number: usize,
    pub name: String,
    pub start: f64,
    pub time: String,
}

/// A section of the current song.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionView {
    pub id: MarkerId,
    pub name: String,
    pub pos: f64,
    pub highlight: Highlight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Highlight {
    Idle,
    Pending,
    Active,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportView {
    pub is_playing: bool,
    pub pos: f64,
    pub time: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaderView {
    pub id: TrackId,
    pub name: String,
    pub short_name: String,
    pub vol: f64,
    pub db_label: String,
    pub pan: f64,
    pub pan_label: String,
    pub mute: bool,
}

impl From<SectionState> for Highlight {
    fn from(state: SectionState) -> Self {
        match state {
            SectionState::Idle => Highlight::Idle,
            SectionState::Pending => Highlight::Pending,
            SectionState::Active => Highlight::Active,
        }
    }
}

pub fn session_to_snapshot(session: &Session) -> SessionSnapshot {
    let current_song = session.current_song().map(|song| song.id);

    let sections = current_song
        .map(|id| {
            session
                .sections_for_song(id)
                .iter()
                .map(|marker| SectionView {
                    id: marker.id,
                    name: marker.name.clone(),
                    pos: marker.pos,
                    highlight: session.section_state(marker.id).into(),
                })
                .collect()
        })
        .unwrap_or_default();

    let transport = session.transport();

    SessionSnapshot {
        songs: session
            .songs()
            .into_iter()
            .enumerate()
            .map(|(index, song)| SongView {
                id: song.id,
                number: index + 1,
                time: format_time(song.pos),
                start: song.pos,
                name: song.name,
            })
            .collect(),
        current_song,
        playing_song: session.playing_song().map(|song| song.id),
        sections,
        transport: TransportView {
            is_playing: transport.is_playing(),
            pos: transport.pos,
            time: format_time(transport.pos),
        },
        faders: session
            .tracks()
            .iter()
            .filter(|track| track.visible)
            .map(|track| FaderView {
                id: track.id,
                name: track.name.clone(),
                short_name: truncate(&track.name, TRACK_NAME_CHARS),
                vol: track.vol,
                db_label: format_db(track.vol),
                pan: track.pan,
                pan_label: format_pan(track.pan),
                mute: track.mute,
            })
            .collect(),
        jump_mode: session.jump_mode(),
        bar_count: session.bar_count(),
        has_pending_jump: session.pending_jump().is_some(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use remote_protocol::{Marker, Region, Track};

    fn session() -> Session {
        let mut session = Session::new(JumpMode::Bar, 4);
        session.set_regions(vec![Region {
            id: RegionId(1),
            name: "Opener".to_string(),
            start: 0.0,
            end: 80.0,
        }]);
        session.set_markers(vec![
            Marker {
                id: MarkerId(1),
                name: "Intro".to_string(),
                pos: 0.0,
            },
            Marker {
                id: MarkerId(2),
                name: "Chorus".to_string(),
                pos: 36.0,
            },
        ]);
        session.set_tracks(vec![
            Track {
                id: TrackId(1),
                name: "Backing Vocals Left".to_string(),
                vol: 0.716,
                pan: -0.5,
                mute: false,
                solo: false,
                visible: true,
            },
            Track {
                id: TrackId(2),
                name: "Hidden".to_string(),
                vol: 0.5,
                pan: 0.0,
                mute: true,
                solo: false,
                visible: false,
            },
        ]);
        session
    }

    #[test]
    fn test_no_sections_without_current_song() {
        let snapshot = session_to_snapshot(&session());

        assert_eq!(snapshot.songs.len(), 1);
        assert_eq!(snapshot.songs[0].number, 1);
        assert_eq!(snapshot.songs[0].time, "0:00");
        assert!(snapshot.sections.is_empty());
    }

    #[test]
    fn test_sections_carry_highlight() {
        let mut session = session();
        session.select_song(RegionId(1));
        session.click_section(MarkerId(2));

        let snapshot = session_to_snapshot(&session);

        assert_eq!(snapshot.sections.len(), 2);
        assert_eq!(snapshot.sections[0].highlight, Highlight::Idle);
        assert_eq!(snapshot.sections[1].highlight, Highlight::Pending);
        assert!(snapshot.has_pending_jump);
    }

    #[test]
    fn test_playing_song_is_reported_separately() {
        let mut session = session();
        session.set_regions(vec![
            Region {
                id: RegionId(1),
                name: "Opener".to_string(),
                start: 0.0,
                end: 80.0,
            },
            Region {
                id: RegionId(2),
                name: "Closer".to_string(),
                start: 90.0,
                end: 180.0,
            },
        ]);
        session.select_song(RegionId(2));
        session.observe_transport(remote_protocol::TransportState {
            pos: 12.0,
            ..Default::default()
        });

        let snapshot = session_to_snapshot(&session);

        assert_eq!(snapshot.current_song, Some(RegionId(2)));
        assert_eq!(snapshot.playing_song, Some(RegionId(1)));
    }

    #[test]
    fn test_faders_hide_hidden_tracks_and_format_labels() {
        let snapshot = session_to_snapshot(&session());

        assert_eq!(snapshot.faders.len(), 1);
        let fader = &snapshot.faders[0];
        assert_eq!(fader.short_name.chars().count(), TRACK_NAME_CHARS);
        assert_eq!(fader.db_label, "0.0 dB");
        assert_eq!(fader.pan_label, "50L");
    }

    #[test]
    fn test_snapshot_serializes_camel_case() {
        let json = serde_json::to_value(session_to_snapshot(&session())).expect("json");

        assert_eq!(json["jumpMode"], "bar");
        assert_eq!(json["barCount"], 4);
        assert_eq!(json["transport"]["isPlaying"], false);
        assert_eq!(json["faders"][0]["panLabel"], "50L");
    }
}
