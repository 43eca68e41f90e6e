//! Offline stand-in for the DAW's control endpoint.
//!
//! `MockBackend` speaks the same text protocol as the real endpoint, answering
//! from a JSON fixture and applying SET commands to its in-memory copy, so the
//! whole client stack (parsing included) runs without a DAW.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use remote_protocol::parse::{parse_float, parse_int};
use remote_protocol::{
    EXT_STATE_NAMESPACE, Marker, PlayState, Region, TempoContext, Track, TrackFlags, fader_to_engine,
    engine_to_fader, format_time,
};
use serde::Deserialize;
use tracing::debug;

use crate::backend::Backend;
use crate::error::ClientError;

/// Simulated round-trip time.
pub const DEFAULT_MOCK_LATENCY: Duration = Duration::from_millis(100);

const BUILTIN_FIXTURE: &str = include_str!("../fixtures/mock-session.json");

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MockPlayState {
    #[serde(rename = "isPlaying")]
    pub is_playing: bool,
    pub pos: f64,
}

/// On-disk shape of a mock session.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MockFixture {
    #[serde(default)]
    pub markers: Vec<Marker>,
    #[serde(default)]
    pub regions: Vec<Region>,
    #[serde(default)]
    pub tracks: Vec<Track>,
    #[serde(rename = "playState", default)]
    pub play_state: MockPlayState,
}

#[derive(Debug, Default)]
struct MockState {
    fixture: MockFixture,
    ext_state: BTreeMap<String, String>,
    actions: Vec<String>,
    requests: Vec<String>,
    failing_prefixes: Vec<String>,
}

pub struct MockBackend {
    state: Mutex<MockState>,
    latency: Duration,
    tempo: TempoContext,
}

impl MockBackend {
    pub fn new(fixture: MockFixture) -> Self {
        Self {
            state: Mutex::new(MockState {
                fixture,
                ..Default::default()
            }),
            latency: DEFAULT_MOCK_LATENCY,
            tempo: TempoContext::default(),
        }
    }

    /// The fixture shipped with the crate.
    pub fn builtin() -> Self {
        // The embedded fixture is checked by `test_builtin_fixture_parses`.
        Self::from_json(BUILTIN_FIXTURE).unwrap_or_else(|_| Self::new(MockFixture::default()))
    }

    pub fn from_json(json: &str) -> Result<Self, ClientError> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    pub fn from_file(path: &Path) -> Result<Self, ClientError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Make every later request whose path starts with `prefix` fail as if the
    /// endpoint had dropped off the network.
    pub fn fail_paths_starting_with(&self, prefix: &str) {
        self.lock().failing_prefixes.push(prefix.to_string());
    }

    pub fn restore_all_paths(&self) {
        self.lock().failing_prefixes.clear();
    }

    /// Every path requested so far, failed ones included, in order.
    pub fn requests(&self) -> Vec<String> {
        self.lock().requests.clone()
    }

    /// Action ids that were run, e.g. the companion script's command id.
    pub fn actions(&self) -> Vec<String> {
        self.lock().actions.clone()
    }

    pub fn ext_state(&self, key: &str) -> Option<String> {
        self.lock()
            .ext_state
            .get(&format!("{EXT_STATE_NAMESPACE}/{key}"))
            .cloned()
    }

    pub fn play_state(&self) -> MockPlayState {
        self.lock().fixture.play_state.clone()
    }

    pub fn tracks(&self) -> Vec<Track> {
        self.lock().fixture.tracks.clone()
    }

    fn respond(&self, path: &str) -> Result<String, ClientError> {
        let mut state = self.lock();
        state.requests.push(path.to_string());

        if state
            .failing_prefixes
            .iter()
            .any(|prefix| path.starts_with(prefix.as_str()))
        {
            return Err(ClientError::Unreachable {
                path: path.to_string(),
            });
        }

        let Some(commands) = path.strip_prefix("/_/") else {
            return Err(ClientError::Status {
                path: path.to_string(),
                status: 404,
            });
        };

        let mut out = String::new();
        for command in commands.split(';').filter(|c| !c.is_empty()) {
            self.apply(&mut state, command, &mut out);
        }
        Ok(out)
    }

    fn apply(&self, state: &mut MockState, command: &str, out: &mut String) {
        let fields: Vec<&str> = command.split('/').collect();
        match fields.as_slice() {
            ["MARKER"] => {
                out.push_str("MARKER_LIST\n");
                for marker in &state.fixture.markers {
                    let _ = writeln!(out, "MARKER\t{}\t{}\t{:.6}\t0", marker.name, marker.id, marker.pos);
                }
                out.push_str("MARKER_LIST_END\n");
            }
            ["REGION"] => {
                out.push_str("REGION_LIST\n");
                for region in &state.fixture.regions {
                    let _ = writeln!(
                        out,
                        "REGION\t{}\t{}\t{:.6}\t{:.6}\t0",
                        region.name, region.id, region.start, region.end
                    );
                }
                out.push_str("REGION_LIST_END\n");
            }
            ["TRACK"] => {
                out.push_str("TRACK\t0\tMASTER\t0\t1.000000\t0.000000\n");
                for track in &state.fixture.tracks {
                    let _ = writeln!(
                        out,
                        "TRACK\t{}\t{}\t{}\t{:.6}\t{:.6}",
                        track.id,
                        track.name,
                        track_flags(track).bits(),
                        fader_to_engine(track.vol),
                        track.pan
                    );
                }
            }
            ["TRANSPORT"] => {
                let play = &state.fixture.play_state;
                let play_state = if play.is_playing {
                    PlayState::Playing
                } else {
                    PlayState::Stopped
                };
                let _ = writeln!(
                    out,
                    "TRANSPORT\t{}\t{:.6}\t0\t{}\t{}",
                    play_state.code(),
                    play.pos,
                    format_time(play.pos),
                    self.tempo.format_position(play.pos)
                );
            }
            ["SET", "POS", pos] => {
                state.fixture.play_state.pos = parse_float(pos).max(0.0);
            }
            ["SET", "TRACK", id, param, value] => {
                let id = parse_int(id);
                let Some(track) = state
                    .fixture
                    .tracks
                    .iter_mut()
                    .find(|track| Some(track.id.0) == id)
                else {
                    debug!(command, "mock: unknown track");
                    return;
                };
                match *param {
                    "VOL" => track.vol = engine_to_fader(parse_float(value)),
                    "PAN" => track.pan = parse_float(value).clamp(-1.0, 1.0),
                    "MUTE" => track.mute = parse_int(value) == Some(1),
                    _ => debug!(command, "mock: unknown track parameter"),
                }
            }
            ["SET", "EXTSTATE", namespace, key, value] => {
                state
                    .ext_state
                    .insert(format!("{namespace}/{key}"), value.to_string());
            }
            ["1007"] => state.fixture.play_state.is_playing = true,
            ["40667"] => state.fixture.play_state.is_playing = false,
            [action] => state.actions.push(action.to_string()),
            _ => debug!(command, "mock: ignoring command"),
        }
    }
}

fn track_flags(track: &Track) -> TrackFlags {
    let mut flags = TrackFlags::empty();
    flags.set(TrackFlags::MUTED, track.mute);
    flags.set(TrackFlags::SOLOED, track.solo);
    flags.set(TrackFlags::HIDDEN_MCP, !track.visible);
    flags
}

impl Backend for MockBackend {
    async fn get(&self, path: &str) -> Result<String, ClientError> {
        tokio::time::sleep(self.latency).await;
        debug!(path, "mock request");
        self.respond(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use remote_protocol::{TrackId, parse_markers, parse_regions, parse_tracks, parse_transport};

    fn backend() -> MockBackend {
        MockBackend::builtin().with_latency(Duration::ZERO)
    }

    #[test]
    fn test_builtin_fixture_parses() {
        let fixture: MockFixture = serde_json::from_str(BUILTIN_FIXTURE).expect("fixture");
        assert!(!fixture.markers.is_empty());
        assert!(!fixture.regions.is_empty());
        assert!(!fixture.tracks.is_empty());
        assert!(fixture.tracks.iter().all(|track| track.visible));
    }

    #[test]
    fn test_invalid_fixture_is_rejected() {
        assert!(matches!(
            MockBackend::from_json("{ not json"),
            Err(ClientError::MockFixture(_))
        ));
    }

    #[test]
    fn test_fixture_from_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("session.json");
        std::fs::write(
            &path,
            r#"{"markers":[{"id":7,"name":"Solo","pos":3.5}],"playState":{"isPlaying":true,"pos":1.0}}"#,
        )
        .expect("write");

        let backend = MockBackend::from_file(&path).expect("backend");
        let markers = parse_markers(&backend.respond("/_/MARKER").expect("markers"));
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].pos, 3.5);
        assert!(backend.play_state().is_playing);
    }

    #[test]
    fn test_missing_fixture_file_is_io_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(matches!(
            MockBackend::from_file(&dir.path().join("nope.json")),
            Err(ClientError::Io(_))
        ));
    }

    #[test]
    fn test_lists_round_trip_through_the_wire_format() {
        let backend = backend();

        let regions = parse_regions(&backend.respond("/_/REGION").expect("regions"));
        assert_eq!(regions.len(), 3);
        assert_eq!(regions[1].name, "Second Song");

        let tracks = parse_tracks(&backend.respond("/_/TRACK").expect("tracks"));
        assert_eq!(tracks.len(), 5, "master must not be listed");
        assert!((tracks[0].vol - 0.716).abs() < 1e-6);
        assert!(tracks[3].mute);
    }

    #[test]
    fn test_chained_transport_commands() {
        let backend = backend();

        let response = backend.respond("/_/SET/POS/42.5;TRANSPORT").expect("seek");
        let transport = parse_transport(&response);
        assert_eq!(transport.pos, 42.5);
        assert!(!transport.is_playing());

        let transport = parse_transport(&backend.respond("/_/1007;TRANSPORT").expect("play"));
        assert_eq!(transport.play_state, PlayState::Playing);
        assert_eq!(transport.position_text.as_deref(), Some("0:42"));

        let transport = parse_transport(&backend.respond("/_/40667;TRANSPORT").expect("stop"));
        assert!(!transport.is_playing());
    }

    #[test]
    fn test_mixer_commands_update_tracks() {
        let backend = backend();

        backend.respond("/_/SET/TRACK/2/VOL/4.000000").expect("vol");
        backend.respond("/_/SET/TRACK/2/PAN/-0.500000").expect("pan");
        backend.respond("/_/SET/TRACK/2/MUTE/1").expect("mute");

        let track = backend
            .tracks()
            .into_iter()
            .find(|track| track.id == TrackId(2))
            .expect("track 2");
        assert!((track.vol - 1.0).abs() < 1e-9);
        assert_eq!(track.pan, -0.5);
        assert!(track.mute);
    }

    #[test]
    fn test_ext_state_and_actions_are_recorded() {
        let backend = backend();

        backend
            .respond("/_/SET/EXTSTATE/LiveRemote/jump_mode/bar")
            .expect("ext state");
        backend.respond("/_/_RS1234").expect("action");

        assert_eq!(backend.ext_state("jump_mode").as_deref(), Some("bar"));
        assert_eq!(backend.actions(), vec!["_RS1234".to_string()]);
        assert_eq!(backend.requests().len(), 2);
    }

    #[test]
    fn test_failure_injection() {
        let backend = backend();
        backend.fail_paths_starting_with("/_/SET/EXTSTATE");

        assert!(matches!(
            backend.respond("/_/SET/EXTSTATE/LiveRemote/jump_mode/bar"),
            Err(ClientError::Unreachable { .. })
        ));
        assert!(backend.respond("/_/TRANSPORT").is_ok());

        backend.restore_all_paths();
        assert!(backend.respond("/_/SET/EXTSTATE/LiveRemote/jump_mode/bar").is_ok());
    }

    #[test]
    fn test_path_outside_control_root_is_not_found() {
        assert!(matches!(
            backend().respond("/index.html"),
            Err(ClientError::Status { status: 404, .. })
        ));
    }
}
