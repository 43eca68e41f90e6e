//! Wire-level model of the DAW's HTTP control protocol: entity types, response
//! decoding, request paths, and the fader/volume math shared by every client.

pub mod command;
pub mod model;
pub mod parse;
pub mod text;
pub mod time;
pub mod volume;

pub use command::{Command, EXT_STATE_NAMESPACE, ExtStateKey, ScriptAction};
pub use model::{
    JumpMode, Marker, MarkerId, PlayState, Region, RegionId, Track, TrackFlags, TrackId,
    TransportState, UnknownJumpMode,
};
pub use parse::{parse_markers, parse_regions, parse_tracks, parse_transport};
pub use text::truncate;
pub use time::{MusicalPosition, TempoContext, TimeSignature, format_time, format_time_long};
pub use volume::{
    ZERO_DB_FADER, db_to_linear, engine_to_fader, fader_to_engine, format_db, format_pan,
    linear_to_db,
};
