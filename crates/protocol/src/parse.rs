//! Decoding of the DAW's line-oriented, tab-delimited responses.
//!
//! Every list endpoint answers with one record per line, tagged by its first
//! field. Lines with a different tag or too few fields are skipped; they are
//! never an error. Numeric fields use the leading numeric prefix of the field
//! (`"12abc"` reads as 12), and a float field with no numeric prefix reads as NaN.

use crate::model::{
    Marker, MarkerId, PlayState, Region, RegionId, Track, TrackFlags, TrackId, TransportState,
};
use crate::volume::engine_to_fader;

pub const MARKER_TAG: &str = "MARKER";
pub const REGION_TAG: &str = "REGION";
pub const TRACK_TAG: &str = "TRACK";
pub const TRANSPORT_TAG: &str = "TRANSPORT";

/// Fields of the lines tagged `tag`, tag included, split on tabs.
fn tagged_lines<'a>(response: &'a str, tag: &'a str) -> impl Iterator<Item = Vec<&'a str>> + 'a {
    response
        .lines()
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(move |line| {
            line.strip_prefix(tag)
                .is_some_and(|rest| rest.starts_with('\t'))
        })
        .map(|line| line.split('\t').collect())
}

/// Length of the longest prefix of `s` that looks like a decimal number.
fn numeric_prefix_len(s: &str, allow_fraction: bool) -> usize {
    let bytes = s.as_bytes();
    let mut i = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        i += 1;
    }

    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let mut digits = i - int_start;

    if allow_fraction && i < bytes.len() && bytes[i] == b'.' {
        let frac_start = i + 1;
        let mut j = frac_start;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if digits > 0 || j > frac_start {
            digits += j - frac_start;
            i = j;
        }
    }

    if digits == 0 {
        return 0;
    }

    if allow_fraction && i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        if matches!(bytes.get(j), Some(b'+') | Some(b'-')) {
            j += 1;
        }
        let exp_start = j;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            i = j;
        }
    }

    i
}

/// Leading integer of `field`, or `None` if it has none.
pub fn parse_int(field: &str) -> Option<i64> {
    let s = field.trim_start();
    let len = numeric_prefix_len(s, false);
    if len == 0 {
        return None;
    }
    s[..len].parse().ok()
}

/// Leading float of `field`, or NaN if it has none.
pub fn parse_float(field: &str) -> f64 {
    let s = field.trim_start();
    let rest = s.strip_prefix(['+', '-']).unwrap_or(s);
    if rest.starts_with("Infinity") {
        return if s.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }

    let len = numeric_prefix_len(s, true);
    if len == 0 {
        return f64::NAN;
    }
    s[..len].parse().unwrap_or(f64::NAN)
}

/// `MARKER\t<name>\t<id>\t<pos>\t<flags>`
pub fn parse_markers(response: &str) -> Vec<Marker> {
    tagged_lines(response, MARKER_TAG)
        .filter(|parts| parts.len() >= 4)
        .filter_map(|parts| {
            let id = parse_int(parts[2])?;
            Some(Marker {
                id: MarkerId(id),
                name: parts[1].to_string(),
                pos: parse_float(parts[3]),
            })
        })
        .collect()
}

/// `REGION\t<name>\t<id>\t<start>\t<end>\t<flags>`
pub fn parse_regions(response: &str) -> Vec<Region> {
    tagged_lines(response, REGION_TAG)
        .filter(|parts| parts.len() >= 5)
        .filter_map(|parts| {
            let id = parse_int(parts[2])?;
            Some(Region {
                id: RegionId(id),
                name: parts[1].to_string(),
                start: parse_float(parts[3]),
                end: parse_float(parts[4]),
            })
        })
        .collect()
}

/// `TRACK\t<index>\t<name>\t<flags>\t<volume>\t<pan>...`
///
/// The master (index 0) is dropped and engine volume is converted to a fader
/// position.
pub fn parse_tracks(response: &str) -> Vec<Track> {
    tagged_lines(response, TRACK_TAG)
        .filter(|parts| parts.len() >= 6)
        .filter_map(|parts| {
            let index = parse_int(parts[1])?;
            if index == 0 {
                return None;
            }

            let flags = match parse_int(parts[3]) {
                Some(bits) => TrackFlags::from_bits_truncate(u32::try_from(bits).ok()?),
                None => TrackFlags::empty(),
            };

            Some(Track {
                id: TrackId(index),
                name: parts[2].to_string(),
                vol: engine_to_fader(parse_float(parts[4])),
                pan: parse_float(parts[5]),
                mute: flags.contains(TrackFlags::MUTED),
                solo: flags.contains(TrackFlags::SOLOED),
                visible: !flags.contains(TrackFlags::HIDDEN_MCP),
            })
        })
        .collect()
}

/// `TRANSPORT\t<playState>\t<posSeconds>\t<repeat>\t<posString>\t<beatsString>`
///
/// Only the first `TRANSPORT` line counts. A missing or short line yields a
/// stopped transport at zero.
pub fn parse_transport(response: &str) -> TransportState {
    let Some(parts) = tagged_lines(response, TRANSPORT_TAG).next() else {
        return TransportState::default();
    };

    if parts.len() < 3 {
        return TransportState::default();
    }

    let text = |index: usize| {
        parts
            .get(index)
            .filter(|field| !field.is_empty())
            .map(|field| field.to_string())
    };

    TransportState {
        play_state: parse_int(parts[1])
            .map(PlayState::from_code)
            .unwrap_or(PlayState::Other(-1)),
        pos: parse_float(parts[2]),
        repeat: parts.get(3).and_then(|field| parse_int(field)) == Some(1),
        position_text: text(4),
        beats_text: text(5),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_int_prefix() {
        assert_eq!(parse_int("42"), Some(42));
        assert_eq!(parse_int("  7"), Some(7));
        assert_eq!(parse_int("-3"), Some(-3));
        assert_eq!(parse_int("12abc"), Some(12));
        assert_eq!(parse_int("1.9"), Some(1));
        assert_eq!(parse_int("abc"), None);
        assert_eq!(parse_int(""), None);
        assert_eq!(parse_int("-"), None);
    }

    #[test]
    fn test_parse_float_prefix() {
        assert_eq!(parse_float("12.5"), 12.5);
        assert_eq!(parse_float("12.5s"), 12.5);
        assert_eq!(parse_float(".5"), 0.5);
        assert_eq!(parse_float("3."), 3.0);
        assert_eq!(parse_float("1e3"), 1000.0);
        assert_eq!(parse_float("1e"), 1.0);
        assert_eq!(parse_float("-2.25"), -2.25);
        assert_eq!(parse_float("-Infinity"), f64::NEG_INFINITY);
        assert!(parse_float("").is_nan());
        assert!(parse_float("pos").is_nan());
        assert!(parse_float(".").is_nan());
    }

    #[test]
    fn test_parse_markers() {
        let response = "MARKER_LIST\nMARKER\tIntro\t1\t0.000000\t0\nMARKER\tVerse\t2\t12.5\t0\nMARKER_LIST_END\n";
        let markers = parse_markers(response);

        assert_eq!(markers.len(), 2);
        assert_eq!(markers[0].id, MarkerId(1));
        assert_eq!(markers[0].name, "Intro");
        assert_eq!(markers[1].pos, 12.5);
    }

    #[test]
    fn test_short_marker_line_is_skipped() {
        let response = "MARKER\tonly\ttwo\nMARKER\tChorus\t3\t30\t0\n";
        let markers = parse_markers(response);

        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].name, "Chorus");
    }

    #[test]
    fn test_malformed_marker_position_is_nan() {
        let markers = parse_markers("MARKER\tBroken\t4\tsoon\t0\n");
        assert_eq!(markers.len(), 1);
        assert!(markers[0].pos.is_nan());
    }

    #[test]
    fn test_marker_without_numeric_id_is_skipped() {
        let markers = parse_markers("MARKER\tNo id\tx\t5\t0\nMARKER\tOk\t2\t6\t0\n");
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].id, MarkerId(2));
    }

    #[test]
    fn test_other_tags_are_ignored() {
        // REGION lines share no prefix confusion with MARKER, and MARKER_LIST is not MARKER.
        let response = "MARKER_LIST\nREGION\tSong\t1\t0\t10\t0\nMARKER\tA\t1\t1\t0\n";
        assert_eq!(parse_markers(response).len(), 1);
        assert_eq!(parse_regions(response).len(), 1);
    }

    #[test]
    fn test_crlf_line_endings() {
        let regions = parse_regions("REGION\tSong A\t1\t0\t90.5\t0\r\nREGION\tSong B\t2\t90.5\t200\t0\r\n");
        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0].end, 90.5);
        assert_eq!(regions[1].name, "Song B");
    }

    #[test]
    fn test_parse_regions_needs_five_fields() {
        let regions = parse_regions("REGION\tShort\t1\t0\nREGION\tSong\t2\t10\t20\t0\n");
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].id, RegionId(2));
        assert_eq!(regions[0].start, 10.0);
        assert_eq!(regions[0].end, 20.0);
    }

    #[test]
    fn test_parse_tracks() {
        let response = "TRACK\t0\tMASTER\t0\t1.000000\t0.000000\n\
                        TRACK\t1\tDrums\t8\t1.000000\t-0.250000\t-1500\n\
                        TRACK\t2\tBass\t16\t4.000000\t0.000000\n\
                        TRACK\t3\tKeys\t1024\t0.000000\t0.5\n";
        let tracks = parse_tracks(response);

        assert_eq!(tracks.len(), 3);

        assert_eq!(tracks[0].id, TrackId(1));
        assert!(tracks[0].mute);
        assert!(!tracks[0].solo);
        assert!((tracks[0].vol - 0.716).abs() < 1e-9);
        assert_eq!(tracks[0].pan, -0.25);

        assert!(!tracks[1].mute);
        assert!(tracks[1].solo);
        assert!((tracks[1].vol - 1.0).abs() < 1e-9);

        assert_eq!(tracks[2].vol, 0.0);
        assert!(!tracks[2].visible);
    }

    #[test]
    fn test_track_with_malformed_flags_is_unmuted() {
        let tracks = parse_tracks("TRACK\t1\tVox\t?\t1\t0\n");
        assert_eq!(tracks.len(), 1);
        assert!(!tracks[0].mute);
    }

    #[test]
    fn test_track_with_out_of_range_flags_is_skipped() {
        let response = "TRACK\t1\tVox\t-8\t1\t0\n\
                        TRACK\t2\tGtr\t4294967304\t1\t0\n\
                        TRACK\t3\tKeys\t8\t1\t0\n";
        let tracks = parse_tracks(response);

        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].id, TrackId(3));
        assert!(tracks[0].mute);
    }

    #[test]
    fn test_parse_transport() {
        let transport = parse_transport("TRANSPORT\t1\t42.500000\t0\t0:42.500\t22.1.00\n");

        assert!(transport.is_playing());
        assert_eq!(transport.pos, 42.5);
        assert!(!transport.repeat);
        assert_eq!(transport.position_text.as_deref(), Some("0:42.500"));
        assert_eq!(transport.beats_text.as_deref(), Some("22.1.00"));
    }

    #[test]
    fn test_transport_uses_first_line_only() {
        let transport = parse_transport("TRANSPORT\t2\t5\nTRANSPORT\t1\t9\n");
        assert_eq!(transport.play_state, PlayState::Paused);
        assert_eq!(transport.pos, 5.0);
    }

    #[test]
    fn test_missing_transport_defaults_to_stopped() {
        let transport = parse_transport("garbage\n");
        assert_eq!(transport, TransportState::default());

        let short = parse_transport("TRANSPORT\t1\n");
        assert_eq!(short, TransportState::default());
    }

    #[test]
    fn test_transport_recording_is_not_playing() {
        let transport = parse_transport("TRANSPORT\t5\t3\t1\n");
        assert_eq!(transport.play_state, PlayState::Recording);
        assert!(!transport.is_playing());
        assert!(transport.repeat);
        assert_eq!(transport.position_text, None);
    }
}
