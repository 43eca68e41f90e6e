use remote_protocol::ZERO_DB_FADER;

/// Fader positions this close to 0 dB snap onto it.
pub const VOLUME_SNAP_RANGE: f64 = 0.03;

/// Pan values this close to centre snap onto it.
pub const PAN_SNAP_RANGE: f64 = 0.08;

/// Polled values closer than this to what is displayed are ignored.
pub const ECHO_TOLERANCE: f64 = 0.01;

pub fn snap_volume(fader: f64) -> f64 {
    if (fader - ZERO_DB_FADER).abs() < VOLUME_SNAP_RANGE {
        ZERO_DB_FADER
    } else {
        fader
    }
}

pub fn snap_pan(pan: f64) -> f64 {
    if pan.abs() < PAN_SNAP_RANGE { 0.0 } else { pan }
}

/// Decide whether a polled value should replace the displayed one.
///
/// Returns the value to display. A slider being dragged keeps its own value,
/// and small differences are treated as echoes of what was just sent.
pub fn reconcile_echo(displayed: f64, reported: f64, dragging: bool) -> f64 {
    if dragging || reported.is_nan() {
        return displayed;
    }
    if (reported - displayed).abs() > ECHO_TOLERANCE {
        reported
    } else {
        displayed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_volume_snaps_near_zero_db() {
        assert_eq!(snap_volume(0.70), ZERO_DB_FADER);
        assert_eq!(snap_volume(0.74), ZERO_DB_FADER);
        assert_eq!(snap_volume(0.68), 0.68);
        assert_eq!(snap_volume(0.9), 0.9);
    }

    #[test]
    fn test_pan_snaps_to_centre() {
        assert_eq!(snap_pan(0.05), 0.0);
        assert_eq!(snap_pan(-0.079), 0.0);
        assert_eq!(snap_pan(-0.08), -0.08);
        assert_eq!(snap_pan(0.5), 0.5);
    }

    #[test]
    fn test_echo_ignored_while_dragging() {
        assert_eq!(reconcile_echo(0.5, 0.9, true), 0.5);
    }

    #[test]
    fn test_small_echo_ignored() {
        assert_eq!(reconcile_echo(0.5, 0.505, false), 0.5);
        assert_eq!(reconcile_echo(0.5, 0.6, false), 0.6);
    }

    #[test]
    fn test_nan_report_ignored() {
        assert_eq!(reconcile_echo(0.5, f64::NAN, false), 0.5);
    }
}
