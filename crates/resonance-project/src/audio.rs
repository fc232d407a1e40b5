//! Audio-grid arithmetic

/// Video frames per musical beat
///
/// Returns `0.0` for a zero BPM.
#[must_use]
pub fn frames_per_beat(bpm: u32, fps: u32) -> f64 {
    if bpm == 0 {
        return 0.0;
    }
    f64::from(fps) * 60.0 / f64::from(bpm)
}

/// Whole-frame distance of a shot length, in frames
#[must_use]
pub fn frame_drift(seconds: f64, fps: u32) -> f64 {
    let frames = seconds * f64::from(fps);
    (frames - frames.round()).abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn beats() {
        assert!((frames_per_beat(120, 30) - 15.0).abs() < f64::EPSILON);
        assert!((frames_per_beat(90, 30) - 20.0).abs() < f64::EPSILON);
        assert!((frames_per_beat(128, 24) - 11.25).abs() < f64::EPSILON);
        assert_eq!(frames_per_beat(0, 30), 0.0);
    }

    #[test]
    fn drift() {
        assert!(frame_drift(1.5, 30) < 1e-9);
        assert!(frame_drift(0.8, 30) < 1e-9);
        assert!((frame_drift(0.51, 30) - 0.3).abs() < 1e-9);
    }
}
