//! Posture classifier.
//!
//! Judges one frame's segment list: no segments means the posture cannot be
//! confirmed, otherwise only the FIRST segment is consulted and its tilt from
//! horizontal is compared against a fixed threshold. There is no ranking among
//! candidate segments and no smoothing across frames; every frame is judged
//! independently.

use crate::lines::LineSegment;

/// Tilt threshold in degrees below which the shoulder line counts as level.
pub const DEFAULT_MAX_TILT_DEGREES: f32 = 10.0;

/// Binary per-frame classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PostureLabel {
    Good,
    NeedsCorrection,
}

/// Classify a frame from its detected segments.
///
/// Pure function of the input slice: empty input is `NeedsCorrection`,
/// otherwise `Good` iff the first segment's absolute angle from horizontal is
/// strictly below `max_tilt_degrees`.
pub fn classify(segments: &[LineSegment], max_tilt_degrees: f32) -> PostureLabel {
    let Some(first) = segments.first() else {
        return PostureLabel::NeedsCorrection;
    };
    if first.angle_degrees().abs() < max_tilt_degrees {
        PostureLabel::Good
    } else {
        PostureLabel::NeedsCorrection
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(x1: i32, y1: i32, x2: i32, y2: i32) -> LineSegment {
        LineSegment::new(x1, y1, x2, y2)
    }

    #[test]
    fn empty_list_needs_correction() {
        assert_eq!(
            classify(&[], DEFAULT_MAX_TILT_DEGREES),
            PostureLabel::NeedsCorrection
        );
    }

    #[test]
    fn level_segment_is_good() {
        let segments = [seg(0, 0, 100, 0)];
        assert_eq!(
            classify(&segments, DEFAULT_MAX_TILT_DEGREES),
            PostureLabel::Good
        );
    }

    #[test]
    fn steep_segment_needs_correction() {
        let segments = [seg(0, 0, 100, 100)];
        assert_eq!(
            classify(&segments, DEFAULT_MAX_TILT_DEGREES),
            PostureLabel::NeedsCorrection
        );
    }

    #[test]
    fn threshold_boundary_is_strict() {
        // atan2(17, 100) ~ 9.65 degrees: just under.
        let under = [seg(0, 0, 100, 17)];
        assert_eq!(
            classify(&under, DEFAULT_MAX_TILT_DEGREES),
            PostureLabel::Good
        );

        // atan2(18, 100) ~ 10.2 degrees: just over.
        let over = [seg(0, 0, 100, 18)];
        assert_eq!(
            classify(&over, DEFAULT_MAX_TILT_DEGREES),
            PostureLabel::NeedsCorrection
        );
    }

    #[test]
    fn classification_is_idempotent() {
        let segments = [seg(0, 0, 100, 17)];
        let first = classify(&segments, DEFAULT_MAX_TILT_DEGREES);
        let second = classify(&segments, DEFAULT_MAX_TILT_DEGREES);
        assert_eq!(first, second);
    }

    #[test]
    fn only_first_segment_is_consulted() {
        let level_first = [seg(0, 0, 100, 0), seg(0, 0, 100, 100), seg(0, 0, 0, 50)];
        assert_eq!(
            classify(&level_first, DEFAULT_MAX_TILT_DEGREES),
            PostureLabel::Good
        );

        let steep_first = [seg(0, 0, 100, 100), seg(0, 0, 100, 0)];
        assert_eq!(
            classify(&steep_first, DEFAULT_MAX_TILT_DEGREES),
            PostureLabel::NeedsCorrection
        );
    }

    #[test]
    fn downward_tilt_is_judged_by_magnitude() {
        let segments = [seg(0, 0, 100, -18)];
        assert_eq!(
            classify(&segments, DEFAULT_MAX_TILT_DEGREES),
            PostureLabel::NeedsCorrection
        );
    }
}
