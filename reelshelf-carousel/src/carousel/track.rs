//! Track model: wraparound decision and the (possibly replicated) strip.

use super::types::Sequence;

/// Copies of the sequence laid end to end when wraparound is active.
pub const WRAP_COPIES: usize = 3;

/// Whether the sequence overflows the viewport and therefore needs the
/// replicated track.
///
/// An unmeasured viewport (zero, negative or non-finite) never wraps.
pub fn needs_wraparound(len: usize, viewport_width: f32, stride: f32) -> bool {
    if len == 0 {
        return false;
    }
    if !viewport_width.is_finite() || viewport_width <= 0.0 {
        return false;
    }
    if !stride.is_finite() || stride <= 0.0 {
        return false;
    }
    len as f32 * stride > viewport_width
}

/// The strip actually positioned and rendered.
///
/// Replication is virtual: the three copies index into the shared sequence
/// with modulo arithmetic instead of cloning items.
#[derive(Debug, Clone)]
pub struct Track<T> {
    sequence: Sequence<T>,
    wraparound: bool,
}

impl<T> Track<T> {
    /// Returns `None` for an empty sequence.
    pub fn build(sequence: &Sequence<T>, wraparound: bool) -> Option<Self> {
        if sequence.is_empty() {
            return None;
        }
        Some(Self {
            sequence: sequence.clone(),
            wraparound,
        })
    }

    pub fn is_wraparound(&self) -> bool {
        self.wraparound
    }

    pub fn copies(&self) -> usize {
        if self.wraparound { WRAP_COPIES } else { 1 }
    }

    pub fn source_len(&self) -> usize {
        self.sequence.len()
    }

    pub fn len(&self) -> usize {
        self.source_len() * self.copies()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn sequence(&self) -> &Sequence<T> {
        &self.sequence
    }

    /// Index into the original sequence for a track slot.
    pub fn source_index(&self, track_index: usize) -> Option<usize> {
        (track_index < self.len()).then(|| track_index % self.source_len())
    }

    pub fn get(&self, track_index: usize) -> Option<&T> {
        self.source_index(track_index)
            .and_then(|index| self.sequence.get(index))
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.sequence.items().iter().cycle().take(self.len())
    }

    /// Width of one copy of the sequence.
    pub fn cycle_width(&self, stride: f32) -> f32 {
        self.source_len() as f32 * stride
    }

    pub fn extent(&self, stride: f32) -> f32 {
        self.len() as f32 * stride
    }
}

impl<T: Clone> Track<T> {
    /// Materialize the track, e.g. for hosts that render every slot.
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraparound_decision_matches_overflow() {
        assert!(!needs_wraparound(2, 800.0, 270.0));
        assert!(needs_wraparound(10, 800.0, 270.0));
        assert!(!needs_wraparound(3, 810.0, 270.0));
        assert!(needs_wraparound(3, 809.0, 270.0));
    }

    #[test]
    fn wraparound_is_pure() {
        for len in [0usize, 1, 3, 10, 57] {
            for width in [0.0f32, 100.0, 800.0, 2700.0, f32::NAN] {
                let first = needs_wraparound(len, width, 270.0);
                let second = needs_wraparound(len, width, 270.0);
                assert_eq!(first, second);
            }
        }
    }

    #[test]
    fn unmeasured_viewport_never_wraps() {
        assert!(!needs_wraparound(50, 0.0, 270.0));
        assert!(!needs_wraparound(50, -10.0, 270.0));
        assert!(!needs_wraparound(50, f32::INFINITY, 270.0));
        assert!(!needs_wraparound(0, 800.0, 270.0));
    }

    #[test]
    fn empty_sequence_has_no_track() {
        let sequence: Sequence<u32> = Sequence::empty();
        assert!(Track::build(&sequence, true).is_none());
    }

    #[test]
    fn wrapped_track_is_three_concatenated_copies() {
        let sequence = Sequence::new(vec!['a', 'b', 'c']);
        let track = Track::build(&sequence, true).unwrap();
        assert_eq!(track.len(), 9);
        assert_eq!(track.to_vec(), "abcabcabc".chars().collect::<Vec<_>>());
        assert_eq!(track.source_index(7), Some(1));
        assert_eq!(track.get(9), None);
        assert_eq!(track.cycle_width(10.0), 30.0);
        assert_eq!(track.extent(10.0), 90.0);
    }

    #[test]
    fn bounded_track_is_the_sequence() {
        let sequence = Sequence::new(vec![1, 2]);
        let track = Track::build(&sequence, false).unwrap();
        assert_eq!(track.to_vec(), vec![1, 2]);
        assert_eq!(track.source_index(2), None);
        assert!(track.sequence().same_identity(&sequence));
    }
}
