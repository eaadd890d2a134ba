use super::pcm::PcmAudio;
use std::time::Duration;

/// Pause inserted between consecutive segments
pub const DEFAULT_SEGMENT_SILENCE: Duration = Duration::from_millis(500);

/// Stitches per-segment PCM into one continuous track.
#[derive(Debug, Clone)]
pub struct AudioAssembler {
    silence: Duration,
}

impl Default for AudioAssembler {
    fn default() -> Self {
        Self::new(DEFAULT_SEGMENT_SILENCE)
    }
}

impl AudioAssembler {
    pub fn new(silence: Duration) -> Self {
        Self { silence }
    }

    pub fn silence(&self) -> Duration {
        self.silence
    }

    /// Concatenate segments in order with a silence gap between each adjacent pair.
    ///
    /// All inputs are expected to share one PCM format; the first segment's format is used.
    /// No segments give empty audio and a single segment is returned untouched.
    pub fn merge(&self, mut segments: Vec<PcmAudio>) -> PcmAudio {
        match segments.len() {
            0 => return PcmAudio::empty(),
            1 => return segments.remove(0),
            _ => {}
        }

        let spec = segments[0].spec();
        let gap = spec.bytes_for(self.silence);
        let total = segments.iter().map(PcmAudio::len).sum::<usize>() + gap * (segments.len() - 1);

        let mut merged = Vec::with_capacity(total);
        for (index, segment) in segments.into_iter().enumerate() {
            if index > 0 {
                merged.resize(merged.len() + gap, 0);
            }
            merged.extend_from_slice(segment.data());
        }

        tracing::debug!(
            total_bytes = merged.len(),
            gap_bytes = gap,
            "PCM segments merged"
        );

        PcmAudio::new(spec, merged)
    }
}
