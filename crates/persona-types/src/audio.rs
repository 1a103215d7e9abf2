//! Microphone capture parameters.
//!
//! Persona does not capture audio itself. These values are published for the
//! external capture component so both sides agree on the stream shape and on
//! when an utterance starts and ends.

use std::time::Duration;

/// PCM sample encoding of captured audio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleFormat {
    /// Signed 16-bit little-endian samples.
    Int16,
}

impl SampleFormat {
    pub fn bits_per_sample(&self) -> u16 {
        match self {
            SampleFormat::Int16 => 16,
        }
    }
}

/// Capture stream shape and silence-detection thresholds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AudioCaptureConfig {
    pub format: SampleFormat,
    pub channels: u16,
    /// Samples per second, in Hertz.
    pub sample_rate: u32,
    /// Samples per read from the device.
    pub chunk_size: u32,
    /// Mean absolute amplitude below which a chunk counts as silence.
    pub silence_threshold: u32,
    /// Continuous silence that ends a recording.
    pub silence_duration: Duration,
    /// Audio retained from before speech was detected.
    pub pre_speech_buffer: Duration,
}

impl AudioCaptureConfig {
    /// The fixed capture parameters.
    pub const DEFAULT: AudioCaptureConfig = AudioCaptureConfig {
        format: SampleFormat::Int16,
        channels: 1,
        sample_rate: 44_100,
        chunk_size: 1024,
        silence_threshold: 200,
        silence_duration: Duration::from_secs(2),
        pre_speech_buffer: Duration::from_millis(500),
    };

    /// Number of device reads per second of audio.
    pub fn chunks_per_second(&self) -> f64 {
        self.sample_rate as f64 / self.chunk_size as f64
    }

    /// Chunks of continuous silence needed to end a recording (rounded up).
    pub fn silence_chunks(&self) -> usize {
        self.chunks_for(self.silence_duration)
    }

    /// Chunks kept in the pre-speech ring buffer (rounded up).
    pub fn pre_speech_chunks(&self) -> usize {
        self.chunks_for(self.pre_speech_buffer)
    }

    fn chunks_for(&self, duration: Duration) -> usize {
        (duration.as_secs_f64() * self.chunks_per_second()).ceil() as usize
    }
}

impl Default for AudioCaptureConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = AudioCaptureConfig::default();
        assert_eq!(config.format, SampleFormat::Int16);
        assert_eq!(config.format.bits_per_sample(), 16);
        assert_eq!(config.channels, 1);
        assert_eq!(config.sample_rate, 44_100);
        assert_eq!(config.chunk_size, 1024);
        assert_eq!(config.silence_threshold, 200);
        assert_eq!(config.silence_duration, Duration::from_secs(2));
        assert_eq!(config.pre_speech_buffer, Duration::from_millis(500));
    }

    #[test]
    fn test_chunk_counts_round_up() {
        let config = AudioCaptureConfig::DEFAULT;
        // 2s * 44100 / 1024 = 86.13
        assert_eq!(config.silence_chunks(), 87);
        // 0.5s * 44100 / 1024 = 21.53
        assert_eq!(config.pre_speech_chunks(), 22);
    }
}
