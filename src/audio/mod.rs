//! Audio types, assembly, and file I/O.

pub mod assembler;
pub mod codec;

/// A mono PCM audio buffer.
#[derive(Debug, Clone)]
pub struct AudioBuffer {
    /// Audio samples in the [-1.0, 1.0] range.
    pub samples: Vec<f32>,
    /// Sample rate in Hz.
    pub sample_rate: u32,
}

impl AudioBuffer {
    /// Create a new audio buffer.
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check if the buffer holds no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_duration() {
        let buffer = AudioBuffer::new(vec![0.0; 24000], 24000);
        assert!((buffer.duration_secs() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_buffer_len() {
        let buffer = AudioBuffer::new(vec![0.1, -0.2, 0.3], 24000);
        assert_eq!(buffer.len(), 3);
        assert!(!buffer.is_empty());
        assert!(AudioBuffer::new(Vec::new(), 24000).is_empty());
    }
}
