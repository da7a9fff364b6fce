//! i16 PCM → f32 in [-1.0, 1.0).

use super::format::NormalizedBuffer;

const I16_SCALE: f32 = 32768.0;

#[inline]
pub fn normalize_sample(sample: i16) -> f32 {
    sample as f32 / I16_SCALE
}

/// Convert a whole track. Output length always equals input length.
pub fn normalize(samples: &[i16], sample_rate: u32) -> NormalizedBuffer {
    NormalizedBuffer {
        sample_rate,
        samples: samples.iter().copied().map(normalize_sample).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_values() {
        assert_eq!(normalize_sample(16384), 0.5);
        assert_eq!(normalize_sample(-32768), -1.0);
        assert_eq!(normalize_sample(0), 0.0);
    }

    #[test]
    fn full_range_stays_in_bounds() {
        let all: Vec<i16> = (i16::MIN..=i16::MAX).collect();
        let buf = normalize(&all, 8000);
        assert_eq!(buf.len(), all.len());
        assert_eq!(buf.sample_rate, 8000);
        assert!(buf.samples.iter().all(|s| (-1.0..1.0).contains(s)));
    }

    #[test]
    fn empty_input_gives_empty_buffer() {
        assert!(normalize(&[], 44100).is_empty());
    }
}
