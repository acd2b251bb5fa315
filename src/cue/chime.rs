//! Tone schedule and sample synthesis for the completion chime

use std::{f64::consts::TAU, time::Duration};

/// Output sample rate for rendered chimes
pub const SAMPLE_RATE: u32 = 44_100;

/// C5, E5, G5
pub const CHIME_FREQUENCIES_HZ: [f64; 3] = [523.25, 659.25, 783.99];
pub const TONE_SECONDS: f64 = 0.15;
pub const GAP_SECONDS: f64 = 0.1;
pub const ATTACK_SECONDS: f64 = 0.01;
pub const RELEASE_SECONDS: f64 = 0.05;
pub const PEAK_GAIN: f64 = 0.3;

/// A single sine tone placed on the chime timeline
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub frequency_hz: f64,
    /// Offset from the start of the chime
    pub start_seconds: f64,
    pub duration_seconds: f64,
}

impl Tone {
    pub fn end_seconds(&self) -> f64 {
        self.start_seconds + self.duration_seconds
    }

    /// Envelope gain at `t` seconds into the chime.
    ///
    /// Linear attack to [`PEAK_GAIN`], flat sustain, then a linear release
    /// reaching silence exactly at the end of the tone.
    pub fn gain_at(&self, t: f64) -> f64 {
        let local = t - self.start_seconds;
        let release_start = self.duration_seconds - RELEASE_SECONDS;

        if local < 0.0 || local >= self.duration_seconds {
            0.0
        } else if local < ATTACK_SECONDS {
            PEAK_GAIN * local / ATTACK_SECONDS
        } else if local < release_start {
            PEAK_GAIN
        } else {
            PEAK_GAIN * (self.duration_seconds - local) / RELEASE_SECONDS
        }
    }

    /// Envelope-shaped oscillator output at `t` seconds into the chime
    pub fn sample_at(&self, t: f64) -> f64 {
        let gain = self.gain_at(t);
        if gain == 0.0 {
            return 0.0;
        }
        gain * (TAU * self.frequency_hz * (t - self.start_seconds)).sin()
    }
}

/// The ascending three-tone completion chime
#[derive(Debug, Clone, PartialEq)]
pub struct Chime {
    tones: Vec<Tone>,
}

impl Chime {
    pub fn new(tones: Vec<Tone>) -> Self {
        Self { tones }
    }

    /// Tone `k` starts at `k * (TONE_SECONDS + GAP_SECONDS)`
    pub fn completion() -> Self {
        let tones = CHIME_FREQUENCIES_HZ
            .iter()
            .enumerate()
            .map(|(index, &frequency_hz)| Tone {
                frequency_hz,
                start_seconds: index as f64 * (TONE_SECONDS + GAP_SECONDS),
                duration_seconds: TONE_SECONDS,
            })
            .collect();
        Self::new(tones)
    }

    pub fn tones(&self) -> &[Tone] {
        &self.tones
    }

    /// Time at which the last fade-out reaches silence
    pub fn total_seconds(&self) -> f64 {
        self.tones.iter().map(Tone::end_seconds).fold(0.0, f64::max)
    }

    pub fn total_duration(&self) -> Duration {
        Duration::from_secs_f64(self.total_seconds())
    }

    /// Render mono `f32` samples in `[-PEAK_GAIN, PEAK_GAIN]`
    pub fn render(&self, sample_rate: u32) -> Vec<f32> {
        let rate = f64::from(sample_rate);
        let frames = (self.total_seconds() * rate).ceil() as usize;

        (0..frames)
            .map(|frame| {
                let t = frame as f64 / rate;
                let mixed: f64 = self.tones.iter().map(|tone| tone.sample_at(t)).sum();
                mixed as f32
            })
            .collect()
    }

    /// Render signed 16-bit little-endian mono PCM
    pub fn render_pcm_s16le(&self, sample_rate: u32) -> Vec<u8> {
        self.render(sample_rate)
            .into_iter()
            .flat_map(|sample| {
                let clamped = sample.clamp(-1.0, 1.0);
                ((clamped * f32::from(i16::MAX)) as i16).to_le_bytes()
            })
            .collect()
    }
}

impl Default for Chime {
    fn default() -> Self {
        Self::completion()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_tone_schedule() {
        let chime = Chime::completion();
        let starts: Vec<f64> = chime.tones().iter().map(|t| t.start_seconds).collect();
        assert_eq!(chime.tones().len(), 3);
        assert!(approx(starts[0], 0.0));
        assert!(approx(starts[1], 0.25));
        assert!(approx(starts[2], 0.5));
        assert!(chime
            .tones()
            .windows(2)
            .all(|pair| pair[0].frequency_hz < pair[1].frequency_hz));
    }

    #[test]
    fn test_total_length_ends_with_last_release() {
        let chime = Chime::completion();
        assert!(approx(chime.total_seconds(), 0.65));
        assert_eq!(chime.total_duration(), Duration::from_secs_f64(0.65));
    }

    #[test]
    fn test_envelope_points() {
        let tone = Chime::completion().tones()[1];
        let at = |offset: f64| tone.gain_at(tone.start_seconds + offset);

        assert!(approx(at(-0.001), 0.0));
        assert!(approx(at(0.0), 0.0));
        assert!(approx(at(0.005), 0.15));
        assert!(approx(at(0.01), PEAK_GAIN));
        assert!(approx(at(0.05), PEAK_GAIN));
        assert!(approx(at(0.125), 0.15));
        assert!(approx(at(0.15), 0.0));
        assert!(approx(at(0.2), 0.0));
    }

    #[test]
    fn test_gap_is_silent() {
        let chime = Chime::completion();
        let t = 0.2;
        assert!(chime.tones().iter().all(|tone| tone.sample_at(t) == 0.0));
    }

    #[test]
    fn test_render_length_and_peak() {
        let chime = Chime::completion();
        let samples = chime.render(8_000);
        assert_eq!(samples.len(), 5_200);
        let peak = samples.iter().fold(0.0_f32, |acc, s| acc.max(s.abs()));
        assert!(peak > 0.25);
        assert!(f64::from(peak) <= PEAK_GAIN + 1e-6);
    }

    #[test]
    fn test_pcm_is_two_bytes_per_sample() {
        let chime = Chime::completion();
        let pcm = chime.render_pcm_s16le(8_000);
        assert_eq!(pcm.len(), 5_200 * 2);
        assert_eq!(&pcm[..2], &[0, 0]);
    }
}
