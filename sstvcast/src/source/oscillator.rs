use std::f64::consts::TAU;

use crate::{
    GetSampleRate,
    buf::{
        CENTER,
        SampleBuffer,
        TryPutError,
    },
    source::{
        Envelope,
        Pulse,
    },
};

/// Default peak deviation from [`CENTER`]: 65 % of full scale.
pub const AMPLITUDE: f64 = 21298.0;

#[inline]
fn step_from_frequency_and_sample_rate(frequency: f64, sample_rate: f64) -> f64 {
    (TAU * frequency / sample_rate).rem_euclid(TAU)
}

#[inline]
fn sample_value(phase: f64, amplitude: f64) -> u16 {
    (f64::from(CENTER) + phase.sin() * amplitude)
        .round()
        .clamp(0.0, f64::from(u16::MAX)) as u16
}

/// Phase-continuous sine generator.
///
/// Neither the phase nor the timing error is ever reset between pulses: the
/// phase carries over so that tone boundaries don't click, and the fractional
/// sample left over by one pulse is credited to the next one, so that the
/// total length of any pulse sequence is within half a sample of its nominal
/// length.
#[derive(Clone, Copy, Debug)]
pub struct Oscillator {
    sample_rate: u32,
    amplitude: f64,
    phase: f64,
    time_debt: f64,
}

impl Oscillator {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            amplitude: AMPLITUDE,
            phase: 0.0,
            time_debt: 0.0,
        }
    }

    pub fn with_amplitude(mut self, amplitude: f64) -> Self {
        self.amplitude = amplitude.clamp(0.0, f64::from(i16::MAX));
        self
    }

    #[inline]
    pub fn phase(&self) -> f64 {
        self.phase
    }

    /// Fractional samples owed to (positive) or borrowed from (negative) the
    /// next pulse.
    #[inline]
    pub fn time_debt(&self) -> f64 {
        self.time_debt
    }

    /// Number of samples the next pulse of `duration` seconds will produce,
    /// and the time debt left after it.
    pub fn num_samples(&self, duration: f64) -> (usize, f64) {
        debug_assert!(duration >= 0.0, "negative pulse duration: {duration}");
        let exact = duration * f64::from(self.sample_rate) + self.time_debt;
        let num_samples = exact.round().max(0.0);
        (num_samples as usize, exact - num_samples)
    }

    /// Appends `pulse` to `buffer` and returns the number of samples written.
    ///
    /// If the buffer can't hold the whole pulse, nothing is written and the
    /// oscillator state is unchanged.
    pub fn emit(&mut self, buffer: &mut SampleBuffer, pulse: Pulse) -> Result<usize, TryPutError> {
        let (num_samples, time_debt) = self.num_samples(pulse.duration);

        if pulse.is_silence() {
            buffer.try_put_with(num_samples, |_| CENTER)?;
        }
        else {
            let sample_rate = f64::from(self.sample_rate);
            let step = step_from_frequency_and_sample_rate(pulse.frequency, sample_rate);
            let ramp_samples = pulse.envelope.ramp_samples(sample_rate, num_samples);
            let amplitude = self.amplitude;
            let mut phase = self.phase;

            buffer.try_put_with(num_samples, |i| {
                let gain = Envelope::gain(i, num_samples, ramp_samples);
                let sample = sample_value(phase, amplitude * gain);
                phase += step;
                if phase > TAU {
                    phase -= TAU;
                }
                sample
            })?;

            self.phase = phase;
        }

        self.time_debt = time_debt;
        Ok(num_samples)
    }
}

impl GetSampleRate for Oscillator {
    #[inline]
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}
