mod oscillator;

use std::convert::Infallible;

pub use self::oscillator::{
    AMPLITUDE,
    Oscillator,
};

/// A single tone: `frequency` Hz for `duration` seconds.
///
/// A frequency of 0 is silence.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pulse {
    pub frequency: f64,
    pub duration: f64,
    pub envelope: Envelope,
}

impl Pulse {
    #[inline]
    pub const fn new(frequency: f64, duration: f64) -> Self {
        Self {
            frequency,
            duration,
            envelope: Envelope::Rectangular,
        }
    }

    #[inline]
    pub const fn silence(duration: f64) -> Self {
        Self::new(0.0, duration)
    }

    #[inline]
    pub const fn with_envelope(mut self, envelope: Envelope) -> Self {
        self.envelope = envelope;
        self
    }

    #[inline]
    pub fn is_silence(&self) -> bool {
        self.frequency == 0.0
    }
}

/// Amplitude envelope applied to a pulse.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Envelope {
    #[default]
    Rectangular,

    /// Raised-cosine ramps of `ramp` seconds at both ends. The ramps are
    /// shortened to half the pulse if the pulse is too short for them.
    Hann { ramp: f64 },
}

impl Envelope {
    /// Ramp length in samples for a pulse of `num_samples` samples.
    pub fn ramp_samples(&self, sample_rate: f64, num_samples: usize) -> usize {
        match self {
            Self::Rectangular => 0,
            Self::Hann { ramp } => ((ramp * sample_rate).round() as usize).min(num_samples / 2),
        }
    }

    /// Gain of sample `index` in a pulse of `num_samples` samples with
    /// `ramp_samples` long ramps.
    ///
    /// The first and last sample of a ramped pulse have gain 0.
    pub fn gain(index: usize, num_samples: usize, ramp_samples: usize) -> f64 {
        if ramp_samples == 0 {
            return 1.0;
        }

        let from_edge = index.min(num_samples - 1 - index);
        if from_edge >= ramp_samples {
            1.0
        }
        else {
            let t = from_edge as f64 / ramp_samples as f64;
            0.5 * (1.0 - (std::f64::consts::PI * t).cos())
        }
    }
}

/// Something that consumes pulses, e.g. an oscillator writing into a sample
/// buffer, or a `Vec` recording the tone plan.
pub trait PulseSink {
    type Error;

    fn put_pulse(&mut self, pulse: Pulse) -> Result<(), Self::Error>;

    #[inline]
    fn put_tone(&mut self, frequency: f64, duration: f64) -> Result<(), Self::Error> {
        self.put_pulse(Pulse::new(frequency, duration))
    }

    #[inline]
    fn put_silence(&mut self, duration: f64) -> Result<(), Self::Error> {
        self.put_pulse(Pulse::silence(duration))
    }
}

impl<T> PulseSink for &mut T
where
    T: PulseSink,
{
    type Error = T::Error;

    #[inline]
    fn put_pulse(&mut self, pulse: Pulse) -> Result<(), Self::Error> {
        (**self).put_pulse(pulse)
    }
}

impl PulseSink for Vec<Pulse> {
    type Error = Infallible;

    #[inline]
    fn put_pulse(&mut self, pulse: Pulse) -> Result<(), Self::Error> {
        self.push(pulse);
        Ok(())
    }
}

/// Total duration of a sequence of pulses in seconds.
pub fn total_duration<'a>(pulses: impl IntoIterator<Item = &'a Pulse>) -> f64 {
    pulses.into_iter().map(|pulse| pulse.duration).sum()
}
