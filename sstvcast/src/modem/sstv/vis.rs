//! VIS header and trailer.

use crate::{
    modem::sstv::{
        CHANNEL_HIGH_TONE,
        SYNC_TONE,
        modes::VisCode,
        state::header_states,
    },
    source::{
        Pulse,
        PulseSink,
        total_duration,
    },
};

/// The tones that announce an image of a given mode.
#[derive(Clone, Debug, PartialEq)]
pub struct VisFrame {
    vis_code: VisCode,
    pulses: Vec<Pulse>,
}

impl VisFrame {
    pub fn new(vis_code: VisCode) -> Self {
        let pulses = header_states()
            .map(|state| {
                let pulse = state.pulse(vis_code);
                tracing::trace!(?state, frequency = pulse.frequency, duration = pulse.duration);
                pulse
            })
            .collect();
        Self { vis_code, pulses }
    }

    #[inline]
    pub fn vis_code(&self) -> VisCode {
        self.vis_code
    }

    #[inline]
    pub fn pulses(&self) -> &[Pulse] {
        &self.pulses
    }

    /// Nominal duration in seconds.
    pub fn duration(&self) -> f64 {
        total_duration(&self.pulses)
    }

    pub fn write<S>(&self, mut sink: S) -> Result<(), S::Error>
    where
        S: PulseSink,
    {
        for pulse in &self.pulses {
            sink.put_pulse(*pulse)?;
        }
        Ok(())
    }
}

/// Sent after the last scan line.
pub const TRAILER: [Pulse; 5] = [
    Pulse::new(CHANNEL_HIGH_TONE, 0.300),
    Pulse::new(SYNC_TONE, 0.010),
    Pulse::new(CHANNEL_HIGH_TONE, 0.100),
    Pulse::new(SYNC_TONE, 0.030),
    Pulse::silence(0.500),
];

pub fn write_trailer<S>(mut sink: S) -> Result<(), S::Error>
where
    S: PulseSink,
{
    for pulse in TRAILER {
        sink.put_pulse(pulse)?;
    }
    Ok(())
}
