//! Rendering a complete transmission into a [`SampleBuffer`].

use std::fmt::Display;

use crate::{
    GetSampleRate,
    buf::{
        InvalidSampleRate,
        SampleBuffer,
        TryPutError,
    },
    config::{
        CwOptions,
        EncodeOptions,
    },
    modem::{
        morse::{
            MorseError,
            MorsePlan,
            identification_message,
        },
        sstv::{
            DimensionMismatch,
            IDENTIFICATION_GAP,
            ModeSpecification,
            SstvEncoder,
            UnknownMode,
            VisFrame,
            image::FrameBuffer,
            vis::write_trailer,
        },
    },
    source::{
        Oscillator,
        Pulse,
        PulseSink,
    },
};

/// Part of the transmission that was being written when an error occurred.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Vis,
    Scan,
    Trailer,
    Morse,
}

impl Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Vis => write!(f, "VIS header"),
            Self::Scan => write!(f, "image scan"),
            Self::Trailer => write!(f, "trailer"),
            Self::Morse => write!(f, "CW identification"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("sample buffer is full while writing the {stage}")]
    Capacity {
        stage: Stage,
        #[source]
        source: TryPutError,
    },
    #[error(transparent)]
    UnknownMode(#[from] UnknownMode),
    #[error(transparent)]
    DimensionMismatch(#[from] DimensionMismatch),
    #[error(transparent)]
    InvalidSampleRate(#[from] InvalidSampleRate),
    #[error("invalid CW identification")]
    Morse(#[from] MorseError),
}

impl EncodeError {
    fn capacity(stage: Stage) -> impl Fn(TryPutError) -> Self {
        move |source| Self::Capacity { stage, source }
    }
}

/// Owns the sample buffer and oscillator of one transmission.
///
/// The stages are written in call order. After an error the session should be
/// dropped: the buffer holds everything up to the pulse that didn't fit.
#[derive(Clone, Debug)]
pub struct EncodeSession {
    buffer: SampleBuffer,
    oscillator: Oscillator,
}

impl EncodeSession {
    pub fn new(sample_rate: u32) -> Result<Self, EncodeError> {
        Ok(Self::from_buffer(SampleBuffer::new(sample_rate)?))
    }

    pub fn with_capacity(sample_rate: u32, capacity: usize) -> Result<Self, EncodeError> {
        Ok(Self::from_buffer(SampleBuffer::with_capacity(
            sample_rate,
            capacity,
        )?))
    }

    fn from_buffer(buffer: SampleBuffer) -> Self {
        let oscillator = Oscillator::new(buffer.sample_rate());
        Self { buffer, oscillator }
    }

    #[inline]
    pub fn buffer(&self) -> &SampleBuffer {
        &self.buffer
    }

    #[inline]
    pub fn oscillator(&self) -> &Oscillator {
        &self.oscillator
    }

    /// Checks that `frame_buffer` has the resolution of `mode`.
    ///
    /// Nothing is written. Call this before [`write_header`](Self::write_header)
    /// so that a mismatch doesn't leave a header without an image behind.
    pub fn check<F>(frame_buffer: &F, mode: &'static ModeSpecification) -> Result<(), EncodeError>
    where
        F: FrameBuffer,
    {
        SstvEncoder::new(frame_buffer, mode)?;
        Ok(())
    }

    pub fn write_header(&mut self, mode: &ModeSpecification) -> Result<(), EncodeError> {
        let frame = VisFrame::new(mode.vis_code);
        tracing::debug!(vis_code = %mode.vis_code, duration = frame.duration(), "writing VIS header");
        frame.write(&mut *self).map_err(EncodeError::capacity(Stage::Vis))
    }

    /// Fails with [`EncodeError::DimensionMismatch`] before writing any
    /// sample, but after the header. See [`check`](Self::check).
    pub fn write_image<F>(&mut self, frame_buffer: F, mode: &'static ModeSpecification) -> Result<(), EncodeError>
    where
        F: FrameBuffer,
    {
        let encoder = SstvEncoder::new(frame_buffer, mode)?;
        tracing::debug!(mode = mode.name, duration = mode.image_time(), "writing image");
        encoder
            .write_image(&mut *self)
            .map_err(EncodeError::capacity(Stage::Scan))
    }

    pub fn write_trailer(&mut self) -> Result<(), EncodeError> {
        tracing::debug!("writing trailer");
        write_trailer(&mut *self).map_err(EncodeError::capacity(Stage::Trailer))
    }

    /// Writes a pause followed by `SSTV DE <callsign>` in Morse code.
    pub fn write_identification(&mut self, cw: &CwOptions) -> Result<(), EncodeError> {
        let message = identification_message(&cw.callsign)?;
        let plan = MorsePlan::new(&message, cw.wpm, cw.tone)?;
        self.write_morse(&plan)
    }

    pub fn write_morse(&mut self, plan: &MorsePlan) -> Result<(), EncodeError> {
        tracing::debug!(units = plan.units(), duration = plan.duration(), "writing CW identification");
        let capacity = EncodeError::capacity(Stage::Morse);
        self.put_silence(IDENTIFICATION_GAP).map_err(&capacity)?;
        plan.write(&mut *self).map_err(capacity)
    }

    pub fn finish(self) -> SampleBuffer {
        tracing::debug!(
            samples = self.buffer.len(),
            duration = ?self.buffer.duration(),
            "transmission complete"
        );
        self.buffer
    }
}

impl PulseSink for EncodeSession {
    type Error = TryPutError;

    #[inline]
    fn put_pulse(&mut self, pulse: Pulse) -> Result<(), Self::Error> {
        self.oscillator.emit(&mut self.buffer, pulse)?;
        Ok(())
    }
}

impl GetSampleRate for EncodeSession {
    #[inline]
    fn sample_rate(&self) -> u32 {
        self.buffer.sample_rate()
    }
}

/// Renders a complete transmission: VIS header, image, trailer and the
/// optional CW identification.
///
/// All inputs are validated before the first sample is written.
pub fn encode<F>(frame_buffer: F, mode_name: &str, options: &EncodeOptions) -> Result<SampleBuffer, EncodeError>
where
    F: FrameBuffer,
{
    let mode = ModeSpecification::from_name(mode_name).ok_or_else(|| {
        UnknownMode {
            name: mode_name.to_owned(),
        }
    })?;

    let morse = options
        .cw
        .as_ref()
        .map(|cw| -> Result<_, EncodeError> {
            let message = identification_message(&cw.callsign)?;
            tracing::debug!(%message, wpm = cw.wpm, tone = cw.tone, "identification");
            Ok(MorsePlan::new(&message, cw.wpm, cw.tone)?)
        })
        .transpose()?;

    let mut session = EncodeSession::new(options.sample_rate)?;
    let encoder = SstvEncoder::new(frame_buffer, mode)?;

    tracing::debug!(mode = %mode, sample_rate = options.sample_rate, "encoding");
    session.write_header(mode)?;
    encoder
        .write_image(&mut session)
        .map_err(EncodeError::capacity(Stage::Scan))?;
    session.write_trailer()?;
    if let Some(morse) = &morse {
        session.write_morse(morse)?;
    }

    Ok(session.finish())
}
