//! The sample buffer that holds a complete rendered transmission.

use std::time::Duration;

use crate::GetSampleRate;

/// Highest sample rate an encode session accepts.
pub const MAX_SAMPLE_RATE: u32 = 48000;

/// Lowest sample rate an encode session accepts.
pub const MIN_SAMPLE_RATE: u32 = 8000;

/// Longest transmission a default-sized buffer can hold.
pub const MAX_DURATION: Duration = Duration::from_secs(1200);

/// Sample value of silence. Every tone oscillates symmetrically around it.
pub const CENTER: u16 = 0x8000;

/// Default capacity in samples: [`MAX_DURATION`] at [`MAX_SAMPLE_RATE`].
pub const DEFAULT_CAPACITY: usize = MAX_DURATION.as_secs() as usize * MAX_SAMPLE_RATE as usize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("sample rate of {sample_rate} Hz is outside of {min}..={max} Hz", min = MIN_SAMPLE_RATE, max = MAX_SAMPLE_RATE)]
pub struct InvalidSampleRate {
    pub sample_rate: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("Tried to write {write_length} samples into a buffer with {available} space left.")]
pub struct TryPutError {
    pub write_length: usize,
    pub available: usize,
}

/// Unsigned, DC-biased 16 bit mono PCM.
///
/// The buffer has a fixed logical capacity. Memory is only allocated as
/// samples are written, but a write that would cross the capacity fails as a
/// whole and leaves the buffer untouched.
#[derive(Clone, PartialEq, Eq, derive_more::Debug)]
pub struct SampleBuffer {
    #[debug(skip)]
    samples: Vec<u16>,
    capacity: usize,
    sample_rate: u32,
}

impl SampleBuffer {
    pub fn new(sample_rate: u32) -> Result<Self, InvalidSampleRate> {
        Self::with_capacity(sample_rate, DEFAULT_CAPACITY)
    }

    /// Fails for sample rates outside of
    /// [`MIN_SAMPLE_RATE`]`..=`[`MAX_SAMPLE_RATE`].
    pub fn with_capacity(sample_rate: u32, capacity: usize) -> Result<Self, InvalidSampleRate> {
        if !(MIN_SAMPLE_RATE..=MAX_SAMPLE_RATE).contains(&sample_rate) {
            return Err(InvalidSampleRate { sample_rate });
        }

        Ok(Self {
            samples: vec![],
            capacity,
            sample_rate,
        })
    }

    #[inline]
    pub fn samples(&self) -> &[u16] {
        &self.samples
    }

    /// Write cursor, i.e. the number of samples written so far.
    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.capacity - self.samples.len()
    }

    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.samples.len() as f64 / f64::from(self.sample_rate))
    }

    /// Payload size in bytes when serialized as 16 bit samples.
    #[inline]
    pub fn data_len_bytes(&self) -> usize {
        self.samples.len() * size_of::<u16>()
    }

    /// Samples in two's complement, as containers store them.
    pub fn signed_samples(&self) -> impl ExactSizeIterator<Item = i16> + '_ {
        self.samples.iter().map(|sample| to_signed(*sample))
    }

    /// Appends `write_length` samples produced by `fill`.
    ///
    /// The capacity is checked before `fill` is called for the first time, so
    /// on error nothing has been written and `fill` was never invoked.
    pub fn try_put_with(
        &mut self,
        write_length: usize,
        mut fill: impl FnMut(usize) -> u16,
    ) -> Result<(), TryPutError> {
        let available = self.remaining();
        if write_length > available {
            return Err(TryPutError {
                write_length,
                available,
            });
        }

        self.samples.reserve(write_length);
        self.samples.extend((0..write_length).map(&mut fill));
        Ok(())
    }

    pub fn try_put_slice(&mut self, samples: &[u16]) -> Result<(), TryPutError> {
        self.try_put_with(samples.len(), |i| samples[i])
    }
}

impl GetSampleRate for SampleBuffer {
    #[inline]
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

/// Converts a biased sample to two's complement.
#[inline]
pub fn to_signed(sample: u16) -> i16 {
    (i32::from(sample) - i32::from(CENTER)) as i16
}
