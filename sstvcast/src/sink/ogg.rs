//! Ogg Vorbis, encoded with libvorbis.
//!
//! Lossy, so the decoded samples only approximate the buffer. The number of
//! samples is preserved.

use std::{
    io::Write,
    num::{
        NonZeroU8,
        NonZeroU32,
    },
};

use vorbis_rs::VorbisEncoderBuilder;

use crate::{
    buf::SampleBuffer,
    sink::{
        ContainerHeader,
        Error,
    },
};

/// Fixed stream serial, so that encoding the same buffer twice gives the same
/// file.
const STREAM_SERIAL: i32 = 0x5353_5456;

/// Samples handed to the encoder at once.
const BLOCK_LEN: usize = 4096;

pub fn write<W>(header: &ContainerHeader, buffer: &SampleBuffer, writer: W) -> Result<(), Error>
where
    W: Write,
{
    let sample_rate = NonZeroU32::new(header.sample_rate).ok_or(Error::SampleRate {
        sample_rate: header.sample_rate,
    })?;

    let mut encoder =
        VorbisEncoderBuilder::new_with_serial(sample_rate, NonZeroU8::MIN, writer, STREAM_SERIAL)
            .build()?;

    let mut block = Vec::with_capacity(BLOCK_LEN);
    let mut samples = buffer.signed_samples();
    loop {
        block.clear();
        block.extend(
            samples
                .by_ref()
                .take(BLOCK_LEN)
                .map(|sample| f32::from(sample) / 32768.0),
        );
        if block.is_empty() {
            break;
        }
        encoder.encode_audio_block([block.as_slice()])?;
    }

    encoder.finish()?;
    Ok(())
}
