//! Audio Interchange File Format, big-endian PCM.

use std::io::Write;

use bytes::BufMut;

use crate::{
    buf::SampleBuffer,
    sink::{
        ContainerHeader,
        Error,
        raw::write_samples_be,
    },
};

pub const HEADER_LEN: usize = 54;

const COMM_LEN: u32 = 18;

/// Encodes an integer as an 80 bit IEEE 754 extended precision float, as used
/// for the sample rate in the COMM chunk.
pub fn encode_extended(value: u32) -> [u8; 10] {
    let mut bytes = [0; 10];
    if value == 0 {
        return bytes;
    }

    let leading_zeros = value.leading_zeros();
    let exponent = 16383 + 31 - leading_zeros as u16;
    let mantissa = u64::from(value) << (32 + leading_zeros);

    let mut buf = &mut bytes[..];
    buf.put_u16(exponent);
    buf.put_u64(mantissa);
    bytes
}

pub fn write<W>(header: &ContainerHeader, buffer: &SampleBuffer, mut writer: W) -> Result<(), Error>
where
    W: Write,
{
    let mut head = Vec::<u8>::with_capacity(HEADER_LEN);

    head.put_slice(b"FORM");
    head.put_u32(46 + header.data_len);
    head.put_slice(b"AIFF");

    head.put_slice(b"COMM");
    head.put_u32(COMM_LEN);
    head.put_u16(header.channels);
    head.put_u32(header.num_frames);
    head.put_u16(header.bits_per_sample);
    head.put_slice(&encode_extended(header.sample_rate));

    head.put_slice(b"SSND");
    head.put_u32(8 + header.data_len);
    // offset, block size
    head.put_u32(0);
    head.put_u32(0);

    debug_assert_eq!(head.len(), HEADER_LEN);
    writer.write_all(&head)?;
    write_samples_be(buffer, &mut writer)?;
    Ok(())
}
