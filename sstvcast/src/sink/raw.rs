use std::io::Write;

use bytes::BufMut;

use crate::buf::SampleBuffer;

/// Samples encoded per write.
const CHUNK_SIZE: usize = 4096;

/// Writes the samples as big-endian two's complement.
pub fn write_samples_be<W>(buffer: &SampleBuffer, mut writer: W) -> Result<(), std::io::Error>
where
    W: Write,
{
    let mut chunk = Vec::<u8>::with_capacity(CHUNK_SIZE * 2);
    let mut samples = buffer.signed_samples().peekable();

    while samples.peek().is_some() {
        chunk.clear();
        for sample in samples.by_ref().take(CHUNK_SIZE) {
            chunk.put_i16(sample);
        }
        writer.write_all(&chunk)?;
    }

    Ok(())
}
