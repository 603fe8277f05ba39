use std::io::{
    Seek,
    Write,
};

use crate::{
    buf::SampleBuffer,
    sink::{
        ContainerHeader,
        Error,
    },
};

#[inline]
fn spec(header: &ContainerHeader) -> hound::WavSpec {
    hound::WavSpec {
        channels: header.channels,
        sample_rate: header.sample_rate,
        bits_per_sample: header.bits_per_sample,
        sample_format: hound::SampleFormat::Int,
    }
}

pub fn write<W>(header: &ContainerHeader, buffer: &SampleBuffer, writer: W) -> Result<(), Error>
where
    W: Write + Seek,
{
    let mut writer = hound::WavWriter::new(writer, spec(header))?;

    let mut samples = writer.get_i16_writer(header.num_frames);
    for sample in buffer.signed_samples() {
        samples.write_sample(sample);
    }
    samples.flush()?;

    writer.finalize()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use crate::{
        buf::{
            CENTER,
            SampleBuffer,
        },
        sink::{
            ContainerFormat,
            write_container,
        },
    };

    #[test]
    fn reads_back_with_hound() {
        let mut buffer = SampleBuffer::new(22050).unwrap();
        buffer
            .try_put_slice(&[CENTER, 0, u16::MAX, CENTER + 1000])
            .unwrap();

        let mut cursor = Cursor::new(Vec::<u8>::new());
        write_container(&buffer, ContainerFormat::Wav, &mut cursor).unwrap();

        let bytes = cursor.into_inner();
        assert_eq!(&bytes[0..4], b"RIFF");
        assert_eq!(u32::from_le_bytes(bytes[4..8].try_into().unwrap()), 36 + 8);
        assert_eq!(&bytes[36..40], b"data");
        assert_eq!(u32::from_le_bytes(bytes[40..44].try_into().unwrap()), 8);

        let mut reader = hound::WavReader::new(Cursor::new(bytes)).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.sample_rate, 22050);
        assert_eq!(spec.bits_per_sample, 16);
        let samples = reader
            .samples::<i16>()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(samples, vec![0, i16::MIN, i16::MAX, 1000]);
    }
}
