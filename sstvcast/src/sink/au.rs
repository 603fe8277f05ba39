//! Sun/NeXT audio (`.au`, `.snd`).

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

pub const HEADER_LEN: usize = 24;

const MAGIC: &[u8; 4] = b".snd";

/// 16 bit linear PCM
const ENCODING_LINEAR_16: u32 = 3;

pub fn write<W>(header: &ContainerHeader, buffer: &SampleBuffer, mut writer: W) -> Result<(), Error>
where
    W: Write,
{
    let mut head = Vec::<u8>::with_capacity(HEADER_LEN);
    head.put_slice(MAGIC);
    head.put_u32(HEADER_LEN as u32);
    head.put_u32(header.data_len);
    head.put_u32(ENCODING_LINEAR_16);
    head.put_u32(header.sample_rate);
    head.put_u32(header.channels.into());

    writer.write_all(&head)?;
    write_samples_be(buffer, &mut writer)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use bytes::Buf;

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
    fn header_fields() {
        let mut buffer = SampleBuffer::new(11025).unwrap();
        buffer.try_put_slice(&[CENTER + 5, u16::MAX]).unwrap();

        let mut cursor = Cursor::new(Vec::<u8>::new());
        write_container(&buffer, ContainerFormat::Au, &mut cursor).unwrap();
        let bytes = cursor.into_inner();

        let mut buf = &bytes[..];
        assert_eq!(&buf[..4], b".snd");
        buf.advance(4);
        assert_eq!(buf.get_u32(), 24);
        assert_eq!(buf.get_u32(), 4);
        assert_eq!(buf.get_u32(), 3);
        assert_eq!(buf.get_u32(), 11025);
        assert_eq!(buf.get_u32(), 1);
        assert_eq!(buf.get_i16(), 5);
        assert_eq!(buf.get_i16(), i16::MAX);
        assert!(!buf.has_remaining());
    }
}
