//! Audio container serialization.

mod aiff;
mod au;
#[cfg(feature = "ogg")]
mod ogg;
mod raw;
mod wav;

use std::{
    fmt::Display,
    fs::File,
    io::{
        BufWriter,
        Seek,
        Write,
    },
    path::{
        Path,
        PathBuf,
    },
    str::FromStr,
};

use crate::{
    GetSampleRate,
    buf::SampleBuffer,
};

pub use self::aiff::encode_extended;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unknown container format: {0}")]
    UnknownFormat(String),
    #[error("{format} can't hold {data_len} bytes of samples")]
    PayloadTooLarge {
        format: ContainerFormat,
        data_len: usize,
    },
    #[error("io error")]
    Io(#[from] std::io::Error),
    #[error("wav error")]
    Hound(#[from] hound::Error),
    #[cfg(feature = "ogg")]
    #[error("sample rate of {sample_rate} Hz can't be encoded")]
    SampleRate { sample_rate: u32 },
    #[cfg(feature = "ogg")]
    #[error("vorbis error")]
    Vorbis(#[from] vorbis_rs::VorbisError),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerFormat {
    #[default]
    Wav,
    Aiff,
    Au,
    /// Ogg Vorbis. Lossy.
    #[cfg(feature = "ogg")]
    Ogg,
}

impl ContainerFormat {
    pub const ALL: &[Self] = &[
        Self::Wav,
        Self::Aiff,
        Self::Au,
        #[cfg(feature = "ogg")]
        Self::Ogg,
    ];

    /// File extension, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Wav => "wav",
            Self::Aiff => "aiff",
            Self::Au => "au",
            #[cfg(feature = "ogg")]
            Self::Ogg => "ogg",
        }
    }

    /// Bytes in front of the sample data. `None` for compressed formats, which
    /// don't store the samples in one piece.
    pub fn header_len(&self) -> Option<usize> {
        match self {
            Self::Wav => Some(44),
            Self::Aiff => Some(aiff::HEADER_LEN),
            Self::Au => Some(au::HEADER_LEN),
            #[cfg(feature = "ogg")]
            Self::Ogg => None,
        }
    }

    /// Largest sample payload in bytes whose sizes still fit the header's
    /// 32 bit length fields.
    pub fn max_data_len(&self) -> u64 {
        let max = u64::from(u32::MAX);
        match self {
            // riff chunk size is 36 + data
            Self::Wav => max - 36,
            // form chunk size is 46 + data
            Self::Aiff => max - 46,
            // all ones means "unknown size"
            Self::Au => max - 1,
            // the header only counts frames
            #[cfg(feature = "ogg")]
            Self::Ogg => max,
        }
    }
}

impl Display for ContainerFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Wav => write!(f, "WAV"),
            Self::Aiff => write!(f, "AIFF"),
            Self::Au => write!(f, "AU"),
            #[cfg(feature = "ogg")]
            Self::Ogg => write!(f, "OGG"),
        }
    }
}

impl FromStr for ContainerFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "wav" | "wave" => Ok(Self::Wav),
            "aiff" | "aif" => Ok(Self::Aiff),
            "au" | "snd" => Ok(Self::Au),
            #[cfg(feature = "ogg")]
            "ogg" | "oga" => Ok(Self::Ogg),
            _ => Err(Error::UnknownFormat(s.to_owned())),
        }
    }
}

/// Header fields of a finished buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ContainerHeader {
    pub format: ContainerFormat,
    pub sample_rate: u32,
    pub channels: u16,
    pub bits_per_sample: u16,
    pub num_frames: u32,
    pub data_len: u32,
}

impl ContainerHeader {
    pub fn new(format: ContainerFormat, buffer: &SampleBuffer) -> Result<Self, Error> {
        let data_len = buffer.data_len_bytes();
        let too_large = || {
            Error::PayloadTooLarge {
                format,
                data_len,
            }
        };

        if data_len as u64 > format.max_data_len() {
            return Err(too_large());
        }

        Ok(Self {
            format,
            sample_rate: buffer.sample_rate(),
            channels: 1,
            bits_per_sample: 16,
            num_frames: buffer.len().try_into().map_err(|_| too_large())?,
            data_len: data_len.try_into().map_err(|_| too_large())?,
        })
    }

    /// Size of the whole file in bytes, if the format stores raw samples.
    pub fn file_len(&self) -> Option<u64> {
        let header_len = self.format.header_len()?;
        Some(header_len as u64 + u64::from(self.data_len))
    }
}

/// Serializes `buffer` into `writer`.
pub fn write_container<W>(buffer: &SampleBuffer, format: ContainerFormat, writer: W) -> Result<ContainerHeader, Error>
where
    W: Write + Seek,
{
    let header = ContainerHeader::new(format, buffer)?;
    tracing::debug!(?header, "writing container");

    match format {
        ContainerFormat::Wav => wav::write(&header, buffer, writer)?,
        ContainerFormat::Aiff => aiff::write(&header, buffer, writer)?,
        ContainerFormat::Au => au::write(&header, buffer, writer)?,
        #[cfg(feature = "ogg")]
        ContainerFormat::Ogg => ogg::write(&header, buffer, writer)?,
    }

    Ok(header)
}

/// Writes a container file.
///
/// The file is written next to `path` with a `.partial` suffix and moved into
/// place once complete. On error the partial file is removed.
pub fn write_container_to_path(
    buffer: &SampleBuffer,
    format: ContainerFormat,
    path: impl AsRef<Path>,
) -> Result<ContainerHeader, Error> {
    let path = path.as_ref();
    let partial_path = partial_path(path);

    let result = (|| -> Result<ContainerHeader, Error> {
        let mut writer = BufWriter::new(File::create(&partial_path)?);
        let header = write_container(buffer, format, &mut writer)?;
        writer.flush()?;
        std::fs::rename(&partial_path, path)?;
        Ok(header)
    })();

    match result {
        Ok(header) => {
            tracing::debug!(path = %path.display(), "container written");
            Ok(header)
        }
        Err(error) => {
            if let Err(remove_error) = std::fs::remove_file(&partial_path)
                && remove_error.kind() != std::io::ErrorKind::NotFound
            {
                tracing::warn!(path = %partial_path.display(), %remove_error, "could not remove partial file");
            }
            Err(error)
        }
    }
}

fn partial_path(path: &Path) -> PathBuf {
    let mut file_name = path.file_name().unwrap_or_default().to_owned();
    file_name.push(".partial");
    path.with_file_name(file_name)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::buf::CENTER;

    fn buffer(len: usize) -> SampleBuffer {
        let mut buffer = SampleBuffer::new(11025).unwrap();
        buffer
            .try_put_with(len, |i| CENTER.wrapping_add((i * 97) as u16))
            .unwrap();
        buffer
    }

    #[test]
    fn format_names() {
        assert_eq!("WAV".parse::<ContainerFormat>().unwrap(), ContainerFormat::Wav);
        assert_eq!("aif".parse::<ContainerFormat>().unwrap(), ContainerFormat::Aiff);
        assert_eq!("snd".parse::<ContainerFormat>().unwrap(), ContainerFormat::Au);
        #[cfg(feature = "ogg")]
        assert_eq!("OGG".parse::<ContainerFormat>().unwrap(), ContainerFormat::Ogg);
        assert!(matches!(
            "flac".parse::<ContainerFormat>(),
            Err(Error::UnknownFormat(name)) if name == "flac"
        ));
    }

    #[test]
    fn file_length_matches_header() {
        let buffer = buffer(1001);
        for &format in ContainerFormat::ALL {
            let mut cursor = Cursor::new(Vec::<u8>::new());
            let header = write_container(&buffer, format, &mut cursor).unwrap();
            assert_eq!(header.data_len, 2002);
            assert_eq!(header.num_frames, 1001);
            if let Some(file_len) = header.file_len() {
                assert_eq!(cursor.get_ref().len() as u64, file_len, "{format}");
            }
        }
    }

    #[test]
    fn empty_buffer() {
        let buffer = SampleBuffer::new(8000).unwrap();
        for &format in ContainerFormat::ALL {
            let mut cursor = Cursor::new(Vec::<u8>::new());
            write_container(&buffer, format, &mut cursor).unwrap();
            match format.header_len() {
                Some(header_len) => assert_eq!(cursor.get_ref().len(), header_len),
                None => assert!(!cursor.get_ref().is_empty()),
            }
        }
    }

    #[test]
    fn payload_limits() {
        assert_eq!(ContainerFormat::Wav.max_data_len(), 0xffff_ffdb);
        assert_eq!(ContainerFormat::Aiff.max_data_len(), 0xffff_ffd1);
        assert_eq!(ContainerFormat::Au.max_data_len(), 0xffff_fffe);
    }

    #[test]
    fn partial_file_is_renamed() {
        let dir = std::env::temp_dir().join(format!("sstvcast-sink-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("out.au");

        write_container_to_path(&buffer(10), ContainerFormat::Au, &path).unwrap();
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 24 + 20);
        assert!(!partial_path(&path).exists());

        // the directory doesn't exist, so creating the partial file fails
        let missing = dir.join("missing").join("out.wav");
        assert!(matches!(
            write_container_to_path(&buffer(10), ContainerFormat::Wav, &missing),
            Err(Error::Io(_))
        ));
        assert!(!partial_path(&missing).exists());

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
