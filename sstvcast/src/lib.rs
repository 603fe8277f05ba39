//! Slow-scan television encoder.
//!
//! Renders an image into the audio of an SSTV transmission (VIS header, scan
//! lines, trailer and an optional Morse identification) and serializes it as
//! WAV, AIFF, AU or (with the `ogg` feature) Ogg Vorbis.
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use sstvcast::{
//!     ContainerFormat,
//!     CwOptions,
//!     EncodeOptions,
//! };
//!
//! let image = image::open("picture.png")?.to_rgb8();
//! let options = EncodeOptions::default().with_cw(CwOptions::new("N0CALL"));
//! let buffer = sstvcast::encode(&image, "m1", &options)?;
//! sstvcast::write_container_to_path(&buffer, ContainerFormat::Wav, "picture.wav")?;
//! # Ok(())
//! # }
//! ```

pub mod buf;
pub mod config;
pub mod modem;
pub mod session;
pub mod sink;
pub mod source;
pub mod util;

pub use crate::{
    buf::SampleBuffer,
    config::{
        CwOptions,
        EncodeOptions,
    },
    modem::sstv::{
        ModeSpecification,
        image::{
            FrameBuffer,
            RgbPixels,
        },
    },
    session::{
        EncodeError,
        EncodeSession,
        Stage,
        encode,
    },
    sink::{
        ContainerFormat,
        write_container,
        write_container_to_path,
    },
};

pub trait GetSampleRate {
    fn sample_rate(&self) -> u32;
}

impl<T: GetSampleRate> GetSampleRate for &T {
    #[inline]
    fn sample_rate(&self) -> u32 {
        (**self).sample_rate()
    }
}

impl<T: GetSampleRate> GetSampleRate for &mut T {
    #[inline]
    fn sample_rate(&self) -> u32 {
        (**self).sample_rate()
    }
}
