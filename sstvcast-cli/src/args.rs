use std::path::PathBuf;

use clap::Parser;
use sstvcast::ContainerFormat;

use crate::picture::Aspect;

/// Encode an image as an SSTV transmission.
#[derive(Debug, Parser)]
#[clap(version, about)]
pub struct Args {
    /// Input image (PNG, JPEG, GIF, BMP, ...)
    #[clap(short, long, required_unless_present = "list_modes")]
    pub input: Option<PathBuf>,

    /// Output audio file. Defaults to the input path with the format's
    /// extension appended.
    #[clap(short, long)]
    pub output: Option<PathBuf>,

    /// SSTV mode, e.g. m1, m2, s1, s2, sdx, r36, r72.
    #[clap(short = 'p', long = "protocol")]
    pub mode: Option<String>,

    /// Output format: wav, aiff, au or ogg.
    #[clap(short, long)]
    pub format: Option<ContainerFormat>,

    /// Sample rate in Hz (8000 to 48000).
    #[clap(short = 'r', long = "rate")]
    pub sample_rate: Option<u32>,

    /// How the image is fitted to the mode's resolution.
    #[clap(short, long, value_enum)]
    pub aspect: Option<Aspect>,

    /// Send `SSTV DE <CALLSIGN>` in Morse code after the image.
    #[clap(short = 'C', long)]
    pub callsign: Option<String>,

    /// Morse speed in words per minute (1 to 50).
    #[clap(short = 'W', long)]
    pub wpm: Option<u32>,

    /// Morse tone in Hz (400 to 2000).
    #[clap(short = 'T', long)]
    pub tone: Option<f64>,

    /// Save the fitted image next to the output file.
    #[clap(short = 'K', long)]
    pub keep_image: bool,

    /// Config file. Defaults to `config.toml` in the user's config directory.
    #[clap(long)]
    pub config: Option<PathBuf>,

    /// Log progress details.
    #[clap(short, long)]
    pub verbose: bool,

    /// List supported modes and exit.
    #[clap(long)]
    pub list_modes: bool,
}
