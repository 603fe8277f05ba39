mod args;
mod files;
mod picture;

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{
    Error,
    bail,
    eyre,
};
use sstvcast::{
    ContainerFormat,
    CwOptions,
    EncodeOptions,
    ModeSpecification,
    modem::sstv::{
        TRAILER,
        VisFrame,
    },
    source::total_duration,
    write_container_to_path,
};
use tracing_subscriber::EnvFilter;

use crate::{
    args::Args,
    files::Config,
    picture::Aspect,
};

const DEFAULT_MODE: &str = "m1";

fn main() -> Result<(), Error> {
    let _ = dotenvy::dotenv();
    color_eyre::install()?;

    let args = Args::parse();

    let env_filter = if args.verbose {
        EnvFilter::new("debug")
    }
    else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!(?args);

    if args.list_modes {
        list_modes();
        return Ok(());
    }

    let config = Config::load(args.config.as_deref())?;
    let settings = Settings::resolve(args, config)?;
    settings.print_summary();

    let image = picture::load(&settings.input)?;
    let fitted = picture::fit(
        &image,
        settings.mode.width as u32,
        settings.mode.height as u32,
        settings.aspect,
    );

    if settings.keep_image {
        let mut path = settings.output.as_os_str().to_owned();
        path.push(".png");
        let path = PathBuf::from(path);
        tracing::info!(path = %path.display(), "Saving fitted image");
        fitted.save(&path)?;
    }

    let buffer = sstvcast::encode(&fitted, settings.mode.short_name, &settings.options)?;
    let header = write_container_to_path(&buffer, settings.format, &settings.output)?;
    let bytes = match header.file_len() {
        Some(file_len) => file_len,
        None => std::fs::metadata(&settings.output)?.len(),
    };

    tracing::info!(
        path = %settings.output.display(),
        bytes,
        duration = ?buffer.duration(),
        "Transmission written"
    );

    Ok(())
}

fn list_modes() {
    println!("{:<6} {:<12} {:>4} {:>9} {:>8}", "mode", "name", "VIS", "size", "time");
    for mode in ModeSpecification::ALL {
        println!(
            "{:<6} {:<12} {:>4} {:>9} {:>7.1}s",
            mode.short_name.to_lowercase(),
            mode.name,
            mode.vis_code,
            format!("{}x{}", mode.width, mode.height),
            mode.image_time(),
        );
    }
}

/// Command line arguments merged with the config file.
#[derive(Debug)]
struct Settings {
    input: PathBuf,
    output: PathBuf,
    mode: &'static ModeSpecification,
    format: ContainerFormat,
    aspect: Aspect,
    options: EncodeOptions,
    keep_image: bool,
}

impl Settings {
    fn resolve(args: Args, config: Config) -> Result<Self, Error> {
        let Some(input) = args.input
        else {
            bail!("No input image given");
        };

        let mode_name = args
            .mode
            .or(config.mode)
            .unwrap_or_else(|| DEFAULT_MODE.to_owned());
        let mode = ModeSpecification::from_name(&mode_name)
            .ok_or_else(|| eyre!("Unknown SSTV mode: {mode_name} (see --list-modes)"))?;

        let format = args.format.or(config.format).unwrap_or_default();
        let aspect = args.aspect.or(config.aspect).unwrap_or_default();

        let mut options = config.encode;
        if let Some(sample_rate) = args.sample_rate {
            options.sample_rate = sample_rate;
        }

        if let Some(callsign) = args.callsign {
            let cw = options.cw.get_or_insert_with(|| CwOptions::new(""));
            cw.callsign = callsign;
        }
        match &mut options.cw {
            Some(cw) => {
                if let Some(wpm) = args.wpm {
                    cw.wpm = wpm;
                }
                if let Some(tone) = args.tone {
                    cw.tone = tone;
                }
            }
            None => {
                if args.wpm.is_some() || args.tone.is_some() {
                    bail!("-W and -T need a callsign (-C)");
                }
            }
        }

        let output = files::output_path(&input, args.output.as_deref(), format);

        Ok(Self {
            input,
            output,
            mode,
            format,
            aspect,
            options,
            keep_image: args.keep_image,
        })
    }

    fn print_summary(&self) {
        let duration = VisFrame::new(self.mode.vis_code).duration()
            + self.mode.image_time()
            + total_duration(&TRAILER);

        println!("Input:        {}", self.input.display());
        println!("Output:       {} ({})", self.output.display(), self.format);
        println!("Mode:         {} (VIS {})", self.mode.name, self.mode.vis_code);
        println!("Resolution:   {}x{}", self.mode.width, self.mode.height);
        println!("Aspect:       {:?}", self.aspect);
        println!("Sample rate:  {} Hz", self.options.sample_rate);
        if let Some(cw) = &self.options.cw {
            println!("CW:           {} at {} wpm, {} Hz", cw.callsign, cw.wpm, cw.tone);
        }
        println!("Duration:     {duration:.1} s without CW");
    }
}
