//! Encoder options.
//!
//! These are plain data with serde support, so that a front end can load them
//! from a config file and override single values.

use serde::{
    Deserialize,
    Serialize,
};

use crate::modem::morse::{
    DEFAULT_TONE,
    DEFAULT_WPM,
};

pub const DEFAULT_SAMPLE_RATE: u32 = 22050;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodeOptions {
    pub sample_rate: u32,
    pub cw: Option<CwOptions>,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            cw: None,
        }
    }
}

impl EncodeOptions {
    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn with_cw(mut self, cw: CwOptions) -> Self {
        self.cw = Some(cw);
        self
    }
}

/// Morse identification sent after the image.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CwOptions {
    pub callsign: String,
    #[serde(default = "default_wpm")]
    pub wpm: u32,
    #[serde(default = "default_tone")]
    pub tone: f64,
}

impl CwOptions {
    pub fn new(callsign: impl Into<String>) -> Self {
        Self {
            callsign: callsign.into(),
            wpm: DEFAULT_WPM,
            tone: DEFAULT_TONE,
        }
    }
}

fn default_wpm() -> u32 {
    DEFAULT_WPM
}

fn default_tone() -> f64 {
    DEFAULT_TONE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_from_empty_toml() {
        let options: EncodeOptions = toml::from_str("").unwrap();
        assert_eq!(options, EncodeOptions::default());
        assert_eq!(options.sample_rate, 22050);
    }

    #[test]
    fn partial_cw_table() {
        let options: EncodeOptions = toml::from_str(
            r#"
            sample_rate = 44100

            [cw]
            callsign = "N0CALL"
            tone = 1000.0
            "#,
        )
        .unwrap();
        assert_eq!(options.sample_rate, 44100);
        let cw = options.cw.unwrap();
        assert_eq!(cw.callsign, "N0CALL");
        assert_eq!(cw.wpm, 15);
        assert_eq!(cw.tone, 1000.0);
    }
}
