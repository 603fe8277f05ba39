use std::path::{
    Path,
    PathBuf,
};

use color_eyre::eyre::WrapErr;
use directories::ProjectDirs;
use serde::{
    Deserialize,
    Serialize,
};
use sstvcast::{
    ContainerFormat,
    EncodeOptions,
};

use crate::{
    Error,
    picture::Aspect,
};

/// Settings read from `config.toml`. Command line arguments take precedence.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub mode: Option<String>,
    pub format: Option<ContainerFormat>,
    pub aspect: Option<Aspect>,
    #[serde(flatten)]
    pub encode: EncodeOptions,
}

impl Config {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "Loading config from file");
        let text = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("Could not read config file {}", path.display()))?;
        toml::from_str(&text).wrap_err_with(|| format!("Invalid config file {}", path.display()))
    }

    /// Loads `path` if given, otherwise the default config file if it exists.
    pub fn load(path: Option<&Path>) -> Result<Self, Error> {
        if let Some(path) = path {
            return Self::from_path(path);
        }

        match default_config_path() {
            Some(path) if path.exists() => Self::from_path(path),
            _ => Ok(Self::default()),
        }
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    let project_dirs = ProjectDirs::from("", "sstvcast", "sstvcast")?;
    Some(project_dirs.config_dir().join("config.toml"))
}

/// `<input>.<ext>`, or `output` with the format's extension if it has none.
pub fn output_path(input: &Path, output: Option<&Path>, format: ContainerFormat) -> PathBuf {
    match output {
        Some(output) if output.extension().is_some() => output.to_owned(),
        Some(output) => output.with_extension(format.extension()),
        None => {
            let mut path = input.as_os_str().to_owned();
            path.push(".");
            path.push(format.extension());
            path.into()
        }
    }
}
