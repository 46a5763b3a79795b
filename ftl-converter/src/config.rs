use std::path::{Path, PathBuf};

use ftl::{
    consts::MAX_DECOMPRESSED_LEN,
    export::{ExportError, ExportFormat},
};
use ini::Ini;
use thiserror::Error;

/// Looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG: &str = "ftl-converter.ini";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load {}: {source}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: ini::Error,
    },
    #[error("[{section}] {key} = {value:?} is not a valid byte count")]
    InvalidSize {
        section: &'static str,
        key: &'static str,
        value: String,
    },
    #[error(transparent)]
    Format(#[from] ExportError),
}

#[derive(Clone, Debug, PartialEq)]
pub struct ConverterConfig {
    pub max_output: usize,
    pub formats: Vec<ExportFormat>,
    /// Base output directory. `None` writes next to the input.
    pub output: Option<PathBuf>,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            max_output: MAX_DECOMPRESSED_LEN,
            formats: ExportFormat::ALL.to_vec(),
            output: None,
        }
    }
}

impl ConverterConfig {
    /// Read `path`, or the default file if none is given. A missing default file is not
    /// an error, a missing explicit one is.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, explicit) = match path {
            Some(p) => (p, true),
            None => (Path::new(DEFAULT_CONFIG), false),
        };

        if !explicit && !path.exists() {
            log::debug!("no {DEFAULT_CONFIG}, using defaults");
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path).map_err(|source| ConfigError::Load {
            path: path.to_owned(),
            source,
        })?;
        log::info!("Loaded config from {}", path.display());
        Self::from_ini(&ini)
    }

    pub fn from_ini(ini: &Ini) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(decode) = ini.section(Some("decode")) {
            if let Some(value) = decode.get("max_output") {
                config.max_output =
                    value
                        .trim()
                        .parse()
                        .map_err(|_| ConfigError::InvalidSize {
                            section: "decode",
                            key: "max_output",
                            value: value.to_owned(),
                        })?;
            }
        }

        if let Some(export) = ini.section(Some("export")) {
            if let Some(formats) = export.get("formats") {
                config.formats = ExportFormat::parse_list(formats)?;
            }
            if let Some(output) = export.get("output").filter(|o| !o.trim().is_empty()) {
                config.output = Some(PathBuf::from(output.trim()));
            }
        }

        Ok(config)
    }
}
