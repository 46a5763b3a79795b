//! Writers that turn a decoded [`Model`] into interchange formats.
//!
//! Every exporter owns one subdirectory of the output directory it is given and never
//! touches the others, so several can run at once over the same model.

pub mod gltf;
pub mod json;
pub mod obj;
pub mod xml;

use std::{
    fmt, fs,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
    str::FromStr,
};

use thiserror::Error;

use crate::model::Model;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("JSON serialisation failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{count} vertices cannot be addressed by 16-bit indices (max {max})")]
    TooManyVertices { count: usize, max: usize },
    #[error("unknown export format {0:?}")]
    UnknownFormat(String),
}

pub trait Exporter: Sync {
    fn name(&self) -> &'static str;

    /// Subdirectory of the output directory this exporter writes to.
    fn subdir(&self) -> &'static Path;

    fn export(&self, model: &Model, dir: &Path) -> Result<(), ExportError>;
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Json,
    Xml,
    Obj,
    Gltf,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 4] = [
        ExportFormat::Json,
        ExportFormat::Xml,
        ExportFormat::Obj,
        ExportFormat::Gltf,
    ];

    pub fn exporter(self) -> Box<dyn Exporter> {
        match self {
            ExportFormat::Json => Box::new(json::JsonExporter),
            ExportFormat::Xml => Box::new(xml::XmlExporter),
            ExportFormat::Obj => Box::new(obj::ObjExporter),
            ExportFormat::Gltf => Box::new(gltf::GltfExporter),
        }
    }

    /// Parse a comma-separated list such as `"json, obj"`. Duplicates are dropped.
    pub fn parse_list(list: &str) -> Result<Vec<ExportFormat>, ExportError> {
        let mut formats = Vec::new();
        for item in list.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let format = item.parse()?;
            if !formats.contains(&format) {
                formats.push(format);
            }
        }
        Ok(formats)
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "xml" => Ok(ExportFormat::Xml),
            "obj" => Ok(ExportFormat::Obj),
            "gltf" => Ok(ExportFormat::Gltf),
            _ => Err(ExportError::UnknownFormat(s.to_owned())),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExportFormat::Json => "json",
            ExportFormat::Xml => "xml",
            ExportFormat::Obj => "obj",
            ExportFormat::Gltf => "gltf",
        };
        f.write_str(name)
    }
}

pub(crate) fn io_error(path: &Path) -> impl FnOnce(io::Error) -> ExportError + '_ {
    move |source| ExportError::Io {
        path: path.to_owned(),
        source,
    }
}

/// Create (if needed) and return the exporter's directory under `dir`.
pub(crate) fn prepare_dir(exporter: &dyn Exporter, dir: &Path) -> Result<PathBuf, ExportError> {
    let out = dir.join(exporter.subdir());
    fs::create_dir_all(&out).map_err(io_error(&out))?;
    Ok(out)
}

/// Write a file through a buffered writer, attaching the path to any failure.
pub(crate) fn write_file(
    path: &Path,
    body: impl FnOnce(&mut BufWriter<fs::File>) -> io::Result<()>,
) -> Result<(), ExportError> {
    let file = fs::File::create(path).map_err(io_error(path))?;
    let mut writer = BufWriter::new(file);
    body(&mut writer)
        .and_then(|()| writer.flush())
        .map_err(io_error(path))?;
    log::debug!("wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod export_tests {
    use super::*;

    #[test]
    fn formats_parse_case_insensitively() {
        assert_eq!("GLTF".parse::<ExportFormat>().unwrap(), ExportFormat::Gltf);
        assert_eq!(
            ExportFormat::parse_list("json, obj,json").unwrap(),
            [ExportFormat::Json, ExportFormat::Obj]
        );
        assert!(matches!(
            ExportFormat::parse_list("json,fbx"),
            Err(ExportError::UnknownFormat(f)) if f == "fbx"
        ));
    }

    #[test]
    fn subdirectories_are_distinct() {
        let dirs: Vec<_> = ExportFormat::ALL
            .iter()
            .map(|f| f.exporter().subdir().to_owned())
            .collect();
        for (i, a) in dirs.iter().enumerate() {
            for b in &dirs[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn display_round_trips() {
        for format in ExportFormat::ALL {
            assert_eq!(format.to_string().parse::<ExportFormat>().unwrap(), format);
        }
    }
}
