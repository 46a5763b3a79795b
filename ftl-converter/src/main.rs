//! Converts FTL models into JSON, XML, OBJ and glTF.

mod config;

use std::{
    io,
    path::{Path, PathBuf},
    process::ExitCode,
    time::Instant,
};

use clap::Parser;
use common::prelude::*;
use config::{ConfigError, ConverterConfig};
use env_logger::Env;
use ftl::{export::ExportFormat, DecodeError, DecodeOptions};
use log::LevelFilter;
use rayon::prelude::*;
use thiserror::Error;

#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// FTL file to convert.
    input: PathBuf,
    /// Base output directory. Files go to `<output_dir>/<input stem>/`.
    output_dir: Option<PathBuf>,
    /// Formats to write, comma separated. Defaults to every format.
    #[arg(short, long, value_delimiter = ',')]
    format: Vec<ExportFormat>,
    /// Config file, `ftl-converter.ini` by default.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Only print warnings and errors.
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
    /// Print section details.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Error)]
enum ConverterError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: DecodeError,
    },
    #[error("{format} export failed: {source}")]
    Export {
        format: ExportFormat,
        #[source]
        source: ftl::export::ExportError,
    },
}

fn init_logger(args: &Args) {
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("info"));
    if args.quiet {
        builder.filter_level(LevelFilter::Warn);
    } else if args.verbose {
        builder.filter_level(LevelFilter::Debug);
    }
    builder.init();
}

/// `<base>/<stem>/`, where base is the command line directory, then the config's, then
/// the input's own directory.
fn output_dir(args: &Args, config: &ConverterConfig, file: &VFile) -> PathBuf {
    let base = args
        .output_dir
        .clone()
        .or_else(|| config.output.clone())
        .unwrap_or_else(|| {
            args.input
                .parent()
                .map(Path::to_owned)
                .unwrap_or_default()
        });
    base.join(file.stem())
}

fn run(args: &Args) -> Result<PathBuf, ConverterError> {
    let config = ConverterConfig::load(args.config.as_deref())?;
    let formats = if args.format.is_empty() {
        config.formats.clone()
    } else {
        args.format.clone()
    };

    let file = VFile::load(&args.input).map_err(|source| ConverterError::Read {
        path: args.input.clone(),
        source,
    })?;

    let now = Instant::now();
    let options = DecodeOptions {
        max_decompressed_len: config.max_output,
    };
    let model = ftl::decode_with(&file.data, &options).map_err(|source| ConverterError::Decode {
        path: args.input.clone(),
        source,
    })?;
    log::info!("Decoded {:?} in {:?}", model.name(), now.elapsed());

    let out = output_dir(args, &config, &file);
    formats.par_iter().try_for_each(|&format| {
        let exporter = format.exporter();
        let now = Instant::now();
        exporter
            .export(&model, &out)
            .map_err(|source| ConverterError::Export { format, source })?;
        log::info!(
            "{} written to {} in {:?}",
            exporter.name(),
            out.join(exporter.subdir()).display(),
            now.elapsed()
        );
        Ok::<(), ConverterError>(())
    })?;

    Ok(out)
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logger(&args);

    match run(&args) {
        Ok(out) => {
            log::info!("Done: {}", out.display());
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}
