use std::{
    ffi::OsString,
    fs::{read, write},
    io,
    path::{Path, PathBuf},
    process::ExitCode,
    result::Result,
};

use clap::Parser;
use featfreeze::{FreezeOptions, ScriptLangFilter, Suffix, freeze, report};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error("cannot open {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot save {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{0}")]
    Font(#[from] featfreeze::Error),
}

type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "featfreeze", version)]
#[command(about = "Permanently apply OpenType GSUB features by remapping the cmap table")]
#[command(long_about = "With featfreeze you can \"freeze\" some OpenType features into a font. \
    These features are then \"on by default\", even in apps that don't support OpenType \
    features. Internally, the tool remaps the \"cmap\" table of the font by applying the \
    specified GSUB features. Only single and alternate substitutions are supported.")]
#[command(after_help = "Examples:\n  \
    featfreeze -f 'c2sc,smcp' -S -U SC OpenSans.ttf OpenSansSC.ttf\n  \
    featfreeze -R 'Lato/Otal' Lato-Regular.ttf Otal-Regular.ttf")]
struct Cli {
    /// Comma-separated OpenType feature tags, e.g. 'smcp,c2sc,onum'
    #[arg(short, long)]
    features: Option<String>,
    /// OpenType script tag, e.g. 'cyrl'
    #[arg(short, long)]
    script: Option<String>,
    /// OpenType language tag, e.g. 'SRB '
    #[arg(short, long)]
    lang: Option<String>,
    /// Zap glyph names from the font ('post' table version 3, .ttf only)
    #[arg(short, long)]
    zapnames: bool,
    /// Add a suffix to the font family name (built from the feature tags
    /// unless -U is given)
    #[arg(short = 'S', long)]
    suffix: bool,
    /// Use a custom family-name suffix (implies -S)
    #[arg(short = 'U', long)]
    usesuffix: Option<String>,
    /// Search/replace rules for the name table: 'old/new,old2/new2,...'
    #[arg(short = 'R', long)]
    replacenames: Option<String>,
    /// Update the font version string
    #[arg(short, long)]
    info: bool,
    /// Report scripts, languages and features in the font, then exit
    #[arg(short, long)]
    report: bool,
    /// Output the names of remapped glyphs
    #[arg(short, long)]
    names: bool,
    /// Print additional information during processing
    #[arg(short, long)]
    verbose: bool,
    /// Suppress warnings and the summary line
    #[arg(short, long)]
    quiet: bool,
    /// Input .otf or .ttf font file
    #[arg(value_name = "INPUT", required = true)]
    input: PathBuf,
    /// Output font file (default: <input>.featfreeze.<ext>)
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,
}

impl Cli {
    fn run(&self) -> ExitCode {
        match self.execute() {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("ERROR: {e}");
                ExitCode::FAILURE
            }
        }
    }

    fn execute(&self) -> CliResult<()> {
        if self.report {
            if self.output.is_some() {
                return Err(CliError::Usage(
                    "an output file is not used with --report".into(),
                ));
            }
            let data = self.read_input()?;
            print!("{}", report(&data)?);
            return Ok(());
        }

        let options = self.freeze_options();
        if options.features.is_empty() && !options.wants_name_edits() && !options.zapnames {
            log::warn!("no features and no rename requested; the output will be an unchanged copy");
        }

        let data = self.read_input()?;
        let result = freeze(&data, &options)?;

        if !self.quiet {
            for warning in &result.warnings {
                eprintln!("WARNING: {warning}");
            }
        }
        if self.names {
            println!("{}", result.remapped_names.join(" "));
        }

        let output = self
            .output
            .clone()
            .unwrap_or_else(|| default_output_path(&self.input));
        write(&output, &result.data).map_err(|source| CliError::Write {
            path: output.clone(),
            source,
        })?;
        log::info!("saved font: {}", output.display());

        if !self.quiet {
            println!(
                "{}: froze {}",
                self.input.file_name().unwrap_or_default().to_string_lossy(),
                result.stats
            );
        }
        Ok(())
    }

    fn read_input(&self) -> CliResult<Vec<u8>> {
        read(&self.input).map_err(|source| CliError::Read {
            path: self.input.clone(),
            source,
        })
    }

    fn freeze_options(&self) -> FreezeOptions {
        let features: Vec<String> = self
            .features
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(str::to_owned)
            .collect();
        let suffix = match (&self.usesuffix, self.suffix) {
            (Some(custom), _) => Suffix::Custom(custom.clone()),
            (None, true) => Suffix::FromFeatures,
            (None, false) => Suffix::None,
        };
        FreezeOptions {
            features,
            filter: ScriptLangFilter::new(self.script.clone(), self.lang.clone()),
            suffix,
            replacenames: self.replacenames.clone(),
            info: self.info,
            zapnames: self.zapnames,
        }
    }
}

fn default_output_path(input: &Path) -> PathBuf {
    let mut name = OsString::from(
        input
            .file_stem()
            .or_else(|| input.file_name())
            .unwrap_or_default(),
    );
    name.push(".featfreeze");
    if let Some(ext) = input.extension() {
        name.push(".");
        name.push(ext);
    }
    input.with_file_name(name)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(
        if cli.verbose { "info" } else { "warn" },
    ))
    .init();
    cli.run()
}
