//! Minimal CLI: descriptors → (zod | records)
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;

use zodgen::config::Settings;
use zodgen::{Catalog, Converter, RecordDef};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// compile record descriptors (with validation tags) into Zod schemas
#[derive(Parser, Debug)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// emit Zod schemas for the selected roots and everything they reference
    Convert(ConvertOut),
    /// list the qualified identities found in the descriptors
    Records(RecordsOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// One or more descriptor files. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(clap::Parser, Debug)]
struct ConvertOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// root records as `package.Identity`; every record in input order if omitted
    #[arg(long)]
    root: Vec<String>,

    /// JSON settings file (prefix, ignore_tags, decimal, optional)
    #[arg(long)]
    config: Option<PathBuf>,

    /// name prefix for every schema and type, overrides the settings file
    #[arg(long)]
    prefix: Option<String>,

    /// directives to drop, added to the settings file's list
    #[arg(long)]
    ignore: Vec<String>,

    /// map shopspring decimals to strings
    #[arg(long)]
    decimal: bool,

    /// unwrap `4d63.com/optional` values
    #[arg(long)]
    optional: bool,

    /// output .ts file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(clap::Parser, Debug)]
struct RecordsOut {
    #[command(flatten)]
    input_settings: InputSettings,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn load_catalog(&self) -> Result<Catalog> {
        let source_paths = resolve_file_path_patterns(&self.input).context("failed to resolve input file paths")?;
        let mut catalog = Catalog::new();
        for source_path in source_paths {
            catalog
                .load_file(&source_path)
                .with_context(|| format!("failed to load descriptors from {}", source_path.display()))?;
        }
        info!(records = catalog.len(), "loaded catalog");
        Ok(catalog)
    }
}

impl ConvertOut {
    fn settings(&self) -> Result<Settings> {
        let mut settings = match self.config.as_ref() {
            Some(path) => Settings::from_path(path)
                .with_context(|| format!("failed to read settings from {}", path.display()))?,
            None => Settings::default(),
        };
        if let Some(prefix) = self.prefix.as_ref() {
            settings.prefix = prefix.clone();
        }
        settings.ignore_tags.extend(self.ignore.iter().cloned());
        settings.decimal |= self.decimal;
        settings.optional |= self.optional;
        Ok(settings)
    }

    fn roots<'c>(&self, catalog: &'c Catalog) -> Result<Vec<&'c RecordDef>> {
        if self.root.is_empty() {
            return Ok(catalog.records().collect());
        }
        self.root
            .iter()
            .map(|root| catalog.find(root).ok_or_else(|| anyhow!("unknown root record: {root}")))
            .collect()
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn run(&self) -> Result<()> {
        match &self.cmd {
            Command::Convert(target) => {
                let catalog = target.input_settings.load_catalog()?;
                let options = target.settings()?.into_options();
                let roots = target.roots(&catalog)?;

                let mut converter = Converter::with_options(&catalog, options);
                let source = converter.convert_slice(&roots)?;
                write_output(target.out.as_deref(), &source)
            }
            Command::Records(target) => {
                let catalog = target.input_settings.load_catalog()?;
                for record in catalog.records() {
                    println!("{}", record.qualified_identity());
                }
                Ok(())
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn write_output(out: Option<&Path>, source: &str) -> Result<()> {
    match out {
        Some(out) => {
            if let Some(parent) = out.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(out, source).with_context(|| format!("failed to write {}", out.display()))?;
            info!(path = %out.display(), "wrote schemas");
        }
        None => print!("{source}"),
    }
    Ok(())
}

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{'))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern)? {
                out.push(entry?);
                matched_any = true;
            }
            if !matched_any {
                return Err(anyhow!("glob pattern matched no files: {pattern}"));
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}
