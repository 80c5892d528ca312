//! Minimal CLI: diagnose → (report | schema | formatted text)
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use serde_json::Value;

use crate::diagnose::{self, ParseError};
use crate::infer;
use crate::render;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// validate JSON with localized diagnostics, infer structural schemas, and re-format
#[derive(Parser, Debug)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// parse each input and report success or a localized syntax error
    Check(CheckOut),
    /// infer and print the structural JSON schema of each input
    Schema(SchemaOut),
    /// smart pretty-print: short flat arrays collapse onto one line
    Format(FormatOut),
    /// strip all insignificant whitespace
    Minify(MinifyOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// One or more inputs. May be literal paths or quoted glob patterns or '-' for stdin
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(Args, Debug)]
struct CheckOut {
    #[command(flatten)]
    input_settings: InputSettings,
}

#[derive(Args, Debug)]
struct SchemaOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct FormatOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// output file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct MinifyOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// output file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

struct Source {
    name: String,
    contents: Vec<u8>,
}

impl InputSettings {
    fn load(&self) -> Result<Vec<Source>> {
        let mut sources = Vec::new();
        for raw in &self.input {
            if raw == "-" {
                let mut contents = Vec::new();
                std::io::stdin()
                    .read_to_end(&mut contents)
                    .context("failed to read stdin")?;
                sources.push(Source {
                    name: "<stdin>".to_string(),
                    contents,
                });
                continue;
            }
            for path in resolve_file_path_pattern(raw)? {
                let contents = std::fs::read(&path)
                    .with_context(|| format!("failed to read source file {}", path.display()))?;
                sources.push(Source {
                    name: path.to_string_lossy().to_string(),
                    contents,
                });
            }
        }
        Ok(sources)
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn run(&self) -> Result<()> {
        match &self.cmd {
            Command::Check(target) => {
                let sources = target.input_settings.load()?;
                let mut failures = 0usize;
                for source in &sources {
                    match diagnose::parse_bytes(&source.contents) {
                        Ok(_) => println!("{}: {}", source.name, "valid JSON".green().bold()),
                        Err(error) => {
                            failures += 1;
                            report_failure(&source.name, &error);
                        }
                    }
                }
                if failures > 0 {
                    bail!("{failures} of {} input(s) failed to parse", sources.len());
                }
                Ok(())
            }
            Command::Schema(target) => {
                let documents = parse_documents(&target.input_settings.load()?)?;
                let mut rendered = Vec::with_capacity(documents.len());
                for value in &documents {
                    let schema = infer::infer_schema(value)?;
                    rendered.push(serde_json::to_string_pretty(&schema)?);
                }
                write_output(target.out.as_deref(), &rendered)
            }
            Command::Format(target) => {
                let documents = parse_documents(&target.input_settings.load()?)?;
                let mut rendered = Vec::with_capacity(documents.len());
                for value in &documents {
                    rendered.push(render::pretty_print(value)?);
                }
                write_output(target.out.as_deref(), &rendered)
            }
            Command::Minify(target) => {
                let documents = parse_documents(&target.input_settings.load()?)?;
                let mut rendered = Vec::with_capacity(documents.len());
                for value in &documents {
                    rendered.push(render::minify(value)?);
                }
                write_output(target.out.as_deref(), &rendered)
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn parse_documents(sources: &[Source]) -> Result<Vec<Value>> {
    sources
        .iter()
        .map(|source| {
            diagnose::parse_bytes(&source.contents)
                .map_err(|error| parse_failure(&source.name, &error))
        })
        .collect()
}

fn parse_failure(name: &str, error: &ParseError) -> anyhow::Error {
    match error.location() {
        Some(location) => anyhow!(
            "{name}: {error} (Line: {}, Column: {})\n{}",
            location.line,
            location.column,
            location.snippet
        ),
        None => anyhow!("{name}: {error}"),
    }
}

fn report_failure(name: &str, error: &ParseError) {
    eprintln!("{}: {}", name, "invalid JSON".red().bold());
    eprintln!("  {error}");
    if let Some(location) = error.location() {
        let position = format!("Line: {}, Column: {}", location.line, location.column);
        eprintln!("  {}", position.dimmed());
        for line in location.snippet.lines() {
            eprintln!("  {line}");
        }
    }
}

fn write_output(out: Option<&Path>, rendered: &[String]) -> Result<()> {
    match out {
        Some(path) => {
            if rendered.len() > 1 {
                bail!(
                    "--out expects a single input document, got {}",
                    rendered.len()
                );
            }
            if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("failed to create output directory {}", parent.display())
                })?;
            }
            let contents = rendered.first().map(String::as_str).unwrap_or_default();
            std::fs::write(path, contents)
                .with_context(|| format!("failed to write {}", path.display()))?;
            Ok(())
        }
        None => {
            for chunk in rendered {
                println!("{chunk}");
            }
            Ok(())
        }
    }
}

fn resolve_file_path_pattern(pattern: &str) -> Result<Vec<PathBuf>> {
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{'))
    }

    if !has_glob_chars(pattern) {
        return Ok(vec![PathBuf::from(pattern)]);
    }

    let mut matched = Vec::new();
    for entry in glob::glob(pattern)? {
        matched.push(entry?);
    }
    if matched.is_empty() {
        // Pattern was explicitly a glob but matched nothing -> surface as an error
        bail!("glob pattern matched no files: {pattern}");
    }
    Ok(matched)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_paths_pass_through_unexpanded() {
        let paths = resolve_file_path_pattern("data/sample.json").unwrap();
        assert_eq!(paths, vec![PathBuf::from("data/sample.json")]);
    }
}
