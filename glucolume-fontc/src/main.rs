//! Font compiler front end
//!
//! Compiles a pixel-art source (`== key` sections of `#`/`.` rows) into the
//! font artifact consumed by the glucolume-font build script.
//!
//! ```text
//! glucolume-fontc <source.art> [-o <out.font>]      text artifact
//! glucolume-fontc <source.art> --binary -o <out>    postcard artifact
//! glucolume-fontc <source.art> --check <art.font>   verify an artifact
//! ```

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use glucolume_font::artifact::art_sections;
use glucolume_font::{GlyphKey, GlyphRecord};
use log::{info, warn};

const USAGE: &str = "usage: glucolume-fontc <source.art> [-o <output>] [--binary] [--check <artifact>]";

#[derive(Debug, Default, PartialEq)]
struct Options {
    source: PathBuf,
    output: Option<PathBuf>,
    binary: bool,
    check: Option<PathBuf>,
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<Options> {
    let mut opts = Options::default();
    let mut source = None;
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-o" | "--output" => {
                let path = args.next().ok_or_else(|| anyhow!("{} needs a path", arg))?;
                opts.output = Some(path.into());
            }
            "--check" => {
                let path = args.next().ok_or_else(|| anyhow!("--check needs a path"))?;
                opts.check = Some(path.into());
            }
            "--binary" => opts.binary = true,
            "-h" | "--help" => bail!("{}", USAGE),
            _ if arg.starts_with('-') => bail!("unknown option `{}`\n{}", arg, USAGE),
            _ => {
                if source.replace(PathBuf::from(&arg)).is_some() {
                    bail!("more than one source file\n{}", USAGE);
                }
            }
        }
    }

    opts.source = source.ok_or_else(|| anyhow!("{}", USAGE))?;
    if opts.binary && opts.output.is_none() {
        bail!("--binary needs -o <output>");
    }
    Ok(opts)
}

/// Compile every section of a pixel-art source
fn compile_source(source: &str) -> Result<Vec<GlyphRecord>> {
    let mut records: Vec<GlyphRecord> = Vec::new();

    for section in art_sections(source) {
        let (key, grid) = section.map_err(|e| anyhow!("{}", e))?;
        if records.iter().any(|r| r.key == key) {
            bail!("glyph `{}` defined twice", key.name());
        }
        if grid.is_empty() {
            warn!("glyph `{}` has no rows", key.name());
        }
        records.push(GlyphRecord::compile(key, &grid));
    }

    for key in GlyphKey::ALL {
        if !records.iter().any(|r| r.key == key) {
            warn!("glyph `{}` missing from source", key.name());
        }
    }
    Ok(records)
}

/// Text artifact, one glyph per line
fn render_text(records: &[GlyphRecord], source_name: &str) -> Result<String> {
    let mut out = String::new();
    writeln!(out, "# Font artifact: <key> <width>x<height>: (x,y,w,h) ...")?;
    writeln!(out, "# Generated by glucolume-fontc from {}.", source_name)?;
    writeln!(out)?;
    for record in records {
        record.write_line(&mut out)?;
        out.push('\n');
    }
    Ok(out)
}

fn render_binary(records: &[GlyphRecord]) -> Result<Vec<u8>> {
    postcard::to_stdvec(records).context("encoding postcard artifact")
}

/// Parse a text artifact back into records
fn parse_text(artifact: &str) -> Result<Vec<GlyphRecord>> {
    let mut records = Vec::new();
    for (index, line) in artifact.lines().enumerate() {
        let record = GlyphRecord::parse_line(line).map_err(|e| anyhow!("line {}: {}", index + 1, e))?;
        records.extend(record);
    }
    Ok(records)
}

/// Compare compiled records against an existing artifact
fn check(compiled: &[GlyphRecord], artifact: &[GlyphRecord]) -> Result<()> {
    for record in compiled {
        match artifact.iter().find(|r| r.key == record.key) {
            Some(existing) if existing == record => {}
            Some(_) => bail!("glyph `{}` differs from the artifact", record.key.name()),
            None => bail!("glyph `{}` missing from the artifact", record.key.name()),
        }
    }
    if artifact.len() != compiled.len() {
        bail!(
            "artifact has {} glyphs, source has {}",
            artifact.len(),
            compiled.len()
        );
    }
    Ok(())
}

fn source_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn run(opts: &Options) -> Result<()> {
    let source = fs::read_to_string(&opts.source)
        .with_context(|| format!("reading {}", opts.source.display()))?;
    let records = compile_source(&source)?;
    let blocks: usize = records.iter().map(|r| r.blocks.len()).sum();
    info!("Compiled {} glyphs into {} blocks", records.len(), blocks);

    if let Some(path) = &opts.check {
        let artifact = fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        check(&records, &parse_text(&artifact)?)
            .with_context(|| format!("{} is out of date", path.display()))?;
        info!("{} matches {}", path.display(), opts.source.display());
        return Ok(());
    }

    match (&opts.output, opts.binary) {
        (Some(path), true) => {
            fs::write(path, render_binary(&records)?)
                .with_context(|| format!("writing {}", path.display()))?;
            info!("Wrote {}", path.display());
        }
        (Some(path), false) => {
            fs::write(path, render_text(&records, &source_name(&opts.source))?)
                .with_context(|| format!("writing {}", path.display()))?;
            info!("Wrote {}", path.display());
        }
        (None, _) => print!("{}", render_text(&records, &source_name(&opts.source))?),
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let opts = parse_args(std::env::args().skip(1))?;
    run(&opts)
}
