//! Build script for glucolume-font
//!
//! Reads the font artifact (`glyphs.font`) and generates the fixed-key glyph
//! table that the renderer links against.

use std::env;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

const ARTIFACT: &str = "glyphs.font";

/// One parsed artifact line
struct Entry {
    key: String,
    width: u8,
    height: u8,
    blocks: Vec<[u8; 4]>,
}

fn main() {
    println!("cargo:rerun-if-changed={}", ARTIFACT);
    println!("cargo:rerun-if-changed=build.rs");

    let source = match fs::read_to_string(Path::new(ARTIFACT)) {
        Ok(source) => source,
        Err(e) => panic!("failed to read {}: {}", ARTIFACT, e),
    };

    let mut entries = Vec::new();
    for (index, line) in source.lines().enumerate() {
        match parse_line(line) {
            Ok(Some(entry)) => entries.push(entry),
            Ok(None) => {}
            Err(msg) => panic!("{}:{}: {}", ARTIFACT, index + 1, msg),
        }
    }

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    fs::write(out_dir.join("glyph_table.rs"), generate_rust(&entries)).unwrap();
}

/// Parse `<key> <w>x<h>: (x,y,w,h) ...`
fn parse_line(line: &str) -> Result<Option<Entry>, String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (head, body) = line
        .split_once(':')
        .ok_or_else(|| format!("missing ':' in `{}`", line))?;
    let mut head = head.split_whitespace();
    let key = head.next().ok_or("missing glyph key")?.to_string();
    let dims = head.next().ok_or("missing glyph dimensions")?;
    let (w, h) = dims
        .split_once('x')
        .ok_or_else(|| format!("bad dimensions `{}`", dims))?;
    let width: u8 = w.parse().map_err(|_| format!("bad width `{}`", w))?;
    let height: u8 = h.parse().map_err(|_| format!("bad height `{}`", h))?;

    let mut blocks = Vec::new();
    for tuple in body.split(')') {
        let tuple = tuple.trim();
        if tuple.is_empty() {
            continue;
        }
        let inner = tuple
            .strip_prefix('(')
            .ok_or_else(|| format!("bad block `{}`", tuple))?;
        let mut nums = [0u8; 4];
        let mut count = 0;
        for part in inner.split(',') {
            if count == 4 {
                return Err(format!("too many fields in `{}`", tuple));
            }
            nums[count] = part
                .trim()
                .parse()
                .map_err(|_| format!("bad number `{}`", part))?;
            count += 1;
        }
        if count != 4 {
            return Err(format!("block `{}` needs 4 fields", tuple));
        }
        let [x, y, bw, bh] = nums;
        if bw == 0 || bh == 0 {
            return Err(format!("empty block in `{}`", key));
        }
        if x as u16 + bw as u16 > width as u16 || y as u16 + bh as u16 > height as u16 {
            return Err(format!("block ({},{},{},{}) outside {}", x, y, bw, bh, dims));
        }
        blocks.push(nums);
    }

    Ok(Some(Entry {
        key,
        width,
        height,
        blocks,
    }))
}

/// Map an artifact key to its `GlyphKey` variant name
fn variant_name(key: &str) -> String {
    if key.chars().all(|c| c.is_ascii_digit()) {
        return format!("Digit{}", key);
    }
    key.split('_')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

fn generate_rust(entries: &[Entry]) -> String {
    let mut out = String::new();

    for entry in entries {
        let _ = writeln!(
            out,
            "static GLYPH_{}: Glyph = Glyph {{",
            entry.key.to_uppercase()
        );
        let _ = writeln!(out, "    key: GlyphKey::{},", variant_name(&entry.key));
        let _ = writeln!(out, "    width: {},", entry.width);
        let _ = writeln!(out, "    height: {},", entry.height);
        out.push_str("    blocks: &[\n");
        for [x, y, w, h] in &entry.blocks {
            let _ = writeln!(out, "        Block::new({}, {}, {}, {}),", x, y, w, h);
        }
        out.push_str("    ],\n};\n\n");
    }

    out.push_str("/// Fixed-key glyph lookup generated from the font artifact\n");
    out.push_str("#[allow(unreachable_patterns)]\n");
    out.push_str("pub(crate) fn lookup(key: GlyphKey) -> Option<&'static Glyph> {\n");
    out.push_str("    match key {\n");
    for entry in entries {
        let _ = writeln!(
            out,
            "        GlyphKey::{} => Some(&GLYPH_{}),",
            variant_name(&entry.key),
            entry.key.to_uppercase()
        );
    }
    out.push_str("        _ => None,\n    }\n}\n");

    out
}
