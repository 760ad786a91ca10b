//! Curve-set text files.
//!
//! A curve set names the three vertex curves of a ribbon edit by vertex
//! index. One directive per line, `#` starts a comment:
//!
//! ```text
//! # ring around the handle
//! closed
//! center 24 25 26 27
//! top    16 17 18 19
//! down   32 33 34 35
//! ```
//!
//! `closed` or `open` sets the curve kind (open when neither is given).
//! `center`, `top` and `down` take whitespace-separated vertex indices;
//! repeating a curve name appends to that curve, so long curves can be
//! wrapped over several lines.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{MeshError, Result};
use crate::mesh::{MeshIndex, VertexId};
use crate::ribbon::RibbonCurves;

/// Load a curve set from a file.
///
/// # Example
///
/// ```no_run
/// use meshrib::io::load_curves;
/// use meshrib::ribbon::RibbonCurves;
///
/// let curves: RibbonCurves = load_curves("part.curves").unwrap();
/// ```
pub fn load_curves<P: AsRef<Path>, I: MeshIndex>(path: P) -> Result<RibbonCurves<I>> {
    let text = fs::read_to_string(path)?;
    parse_curves(&text)
}

/// Parse a curve set from text.
///
/// Only the syntax is checked here; vertex ids are checked against a mesh by
/// [`RibbonCurves::validate`].
pub fn parse_curves<I: MeshIndex>(text: &str) -> Result<RibbonCurves<I>> {
    let mut closed: Option<bool> = None;
    let mut curves = RibbonCurves::new(Vec::new(), Vec::new(), Vec::new(), false);

    for (n, raw) in text.lines().enumerate() {
        let line = n + 1;
        let content = raw.split('#').next().unwrap_or("").trim();
        let mut words = content.split_whitespace();
        let Some(directive) = words.next() else {
            continue;
        };

        let target = match directive {
            "closed" | "open" => {
                let kind = directive == "closed";
                if let Some(extra) = words.next() {
                    return Err(format_error(line, format!("unexpected `{}` after `{}`", extra, directive)));
                }
                if closed.is_some_and(|previous| previous != kind) {
                    return Err(format_error(line, "curve set is declared both closed and open"));
                }
                closed = Some(kind);
                continue;
            }
            "center" => &mut curves.center,
            "top" => &mut curves.top,
            "down" => &mut curves.down,
            other => return Err(format_error(line, format!("unknown directive `{}`", other))),
        };

        let start = target.len();
        for word in words {
            let index: usize = word
                .parse()
                .map_err(|_| format_error(line, format!("`{}` is not a vertex index", word)))?;
            if index > I::MAX.to_usize() {
                return Err(format_error(
                    line,
                    format!("vertex index {} exceeds the largest index {}", index, I::MAX.to_usize()),
                ));
            }
            target.push(VertexId::new(index));
        }
        if target.len() == start {
            return Err(format_error(line, format!("`{}` has no vertex indices", directive)));
        }
    }

    curves.closed = closed.unwrap_or(false);
    log::debug!(
        "parsed curve set: {} center, {} top, {} down ({})",
        curves.center.len(),
        curves.top.len(),
        curves.down.len(),
        if curves.closed { "closed" } else { "open" }
    );
    Ok(curves)
}

/// Write a curve set in the text format read by [`parse_curves`].
pub fn write_curves<I: MeshIndex, W: Write>(curves: &RibbonCurves<I>, writer: &mut W) -> Result<()> {
    writeln!(writer, "{}", if curves.closed { "closed" } else { "open" })?;
    for (name, curve) in [("center", &curves.center), ("top", &curves.top), ("down", &curves.down)] {
        write!(writer, "{}", name)?;
        for v in curve {
            write!(writer, " {}", v.index())?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

/// Save a curve set to a file.
pub fn save_curves<P: AsRef<Path>, I: MeshIndex>(curves: &RibbonCurves<I>, path: P) -> Result<()> {
    let file = fs::File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_curves(curves, &mut writer)?;
    writer.flush()?;
    Ok(())
}

fn format_error(line: usize, message: impl Into<String>) -> MeshError {
    MeshError::CurveFormat {
        line,
        message: message.into(),
    }
}
