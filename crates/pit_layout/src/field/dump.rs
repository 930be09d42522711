//! Plain-text field dump read by the field visualiser.
//!
//! ```text
//! intersect
//! 100 100
//! circularTreasure: 50.0 50.0 3.5
//! hole: 11.11111111111111 10.0 1.0 1.0 False
//! ```
use std::fmt;
use std::io::Write;

use super::{Field, FieldKind};
use crate::error::{Error, Result};
use crate::treasure::Treasure;

impl Field {
    /// Writes the field dump to `out`.
    pub fn write_dump<W: Write>(&self, mut out: W) -> Result<()> {
        let treasure = self.treasure.as_ref().ok_or(Error::TreasureNotPlaced)?;

        let tag = match self.kind {
            FieldKind::RealWorld => "realworld",
            // The visualiser draws polygons on the same canvas as shapes.
            _ => "intersect",
        };
        writeln!(out, "{tag}")?;
        writeln!(out, "{} {}", dimension(self.width), dimension(self.height))?;

        match treasure {
            Treasure::Circle(c) => writeln!(
                out,
                "circularTreasure: {} {} {}",
                Repr(c.centre.x),
                Repr(c.centre.y),
                Repr(c.radius)
            )?,
            Treasure::Rectangle(r) => writeln!(
                out,
                "rectangularTreasure: {} {} {} {}",
                Repr(r.centre.x),
                Repr(r.centre.y),
                Repr(r.width),
                Repr(r.height)
            )?,
            Treasure::Polygon(p) => {
                writeln!(out, "polygonTreasure: {}", p.polygon.vertices().len())?;
                for v in p.vertices() {
                    writeln!(out, "vertex: {} {}", Repr(v.x), Repr(v.y))?;
                }
            }
            Treasure::PointCloud(c) => {
                let b = c.bounds();
                writeln!(
                    out,
                    "realworldtreasure: {} {} {} {}",
                    Repr(b.min.x),
                    Repr(b.min.y),
                    Repr(b.max.x),
                    Repr(b.max.y)
                )?;
                for a in c.artefacts() {
                    writeln!(out, "artefact: {} {}", Repr(a.x), Repr(a.y))?;
                }
            }
        }

        for hole in &self.holes {
            let hit = treasure.intersects(hole)?;
            writeln!(
                out,
                "hole: {} {} {} {} {}",
                Repr(hole.centre_x),
                Repr(hole.centre_y),
                Repr(hole.width),
                Repr(hole.height),
                if hit { "True" } else { "False" }
            )?;
        }
        out.flush()?;
        Ok(())
    }

    /// The field dump as a string.
    pub fn dump(&self) -> Result<String> {
        let mut buf = Vec::new();
        self.write_dump(&mut buf)?;
        String::from_utf8(buf).map_err(|e| Error::Other(e.to_string()))
    }
}

/// Field sizes are usually whole numbers and are written without a fractional part.
fn dimension(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        Repr(v).to_string()
    }
}

/// Shortest round-trip float text as the visualiser's writer prints it: `2.0`, `0.25`, and
/// exponents with a sign and at least two digits (`1e-07`, `1.5e+16`).
struct Repr(f64);

impl fmt::Display for Repr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v = self.0;
        if v.is_nan() {
            return f.write_str("nan");
        }
        if v.is_infinite() {
            return f.write_str(if v < 0.0 { "-inf" } else { "inf" });
        }
        let text = format!("{v:?}");
        match text.split_once('e') {
            None => f.write_str(&text),
            Some((mantissa, exp)) => {
                let (sign, digits) = match exp.strip_prefix('-') {
                    Some(d) => ('-', d),
                    None => ('+', exp),
                };
                write!(f, "{mantissa}e{sign}{digits:0>2}")
            }
        }
    }
}
