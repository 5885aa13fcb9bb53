//! Serialization of a finished path: an SVG style polyline and a CSV edge
//! list.

use std::{fmt, io};

use serde::{Deserialize, Serialize};
use svg::{node::element, Document};

use crate::{builder::Chord, geometry::Point, Grid, PinTable};

/// Polyline through every pin the thread visits, closed back to its start.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VectorPath {
    /// `from` pin of the first chord; `None` for an empty path.
    pub start: Option<Point<i64>>,
    /// `to` pin of every chord, in order.
    pub targets: Vec<Point<i64>>,
}

impl VectorPath {
    pub fn is_empty(&self) -> bool {
        self.start.is_none()
    }

    /// SVG document holding the path as a single unfilled `<path>`.
    pub fn to_svg(&self, grid: Grid, stroke: &Stroke) -> Document {
        let path = element::Path::new()
            .set("d", self.to_string())
            .set("stroke", stroke.color.as_str())
            .set("stroke-width", stroke.width)
            .set("fill", "none");
        Document::new()
            .set("width", grid.width)
            .set("height", grid.height)
            .set("viewBox", (0, 0, grid.width, grid.height))
            .add(path)
    }
}

/// `M x y L x y ... Z`, or nothing for an empty path.
impl fmt::Display for VectorPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(start) = self.start else {
            return Ok(());
        };
        write!(f, "M{} {} ", start.x, start.y)?;
        for target in &self.targets {
            write!(f, "L{} {} ", target.x, target.y)?;
        }
        f.write_str("Z")
    }
}

/// Presentation of the exported thread.
#[derive(Clone, Debug, PartialEq)]
pub struct Stroke {
    pub color: String,
    pub width: f32,
}

impl Default for Stroke {
    fn default() -> Self {
        Self {
            color: String::from("black"),
            width: 0.5,
        }
    }
}

/// Coordinates of one chord.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub x1: i64,
    pub y1: i64,
    pub x2: i64,
    pub y2: i64,
}

/// One [`Edge`] per chord, in path order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EdgeTable {
    pub edges: Vec<Edge>,
}

impl EdgeTable {
    pub const HEADER: &'static str = "x1,y1,x2,y2";

    pub fn write_csv<W: io::Write>(&self, mut writer: W) -> io::Result<()> {
        writeln!(writer, "{}", Self::HEADER)?;
        for edge in &self.edges {
            writeln!(writer, "{},{},{},{}", edge.x1, edge.y1, edge.x2, edge.y2)?;
        }
        writer.flush()
    }
}

impl fmt::Display for EdgeTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", Self::HEADER)?;
        for edge in &self.edges {
            writeln!(f, "{},{},{},{}", edge.x1, edge.y1, edge.x2, edge.y2)?;
        }
        Ok(())
    }
}

/// Builds both output forms of `path`.
///
/// # Panics
///
/// If a chord refers to a pin missing from `pins`.
pub fn export(path: &[Chord], pins: &PinTable) -> (VectorPath, EdgeTable) {
    let vector = VectorPath {
        start: path.first().map(|chord| pins[chord.from].position),
        targets: path.iter().map(|chord| pins[chord.to].position).collect(),
    };
    let edges = path
        .iter()
        .map(|chord| {
            let from = pins[chord.from].position;
            let to = pins[chord.to].position;
            Edge {
                x1: from.x,
                y1: from.y,
                x2: to.x,
                y2: to.y,
            }
        })
        .collect();
    (vector, EdgeTable { edges })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verboser::Silent;

    fn square() -> PinTable {
        PinTable::circle(10, 4, 0.0, None, &mut Silent).unwrap()
    }

    fn path() -> Vec<Chord> {
        vec![
            Chord { from: 0, to: 2 },
            Chord { from: 2, to: 1 },
            Chord { from: 1, to: 3 },
        ]
    }

    #[test]
    fn vector_path_walks_the_chords() {
        let (vector, _) = export(&path(), &square());
        assert_eq!(vector.to_string(), "M21 11 L1 11 L11 21 L10 1 Z");
    }

    #[test]
    fn edge_table_uses_pin_coordinates_in_order() {
        let pins = square();
        let chords = path();
        let (_, table) = export(&chords, &pins);
        assert_eq!(table.edges.len(), chords.len());
        for (edge, chord) in table.edges.iter().zip(&chords) {
            assert_eq!(Point::new(edge.x1, edge.y1), pins[chord.from].position);
            assert_eq!(Point::new(edge.x2, edge.y2), pins[chord.to].position);
        }
    }

    #[test]
    fn csv_has_a_header_and_one_line_per_chord() {
        let (_, table) = export(&path(), &square());
        let mut out = Vec::new();
        table.write_csv(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "x1,y1,x2,y2\n21,11,1,11\n1,11,11,21\n11,21,10,1\n"
        );
        assert_eq!(table.to_string(), "x1,y1,x2,y2\n21,11,1,11\n1,11,11,21\n11,21,10,1\n");
    }

    #[test]
    fn empty_path() {
        let (vector, table) = export(&[], &square());
        assert!(vector.is_empty());
        assert_eq!(vector.to_string(), "");
        assert_eq!(table.to_string(), "x1,y1,x2,y2\n");
    }

    #[test]
    fn svg_document_carries_the_path() {
        let (vector, _) = export(&path(), &square());
        let svg = vector.to_svg(Grid::disk(10), &Stroke::default()).to_string();
        assert!(svg.contains(r#"d="M21 11 L1 11 L11 21 L10 1 Z""#));
        assert!(svg.contains(r#"stroke="black""#));
        assert!(svg.contains(r#"fill="none""#));
        assert!(svg.contains(r#"viewBox="0 0 21 21""#));
    }
}
