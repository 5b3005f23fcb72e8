//! Document boundary — resolves the input JSON shape into typed lines
//!
//! Accepted shapes:
//!
//! ```text
//! [x1, y1, x2, y2, ...]                         single flat line
//! [{"x": x1, "y": y1}, ...]                     single point-object line
//! [LINE, LINE, ...]                             batch of lines
//! [{"points": LINE}, {"coords": LINE}, ...]     batch of keyed lines
//! {"lines": [LINE, ...]}                        batch
//! {"segments": [LINE, ...]}                     batch
//! {"points": LINE} / {"coords": LINE}           single keyed line
//! ```
//!
//! An object with neither `lines` nor `segments` is an unrecognized format:
//! a warning is logged and the whole document is read as one line.
//!
//! The shape is decided once here; the geometry core only ever sees
//! `&[Point]`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::geometry::Point;
use crate::{Error, Result};

/// Coordinates of one polyline as found in the document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LineShape {
    /// `[x1, y1, x2, y2, ...]`
    Flat(Vec<f64>),
    /// `[{"x": x1, "y": y1}, ...]`
    Objects(Vec<Point>),
}

impl LineShape {
    /// Pair up the coordinates. A trailing unpaired flat value is dropped.
    pub fn to_points(&self) -> Vec<Point> {
        match self {
            LineShape::Flat(values) => {
                if values.len() % 2 == 1 {
                    log::warn!(
                        "flat line has odd length {}, dropping trailing value",
                        values.len()
                    );
                }
                values
                    .chunks_exact(2)
                    .map(|c| Point::new(c[0], c[1]))
                    .collect()
            }
            LineShape::Objects(points) => points.clone(),
        }
    }
}

/// A batch element wrapped in an object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyedLine {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<LineShape>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coords: Option<LineShape>,
}

/// One element of a top-level batch array
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LineEntry {
    Bare(LineShape),
    Keyed(KeyedLine),
}

impl LineEntry {
    /// `points` wins over `coords` when both are present
    pub fn shape(&self) -> Option<&LineShape> {
        match self {
            LineEntry::Bare(shape) => Some(shape),
            LineEntry::Keyed(keyed) => keyed.points.as_ref().or(keyed.coords.as_ref()),
        }
    }

    pub fn to_points(&self) -> Result<Vec<Point>> {
        self.shape()
            .map(LineShape::to_points)
            .ok_or_else(|| Error::InvalidInput("line has neither `points` nor `coords`".into()))
    }
}

/// A parsed input document
#[derive(Debug, Clone, PartialEq)]
pub enum Document {
    /// Top-level array of lines
    Batch(Vec<LineEntry>),
    /// `{"lines": [...]}`
    Lines(Vec<LineShape>),
    /// `{"segments": [...]}`
    Segments(Vec<LineShape>),
    /// The whole document is one line
    Single(LineEntry),
}

impl Document {
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Array(items) => {
                if !items.is_empty() && items.iter().all(Value::is_number) {
                    let flat = serde_json::from_value(Value::Array(items))?;
                    Ok(Document::Single(LineEntry::Bare(LineShape::Flat(flat))))
                } else if !items.is_empty() && items.iter().all(is_point_object) {
                    let points = serde_json::from_value(Value::Array(items))?;
                    Ok(Document::Single(LineEntry::Bare(LineShape::Objects(points))))
                } else {
                    Ok(Document::Batch(serde_json::from_value(Value::Array(items))?))
                }
            }
            Value::Object(mut map) => {
                if let Some(lines) = map.remove("lines") {
                    Ok(Document::Lines(serde_json::from_value(lines)?))
                } else if let Some(segments) = map.remove("segments") {
                    Ok(Document::Segments(serde_json::from_value(segments)?))
                } else {
                    Self::single_fallback(Value::Object(map))
                }
            }
            other => Self::single_fallback(other),
        }
    }

    fn single_fallback(value: Value) -> Result<Self> {
        log::warn!("unrecognized document format, treating it as a single line");
        let entry: LineEntry = serde_json::from_value(value)
            .map_err(|e| Error::Parse(format!("unrecognized document: {}", e)))?;
        if entry.shape().is_none() {
            return Err(Error::Parse(
                "unrecognized document: expected `lines`, `segments`, `points` or `coords`"
                    .into(),
            ));
        }
        Ok(Document::Single(entry))
    }

    /// Batch documents tag their output with the element index
    pub fn is_indexed(&self) -> bool {
        !matches!(self, Document::Single(_))
    }

    pub fn len(&self) -> usize {
        match self {
            Document::Batch(entries) => entries.len(),
            Document::Lines(lines) | Document::Segments(lines) => lines.len(),
            Document::Single(_) => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Extract every line's points in document order
    pub fn to_lines(&self) -> Vec<Result<Vec<Point>>> {
        match self {
            Document::Batch(entries) => entries.iter().map(LineEntry::to_points).collect(),
            Document::Lines(lines) | Document::Segments(lines) => {
                lines.iter().map(|l| Ok(l.to_points())).collect()
            }
            Document::Single(entry) => vec![entry.to_points()],
        }
    }
}

/// Read a coordinate buffer: a flat numeric array, or an object with `coords`
pub fn coords_from_json(json: &str) -> Result<Vec<f64>> {
    coords_from_value(serde_json::from_str(json)?)
}

pub fn coords_from_value(value: Value) -> Result<Vec<f64>> {
    let coords = match value {
        Value::Object(mut map) => map
            .remove("coords")
            .ok_or_else(|| Error::Parse("object has no `coords` field".into()))?,
        other => other,
    };
    Ok(serde_json::from_value(coords)?)
}

/// Read several buffers: an array whose elements are each accepted by
/// [`coords_from_value`], such as a processed output document
pub fn buffers_from_json(json: &str) -> Result<Vec<Vec<f64>>> {
    let items: Vec<Value> = serde_json::from_str(json)?;
    items.into_iter().map(coords_from_value).collect()
}

fn is_point_object(value: &Value) -> bool {
    value
        .as_object()
        .is_some_and(|o| o.contains_key("x") && o.contains_key("y"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points(doc: &Document) -> Vec<Vec<Point>> {
        doc.to_lines().into_iter().map(|l| l.unwrap()).collect()
    }

    #[test]
    fn test_flat_single_line() {
        let doc = Document::from_json("[0, 0, 10, 0, 10, 10]").unwrap();
        assert!(!doc.is_indexed());
        assert_eq!(
            points(&doc),
            vec![vec![
                Point::new(0.0, 0.0),
                Point::new(10.0, 0.0),
                Point::new(10.0, 10.0)
            ]]
        );
    }

    #[test]
    fn test_point_object_single_line() {
        let doc = Document::from_json(r#"[{"x": 1, "y": 2}, {"x": 3.5, "y": -4}]"#).unwrap();
        assert_eq!(
            points(&doc),
            vec![vec![Point::new(1.0, 2.0), Point::new(3.5, -4.0)]]
        );
    }

    #[test]
    fn test_batch_of_mixed_entries() {
        let doc = Document::from_json(
            r#"[
                [0, 0, 1, 1],
                {"points": [2, 2, 3, 3]},
                {"coords": [{"x": 4, "y": 4}]},
                {"points": [5, 5], "coords": [9, 9]}
            ]"#,
        )
        .unwrap();
        assert!(doc.is_indexed());
        assert_eq!(doc.len(), 4);
        let lines = points(&doc);
        assert_eq!(lines[0][1], Point::new(1.0, 1.0));
        assert_eq!(lines[1][0], Point::new(2.0, 2.0));
        assert_eq!(lines[2], vec![Point::new(4.0, 4.0)]);
        assert_eq!(lines[3], vec![Point::new(5.0, 5.0)]);
    }

    #[test]
    fn test_lines_and_segments_containers() {
        let doc = Document::from_json(r#"{"lines": [[0, 0, 1, 0], [5, 5, 6, 6]]}"#).unwrap();
        assert!(matches!(doc, Document::Lines(ref l) if l.len() == 2));

        let doc = Document::from_json(r#"{"segments": [[0, 0, 1, 0]]}"#).unwrap();
        assert!(matches!(doc, Document::Segments(ref l) if l.len() == 1));
    }

    #[test]
    fn test_keyed_single_line() {
        let doc = Document::from_json(r#"{"coords": [1, 2, 3, 4]}"#).unwrap();
        assert!(!doc.is_indexed());
        assert_eq!(points(&doc)[0].len(), 2);
    }

    #[test]
    fn test_odd_flat_length_drops_trailing() {
        let shape = LineShape::Flat(vec![1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(
            shape.to_points(),
            vec![Point::new(1.0, 2.0), Point::new(3.0, 4.0)]
        );
    }

    #[test]
    fn test_keyed_entry_without_line_is_element_error() {
        let doc = Document::from_json(r#"[{"name": "nope"}, [0, 0, 1, 1]]"#).unwrap();
        let lines = doc.to_lines();
        assert!(matches!(lines[0], Err(Error::InvalidInput(_))));
        assert!(lines[1].is_ok());
    }

    #[test]
    fn test_empty_array_is_empty_batch() {
        let doc = Document::from_json("[]").unwrap();
        assert!(doc.is_empty());
        assert!(doc.is_indexed());
    }

    #[test]
    fn test_unrecognized_object_read_as_single_line() {
        let doc = Document::from_json(r#"{"name": "stroke", "points": [0, 0, 3, 4]}"#).unwrap();
        assert!(matches!(doc, Document::Single(LineEntry::Keyed(_))));
        assert_eq!(
            points(&doc),
            vec![vec![Point::new(0.0, 0.0), Point::new(3.0, 4.0)]]
        );
    }

    #[test]
    fn test_rejects_unrecognized() {
        assert!(matches!(Document::from_json("42"), Err(Error::Parse(_))));
        assert!(matches!(Document::from_json("\"x\""), Err(Error::Parse(_))));
        assert!(matches!(
            Document::from_json(r#"{"shapes": []}"#),
            Err(Error::Parse(_))
        ));
        assert!(matches!(Document::from_json("{"), Err(Error::Parse(_))));
    }

    #[test]
    fn test_non_numeric_value_is_parse_error() {
        let err = Document::from_json(r#"{"lines": [[0, "a", 1, 1]]}"#).unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn test_coords_from_json() {
        assert_eq!(coords_from_json("[1, -2, 3, 4]").unwrap(), vec![1.0, -2.0, 3.0, 4.0]);
        assert_eq!(
            coords_from_json(r#"{"coords": [5, 6], "scaleFactor": 1.0}"#).unwrap(),
            vec![5.0, 6.0]
        );
        assert!(coords_from_json(r#"{"points": []}"#).is_err());
    }

    #[test]
    fn test_buffers_from_processed_output() {
        let buffers = buffers_from_json(
            r#"[{"coords": [1, 2], "scaleFactor": 2.0, "index": 0}, [3, 4]]"#,
        )
        .unwrap();
        assert_eq!(buffers, vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
        assert!(buffers_from_json(r#"{"coords": [1, 2]}"#).is_err());
    }
}
