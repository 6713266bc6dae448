use crate::ir::Point;
use serde::Deserialize;
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PointsError {
    #[error("invalid points document: {0}")]
    Syntax(#[from] json5::Error),
    #[error("duplicate point id '{id}' at index {index}")]
    DuplicateId { id: String, index: usize },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PointsDocument {
    Wrapped { locations: Vec<RawLocation> },
    Bare(Vec<RawLocation>),
}

#[derive(Debug, Deserialize)]
struct RawLocation {
    id: Option<String>,
    name: String,
    display: Option<String>,
    lat: f64,
    lng: f64,
    #[serde(default)]
    info: String,
}

/// Parse a points file. Accepts JSON or JSON5, either `{"locations": [...]}`
/// or a bare array. Records without an id get their index as id, or
/// `"{index}-{n}"` with the smallest free `n` when the file already uses it.
pub fn parse_points(input: &str) -> Result<Vec<Point>, PointsError> {
    let document: PointsDocument = json5::from_str(input)?;
    let raw = match document {
        PointsDocument::Wrapped { locations } => locations,
        PointsDocument::Bare(locations) => locations,
    };

    let mut seen = HashSet::new();
    for (index, location) in raw.iter().enumerate() {
        if let Some(id) = &location.id {
            if !seen.insert(id.clone()) {
                return Err(PointsError::DuplicateId {
                    id: id.clone(),
                    index,
                });
            }
        }
    }

    let mut points = Vec::with_capacity(raw.len());
    for (index, location) in raw.into_iter().enumerate() {
        let id = match location.id {
            Some(id) => id,
            None => default_id(index, &mut seen),
        };
        points.push(Point {
            id,
            name: location.name,
            display: location.display,
            lat: location.lat,
            lng: location.lng,
            info: location.info,
        });
    }
    Ok(points)
}

fn default_id(index: usize, taken: &mut HashSet<String>) -> String {
    let mut id = index.to_string();
    let mut suffix = 1;
    while taken.contains(&id) {
        id = format!("{index}-{suffix}");
        suffix += 1;
    }
    taken.insert(id.clone());
    id
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_wrapped_locations() {
        let input = r#"{
            "locations": [
                { "name": "Sydney Sixers(16L)", "display": "Sydney Sixers", "lat": 11.1011, "lng": 76.9909,
                  "info": "Nivara Avenue Group \n3.5 to 4 cents" },
                { "name": "Location 2", "lat": 11.438517, "lng": 77.559867 }
            ]
        }"#;
        let points = parse_points(input).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].id, "0");
        assert_eq!(points[0].display_text(), "Sydney Sixers");
        assert_eq!(points[1].id, "1");
        assert_eq!(points[1].display_text(), "Location 2");
        assert!(points[1].info.is_empty());
    }

    #[test]
    fn parses_bare_array_with_json5_syntax() {
        let input = r#"[
            // trailing commas and comments are fine
            { id: "temple", name: "Pon Parappi Amman Kovil", lat: 11.43, lng: 77.55, },
        ]"#;
        let points = parse_points(input).unwrap();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].id, "temple");
    }

    #[test]
    fn empty_document_is_valid() {
        assert!(parse_points(r#"{"locations": []}"#).unwrap().is_empty());
    }

    #[test]
    fn rejects_duplicate_ids() {
        let input = r#"[
            { "id": "a", "name": "A", "lat": 0, "lng": 0 },
            { "id": "a", "name": "B", "lat": 1, "lng": 1 }
        ]"#;
        match parse_points(input) {
            Err(PointsError::DuplicateId { id, index }) => {
                assert_eq!(id, "a");
                assert_eq!(index, 1);
            }
            other => panic!("expected duplicate id error, got {other:?}"),
        }
    }

    #[test]
    fn default_ids_skip_explicit_ones() {
        let input = r#"[
            { "id": "1", "name": "A", "lat": 0, "lng": 0 },
            { "name": "B", "lat": 1, "lng": 1 },
            { "id": "1-1", "name": "C", "lat": 2, "lng": 2 },
            { "name": "D", "lat": 3, "lng": 3 }
        ]"#;
        let points = parse_points(input).unwrap();
        let ids: Vec<&str> = points.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "1-2", "1-1", "3"]);
    }

    #[test]
    fn explicit_duplicate_after_default_is_still_reported() {
        let input = r#"[
            { "name": "A", "lat": 0, "lng": 0 },
            { "id": "x", "name": "B", "lat": 1, "lng": 1 },
            { "id": "x", "name": "C", "lat": 2, "lng": 2 }
        ]"#;
        assert!(matches!(
            parse_points(input),
            Err(PointsError::DuplicateId { index: 2, .. })
        ));
    }

    #[test]
    fn rejects_missing_coordinates() {
        assert!(matches!(
            parse_points(r#"[{ "name": "A", "lat": 0 }]"#),
            Err(PointsError::Syntax(_))
        ));
    }
}
