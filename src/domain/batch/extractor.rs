//! Extractor paths for narrowing a per-key response slice

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Ordered path into a JSON value, e.g. `data.post` or `["items", "0"]`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "ExtractorRepr", into = "Vec<String>")]
pub struct Extractor {
    segments: Vec<String>,
}

impl Extractor {
    /// Builds an extractor from a dot-separated path
    ///
    /// An empty path has no segments and extracts the whole value.
    pub fn parse(path: &str) -> Self {
        if path.is_empty() {
            return Self {
                segments: Vec::new(),
            };
        }

        Self {
            segments: path.split('.').map(str::to_string).collect(),
        }
    }

    /// Builds an extractor from explicit path segments
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Walks the path and returns a copy of the value found there
    ///
    /// Objects are navigated by field name and arrays by index. A missing
    /// segment or a scalar in the middle of the path yields `None`.
    pub fn extract(&self, value: &Value) -> Option<Value> {
        self.navigate(value).cloned()
    }

    fn navigate<'a>(&self, value: &'a Value) -> Option<&'a Value> {
        let mut current = value;

        for segment in &self.segments {
            current = match current {
                Value::Object(obj) => obj.get(segment)?,
                Value::Array(arr) => arr.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }

        Some(current)
    }
}

impl From<&str> for Extractor {
    fn from(path: &str) -> Self {
        Self::parse(path)
    }
}

impl From<String> for Extractor {
    fn from(path: String) -> Self {
        Self::parse(&path)
    }
}

impl From<Vec<String>> for Extractor {
    fn from(segments: Vec<String>) -> Self {
        Self { segments }
    }
}

impl From<Extractor> for Vec<String> {
    fn from(extractor: Extractor) -> Self {
        extractor.segments
    }
}

impl fmt::Display for Extractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

/// Accepts either `"a.b"` or `["a", "b"]` when deserializing
#[derive(Deserialize)]
#[serde(untagged)]
enum ExtractorRepr {
    Path(String),
    Segments(Vec<String>),
}

impl From<ExtractorRepr> for Extractor {
    fn from(repr: ExtractorRepr) -> Self {
        match repr {
            ExtractorRepr::Path(path) => Self::parse(&path),
            ExtractorRepr::Segments(segments) => Self { segments },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_nested_object() {
        let value = json!({"data": {"post": {"title": "Hello"}}});
        let extractor = Extractor::parse("data.post");

        assert_eq!(extractor.extract(&value), Some(json!({"title": "Hello"})));
    }

    #[test]
    fn test_extract_array_index() {
        let value = json!({"items": [{"id": 1}, {"id": 2}]});
        let extractor = Extractor::from_segments(["items", "1", "id"]);

        assert_eq!(extractor.extract(&value), Some(json!(2)));
    }

    #[test]
    fn test_missing_segment_is_absent() {
        let value = json!({"data": {"post": null}});

        assert_eq!(Extractor::parse("data.posts").extract(&value), None);
        assert_eq!(Extractor::parse("data.post.title").extract(&value), None);
        assert_eq!(Extractor::parse("items.x").extract(&json!({"items": [1]})), None);
    }

    #[test]
    fn test_scalar_intermediate_is_absent() {
        let value = json!({"count": 0});
        assert_eq!(Extractor::parse("count.value").extract(&value), None);
    }

    #[test]
    fn test_null_leaf_is_returned() {
        let value = json!({"data": {"post": null}});
        assert_eq!(Extractor::parse("data.post").extract(&value), Some(Value::Null));
    }

    #[test]
    fn test_empty_path_returns_whole_value() {
        let value = json!({"title": "Hello"});
        let extractor = Extractor::parse("");

        assert!(extractor.segments().is_empty());
        assert_eq!(extractor.extract(&value), Some(value));

        let from_string: Extractor = serde_json::from_value(json!("")).unwrap();
        assert_eq!(from_string, extractor);
    }

    #[test]
    fn test_deserialize_both_forms() {
        let from_path: Extractor = serde_json::from_value(json!("data.post")).unwrap();
        let from_segments: Extractor = serde_json::from_value(json!(["data", "post"])).unwrap();

        assert_eq!(from_path, from_segments);
        assert_eq!(from_path.to_string(), "data.post");
    }
}
