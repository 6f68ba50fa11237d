//! Path template matching.
//!
//! # Responsibilities
//! - Parse templates like `teams/{team_id}/users/{user_id}`
//! - Match a request path segment by segment
//! - Capture named parameters for the route handler
//!
//! # Design Decisions
//! - Whole-path match: segment counts must be equal
//! - Literal segments are case-sensitive
//! - Parameter segments accept ids only: digits and `-`, or a hyphenated UUID
//! - No regex; matching is a single pass over the segments

use uuid::Uuid;

use crate::client::types::{ClientError, ClientResult};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

/// A compiled path template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    template: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    /// Compile a template. `{name}` segments become parameters, everything
    /// else is matched literally.
    pub fn new(template: impl Into<String>) -> Self {
        let template = template.into();
        let segments = split_path(&template)
            .map(|seg| {
                match seg.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                    Some(name) if !name.is_empty() => Segment::Param(name.to_string()),
                    _ => Segment::Literal(seg.to_string()),
                }
            })
            .collect();

        Self { template, segments }
    }

    /// The template this pattern was compiled from.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Match `path` against this pattern, returning the captured parameters.
    pub fn match_path(&self, path: &str) -> Option<PathParams> {
        let mut params = PathParams::default();
        let mut parts = split_path(path);

        for segment in &self.segments {
            let part = parts.next()?;
            match segment {
                Segment::Literal(lit) => {
                    if lit != part {
                        return None;
                    }
                }
                Segment::Param(name) => {
                    if !is_id(part) {
                        return None;
                    }
                    params.push(name.clone(), part.to_string());
                }
            }
        }

        // Leftover segments mean the path is longer than the template
        if parts.next().is_some() {
            return None;
        }

        Some(params)
    }
}

/// Split on `/`, ignoring one leading and one trailing separator.
fn split_path(path: &str) -> impl Iterator<Item = &str> {
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    let trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);
    trimmed.split('/').filter(move |_| !trimmed.is_empty())
}

/// Hyphenated UUID length; shorter all-hex words such as `add` stay literals.
const UUID_LEN: usize = 36;

fn is_id(segment: &str) -> bool {
    if segment.is_empty() {
        return false;
    }
    if segment.bytes().all(|b| b.is_ascii_digit() || b == b'-') {
        return true;
    }
    segment.len() == UUID_LEN && Uuid::try_parse(segment).is_ok()
}

/// Named parameters captured from a path, in template order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams {
    values: Vec<(String, String)>,
}

impl PathParams {
    fn push(&mut self, name: String, value: String) {
        self.values.push((name, value));
    }

    /// Look up a parameter by name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Look up a parameter the route template is known to capture.
    pub fn require(&self, name: &'static str) -> ClientResult<&str> {
        self.get(name).ok_or(ClientError::MissingParam(name))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}
