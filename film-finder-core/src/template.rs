//! Placeholder-bearing SQL templates.
//!
//! Templates use `%(name)s` markers and `%%` for a literal percent sign.
//! The same template feeds two strictly separate paths: the catalog driver
//! (which rewrites markers into its native binding syntax) and the display
//! renderer (which substitutes literal values and is never executed).

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::RenderError;
use crate::value::ParamMap;

/// A parsed piece of a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    Literal(&'a str),
    Percent,
    Placeholder(&'a str),
}

/// An immutable SQL template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryTemplate(String);

impl QueryTemplate {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn text(&self) -> &str {
        &self.0
    }

    /// Split the template into literal text and placeholder markers.
    pub fn segments(&self) -> Result<Vec<Segment<'_>>, RenderError> {
        let text = self.0.as_str();
        let mut segments = Vec::new();
        let mut literal_start = 0;
        let mut pos = 0;

        while let Some(rel) = text[pos..].find('%') {
            let at = pos + rel;
            if at > literal_start {
                segments.push(Segment::Literal(&text[literal_start..at]));
            }
            let rest = &text[at + 1..];
            if rest.starts_with('%') {
                segments.push(Segment::Percent);
                pos = at + 2;
            } else if let Some(inner) = rest.strip_prefix('(') {
                let close = inner.find(")s").ok_or_else(|| RenderError::Malformed {
                    offset: at,
                    detail: "expected ')s' after placeholder name".to_string(),
                })?;
                let name = &inner[..close];
                if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
                {
                    return Err(RenderError::Malformed {
                        offset: at,
                        detail: format!("invalid placeholder name '{}'", name),
                    });
                }
                segments.push(Segment::Placeholder(name));
                // '%' + '(' + name + ')s'
                pos = at + 2 + close + 2;
            } else {
                return Err(RenderError::Malformed {
                    offset: at,
                    detail: "unsupported format character".to_string(),
                });
            }
            literal_start = pos;
        }
        if literal_start < text.len() {
            segments.push(Segment::Literal(&text[literal_start..]));
        }
        Ok(segments)
    }

    /// Distinct placeholder names referenced by the template.
    pub fn placeholders(&self) -> Result<BTreeSet<&str>, RenderError> {
        Ok(self
            .segments()?
            .into_iter()
            .filter_map(|s| match s {
                Segment::Placeholder(name) => Some(name),
                _ => None,
            })
            .collect())
    }

    /// Verify that placeholders and parameter names match exactly.
    pub fn check_params(&self, params: &ParamMap) -> Result<(), RenderError> {
        let placeholders = self.placeholders()?;
        if let Some(missing) = placeholders.iter().find(|name| !params.contains(name)) {
            return Err(RenderError::MissingParameter(missing.to_string()));
        }
        if let Some(unused) = params.names().find(|name| !placeholders.contains(name)) {
            return Err(RenderError::UnusedParameter(unused.to_string()));
        }
        Ok(())
    }

    /// Rewrite markers for a driver using `<prefix>name` named parameters
    /// (`:name` for SQLite). Values are never interpolated.
    pub fn to_named_sql(&self, prefix: char) -> Result<String, RenderError> {
        let mut sql = String::with_capacity(self.0.len());
        for segment in self.segments()? {
            match segment {
                Segment::Literal(s) => sql.push_str(s),
                Segment::Percent => sql.push('%'),
                Segment::Placeholder(name) => {
                    sql.push(prefix);
                    sql.push_str(name);
                }
            }
        }
        Ok(sql)
    }
}

impl From<&str> for QueryTemplate {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segments_split_markers() {
        let t = QueryTemplate::new("a = %(x)s AND b LIKE '10%%'");
        let segs = t.segments().unwrap();
        assert_eq!(
            segs,
            vec![
                Segment::Literal("a = "),
                Segment::Placeholder("x"),
                Segment::Literal(" AND b LIKE '10"),
                Segment::Percent,
                Segment::Literal("'"),
            ]
        );
    }

    #[test]
    fn named_sql_uses_driver_markers() {
        let t = QueryTemplate::new("WHERE release_year BETWEEN %(year_1)s AND %(year_2)s");
        assert_eq!(
            t.to_named_sql(':').unwrap(),
            "WHERE release_year BETWEEN :year_1 AND :year_2"
        );
    }

    #[test]
    fn malformed_marker_is_rejected() {
        let t = QueryTemplate::new("WHERE title = %s");
        assert!(matches!(t.segments(), Err(RenderError::Malformed { offset: 14, .. })));
        let t = QueryTemplate::new("WHERE title = %(title");
        assert!(matches!(t.segments(), Err(RenderError::Malformed { .. })));
    }

    #[test]
    fn check_params_both_directions() {
        let t = QueryTemplate::new("WHERE year = %(y)s");
        assert!(t.check_params(&ParamMap::new().with("y", 1999)).is_ok());
        assert_eq!(
            t.check_params(&ParamMap::new()),
            Err(RenderError::MissingParameter("y".to_string()))
        );
        assert_eq!(
            t.check_params(&ParamMap::new().with("y", 1).with("z", 2)),
            Err(RenderError::UnusedParameter("z".to_string()))
        );
    }
}
