//! Human-readable rendering of executed queries.
//!
//! The rendered text is written to the audit log and shown to the user.
//! It is never sent to the catalog driver.

use crate::error::RenderError;
use crate::scaffold::{CANONICAL_PREFIXES, strip_scaffold};
use crate::sqlfmt;
use crate::template::{QueryTemplate, Segment};
use crate::value::ParamMap;

/// Turns a template plus parameters into display text.
#[derive(Debug, Clone)]
pub struct QueryRenderer {
    scaffolds: Vec<&'static str>,
}

impl Default for QueryRenderer {
    fn default() -> Self {
        Self {
            scaffolds: CANONICAL_PREFIXES.to_vec(),
        }
    }
}

impl QueryRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom set of CTE prefixes to strip instead of the catalog's.
    pub fn with_scaffolds(scaffolds: Vec<&'static str>) -> Self {
        Self { scaffolds }
    }

    /// Substitute `params` into `template`, strip CTE scaffolding and
    /// pretty-print the result.
    ///
    /// Text values are single-quoted; integers and NULL are inserted as-is.
    /// Every placeholder needs a parameter and every parameter needs a
    /// placeholder.
    pub fn render(&self, template: &QueryTemplate, params: &ParamMap) -> Result<String, RenderError> {
        template.check_params(params)?;

        let mut substituted = String::with_capacity(template.text().len());
        for segment in template.segments()? {
            match segment {
                Segment::Literal(s) => substituted.push_str(s),
                Segment::Percent => substituted.push('%'),
                Segment::Placeholder(name) => {
                    let value = params
                        .get(name)
                        .ok_or_else(|| RenderError::MissingParameter(name.to_string()))?;
                    substituted.push_str(&value.display_literal());
                }
            }
        }

        let stripped = strip_scaffold(&substituted, &self.scaffolds);
        Ok(sqlfmt::format(stripped.trim()))
    }
}
