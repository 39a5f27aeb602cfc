//! Content expressions: which children a node may hold.
//!
//! Deliberately small: one target (a group or node name) with a
//! quantifier.
//!
//! | Expression | Meaning |
//! |------------|---------|
//! | `inline*`  | zero or more nodes of group `inline` |
//! | `block+`   | one or more nodes of group `block` |
//! | `image?`   | at most one `image` node |
//! | `paragraph`| exactly one `paragraph` |

use crate::error::{SchemaError, SchemaResult};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentExpr {
    /// Group or node name
    pub target: String,
    pub min: usize,
    /// `None` = unbounded
    pub max: Option<usize>,
}

impl ContentExpr {
    pub fn parse(node: &str, expr: &str) -> SchemaResult<Self> {
        let expr = expr.trim();
        let (target, min, max) = match expr.chars().last() {
            Some('*') => (&expr[..expr.len() - 1], 0, None),
            Some('+') => (&expr[..expr.len() - 1], 1, None),
            Some('?') => (&expr[..expr.len() - 1], 0, Some(1)),
            _ => (expr, 1, Some(1)),
        };

        let valid_name = !target.is_empty()
            && target
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid_name {
            return Err(SchemaError::InvalidContentExpr {
                node: node.to_string(),
                expr: expr.to_string(),
            });
        }

        Ok(Self {
            target: target.to_string(),
            min,
            max,
        })
    }

    /// Whether a child with this name and group may appear
    pub fn allows(&self, name: &str, group: Option<&str>) -> bool {
        self.target == name || group == Some(self.target.as_str())
    }

    /// Whether `count` children satisfy the quantifier
    pub fn accepts_count(&self, count: usize) -> bool {
        count >= self.min && self.max.map_or(true, |max| count <= max)
    }
}

impl fmt::Display for ContentExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let suffix = match (self.min, self.max) {
            (0, None) => "*",
            (1, None) => "+",
            (0, Some(1)) => "?",
            _ => "",
        };
        write!(f, "{}{}", self.target, suffix)
    }
}
