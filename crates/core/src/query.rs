//! Structured, parameterized filter queries.
//!
//! Queries are data, not text. Field paths are lists of opaque segments and
//! comparison values travel separately from the query shape, so an
//! identifier such as `x" OR 1=1` is only ever compared, never parsed.
//! The [`fmt::Display`] impl renders a placeholder form for logs:
//!
//! ```text
//! SELECT tail.* FROM `default` WHERE type = $1 AND head.id = $2 ORDER BY tail.name
//! ```

use serde_json::Value;
use std::fmt;

/// Path to a field inside a JSON document, one segment per object level.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath {
    segments: Vec<String>,
}

impl FieldPath {
    /// Path with a single segment.
    pub fn field(name: impl Into<String>) -> Self {
        Self {
            segments: vec![name.into()],
        }
    }

    /// Extend the path by one segment. The segment is taken verbatim, dots included.
    pub fn then(mut self, name: impl Into<String>) -> Self {
        self.segments.push(name.into());
        self
    }

    /// Path segments.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Follow the path through nested objects.
    pub fn resolve<'a>(&self, doc: &'a Value) -> Option<&'a Value> {
        self.segments
            .iter()
            .try_fold(doc, |cur, seg| cur.as_object()?.get(seg))
    }
}

/// Bare identifiers print as-is; anything else is backtick-quoted.
fn is_plain_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, seg) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            if is_plain_identifier(seg) {
                f.write_str(seg)?;
            } else {
                write!(f, "`{}`", seg.replace('`', "``"))?;
            }
        }
        Ok(())
    }
}

/// A single filter condition.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// The field at `path` exists and equals `value`.
    Eq {
        /// Field to compare.
        path: FieldPath,
        /// Bound comparison value.
        value: Value,
    },
}

impl Predicate {
    /// Equality predicate.
    pub fn eq(path: FieldPath, value: impl Into<Value>) -> Self {
        Predicate::Eq {
            path,
            value: value.into(),
        }
    }

    /// Whether `doc` satisfies this predicate.
    pub fn matches(&self, doc: &Value) -> bool {
        match self {
            Predicate::Eq { path, value } => path.resolve(doc) == Some(value),
        }
    }
}

/// A filtered scan over one bucket, with optional projection and ordering.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    /// Bucket to scan.
    pub bucket: String,
    /// Conjunction of predicates; empty matches everything.
    pub filter: Vec<Predicate>,
    /// Sub-object to return instead of the whole document.
    pub projection: Option<FieldPath>,
    /// Field to sort ascending by. Evaluated on the whole document.
    pub order_by: Option<FieldPath>,
}

impl Query {
    /// Scan of `bucket` with no conditions.
    pub fn scan(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            filter: Vec::new(),
            projection: None,
            order_by: None,
        }
    }

    /// Add an equality condition.
    pub fn where_eq(mut self, path: FieldPath, value: impl Into<Value>) -> Self {
        self.filter.push(Predicate::eq(path, value));
        self
    }

    /// Return only the sub-object at `path`.
    pub fn project(mut self, path: FieldPath) -> Self {
        self.projection = Some(path);
        self
    }

    /// Sort ascending by `path`.
    pub fn order_by(mut self, path: FieldPath) -> Self {
        self.order_by = Some(path);
        self
    }

    /// Whether `doc` satisfies every predicate.
    pub fn matches(&self, doc: &Value) -> bool {
        self.filter.iter().all(|p| p.matches(doc))
    }

    /// Bound values in placeholder order (`$1`, `$2`, ...).
    pub fn params(&self) -> Vec<&Value> {
        self.filter
            .iter()
            .map(|p| match p {
                Predicate::Eq { value, .. } => value,
            })
            .collect()
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.projection {
            Some(p) => write!(f, "SELECT {}.*", p)?,
            None => f.write_str("SELECT *")?,
        }
        write!(f, " FROM `{}`", self.bucket.replace('`', "``"))?;
        for (i, pred) in self.filter.iter().enumerate() {
            f.write_str(if i == 0 { " WHERE " } else { " AND " })?;
            match pred {
                Predicate::Eq { path, .. } => write!(f, "{} = ${}", path, i + 1)?,
            }
        }
        if let Some(order) = &self.order_by {
            write!(f, " ORDER BY {}", order)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn arc_doc() -> Value {
        json!({
            "type": "arc",
            "tail": {"type": "user", "id": "1", "name": "Ann"},
            "head": {"type": "user", "id": "2", "name": "Bob"},
            "relation": {"follow": true, "a.b": true}
        })
    }

    #[test]
    fn resolve_nested_field() {
        let doc = arc_doc();
        let p = FieldPath::field("head").then("name");
        assert_eq!(p.resolve(&doc), Some(&json!("Bob")));
        assert_eq!(FieldPath::field("missing").resolve(&doc), None);
    }

    #[test]
    fn dotted_segment_is_one_key() {
        let doc = arc_doc();
        let p = FieldPath::field("relation").then("a.b");
        assert_eq!(p.resolve(&doc), Some(&json!(true)));
        // Not interpreted as relation -> a -> b
        let nested = FieldPath::field("relation").then("a").then("b");
        assert_eq!(nested.resolve(&doc), None);
    }

    #[test]
    fn resolve_through_non_object_is_none() {
        let doc = arc_doc();
        let p = FieldPath::field("type").then("x");
        assert_eq!(p.resolve(&doc), None);
    }

    #[test]
    fn query_matches_conjunction() {
        let doc = arc_doc();
        let q = Query::scan("default")
            .where_eq(FieldPath::field("type"), "arc")
            .where_eq(FieldPath::field("head").then("id"), "2");
        assert!(q.matches(&doc));

        let q = q.where_eq(FieldPath::field("relation").then("like"), true);
        assert!(!q.matches(&doc));
    }

    #[test]
    fn eq_does_not_coerce_types() {
        let doc = json!({"n": 1});
        assert!(!Predicate::eq(FieldPath::field("n"), "1").matches(&doc));
        assert!(Predicate::eq(FieldPath::field("n"), 1).matches(&doc));
    }

    #[test]
    fn display_uses_placeholders() {
        let q = Query::scan("default")
            .where_eq(FieldPath::field("type"), "arc")
            .where_eq(FieldPath::field("head").then("id"), "x\" OR 1=1")
            .project(FieldPath::field("tail"))
            .order_by(FieldPath::field("tail").then("name"));
        assert_eq!(
            q.to_string(),
            "SELECT tail.* FROM `default` WHERE type = $1 AND head.id = $2 ORDER BY tail.name"
        );
        assert_eq!(q.params()[1], &json!("x\" OR 1=1"));
    }

    #[test]
    fn display_quotes_unusual_segments() {
        let p = FieldPath::field("relation").then("x = true OR `y`");
        assert_eq!(p.to_string(), "relation.`x = true OR ``y```");
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn any_segment_is_one_key(outer in "[a-z]{1,4}", seg in ".{0,12}", n in any::<i64>()) {
                let doc = json!({ outer.clone(): { seg.clone(): n } });
                let p = FieldPath::field(outer).then(seg);
                prop_assert_eq!(p.resolve(&doc), Some(&json!(n)));
            }

            #[test]
            fn values_never_reach_display(value in ".{0,16}") {
                let q = Query::scan("b").where_eq(FieldPath::field("id"), value.clone());
                prop_assert_eq!(q.to_string(), "SELECT * FROM `b` WHERE id = $1");
                let expected = Value::String(value);
                prop_assert_eq!(q.params(), vec![&expected]);
            }
        }
    }
}
