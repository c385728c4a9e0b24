//! Simple SQL filter expression rendering.
//!
//! The explore UI previews ad-hoc filters as a SQL-like fragment
//! (`country IN ('FR', 'DE')`). [`simple_sql_expression`] produces that
//! fragment from a column, an operator, and the value(s) being compared.
//!
//! The renderer is a total function: absent or partial inputs degrade to a
//! defined string (possibly empty) instead of erroring. It is a best-effort
//! display formatter, not a validator; validation belongs to the caller.

use std::fmt;

/// Operators whose comparator always renders as a parenthesized list.
///
/// Matching is exact and case-sensitive: `in` or `In` are ordinary
/// operators and do not trigger list promotion.
const MULTI_OPERATORS: [&str; 2] = ["IN", "NOT IN"];

/// A scalar comparison value.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlScalar {
    /// Free text. Renders single-quoted unless it parses as a number.
    Text(String),
    /// An integer. Renders unquoted.
    Int(i64),
    /// A float. Renders unquoted, shortest form (`1.0` renders as `1`).
    Float(f64),
}

impl SqlScalar {
    /// Render the scalar as a SQL literal.
    ///
    /// Text that parses entirely as a number renders unquoted in canonical
    /// numeric form (`"0"` renders as `0`). Any other text renders
    /// single-quoted with embedded quotes doubled.
    pub fn render(&self) -> String {
        match self {
            SqlScalar::Int(n) => n.to_string(),
            SqlScalar::Float(f) => f.to_string(),
            SqlScalar::Text(s) => match numeric_literal(s) {
                Some(canonical) => canonical,
                None => quote_text(s),
            },
        }
    }
}

impl fmt::Display for SqlScalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl From<&str> for SqlScalar {
    fn from(s: &str) -> Self {
        SqlScalar::Text(s.to_string())
    }
}

impl From<String> for SqlScalar {
    fn from(s: String) -> Self {
        SqlScalar::Text(s)
    }
}

impl From<i64> for SqlScalar {
    fn from(n: i64) -> Self {
        SqlScalar::Int(n)
    }
}

impl From<i32> for SqlScalar {
    fn from(n: i32) -> Self {
        SqlScalar::Int(n.into())
    }
}

impl From<f64> for SqlScalar {
    fn from(f: f64) -> Self {
        SqlScalar::Float(f)
    }
}

/// The value side of a filter expression: one scalar or an ordered list.
///
/// Constructed explicitly at call sites; `From` impls cover the common
/// shapes (`"foo".into()`, `vec![0i64, 1, 2].into()`).
#[derive(Debug, Clone, PartialEq)]
pub enum Comparator {
    /// A single value.
    Scalar(SqlScalar),
    /// An ordered list of values.
    List(Vec<SqlScalar>),
}

impl From<SqlScalar> for Comparator {
    fn from(scalar: SqlScalar) -> Self {
        Comparator::Scalar(scalar)
    }
}

impl From<&str> for Comparator {
    fn from(s: &str) -> Self {
        Comparator::Scalar(s.into())
    }
}

impl From<String> for Comparator {
    fn from(s: String) -> Self {
        Comparator::Scalar(s.into())
    }
}

impl From<i64> for Comparator {
    fn from(n: i64) -> Self {
        Comparator::Scalar(n.into())
    }
}

impl From<i32> for Comparator {
    fn from(n: i32) -> Self {
        Comparator::Scalar(n.into())
    }
}

impl From<f64> for Comparator {
    fn from(f: f64) -> Self {
        Comparator::Scalar(f.into())
    }
}

impl<S: Into<SqlScalar>> From<Vec<S>> for Comparator {
    fn from(values: Vec<S>) -> Self {
        Comparator::List(values.into_iter().map(Into::into).collect())
    }
}

/// Attempt to read `s` as a numeric literal, returning its canonical form.
///
/// `"0"` and `"0.0"` both canonicalize to `0`, `"007"` to `7`. A string
/// that does not parse entirely as a plain decimal integer or finite float
/// is not numeric.
pub fn numeric_literal(s: &str) -> Option<String> {
    if let Ok(n) = s.parse::<i64>() {
        return Some(n.to_string());
    }
    match s.parse::<f64>() {
        Ok(f) if f.is_finite() => Some(f.to_string()),
        _ => None,
    }
}

/// Single-quote `s`, doubling every embedded quote: `it's` renders as
/// `'it''s'`.
fn quote_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for ch in s.chars() {
        if ch == '\'' {
            out.push('\'');
            out.push('\'');
        } else {
            out.push(ch);
        }
    }
    out.push('\'');
    out
}

/// Render a simple SQL filter fragment from its parts.
///
/// Rules, applied in order:
///
/// 1. No subject: the result is empty, whatever else is set.
/// 2. No operator: the subject alone.
/// 3. No comparator (or an empty list): `"{subject} {operator}"`.
/// 4. Otherwise `"{subject} {operator} {comparator}"`, where a list
///    renders parenthesized and comma-separated, a scalar under `IN` /
///    `NOT IN` is promoted to a one-element list, and each value renders
///    per [`SqlScalar::render`].
///
/// # Example
/// ```
/// use chartreq::simple_sql_expression;
///
/// let sql = simple_sql_expression(Some("country"), Some("IN"), Some(vec!["FR", "DE"].into()));
/// assert_eq!(sql, "country IN ('FR', 'DE')");
/// ```
pub fn simple_sql_expression(
    subject: Option<&str>,
    operator: Option<&str>,
    comparator: Option<Comparator>,
) -> String {
    let Some(subject) = subject else {
        return String::new();
    };
    let Some(operator) = operator else {
        return subject.to_string();
    };

    let values: &[SqlScalar] = match &comparator {
        None => &[],
        Some(Comparator::Scalar(value)) => std::slice::from_ref(value),
        Some(Comparator::List(values)) => values.as_slice(),
    };
    if values.is_empty() {
        return format!("{subject} {operator}");
    }

    let rendered: Vec<String> = values.iter().map(SqlScalar::render).collect();
    let as_list = MULTI_OPERATORS.contains(&operator)
        || matches!(&comparator, Some(Comparator::List(_)));
    if as_list {
        format!("{subject} {operator} ({})", rendered.join(", "))
    } else {
        format!("{subject} {operator} {}", rendered[0])
    }
}
