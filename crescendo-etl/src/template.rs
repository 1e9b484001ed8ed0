//! Named statement templates
//!
//! Each SQL statement is a named constant with `{placeholder}` markers
//! resolved by name at call time. Rendering fails if any placeholder is
//! left unresolved, so a missing or misspelled parameter can never reach
//! the warehouse as literal braces.

use crate::error::{EtlError, Result};

/// A SQL statement with a stable name and named placeholders
#[derive(Debug, Clone, Copy)]
pub struct StatementTemplate {
    name: &'static str,
    sql: &'static str,
}

impl StatementTemplate {
    pub const fn new(name: &'static str, sql: &'static str) -> Self {
        Self { name, sql }
    }

    /// Stable statement name, used for logging and error context
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The template text with placeholders intact
    pub fn raw(&self) -> &'static str {
        self.sql
    }

    /// Substitute every `{key}` marker and verify nothing is left over.
    pub fn render(&self, params: &[(&str, &str)]) -> Result<String> {
        let mut sql = self.sql.to_string();
        for (key, value) in params {
            sql = sql.replace(&format!("{{{key}}}"), value);
        }

        if let Some(placeholder) = first_placeholder(&sql) {
            return Err(EtlError::UnresolvedPlaceholder {
                statement: self.name.to_string(),
                placeholder,
            });
        }
        Ok(sql)
    }
}

/// Find the first `{identifier}` marker remaining in `sql`, if any.
fn first_placeholder(sql: &str) -> Option<String> {
    let bytes = sql.as_bytes();
    let mut i = 0;
    while let Some(open) = sql[i..].find('{').map(|p| p + i) {
        if let Some(close) = sql[open + 1..].find('}').map(|p| p + open + 1) {
            let inner = &sql[open + 1..close];
            if !inner.is_empty()
                && inner
                    .bytes()
                    .all(|b| b.is_ascii_alphanumeric() || b == b'_')
            {
                return Some(sql[open..=close].to_string());
            }
            i = open + 1;
        } else {
            return None;
        }
        if i >= bytes.len() {
            return None;
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const GREETING: StatementTemplate =
        StatementTemplate::new("greeting", "SELECT '{name}' FROM {table};");

    #[test]
    fn render_substitutes_by_name_regardless_of_order() {
        let sql = GREETING
            .render(&[("table", "users"), ("name", "ada")])
            .unwrap();
        assert_eq!(sql, "SELECT 'ada' FROM users;");
    }

    #[test]
    fn render_rejects_unresolved_placeholders() {
        let err = GREETING.render(&[("name", "ada")]).unwrap_err();
        match err {
            EtlError::UnresolvedPlaceholder {
                statement,
                placeholder,
            } => {
                assert_eq!(statement, "greeting");
                assert_eq!(placeholder, "{table}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn render_ignores_braces_that_are_not_markers() {
        let t = StatementTemplate::new("odd", "SELECT '{not a marker}' FROM {table};");
        let sql = t.render(&[("table", "users")]).unwrap();
        assert_eq!(sql, "SELECT '{not a marker}' FROM users;");
    }
}
