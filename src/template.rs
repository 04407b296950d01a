//! Field templating.
//!
//! A template maps a field name to a pattern with one `%s` placeholder, so
//! `dir: "/srv/%s"` lets every product write `dir: site-a` instead of the
//! full path. `%%` stands for a literal percent sign.

use crate::error::{Error, Result};
use std::collections::BTreeMap;

/// Field name → pattern.
pub type Templates = BTreeMap<String, String>;

const PLACEHOLDER: char = 's';

/// Resolves `raw` through the pattern registered for `field`, if any.
pub fn apply(field: &str, raw: &str, templates: &Templates) -> Result<String> {
    match templates.get(field) {
        Some(pattern) => substitute(field, pattern, raw),
        None => Ok(raw.to_string()),
    }
}

fn substitute(field: &str, pattern: &str, raw: &str) -> Result<String> {
    let mut out = String::with_capacity(pattern.len() + raw.len());
    let mut found = 0;
    let mut chars = pattern.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.peek() {
            Some('%') => {
                chars.next();
                out.push('%');
            }
            Some(&PLACEHOLDER) => {
                chars.next();
                found += 1;
                out.push_str(raw);
            }
            _ => out.push('%'),
        }
    }

    if found == 1 {
        Ok(out)
    } else {
        Err(Error::Template {
            field: field.to_string(),
            pattern: pattern.to_string(),
            found,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn templates(pairs: &[(&str, &str)]) -> Templates {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_registered_field_substitutes_placeholder() -> anyhow::Result<()> {
        let t = templates(&[("clone_url", "git@github.com:acme/%s.git")]);
        assert_eq!(
            apply("clone_url", "site-a", &t)?,
            "git@github.com:acme/site-a.git"
        );
        Ok(())
    }

    #[test]
    fn test_unregistered_field_is_identity() -> anyhow::Result<()> {
        let t = templates(&[("dir", "/srv/%s")]);
        assert_eq!(apply("pm2", "%s weird %%", &t)?, "%s weird %%");
        assert_eq!(apply("dir", "x", &Templates::new())?, "x");
        Ok(())
    }

    #[test]
    fn test_literal_text_is_preserved() -> anyhow::Result<()> {
        let t = templates(&[("dir", "100%% /srv/%s 50%d")]);
        assert_eq!(apply("dir", "a", &t)?, "100% /srv/a 50%d");
        Ok(())
    }

    #[test]
    fn test_value_is_inserted_verbatim() -> anyhow::Result<()> {
        let t = templates(&[("dir", "/srv/%s")]);
        assert_eq!(apply("dir", "%s%%", &t)?, "/srv/%s%%");
        Ok(())
    }

    #[test]
    fn test_pattern_needs_exactly_one_placeholder() {
        let none = templates(&[("dir", "/srv/static")]);
        assert!(matches!(
            apply("dir", "a", &none),
            Err(Error::Template { found: 0, .. })
        ));

        let two = templates(&[("dir", "/srv/%s/%s")]);
        assert!(matches!(
            apply("dir", "a", &two),
            Err(Error::Template { found: 2, .. })
        ));
    }

    #[test]
    fn test_apply_is_deterministic() -> anyhow::Result<()> {
        let t = templates(&[("dir", "/srv/%s")]);
        assert_eq!(apply("dir", "a", &t)?, apply("dir", "a", &t)?);
        Ok(())
    }
}
