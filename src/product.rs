//! Product normalization.
//!
//! Products are declared as a list of single-key mappings keyed by their
//! display name:
//!
//! ```yaml
//! products:
//!   - Site A:
//!       dir: site-a
//!       clone url: git@example.com:acme/site-a.git
//!       pm2: site-a
//!       steps:
//!         - Installing dependencies: npm ci
//! ```
//!
//! [`normalize`] flattens each entry into a [`Project`], resolving every
//! scalar field through the templates and replacing spaces in field names
//! with underscores.

use crate::error::{Error, ProductError, Result};
use crate::steps::{self, Step};
use crate::template::{self, Templates};
use serde_yaml::{Mapping, Value};
use std::collections::BTreeMap;

/// A normalized product, ready for the updater.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Project {
    pub verbose_name: String,
    pub dir: Option<String>,
    pub clone_url: Option<String>,
    /// pm2 service identifier; `None` when the app is not managed by pm2.
    pub pm2: Option<String>,
    /// Remote-tracking ref such as `origin/main`; `None` uses the upstream.
    pub remote_branch: Option<String>,
    pub steps: Vec<Step>,
    /// Declared fields with no dedicated meaning, under their underscored names.
    pub extra: BTreeMap<String, Value>,
}

impl Project {
    /// Name used for headers and the summary.
    pub fn display_name(&self) -> &str {
        [
            Some(self.verbose_name.as_str()),
            self.pm2.as_deref(),
            self.dir.as_deref(),
        ]
        .into_iter()
        .flatten()
        .find(|name| !name.is_empty())
        .unwrap_or_default()
    }

    pub fn dir(&self) -> Result<&str> {
        self.dir
            .as_deref()
            .ok_or(Error::MissingField { field: "dir" })
    }

    pub fn clone_url(&self) -> Result<&str> {
        self.clone_url
            .as_deref()
            .ok_or(Error::MissingField { field: "clone_url" })
    }
}

/// Renders scalar YAML values as text. Sequences, mappings and null are `None`.
pub(crate) fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Lazily normalizes `products`, one item per declared product, in order.
pub fn normalize<'a>(
    products: &'a [Value],
    templates: &'a Templates,
) -> impl Iterator<Item = std::result::Result<Project, ProductError>> + 'a {
    products
        .iter()
        .enumerate()
        .flat_map(move |(index, entry)| normalize_entry(index, entry, templates))
}

fn normalize_entry(
    index: usize,
    entry: &Value,
    templates: &Templates,
) -> Vec<std::result::Result<Project, ProductError>> {
    let position = format!("#{}", index + 1);
    let Value::Mapping(entry) = entry else {
        return vec![Err(ProductError {
            product: position,
            source: Error::InvalidProduct {
                reason: "expected a mapping from a product name to its fields".to_string(),
            },
        })];
    };

    entry
        .iter()
        .map(|(name, fields)| -> std::result::Result<Project, ProductError> {
            let verbose_name = match name {
                Value::Null => String::new(),
                other => scalar_text(other).ok_or_else(|| ProductError {
                    product: position.clone(),
                    source: Error::InvalidProduct {
                        reason: "product name must be a string".to_string(),
                    },
                })?,
            };
            let label = if verbose_name.is_empty() {
                position.clone()
            } else {
                verbose_name.clone()
            };
            normalize_fields(verbose_name, fields, templates)
                .map_err(|source| ProductError { product: label, source })
        })
        .collect()
}

fn normalize_fields(
    verbose_name: String,
    fields: &Value,
    templates: &Templates,
) -> Result<Project> {
    let empty = Mapping::new();
    let fields = match fields {
        Value::Mapping(fields) => fields,
        Value::Null => &empty,
        _ => {
            return Err(Error::InvalidProduct {
                reason: "fields must be a mapping".to_string(),
            });
        }
    };

    let mut project = Project {
        verbose_name,
        ..Project::default()
    };

    for (key, value) in fields {
        let raw_key = scalar_text(key).ok_or_else(|| Error::InvalidProduct {
            reason: format!("field name must be a string, got {:?}", key),
        })?;
        let value = resolve(&raw_key, value, templates)?;
        let key = raw_key.replace(' ', "_");

        match key.as_str() {
            "verbose_name" => {
                project.verbose_name = text_field(&key, &value)?.unwrap_or_default()
            }
            "dir" => project.dir = text_field(&key, &value)?,
            "clone_url" => project.clone_url = text_field(&key, &value)?,
            "pm2" => project.pm2 = text_field(&key, &value)?.filter(|s| !s.is_empty()),
            "remote_branch" => {
                project.remote_branch = text_field(&key, &value)?.filter(|s| !s.is_empty())
            }
            "steps" => project.steps = steps::from_value(&value)?,
            _ => {
                project.extra.insert(key, value);
            }
        }
    }

    Ok(project)
}

/// Templates only apply to scalars; anything else passes through untouched.
fn resolve(field: &str, value: &Value, templates: &Templates) -> Result<Value> {
    if !templates.contains_key(field) {
        return Ok(value.clone());
    }
    match scalar_text(value) {
        Some(raw) => Ok(Value::String(template::apply(field, &raw, templates)?)),
        None => Ok(value.clone()),
    }
}

fn text_field(key: &str, value: &Value) -> Result<Option<String>> {
    match value {
        Value::Null => Ok(None),
        other => scalar_text(other).map(Some).ok_or_else(|| Error::InvalidProduct {
            reason: format!("`{}` must be a string", key),
        }),
    }
}
