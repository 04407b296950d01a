//! Loading of the `.updater.yml` configuration document.

use crate::constants::CONFIG_FILENAME;
use crate::error::{Error, Result};
use crate::steps::{self, Step};
use crate::template::Templates;
use serde::Deserialize;
use serde_yaml::{Mapping, Value};
use std::path::{Path, PathBuf};

/// Everything read from the configuration file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub templates: Templates,
    /// Raw product declarations; see [`crate::product::normalize`].
    pub products: Vec<Value>,
    pub options: Options,
    pub before: Vec<Step>,
    pub after: Vec<Step>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Options {
    #[serde(rename = "show stdout")]
    pub show_stdout: ShowStdout,
}

/// Whether subprocess output is shown live, per step group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ShowStdout {
    pub before: bool,
    pub after: bool,
    /// Per-project steps.
    pub steps: bool,
}

impl Default for ShowStdout {
    fn default() -> Self {
        Self {
            before: false,
            after: true,
            steps: false,
        }
    }
}

/// On-disk shape. Every optional key tolerates an explicit null.
#[derive(Debug, Deserialize)]
struct RawDocument {
    products: Option<Vec<Value>>,
    templates: Option<Templates>,
    options: Option<Options>,
    before: Option<Vec<Mapping>>,
    after: Option<Vec<Mapping>>,
}

/// Path of the conventional configuration file in the current directory.
pub fn default_path() -> PathBuf {
    PathBuf::from(".").join(CONFIG_FILENAME)
}

/// Loads the configuration from the current directory.
pub fn load() -> Result<Document> {
    load_from(&default_path())
}

pub fn load_from(path: &Path) -> Result<Document> {
    if !path.is_file() {
        return Err(Error::ConfigNotFound {
            path: display_path(path),
        });
    }
    let text = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!("loaded configuration from {}", path.display());
    parse(&text, path)
}

/// Parses configuration text; `path` is only used in error messages.
pub fn parse(text: &str, path: &Path) -> Result<Document> {
    let parse_error = |source| Error::ConfigParse {
        path: display_path(path),
        source,
    };

    let value: Value = serde_yaml::from_str(text).map_err(parse_error)?;
    let value = match value {
        Value::Null => Value::Mapping(Mapping::new()),
        other => other,
    };
    let raw: RawDocument = serde_yaml::from_value(value).map_err(parse_error)?;

    let products = raw.products.ok_or_else(|| Error::ConfigMissingProducts {
        path: display_path(path),
    })?;

    Ok(Document {
        templates: raw.templates.unwrap_or_default(),
        products,
        options: raw.options.unwrap_or_default(),
        before: steps::parse_declarations(&raw.before.unwrap_or_default())?,
        after: steps::parse_declarations(&raw.after.unwrap_or_default())?,
    })
}

/// Drops a leading `./` so messages read `.updater.yml`.
fn display_path(path: &Path) -> PathBuf {
    path.strip_prefix(".").unwrap_or(path).to_path_buf()
}
