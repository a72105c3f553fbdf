//! Settings read from the environment
//!
//! Expected environment variables (all optional):
//! - RETL_DELIMITER: default CSV delimiter, a single character or `TAB`
//! - RETL_SOURCE_FORMAT: default source format tag
//! - RETL_TARGET_FORMAT: default destination format tag
//!
//! The binary sources a dotenv file before reading these.

use crate::error::EtlError;
use crate::format::{Delimiter, Format, FormatTag};
use eyre::{Context, Result};
use std::path::Path;

pub const DELIMITER_VAR: &str = "RETL_DELIMITER";
pub const SOURCE_FORMAT_VAR: &str = "RETL_SOURCE_FORMAT";
pub const TARGET_FORMAT_VAR: &str = "RETL_TARGET_FORMAT";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub delimiter: Option<Delimiter>,
    pub source_format: Option<String>,
    pub target_format: Option<String>,
}

impl Settings {
    /// Load settings from environment variables
    pub fn from_env() -> Result<Self> {
        // Unlike the format tags, a lone space is a usable delimiter
        let delimiter = match std::env::var(DELIMITER_VAR).ok().filter(|raw| !raw.is_empty()) {
            Some(raw) => Some(
                raw.parse::<Delimiter>()
                    .with_context(|| format!("Invalid {}", DELIMITER_VAR))?,
            ),
            None => None,
        };

        Ok(Self {
            delimiter,
            source_format: non_empty_var(SOURCE_FORMAT_VAR),
            target_format: non_empty_var(TARGET_FORMAT_VAR),
        })
    }

    /// Pick a source format: flag, then setting, then file extension
    pub fn source_format_for(&self, flag: Option<&str>, path: &Path) -> Result<FormatTag, EtlError> {
        pick_format(flag, self.source_format.as_deref(), path)
    }

    /// Pick a destination format: flag, then setting, then file extension
    pub fn target_format_for(&self, flag: Option<&str>, path: &Path) -> Result<FormatTag, EtlError> {
        pick_format(flag, self.target_format.as_deref(), path)
    }

    /// Pick a delimiter: flag, then setting, then TAB for `.tsv` sources, then `;`
    pub fn delimiter_for(&self, flag: Option<Delimiter>, path: &Path) -> Delimiter {
        flag.or(self.delimiter).unwrap_or_else(|| {
            let is_tsv = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("tsv"));
            if is_tsv {
                Delimiter::TAB
            } else {
                Delimiter::default()
            }
        })
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn pick_format(flag: Option<&str>, setting: Option<&str>, path: &Path) -> Result<FormatTag, EtlError> {
    if let Some(tag) = flag.or(setting) {
        return Ok(FormatTag::new(tag));
    }
    Format::from_path(path)
        .map(FormatTag::from)
        .ok_or_else(|| EtlError::UnsupportedFormat(path.display().to_string()))
}
