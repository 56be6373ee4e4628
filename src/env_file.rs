//! Installed-flag toggling in a line-oriented `KEY=value` env file.
//!
//! Only lines starting with `KEY=` are touched. Every other byte of the file,
//! including comments, blank lines and `\r\n` endings, is written back
//! verbatim.

use regex::{NoExpand, Regex};
use std::path::Path;

use crate::errors::SetupError;

/// Return `content` with `key` set to `value`.
///
/// Every line beginning with `key=` is replaced in place. When no such line
/// exists, `key=value` is appended on a new line.
pub fn apply_flag(content: &str, key: &str, value: bool) -> Result<String, SetupError> {
    Ok(apply_with(content, &key_pattern(key)?, key, value))
}

/// Current value of `key`, if the file defines it. The last definition wins.
pub fn read_flag(content: &str, key: &str) -> Result<Option<String>, SetupError> {
    Ok(read_with(content, &key_pattern(key)?, key))
}

fn apply_with(content: &str, pattern: &Regex, key: &str, value: bool) -> String {
    let line = format!("{key}={value}");

    if pattern.is_match(content) {
        return pattern.replace_all(content, NoExpand(&line)).into_owned();
    }

    let mut out = String::with_capacity(content.len() + line.len() + 1);
    out.push_str(content);
    if !content.is_empty() && !content.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(&line);
    out.push('\n');
    out
}

fn read_with(content: &str, pattern: &Regex, key: &str) -> Option<String> {
    pattern
        .find_iter(content)
        .last()
        .map(|m| m.as_str()[key.len() + 1..].to_string())
}

/// Rewrite `key` in the env file at `path`.
///
/// The file must already exist; it is never created here.
pub fn set_flag(path: &Path, key: &str, value: bool) -> Result<(), SetupError> {
    if !path.is_file() {
        return Err(SetupError::MissingEnvFile {
            path: path.to_path_buf(),
        });
    }

    let pattern = key_pattern(key)?;
    let io_err = |source| SetupError::EnvFileIo {
        path: path.to_path_buf(),
        source,
    };

    let content = std::fs::read_to_string(path).map_err(io_err)?;
    let previous = read_with(&content, &pattern, key);
    let updated = apply_with(&content, &pattern, key, value);
    std::fs::write(path, updated).map_err(io_err)?;

    tracing::debug!(
        path = %path.display(),
        key,
        previous = previous.as_deref().unwrap_or("<unset>"),
        value,
        "installed flag rewritten"
    );
    Ok(())
}

fn key_pattern(key: &str) -> Result<Regex, SetupError> {
    Regex::new(&format!(r"(?m)^{}=[^\r\n]*", regex::escape(key))).map_err(|source| {
        SetupError::InvalidKey {
            key: key.to_string(),
            source,
        }
    })
}
