//! Section/key reader for INI style configuration text
//!
//! The inventory code only talks to the [`SectionReader`] trait; [`IniFile`]
//! is the implementation backing configuration files on disk.

use std::fs;
use std::path::Path;

use tracing::warn;

use crate::error::{GetoError, Result};

/// Section whose values act as fallbacks for every other section
pub const DEFAULT_SECTION: &str = "DEFAULT";

/// Read access to sectioned key/value data
pub trait SectionReader {
    /// Value of `key` in `section`, or `None` when absent
    fn value(&self, section: &str, key: &str) -> Option<&str>;

    /// Keys of `section` in file order, or `None` when the section is absent
    fn keys(&self, section: &str) -> Option<Vec<&str>>;

    /// Like [`SectionReader::value`], but absence is an error
    fn require(&self, section: &str, key: &str) -> Result<&str> {
        self.value(section, key)
            .ok_or_else(|| GetoError::KeyNotFound {
                section: section.to_string(),
                key: key.to_string(),
            })
    }

    /// Like [`SectionReader::keys`], but absence is an error
    fn require_keys(&self, section: &str) -> Result<Vec<&str>> {
        self.keys(section)
            .ok_or_else(|| GetoError::SectionNotFound {
                section: section.to_string(),
            })
    }
}

#[derive(Debug, Clone, Default)]
struct Section {
    name: String,
    entries: Vec<(String, String)>,
}

impl Section {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            entries: Vec::new(),
        }
    }

    fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn insert(&mut self, key: &str, value: &str, line_no: usize) -> usize {
        if let Some(idx) = self.entries.iter().position(|(k, _)| k == key) {
            warn!(
                "Duplicate option \"{}\" in section \"{}\" at line {}, last value wins",
                key, self.name, line_no
            );
            self.entries[idx].1 = value.to_string();
            idx
        } else {
            self.entries.push((key.to_string(), value.to_string()));
            self.entries.len() - 1
        }
    }
}

/// Parsed INI document with section and key order preserved
#[derive(Debug, Clone, Default)]
pub struct IniFile {
    sections: Vec<Section>,
}

impl IniFile {
    /// Read and parse a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse INI text
    ///
    /// Supports `key = value` and `key: value`, `#`/`;` comments (inline
    /// ones must follow a space or tab), and indented continuation lines. Duplicate keys keep the position of
    /// their first occurrence and the value of their last.
    pub fn parse(content: &str) -> Result<Self> {
        let mut ini = IniFile::default();
        let mut current: Option<usize> = None;
        let mut last_entry: Option<usize> = None;

        for (idx, raw) in content.lines().enumerate() {
            let line_no = idx + 1;
            let line = strip_inline_comment(raw.trim());

            if line.is_empty() {
                last_entry = None;
                continue;
            }
            if line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            // Continuation of the previous value; an indented option is still an option
            if raw.starts_with(char::is_whitespace) && !is_option_or_header(line) {
                if let (Some(section), Some(entry)) = (current, last_entry) {
                    let value = &mut ini.sections[section].entries[entry].1;
                    if !value.is_empty() {
                        value.push('\n');
                    }
                    value.push_str(line);
                    continue;
                }
            }

            if let Some(header) = line.strip_prefix('[') {
                let name = header
                    .strip_suffix(']')
                    .ok_or_else(|| GetoError::malformed(line_no, "missing closing ']'"))?
                    .trim();
                if name.is_empty() {
                    return Err(GetoError::malformed(line_no, "empty section name"));
                }
                current = Some(ini.section_index_or_insert(name));
                last_entry = None;
                continue;
            }

            let section = current.ok_or_else(|| {
                GetoError::malformed(line_no, "option appears before any section header")
            })?;
            let (key, value) = split_option(line)
                .ok_or_else(|| GetoError::malformed(line_no, "expected 'key = value'"))?;
            if key.is_empty() {
                return Err(GetoError::malformed(line_no, "empty option name"));
            }

            last_entry = Some(ini.sections[section].insert(key, value, line_no));
        }

        Ok(ini)
    }

    fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    fn section_index_or_insert(&mut self, name: &str) -> usize {
        match self.sections.iter().position(|s| s.name == name) {
            Some(idx) => idx,
            None => {
                self.sections.push(Section::new(name));
                self.sections.len() - 1
            }
        }
    }
}

impl SectionReader for IniFile {
    fn value(&self, section: &str, key: &str) -> Option<&str> {
        let found = self.section(section)?;
        found.get(key).or_else(|| {
            if section == DEFAULT_SECTION {
                None
            } else {
                self.section(DEFAULT_SECTION)?.get(key)
            }
        })
    }

    fn keys(&self, section: &str) -> Option<Vec<&str>> {
        self.section(section)
            .map(|s| s.entries.iter().map(|(k, _)| k.as_str()).collect())
    }
}

/// Drop a trailing comment introduced by whitespace then `;` or `#`
fn strip_inline_comment(line: &str) -> &str {
    let cut = line
        .as_bytes()
        .windows(2)
        .position(|w| matches!(w[0], b' ' | b'\t') && matches!(w[1], b';' | b'#'));
    match cut {
        Some(pos) => line[..pos].trim_end(),
        None => line,
    }
}

fn is_option_or_header(line: &str) -> bool {
    line.starts_with('[') || line.contains(['=', ':'])
}

/// Split `key = value` / `key: value` at the first separator
fn split_option(line: &str) -> Option<(&str, &str)> {
    let pos = line.find(['=', ':'])?;
    Some((line[..pos].trim(), line[pos + 1..].trim()))
}
