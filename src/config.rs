//! Sectioned key/value configuration (INI format).

use std::{
    fs,
    path::Path,
};
use crate::{
    Error,
    ext,
};

/// Name of the section, whose options are visible in all other sections.
const DEFAULT_SECTION: &str = "DEFAULT";
/// Maximal depth of nested `%(name)s` substitutions.
const MAX_INTERPOLATION_DEPTH: usize = 10;

/// Ordered list of options in one section.
/// Option names keep their spelling from the file, but are compared case-insensitively.
#[derive(Default, Debug, Clone)]
pub struct Section {
    options: Vec<(String, Option<String>)>,
}

impl Section {
    fn position(&self, name: &str) -> Option<usize> {
        self.options.iter().position(|(key, _)| key.eq_ignore_ascii_case(name))
    }

    fn set(&mut self, name: String, value: Option<String>) {
        match self.position(&name) {
            Some(i) => self.options[i] = (name, value),
            None => self.options.push((name, value)),
        }
    }

    fn get_raw(&self, name: &str) -> Option<&Option<String>> {
        self.position(name).map(|i| &self.options[i].1)
    }

    /// Returns option value. `None` if the option is absent or its value could not be retrieved.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.get_raw(name).and_then(Option::as_deref)
    }

    /// Iterates over options and their values in the file order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> + '_ {
        self.options.iter().map(|(key, value)| (key.as_str(), value.as_deref()))
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

/// Configuration: section name -> option name -> value.
/// Values are interpolated once during loading, and are read-only afterwards.
#[derive(Default, Debug, Clone)]
pub struct Config {
    sections: Vec<(String, Section)>,
}

impl Config {
    /// Loads configuration from a file. Missing or unreadable file produces `Error::NoConfig`.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let text = fs::read_to_string(path).map_err(|e| {
            log::error!("Cannot read configuration file {}: {}", ext::fmt::path(path), e);
            Error::NoConfig(path.to_owned())
        })?;
        let config = Self::parse(&text, path)?;
        log::debug!("Loaded configuration {} with sections [{}]", ext::fmt::path(path),
            config.sections.iter().map(|(name, _)| name.as_str()).collect::<Vec<_>>().join(", "));
        Ok(config)
    }

    /// Parses configuration text. `path` is used only for error messages.
    pub fn parse(text: &str, path: &Path) -> Result<Self, Error> {
        let mut defaults = Section::default();
        let mut raw: Vec<(String, Section)> = Vec::new();
        // Index of the current section in `raw`, or None for DEFAULT.
        let mut curr_section: Option<Option<usize>> = None;
        // Name of the last option in the current section, used for continuation lines.
        let mut last_option: Option<String> = None;

        for (i, line) in text.lines().enumerate() {
            let line_num = i + 1;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with(';') || is_rem_comment(trimmed) {
                continue;
            }

            let mut section = match curr_section {
                Some(Some(j)) => Some(&mut raw[j].1),
                Some(None) => Some(&mut defaults),
                None => None,
            };
            if line.starts_with(char::is_whitespace) {
                if let (Some(section), Some(name)) = (section.as_deref_mut(), last_option.as_ref()) {
                    if let Some(i) = section.position(name) {
                        let value = section.options[i].1.get_or_insert_with(String::new);
                        value.push('\n');
                        value.push_str(trimmed);
                        continue;
                    }
                }
            }

            if trimmed.starts_with('[') {
                let name = trimmed.strip_prefix('[').and_then(|s| s.strip_suffix(']'))
                    .ok_or_else(|| Error::ConfigParse(path.to_owned(), line_num,
                        format!("cannot parse section header '{}'", trimmed)))?;
                last_option = None;
                curr_section = Some(if name == DEFAULT_SECTION {
                    None
                } else if let Some(j) = raw.iter().position(|(key, _)| key == name) {
                    Some(j)
                } else {
                    raw.push((name.to_owned(), Section::default()));
                    Some(raw.len() - 1)
                });
                continue;
            }

            let Some(section) = section else {
                return Err(Error::ConfigParse(path.to_owned(), line_num,
                    "file contains no section headers".to_owned()));
            };
            let Some(split) = trimmed.find(|c: char| c == '=' || c == ':') else {
                return Err(Error::ConfigParse(path.to_owned(), line_num,
                    format!("expected 'name = value', found '{}'", trimmed)));
            };
            let name = trimmed[..split].trim_end();
            if name.is_empty() {
                return Err(Error::ConfigParse(path.to_owned(), line_num, "empty option name".to_owned()));
            }
            let value = trimmed[split + 1..].trim_start();
            section.set(name.to_owned(), Some(value.to_owned()));
            last_option = Some(name.to_owned());
        }

        let sections = raw.iter().map(|(name, section)| (name.clone(), interpolate_section(name, section, &defaults)))
            .collect();
        Ok(Self { sections })
    }

    pub fn has_section(&self, name: &str) -> bool {
        self.section(name).is_some()
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|(key, _)| key == name).map(|(_, section)| section)
    }

    /// Returns option value, or None if it is absent, null, or the section does not exist.
    pub fn get(&self, section: &str, option: &str) -> Option<&str> {
        self.section(section).and_then(|s| s.get(option))
    }

    /// Same as `get`, but absent value produces `Error::MissingConfig`.
    pub fn require(&self, section: &str, option: &str) -> Result<&str, Error> {
        self.get(section, option).ok_or_else(|| Error::MissingConfig(section.to_owned(), option.to_owned()))
    }

    /// Variables from the `environment` section, in the file order. Null values are skipped.
    pub fn environment(&self) -> Vec<(String, String)> {
        match self.section("environment") {
            Some(section) => section.iter()
                .filter_map(|(key, value)| value.map(|v| (key.to_owned(), v.to_owned())))
                .collect(),
            None => Vec::new(),
        }
    }
}

/// `REM` comment lines.
fn is_rem_comment(line: &str) -> bool {
    match (line.get(..3), line.get(3..)) {
        (Some(head), Some(tail)) => head.eq_ignore_ascii_case("rem") && tail.starts_with(char::is_whitespace),
        _ => false,
    }
}

/// Interpolates all values in the section. Defaults are added to the section as well.
/// Only values with `%(` references are interpolated, others are kept as written.
/// Values, that could not be interpolated, are replaced with None.
fn interpolate_section(name: &str, section: &Section, defaults: &Section) -> Section {
    let mut merged = defaults.clone();
    for (key, value) in section.options.iter() {
        merged.set(key.clone(), value.clone());
    }
    let mut res = Section::default();
    for (key, value) in merged.options.iter() {
        let value = match value {
            Some(v) if v.contains("%(") => match interpolate(v, &merged, 1) {
                Ok(s) => Some(s),
                Err(e) => {
                    log::info!("Exception on [{}] {}: {}", name, key, e);
                    None
                }
            },
            _ => value.clone(),
        };
        res.options.push((key.clone(), value));
    }
    res
}

/// Replaces `%(name)s` with the corresponding value, and `%%` with `%`.
fn interpolate(value: &str, section: &Section, depth: usize) -> Result<String, String> {
    if depth > MAX_INTERPOLATION_DEPTH {
        return Err(format!("interpolation is too deep in '{}'", value));
    }
    let mut res = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(i) = rest.find('%') {
        res.push_str(&rest[..i]);
        rest = &rest[i..];
        if let Some(tail) = rest.strip_prefix("%%") {
            res.push('%');
            rest = tail;
        } else if let Some(tail) = rest.strip_prefix("%(") {
            let end = tail.find(")s").ok_or_else(|| format!("bad interpolation syntax in '{}'", value))?;
            let key = &tail[..end];
            let sub = section.get_raw(key).and_then(Option::as_deref)
                .ok_or_else(|| format!("unknown reference %({})s", key))?;
            if sub.contains("%(") {
                res.push_str(&interpolate(sub, section, depth + 1)?);
            } else {
                res.push_str(sub);
            }
            rest = &tail[end + 2..];
        } else {
            return Err(format!("'%' must be followed by '%' or '(' in '{}'", value));
        }
    }
    res.push_str(rest);
    Ok(res)
}
