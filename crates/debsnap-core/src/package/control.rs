//! Reader for Debian `Packages` indexes.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;

use super::package::Package;
use crate::error::{DebsnapError, Result};

/// Parse every stanza of a `Packages` index
pub fn parse_control(content: &str) -> Result<Vec<Package>> {
    let mut packages = Vec::new();

    for (index, stanza) in split_stanzas(content).into_iter().enumerate() {
        let fields = parse_stanza(&stanza).map_err(|message| DebsnapError::InvalidStanza {
            index: index + 1,
            message,
        })?;
        let package = Package::from_fields(&fields).map_err(|message| DebsnapError::InvalidStanza {
            index: index + 1,
            message,
        })?;
        packages.push(package);
    }

    log::debug!("Parsed {} packages from control data", packages.len());
    Ok(packages)
}

/// Read and parse a `Packages` file
pub fn parse_control_file(path: &Path) -> Result<Vec<Package>> {
    let content = fs::read_to_string(path)?;
    parse_control(&content)
}

fn split_stanzas(content: &str) -> Vec<Vec<&str>> {
    let mut stanzas = Vec::new();
    let mut current = Vec::new();

    for line in content.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                stanzas.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        stanzas.push(current);
    }

    stanzas
}

/// Field names are case-insensitive and stored lowercased
fn parse_stanza(lines: &[&str]) -> std::result::Result<IndexMap<String, String>, String> {
    let mut fields: IndexMap<String, String> = IndexMap::new();
    let mut last: Option<String> = None;

    for line in lines {
        if line.starts_with(' ') || line.starts_with('\t') {
            let key = last
                .as_ref()
                .ok_or_else(|| "continuation line without a field".to_string())?;
            if let Some(value) = fields.get_mut(key) {
                value.push('\n');
                value.push_str(line.trim());
            }
            continue;
        }

        let (key, value) = line
            .split_once(':')
            .ok_or_else(|| format!("malformed line '{}'", line))?;
        let key = key.trim().to_lowercase();
        fields.insert(key.clone(), value.trim().to_string());
        last = Some(key);
    }

    Ok(fields)
}

impl Package {
    /// Build a package from lowercased control fields
    pub fn from_fields(fields: &IndexMap<String, String>) -> std::result::Result<Self, String> {
        let required = |name: &str| {
            fields
                .get(name)
                .filter(|value| !value.is_empty())
                .cloned()
                .ok_or_else(|| format!("missing '{}' field", name))
        };
        let optional = |name: &str| {
            fields
                .get(name)
                .map(|value| value.replace('\n', " "))
                .filter(|value| !value.trim().is_empty())
        };

        let mut package = Package::new(required("package")?, required("version")?, required("architecture")?);
        package.source = optional("source");
        package.depends = optional("depends");
        package.pre_depends = optional("pre-depends");
        package.recommends = optional("recommends");
        package.suggests = optional("suggests");
        package.provides = optional("provides");
        package.conflicts = optional("conflicts");

        Ok(package)
    }
}
