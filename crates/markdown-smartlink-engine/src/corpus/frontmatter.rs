//! YAML front matter: reading aliases and heading aliases out of it, and
//! appending new ones.
//!
//! Notes in the wild store these keys in several shapes (a single string, a
//! list, a single map, a list of maps, `alias` vs `aliases`). Everything is
//! normalized here so the rest of the engine only sees [`Frontmatter`].

use serde::de::Error as _;
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

use super::HeadingAlias;

/// Keys read for file aliases.
pub const ALIAS_KEYS: [&str; 2] = ["alias", "aliases"];
/// Keys read for heading aliases.
pub const HEADING_ALIAS_KEYS: [&str; 2] = ["heading-aliases", "heading-alias"];

const ALIAS_WRITE_KEY: &str = "aliases";
const HEADING_ALIAS_WRITE_KEY: &str = "heading-aliases";

const FENCE: &str = "---";

/// A note split at its front matter fence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Split<'a> {
    /// YAML between the fences, `None` when the note has no front matter.
    pub yaml: Option<&'a str>,
    pub body: &'a str,
}

/// Splits `text` into front matter and body.
///
/// Front matter must open on the very first line with `---` and close with
/// a line that is exactly `---`. An unclosed block is treated as body.
pub fn split(text: &str) -> Split<'_> {
    let no_front_matter = Split {
        yaml: None,
        body: text,
    };
    let Some(rest) = text
        .strip_prefix("---\n")
        .or_else(|| text.strip_prefix("---\r\n"))
    else {
        return no_front_matter;
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end_matches(['\r', '\n']) == FENCE {
            return Split {
                yaml: Some(&rest[..offset]),
                body: &rest[offset + line.len()..],
            };
        }
        offset += line.len();
    }
    no_front_matter
}

/// Alias metadata of one note, already normalized.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frontmatter {
    pub aliases: Vec<String>,
    pub heading_aliases: Vec<HeadingAlias>,
}

#[derive(Debug, Deserialize)]
struct RawHeadingAlias {
    alias: String,
    heading: String,
    #[serde(default)]
    level: Option<i64>,
}

#[derive(Debug, Serialize)]
struct HeadingAliasEntry<'a> {
    heading: &'a str,
    alias: &'a str,
    level: u8,
}

impl Frontmatter {
    /// Reads the alias keys of a parsed front matter map. Entries of the
    /// wrong shape are skipped with a warning.
    pub fn from_mapping(map: &Mapping) -> Self {
        let mut aliases = Vec::new();
        for key in ALIAS_KEYS {
            for item in map.get(key).map(one_or_many).unwrap_or_default() {
                match item {
                    Value::String(alias) => aliases.push(alias.clone()),
                    Value::Number(alias) => aliases.push(alias.to_string()),
                    other => log::warn!("Skipping {key} entry {other:?}: not a string"),
                }
            }
        }

        let mut heading_aliases = Vec::new();
        for key in HEADING_ALIAS_KEYS {
            for item in map.get(key).map(one_or_many).unwrap_or_default() {
                match serde_yaml::from_value::<RawHeadingAlias>(item.clone()) {
                    Ok(raw) => match heading_level(raw.level) {
                        Some(level) => {
                            heading_aliases.push(HeadingAlias::new(raw.alias, raw.heading, level))
                        }
                        None => log::warn!(
                            "Skipping {key} entry {:?}: level {:?} is not 1-6",
                            raw.alias,
                            raw.level
                        ),
                    },
                    Err(err) => log::warn!("Skipping {key} entry: {err}"),
                }
            }
        }

        Self {
            aliases,
            heading_aliases,
        }
    }
}

/// A missing level means a top-level heading.
fn heading_level(level: Option<i64>) -> Option<u8> {
    match level {
        None => Some(1),
        Some(level @ 1..=6) => u8::try_from(level).ok(),
        Some(_) => None,
    }
}

fn one_or_many(value: &Value) -> &[Value] {
    match value {
        Value::Sequence(items) => items,
        Value::Null => &[],
        single => std::slice::from_ref(single),
    }
}

fn parse_mapping(yaml: &str) -> Result<Mapping, serde_yaml::Error> {
    if yaml.trim().is_empty() {
        return Ok(Mapping::new());
    }
    match serde_yaml::from_str::<Value>(yaml)? {
        Value::Mapping(map) => Ok(map),
        Value::Null => Ok(Mapping::new()),
        _ => Err(serde_yaml::Error::custom("front matter is not a key/value map")),
    }
}

/// Parses the alias metadata of a whole note.
pub fn read(text: &str) -> Result<Frontmatter, serde_yaml::Error> {
    match split(text).yaml {
        Some(yaml) => Ok(Frontmatter::from_mapping(&parse_mapping(yaml)?)),
        None => Ok(Frontmatter::default()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AliasOutcome {
    Added,
    AlreadyExists,
}

impl AliasOutcome {
    /// User-facing notice for the outcome.
    pub fn message(self) -> &'static str {
        match self {
            AliasOutcome::Added => "Alias added.",
            AliasOutcome::AlreadyExists => "Alias already exists.",
        }
    }
}

/// Note text after an alias update. `text` equals the input when nothing
/// was added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Updated {
    pub text: String,
    pub outcome: AliasOutcome,
}

/// Appends `alias` to the note's `aliases` list unless any alias key
/// already lists it.
pub fn add_alias(text: &str, alias: &str) -> Result<Updated, serde_yaml::Error> {
    update(text, |map| {
        if Frontmatter::from_mapping(map)
            .aliases
            .iter()
            .any(|existing| existing == alias)
        {
            return Ok(AliasOutcome::AlreadyExists);
        }
        push_entry(map, ALIAS_WRITE_KEY, Value::String(alias.to_string()))?;
        Ok(AliasOutcome::Added)
    })
}

/// Appends `{heading, alias, level}` to the note's `heading-aliases` unless
/// the same triple is already declared.
pub fn add_heading_alias(
    text: &str,
    heading_alias: &HeadingAlias,
) -> Result<Updated, serde_yaml::Error> {
    update(text, |map| {
        if Frontmatter::from_mapping(map)
            .heading_aliases
            .contains(heading_alias)
        {
            return Ok(AliasOutcome::AlreadyExists);
        }
        let entry = serde_yaml::to_value(HeadingAliasEntry {
            heading: &heading_alias.heading,
            alias: &heading_alias.alias,
            level: heading_alias.level,
        })?;
        push_entry(map, HEADING_ALIAS_WRITE_KEY, entry)?;
        Ok(AliasOutcome::Added)
    })
}

fn update(
    text: &str,
    edit: impl FnOnce(&mut Mapping) -> Result<AliasOutcome, serde_yaml::Error>,
) -> Result<Updated, serde_yaml::Error> {
    let Split { yaml, body } = split(text);
    let mut map = parse_mapping(yaml.unwrap_or_default())?;

    let outcome = edit(&mut map)?;
    let text = match outcome {
        AliasOutcome::AlreadyExists => text.to_string(),
        AliasOutcome::Added => {
            let yaml = serde_yaml::to_string(&map)?;
            format!("{FENCE}\n{yaml}{FENCE}\n{body}")
        }
    };
    Ok(Updated { text, outcome })
}

/// Pushes onto the list at `key`, turning a missing or single value into a
/// list first. Other keys keep their order.
fn push_entry(map: &mut Mapping, key: &str, entry: Value) -> Result<(), serde_yaml::Error> {
    let mut items = match map.get(key) {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Sequence(items)) => items.clone(),
        Some(single @ (Value::String(_) | Value::Number(_) | Value::Mapping(_))) => {
            vec![single.clone()]
        }
        Some(_) => {
            return Err(serde_yaml::Error::custom(format!(
                "`{key}` must be a list"
            )));
        }
    };
    items.push(entry);
    map.insert(Value::String(key.to_string()), Value::Sequence(items));
    Ok(())
}
