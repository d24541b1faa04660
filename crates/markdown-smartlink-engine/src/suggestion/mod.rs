//! # Suggestions
//!
//! A [`Candidate`] is one row of the suggestion popover. File, alias,
//! heading and heading-alias suggestions share the record; which optional
//! fields are filled decides how it renders and what link it resolves to.
//!
//! Rendering here is text only (title, note, aux badge and the hint lines
//! shown under the list). Drawing it is up to the host.

pub mod resolve;

use std::fmt;

use serde::Serialize;

use crate::corpus::Heading;
use crate::link::WikiLink;
use crate::search::SearchOptions;

pub use resolve::{Resolution, resolve};

/// The file a suggestion points at.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct FileRef {
    pub name: String,
    /// Directory prefix ending in `/`, empty at the vault root.
    pub path: String,
}

impl FileRef {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Candidate {
    pub alias: Option<String>,
    pub heading: Option<Heading>,
    pub file: FileRef,
}

impl Candidate {
    pub fn file(file: FileRef) -> Self {
        Self {
            alias: None,
            heading: None,
            file,
        }
    }

    pub fn alias(alias: impl Into<String>, file: FileRef) -> Self {
        Self {
            alias: Some(alias.into()),
            heading: None,
            file,
        }
    }

    pub fn heading(heading: Heading, file: FileRef) -> Self {
        Self {
            alias: None,
            heading: Some(heading),
            file,
        }
    }

    pub fn heading_alias(alias: impl Into<String>, heading: Heading, file: FileRef) -> Self {
        Self {
            alias: Some(alias.into()),
            heading: Some(heading),
            file,
        }
    }

    /// Main line of the popover row: alias, else heading, else file name.
    pub fn title(&self) -> &str {
        if let Some(alias) = &self.alias {
            alias
        } else if let Some(heading) = &self.heading {
            &heading.text
        } else {
            &self.file.name
        }
    }

    /// Secondary line showing where the suggestion leads.
    pub fn note(&self) -> String {
        let FileRef { name, path } = &self.file;
        match (&self.alias, &self.heading) {
            (Some(_), Some(heading)) => format!("{path}{name}#{}", heading.text),
            (Some(_), None) | (None, Some(_)) => format!("{path}{name}"),
            (None, None) => path.clone(),
        }
    }

    pub fn aux(&self) -> Aux {
        Aux {
            alias: self.alias.is_some(),
            heading_level: self.heading.as_ref().map(|h| h.level),
        }
    }

    /// The link text between `[[` and `]]`.
    pub fn link_body(&self) -> String {
        WikiLink::body(&self.file, self.heading.as_ref(), self.alias.as_deref())
    }

    /// The full canonical link, e.g. `[[Notes/Doc##Intro|short]]`.
    pub fn to_link(&self) -> String {
        WikiLink::format(&self.file, self.heading.as_ref(), self.alias.as_deref())
    }
}

/// Right-hand badge of a popover row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Aux {
    pub alias: bool,
    pub heading_level: Option<u8>,
}

impl Aux {
    /// Shown for suggestions that point to something else.
    pub const ALIAS_GLYPH: &'static str = "↪";

    /// `H<level>` for heading suggestions.
    pub fn heading_badge(&self) -> Option<String> {
        self.heading_level.map(|level| format!("H{level}"))
    }
}

impl fmt::Display for Aux {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.heading_badge(), self.alias) {
            (Some(badge), true) => write!(f, "{badge} {}", Self::ALIAS_GLYPH),
            (Some(badge), false) => f.write_str(&badge),
            (None, true) => f.write_str(Self::ALIAS_GLYPH),
            (None, false) => Ok(()),
        }
    }
}

/// A hint line under the popover, e.g. "Type # to search headings".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Instruction {
    pub command: &'static str,
    pub purpose: &'static str,
}

impl Instruction {
    pub const FILE: Self = Self {
        command: "Type *",
        purpose: "to search files",
    };
    pub const HEADING: Self = Self {
        command: "Type #",
        purpose: "to search headings",
    };
    pub const ALIAS: Self = Self {
        command: "Type @",
        purpose: "to search aliases",
    };
    pub const ACCEPT: Self = Self {
        command: "↵",
        purpose: "to accept",
    };
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.command, self.purpose)
    }
}

/// Hints for sigils that would still narrow the current search.
pub fn instructions(options: &SearchOptions) -> Vec<Instruction> {
    let mut out = Vec::with_capacity(4);
    if !options.file && !options.heading {
        out.push(Instruction::FILE);
        out.push(Instruction::HEADING);
    }
    if !options.alias {
        out.push(Instruction::ALIAS);
    }
    out.push(Instruction::ACCEPT);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn file() -> FileRef {
        FileRef::new("Doc", "Notes/")
    }

    #[test]
    fn title_prefers_alias_then_heading_then_file() {
        let heading = Heading::new("Intro", 2);
        assert_eq!(
            Candidate::heading_alias("short", heading.clone(), file()).title(),
            "short"
        );
        assert_eq!(Candidate::alias("short", file()).title(), "short");
        assert_eq!(Candidate::heading(heading, file()).title(), "Intro");
        assert_eq!(Candidate::file(file()).title(), "Doc");
    }

    #[test]
    fn note_variants() {
        let heading = Heading::new("Intro", 2);
        assert_eq!(
            Candidate::heading_alias("short", heading.clone(), file()).note(),
            "Notes/Doc#Intro"
        );
        assert_eq!(Candidate::alias("short", file()).note(), "Notes/Doc");
        assert_eq!(Candidate::heading(heading, file()).note(), "Notes/Doc");
        assert_eq!(Candidate::file(file()).note(), "Notes/");
    }

    #[test]
    fn aux_tracks_alias_and_heading_level_independently() {
        let heading = Heading::new("Intro", 3);
        let aux = Candidate::heading_alias("short", heading.clone(), file()).aux();
        assert_eq!(
            aux,
            Aux {
                alias: true,
                heading_level: Some(3),
            }
        );
        assert_eq!(aux.to_string(), "H3 ↪");

        assert_eq!(Candidate::heading(heading, file()).aux().to_string(), "H3");
        assert_eq!(Candidate::alias("a", file()).aux().to_string(), "↪");
        assert_eq!(Candidate::file(file()).aux().heading_badge(), None);
        assert_eq!(Candidate::file(file()).aux().to_string(), "");
    }

    #[test]
    fn link_for_heading_alias() {
        let candidate = Candidate::heading_alias("short", Heading::new("Intro", 2), file());
        assert_eq!(candidate.to_link(), "[[Notes/Doc##Intro|short]]");
        assert_eq!(candidate.link_body(), "Notes/Doc##Intro|short");
    }

    #[test]
    fn instructions_for_broad_search() {
        assert_eq!(
            instructions(&SearchOptions::default()),
            vec![
                Instruction::FILE,
                Instruction::HEADING,
                Instruction::ALIAS,
                Instruction::ACCEPT
            ]
        );
    }

    #[test]
    fn instructions_drop_used_sigils() {
        let heading = SearchOptions {
            heading: true,
            ..SearchOptions::default()
        };
        assert_eq!(
            instructions(&heading),
            vec![Instruction::ALIAS, Instruction::ACCEPT]
        );

        let alias = SearchOptions {
            alias: true,
            ..SearchOptions::default()
        };
        assert_eq!(
            instructions(&alias),
            vec![Instruction::FILE, Instruction::HEADING, Instruction::ACCEPT]
        );
        assert_eq!(Instruction::ACCEPT.to_string(), "↵ to accept");
    }
}
