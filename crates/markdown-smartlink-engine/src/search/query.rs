use serde::Serialize;

bitflags::bitflags! {
    /// Candidate classes a query is allowed to produce.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct SearchClasses: u8 {
        /// File base names.
        const FILE = 1 << 0;
        /// Aliases declared in a file's front matter.
        const ALIAS = 1 << 1;
        /// Headings inside a file.
        const HEADING = 1 << 2;
        /// Aliases declared for a specific heading.
        const HEADING_ALIAS = 1 << 3;
    }
}

/// Which sigils were typed in front of the query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SearchOptions {
    pub file: bool,
    pub heading: bool,
    pub alias: bool,
}

/// A leading character that narrows the search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sigil {
    File,
    Heading,
    Alias,
}

impl Sigil {
    pub const FILE: char = '*';
    pub const HEADING: char = '#';
    pub const ALIAS: char = '@';

    pub fn from_char(c: char) -> Option<Self> {
        match c {
            Self::FILE => Some(Self::File),
            Self::HEADING => Some(Self::Heading),
            Self::ALIAS => Some(Self::Alias),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Self::File => Self::FILE,
            Self::Heading => Self::HEADING,
            Self::Alias => Self::ALIAS,
        }
    }
}

/// The classified search: residual text plus the classes it may match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub text: String,
    pub classes: SearchClasses,
    pub options: SearchOptions,
}

impl Query {
    /// At most this many sigils are read off the front of the input.
    pub const MAX_SIGILS: usize = 2;

    /// Classifies the inner text of a search span.
    ///
    /// Never fails. Sigil exclusivity is applied after parsing, in this
    /// order: a file sigil drops headings and heading aliases, a heading
    /// sigil drops files and file aliases, an alias sigil drops files and
    /// headings. `*` together with `#` therefore leaves no class enabled.
    pub fn classify(inner_text: &str) -> Self {
        let mut options = SearchOptions::default();
        let mut rest = inner_text;

        for _ in 0..Self::MAX_SIGILS {
            let Some(sigil) = rest.chars().next().and_then(Sigil::from_char) else {
                break;
            };
            match sigil {
                Sigil::File => options.file = true,
                Sigil::Heading => options.heading = true,
                Sigil::Alias => options.alias = true,
            }
            rest = &rest[sigil.as_char().len_utf8()..];
        }

        let mut classes = SearchClasses::all();
        if options.file {
            classes.remove(SearchClasses::HEADING | SearchClasses::HEADING_ALIAS);
        }
        if options.heading {
            classes.remove(SearchClasses::FILE | SearchClasses::ALIAS);
        }
        if options.alias {
            classes.remove(SearchClasses::FILE | SearchClasses::HEADING);
        }

        Self {
            text: rest.to_string(),
            classes,
            options,
        }
    }

    pub fn includes(&self, class: SearchClasses) -> bool {
        self.classes.contains(class)
    }
}
