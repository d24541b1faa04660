pub mod commands;
pub mod corpus;
pub mod editing;
pub mod error;
pub mod io;
pub mod link;
pub mod search;
pub mod suggestion;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use commands::{AliasCreated, NewAlias, create_alias, insert_search};
pub use corpus::frontmatter::AliasOutcome;
pub use corpus::{Corpus, CorpusDocument, Heading, HeadingAlias};
pub use editing::{Position, SpliceSink, TextBuffer};
pub use error::LinkError;
pub use io::{IoError, load_vault};
pub use search::{DelimiterPair, Query, SmartLinkSearch, Span, Suggestions};
pub use suggestion::{Candidate, FileRef, Instruction, Resolution};
