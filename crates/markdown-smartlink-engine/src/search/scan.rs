use std::collections::HashSet;

use crate::corpus::CorpusDocument;
use crate::suggestion::Candidate;

use super::query::{Query, SearchClasses};

/// Substring test shared by every candidate class.
///
/// With `ignore_case` both sides are lowercased before comparing; the needle
/// once up front, each haystack as it is tested.
#[derive(Debug, Clone)]
pub struct Matcher {
    needle: String,
    ignore_case: bool,
}

impl Matcher {
    pub fn new(needle: &str, ignore_case: bool) -> Self {
        let needle = if ignore_case {
            needle.to_lowercase()
        } else {
            needle.to_string()
        };
        Self {
            needle,
            ignore_case,
        }
    }

    pub fn matches(&self, haystack: &str) -> bool {
        if self.ignore_case {
            haystack.to_lowercase().contains(&self.needle)
        } else {
            haystack.contains(&self.needle)
        }
    }
}

/// Collects every candidate in `corpus` matching `query`.
///
/// Output order is corpus order, and within one document: file, aliases,
/// headings, heading aliases. Repeated alias or heading-alias entries of a
/// single document collapse to one candidate; identical entries on
/// different documents are all kept.
pub fn scan<'a>(
    corpus: impl IntoIterator<Item = &'a CorpusDocument>,
    query: &Query,
    ignore_case: bool,
) -> Vec<Candidate> {
    let matcher = Matcher::new(&query.text, ignore_case);
    let mut candidates = Vec::new();

    for document in corpus {
        scan_document(document, query, &matcher, &mut candidates);
    }

    log::debug!(
        "query {:?} ({:?}) matched {} candidates",
        query.text,
        query.classes,
        candidates.len()
    );
    candidates
}

fn scan_document(
    document: &CorpusDocument,
    query: &Query,
    matcher: &Matcher,
    out: &mut Vec<Candidate>,
) {
    let file = document.file_ref();
    let mut seen: HashSet<Candidate> = HashSet::new();

    if query.includes(SearchClasses::FILE) && matcher.matches(&document.name) {
        out.push(Candidate::file(file.clone()));
    }

    if query.includes(SearchClasses::ALIAS) {
        for alias in &document.aliases {
            if matcher.matches(alias) {
                let candidate = Candidate::alias(alias.clone(), file.clone());
                if seen.insert(candidate.clone()) {
                    out.push(candidate);
                }
            }
        }
    }

    if query.includes(SearchClasses::HEADING) {
        for heading in &document.headings {
            if matcher.matches(&heading.text) {
                out.push(Candidate::heading(heading.clone(), file.clone()));
            }
        }
    }

    if query.includes(SearchClasses::HEADING_ALIAS) {
        for heading_alias in &document.heading_aliases {
            if matcher.matches(&heading_alias.alias) {
                let candidate = Candidate::heading_alias(
                    heading_alias.alias.clone(),
                    heading_alias.heading(),
                    file.clone(),
                );
                if seen.insert(candidate.clone()) {
                    out.push(candidate);
                }
            }
        }
    }
}
