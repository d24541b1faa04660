use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use markdown_smartlink_config::SearchConfig;
use markdown_smartlink_engine::corpus::frontmatter;
use markdown_smartlink_engine::editing::Edit;
use markdown_smartlink_engine::{
    AliasOutcome, Corpus, DelimiterPair, NewAlias, SmartLinkSearch, Suggestions, TextBuffer,
    create_alias, insert_search, io,
};
use ratatui::widgets::ListState;
use relative_path::RelativePathBuf;
use std::path::PathBuf;

/// Suggestions for the search under the cursor and the highlighted row.
pub struct Popover {
    pub line: usize,
    pub suggestions: Suggestions,
    pub state: ListState,
}

pub struct App {
    pub notes_path: PathBuf,
    pub note: RelativePathBuf,
    pub corpus: Corpus,
    pub search: SmartLinkSearch,
    pub buffer: TextBuffer,
    pub popover: Option<Popover>,
    pub status: String,
    pub should_quit: bool,
    saved_version: u64,
    quit_requested: bool,
}

impl App {
    pub fn new(notes_path: PathBuf, note: RelativePathBuf, settings: &SearchConfig) -> Result<Self> {
        let corpus = io::load_vault(&notes_path)?;
        let text = match io::read_file(&note, &notes_path) {
            Ok(text) => text,
            Err(io::IoError::NotFound(_)) => String::new(),
            Err(e) => return Err(e.into()),
        };
        let delimiters =
            DelimiterPair::from_settings(&settings.left_identifier, &settings.right_identifier);
        let search = SmartLinkSearch::new(delimiters, settings.ignore_case)?;

        let status = format!("{} notes loaded", corpus.len());
        let mut app = Self {
            notes_path,
            note,
            corpus,
            search,
            buffer: TextBuffer::new(&text),
            popover: None,
            status,
            should_quit: false,
            saved_version: 0,
            quit_requested: false,
        };
        app.refresh_suggestions();
        Ok(app)
    }

    pub fn is_dirty(&self) -> bool {
        self.buffer.version() != self.saved_version
    }

    fn has_candidates(&self) -> bool {
        self.popover
            .as_ref()
            .is_some_and(|popover| !popover.suggestions.candidates.is_empty())
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if key.code != KeyCode::Esc {
            self.quit_requested = false;
        }

        match key.code {
            KeyCode::Esc => self.quit(),
            KeyCode::Char('s') if ctrl => self.save(),
            KeyCode::Char('k') if ctrl => self.start_search(),
            KeyCode::Char('a') if ctrl => self.create_alias(),
            KeyCode::Up if self.has_candidates() => self.select_previous(),
            KeyCode::Down if self.has_candidates() => self.select_next(),
            KeyCode::Enter | KeyCode::Tab if self.has_candidates() => self.accept(),
            KeyCode::Up => self.buffer.move_up(),
            KeyCode::Down => self.buffer.move_down(),
            KeyCode::Left => self.buffer.move_left(),
            KeyCode::Right => self.buffer.move_right(),
            KeyCode::Enter => {
                self.buffer.insert_at_cursor("\n");
            }
            KeyCode::Tab => {
                self.buffer.insert_at_cursor("\t");
            }
            KeyCode::Backspace => {
                self.buffer.delete_backward();
            }
            KeyCode::Char(c) if !ctrl => {
                self.buffer.insert_at_cursor(c.encode_utf8(&mut [0; 4]));
            }
            _ => {}
        }

        self.refresh_suggestions();
    }

    /// Recomputes the popover for the cursor position. The highlighted row
    /// is kept while the same search is being edited.
    pub fn refresh_suggestions(&mut self) {
        let (line, text, ch) = self.buffer.cursor_line();
        let Some(suggestions) = self.search.suggest(&text, ch, &self.corpus) else {
            self.popover = None;
            return;
        };

        let previous = self
            .popover
            .take()
            .filter(|p| p.line == line && p.suggestions.span.start == suggestions.span.start)
            .and_then(|p| p.state.selected());

        let mut state = ListState::default();
        if !suggestions.candidates.is_empty() {
            let last = suggestions.candidates.len() - 1;
            state.select(Some(previous.unwrap_or(0).min(last)));
        }

        self.popover = Some(Popover {
            line,
            suggestions,
            state,
        });
    }

    fn select_next(&mut self) {
        if let Some(popover) = self.popover.as_mut() {
            let len = popover.suggestions.candidates.len();
            let i = match popover.state.selected() {
                Some(i) => (i + 1) % len,
                None => 0,
            };
            popover.state.select(Some(i));
        }
    }

    fn select_previous(&mut self) {
        if let Some(popover) = self.popover.as_mut() {
            let len = popover.suggestions.candidates.len();
            let i = match popover.state.selected() {
                Some(0) | None => len - 1,
                Some(i) => i - 1,
            };
            popover.state.select(Some(i));
        }
    }

    fn accept(&mut self) {
        let Some(popover) = self.popover.take() else {
            return;
        };
        let Some(candidate) = popover
            .state
            .selected()
            .and_then(|i| popover.suggestions.candidates.get(i))
        else {
            return;
        };

        match self.search.resolve(&popover.suggestions.span, candidate) {
            Ok(resolution) => {
                resolution.apply(popover.line, &mut self.buffer);
                self.status = format!("Linked {}", resolution.replacement);
            }
            Err(e) => {
                log::warn!("Could not link suggestion: {e}");
                self.status = e.to_string();
            }
        }
    }

    fn start_search(&mut self) {
        let cursor = self.buffer.cursor();
        insert_search(&mut self.buffer, cursor, self.search.delimiters());
    }

    fn create_alias(&mut self) {
        let (_, line, ch) = self.buffer.cursor_line();
        match create_alias(&line, ch, &mut self.corpus, &self.notes_path) {
            Ok(created) => {
                if created.path == self.note {
                    self.add_alias_to_buffer(&created.alias);
                }
                self.status = format!("{} ({})", created.outcome.message(), created.path);
            }
            Err(e) => {
                log::warn!("Could not create alias: {e}");
                self.status = e.to_string();
            }
        }
    }

    /// Mirrors an alias stored in the open note into the buffer, so the
    /// next save keeps it. Only the front matter block is replaced; the
    /// cursor stays on the same body text.
    fn add_alias_to_buffer(&mut self, alias: &NewAlias) {
        let was_clean = !self.is_dirty();
        let text = self.buffer.text();
        let updated = match alias.add_to(&text) {
            Ok(updated) if updated.outcome == AliasOutcome::Added => updated,
            Ok(_) => return,
            Err(e) => {
                log::warn!("Could not add alias to the open note: {e}");
                return;
            }
        };

        let old_end = text.len() - frontmatter::split(&text).body.len();
        let new_end = updated.text.len() - frontmatter::split(&updated.text).body.len();
        self.buffer.apply(Edit::ReplaceRange {
            range: 0..old_end,
            text: updated.text[..new_end].to_string(),
        });
        if was_clean {
            self.saved_version = self.buffer.version();
        }
    }

    fn save(&mut self) {
        match self.try_save() {
            Ok(()) => self.status = format!("Saved {}", self.note),
            Err(e) => {
                log::error!("Failed to save {}: {e:#}", self.note);
                self.status = format!("Save failed: {e}");
            }
        }
    }

    fn try_save(&mut self) -> Result<()> {
        io::write_file(&self.note, &self.notes_path, &self.buffer.text())?;
        self.saved_version = self.buffer.version();
        self.corpus
            .upsert(io::load_document(&self.note, &self.notes_path)?);
        log::info!("Saved {}", self.note);
        Ok(())
    }

    /// Quits, asking for a second Esc when there are unsaved changes.
    fn quit(&mut self) {
        if self.is_dirty() && !self.quit_requested {
            self.quit_requested = true;
            self.status = "Unsaved changes, press Esc again to quit".to_string();
        } else {
            self.should_quit = true;
        }
    }
}
