mod app;
mod ui;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use markdown_smartlink_config::Config;
use markdown_smartlink_engine::io;
use ratatui::{Terminal, backend::CrosstermBackend};
use relative_path::RelativePathBuf;
use std::{env, fs::File, io::stdout, path::PathBuf, process};

use crate::app::App;

/// Notes folder and note to edit, from the command line with the config
/// file filling in a missing notes folder.
fn resolve_paths(
    args: &[String],
    config: Option<&Config>,
) -> Result<(PathBuf, RelativePathBuf), String> {
    match args {
        [_, notes_path, note] => Ok((PathBuf::from(notes_path), note_path(note))),
        [_, note] => config
            .and_then(|config| config.notes_path.clone())
            .map(|notes_path| (notes_path, note_path(note)))
            .ok_or_else(|| "No notes folder given and none set in the config file".to_string()),
        _ => Err("Missing note to edit".to_string()),
    }
}

/// `Daily/today` and `Daily/today.md` name the same note.
fn note_path(arg: &str) -> RelativePathBuf {
    if arg.ends_with(".md") {
        RelativePathBuf::from(arg)
    } else {
        RelativePathBuf::from(format!("{arg}.md"))
    }
}

fn program_name(args: &[String]) -> &str {
    args.first().map_or("markdown-smartlink-cli", String::as_str)
}

/// Logs go to a file; the terminal belongs to the editor.
fn init_logging() {
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(log::LevelFilter::Info)
        .parse_default_env();
    if let Ok(file) = File::create(env::temp_dir().join("markdown-smartlink.log")) {
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
}

fn main() -> Result<()> {
    init_logging();

    let args: Vec<String> = env::args().collect();
    let config_path = Config::config_path();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            process::exit(1);
        }
    };

    let (notes_path, note) = match resolve_paths(&args, config.as_ref()) {
        Ok(paths) => paths,
        Err(message) => {
            eprintln!("Error: {message}");
            eprintln!("Usage: {} [notes-folder-path] <note>", program_name(&args));
            eprintln!(
                "The notes folder can also be set as notes_path in {}",
                config_path.display()
            );
            process::exit(1);
        }
    };

    if let Err(e) = io::validate_notes_dir(&notes_path) {
        eprintln!(
            "Error: Notes path '{}' is invalid: {e}",
            notes_path.display()
        );
        process::exit(1);
    }

    let settings = config.map(|config| config.search).unwrap_or_default();
    let mut app = App::new(notes_path, note, &settings)?;

    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    loop {
        terminal.draw(|f| ui::ui(f, app))?;

        if let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            app.handle_key(key);
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
