use clap::Parser;
use colored::*;
use directories::ProjectDirs;
use notekit::api::{
    CmdMessage, ConfigAction, MatchView, MessageLevel, NotekitApi, PinView, ReplaceTarget,
};
use notekit::catalog::Catalog;
use notekit::config::NotekitConfig;
use notekit::error::{NotekitError, Result};
use notekit::search::SearchOptions;
use notekit::store::fs::FileStore;
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use unicode_width::UnicodeWidthStr;

mod args;
use args::{Cli, Commands, NotebookAction, TagAction, TopicAction};

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {}", "Error:".red(), e);
        std::process::exit(1);
    }
}

struct AppContext {
    api: NotekitApi<FileStore>,
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let mut ctx = init_context(&cli)?;

    match cli.command {
        Some(Commands::Pin { kind, id, notebook }) => handle_pin(&mut ctx, kind, id, notebook),
        Some(Commands::Unpin { id }) => handle_unpin(&mut ctx, id),
        Some(Commands::Pins) => handle_pins(&mut ctx),
        Some(Commands::IsPinned { id }) => {
            print_messages(&ctx.api.is_pinned(&id).messages);
            Ok(())
        }
        Some(Commands::Notebook { action }) => handle_notebook(&mut ctx, action),
        Some(Commands::Topic { action }) => handle_topic(&mut ctx, action),
        Some(Commands::Tag { action }) => handle_tag(&mut ctx, action),
        Some(Commands::Catalog) => handle_catalog(&ctx),
        Some(Commands::Logout) => handle_logout(&mut ctx),
        Some(Commands::Find {
            file,
            term,
            match_case,
            no_match_case,
            whole_word,
            no_whole_word,
            regex,
            no_regex,
            replace,
            all,
            nth,
        }) => {
            let flags = SearchFlags {
                match_case: flag(match_case, no_match_case),
                whole_word: flag(whole_word, no_whole_word),
                regex: flag(regex, no_regex),
            };
            let target = match (all, nth) {
                (true, _) => ReplaceTarget::All,
                (false, Some(n)) => ReplaceTarget::Nth(n),
                (false, None) => ReplaceTarget::Nth(1),
            };
            handle_find(&ctx, file, term, flags, replace, target)
        }
        Some(Commands::Config { key, value }) => handle_config(&ctx, key, value),
        None => handle_pins(&mut ctx),
    }
}

/// Search switches from the command line. `None` means "use the config".
struct SearchFlags {
    match_case: Option<bool>,
    whole_word: Option<bool>,
    regex: Option<bool>,
}

impl SearchFlags {
    fn over(&self, defaults: SearchOptions) -> SearchOptions {
        SearchOptions {
            match_case: self.match_case.unwrap_or(defaults.match_case),
            match_whole_word: self.whole_word.unwrap_or(defaults.match_whole_word),
            enable_regex: self.regex.unwrap_or(defaults.enable_regex),
        }
    }
}

fn flag(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (false, true) => Some(false),
        (false, false) => None,
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_env("NOTEKIT_LOG").unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn data_dir(cli: &Cli) -> Result<PathBuf> {
    if let Some(dir) = &cli.data_dir {
        return Ok(dir.clone());
    }
    if let Ok(dir) = std::env::var("NOTEKIT_DATA") {
        if !dir.is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    ProjectDirs::from("com", "notekit", "notekit")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| NotekitError::Api("Could not determine data directory".into()))
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let dir = data_dir(cli)?;
    tracing::debug!(data_dir = %dir.display(), "opening store");
    let api = NotekitApi::open(FileStore::new(dir))?;
    Ok(AppContext { api })
}

fn handle_pin(
    ctx: &mut AppContext,
    kind: String,
    id: String,
    notebook: Option<String>,
) -> Result<()> {
    let result = ctx.api.pin(&kind, &id, notebook.as_deref())?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_unpin(ctx: &mut AppContext, id: String) -> Result<()> {
    let result = ctx.api.unpin(&id)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_pins(ctx: &mut AppContext) -> Result<()> {
    let result = ctx.api.list_pins()?;
    print_messages(&result.messages);
    print_pins(&result.pins);

    let edited = ctx.api.settings().raw().date_edited;
    if !result.pins.is_empty() && edited > 0 {
        println!("\n{}", format!("edited {}", format_time_ago(edited)).dimmed());
    }
    Ok(())
}

fn handle_notebook(ctx: &mut AppContext, action: NotebookAction) -> Result<()> {
    let result = match action {
        NotebookAction::Add { title } => ctx.api.add_notebook(&title)?,
        NotebookAction::Rm { id } => ctx.api.remove_notebook(&id)?,
    };
    print_messages(&result.messages);
    Ok(())
}

fn handle_topic(ctx: &mut AppContext, action: TopicAction) -> Result<()> {
    let result = match action {
        TopicAction::Add { notebook, title } => ctx.api.add_topic(&notebook, &title)?,
        TopicAction::Rm { notebook, id } => ctx.api.remove_topic(&notebook, &id)?,
    };
    print_messages(&result.messages);
    Ok(())
}

fn handle_tag(ctx: &mut AppContext, action: TagAction) -> Result<()> {
    let result = match action {
        TagAction::Add { title } => ctx.api.add_tag(&title)?,
        TagAction::Rm { id } => ctx.api.remove_tag(&id)?,
    };
    print_messages(&result.messages);
    Ok(())
}

fn handle_catalog(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.catalog()?;
    if let Some(catalog) = &result.catalog {
        print_catalog(catalog);
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_logout(ctx: &mut AppContext) -> Result<()> {
    let result = ctx.api.logout()?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_find(
    ctx: &AppContext,
    file: PathBuf,
    term: String,
    flags: SearchFlags,
    replacement: Option<String>,
    target: ReplaceTarget,
) -> Result<()> {
    let text = fs::read_to_string(&file)?;
    let options = flags.over(ctx.api.load_config()?.search);

    let result = match &replacement {
        Some(replacement) => ctx.api.replace(&text, &term, options, replacement, target)?,
        None => ctx.api.find(&text, &term, options)?,
    };

    if let Some(document) = &result.document {
        fs::write(&file, document)?;
    }
    if replacement.is_none() {
        print_matches(&result.matches);
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_config(ctx: &AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(k), None) => ConfigAction::ShowKey(k),
        (Some(k), Some(v)) => ConfigAction::Set(k, v),
    };
    let is_show_all = matches!(action, ConfigAction::ShowAll);

    let result = ctx.api.config(action)?;
    if is_show_all {
        if let Some(config) = &result.config {
            for key in NotekitConfig::keys() {
                println!("{} = {}", key, config.get(key)?);
            }
        }
    }
    print_messages(&result.messages);
    Ok(())
}

fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

const LINE_WIDTH: usize = 100;
const CONTEXT_WIDTH: usize = 30;
const PIN_MARKER: &str = "⚲";

fn print_pins(pins: &[PinView]) {
    for (i, pin) in pins.iter().enumerate() {
        let idx = format!("{}. ", i + 1);
        let kind = format!("{:<9}", pin.kind.to_string());

        let title = match (&pin.title, &pin.parent) {
            (Some(title), Some(parent)) => format!("{} › {}", parent, title),
            (Some(title), None) => title.clone(),
            (None, _) => "(missing)".to_string(),
        };

        let fixed = 2 + PIN_MARKER.width() + 1 + idx.width() + kind.width() + pin.id.width() + 3;
        let title = truncate_to_width(&title, LINE_WIDTH.saturating_sub(fixed));
        let title = if pin.is_stale() {
            title.red()
        } else {
            title.bold()
        };

        println!(
            "  {} {}{}{}  {}",
            PIN_MARKER.yellow(),
            idx.yellow(),
            kind.dimmed(),
            title,
            pin.id.dimmed()
        );
    }
}

fn print_catalog(catalog: &Catalog) {
    if !catalog.notebooks.is_empty() {
        println!("{}", "Notebooks".bold());
        for notebook in &catalog.notebooks {
            println!("  {}  {}", notebook.title, notebook.id.dimmed());
            for topic in &notebook.topics {
                println!("    - {}  {}", topic.title, topic.id.dimmed());
            }
        }
    }
    if !catalog.tags.is_empty() {
        println!("{}", "Tags".bold());
        for tag in &catalog.tags {
            println!("  #{}  {}", tag.title, tag.id.dimmed());
        }
    }
}

fn print_matches(matches: &[MatchView]) {
    for m in matches {
        let location = format!("{:>8}", format!("{}:{}", m.line, m.column));
        let marker = if m.selected { ">" } else { " " };

        let before = tail_to_width(&m.line_text[..m.span.start], CONTEXT_WIDTH);
        let found = &m.line_text[m.span.clone()];
        let used = location.width() + 4 + before.width() + found.width();
        let after = truncate_to_width(&m.line_text[m.span.end..], LINE_WIDTH.saturating_sub(used));

        println!(
            "{} {}  {}{}{}",
            marker.yellow(),
            location.dimmed(),
            before,
            found.yellow().bold(),
            after
        );
    }
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    use unicode_width::UnicodeWidthChar;

    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }

    result
}

/// Keep the end of `s`, at most `max_width` columns wide.
fn tail_to_width(s: &str, max_width: usize) -> String {
    use unicode_width::UnicodeWidthChar;

    if s.width() <= max_width {
        return s.to_string();
    }

    let mut kept: Vec<char> = Vec::new();
    let mut current_width = 1;
    for c in s.chars().rev() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width {
            break;
        }
        kept.push(c);
        current_width += char_width;
    }
    kept.push('…');
    kept.iter().rev().collect()
}

fn format_time_ago(millis: i64) -> String {
    let then = chrono::DateTime::from_timestamp_millis(millis).unwrap_or_default();
    let duration = chrono::Utc::now().signed_duration_since(then);

    let formatter = timeago::Formatter::new();
    formatter.convert(duration.to_std().unwrap_or_default())
}
