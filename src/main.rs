use chaabi::{
    app::{Action, App},
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    logging,
    quote::{Quote, QuoteBook, QuoteSource},
    runtime::{AppEvent, CrosstermEventSource, FixedTicker, Runner},
    store::{MemoryScoreStore, ScoreStore, SqliteScoreStore},
};
use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    time::Instant,
};

/// typing speed test tui
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Retype a quote as fast and as accurately as you can. Mistakes are counted but cannot be corrected; the final WPM is kept as your last score."
)]
pub struct Cli {
    /// number of seconds to run test (defaults to the configured duration, 300 out of the box)
    #[clap(short = 's', long, value_parser = clap::value_parser!(u64).range(1..))]
    number_of_secs: Option<u64>,

    /// custom quote to type instead of a random one
    #[clap(short = 'p', long)]
    prompt: Option<String>,

    /// author shown under a custom quote
    #[clap(short = 'a', long, requires = "prompt")]
    author: Option<String>,

    /// don't persist the final score
    #[clap(long)]
    no_save: bool,

    /// write the effective settings to the config file
    #[clap(long)]
    save_config: bool,
}

impl Cli {
    /// Config file values overridden by whatever was given on the command line
    fn resolve(&self, mut config: Config) -> Config {
        if let Some(secs) = self.number_of_secs {
            config.duration_secs = secs;
        }
        if self.no_save {
            config.save_score = false;
        }
        config
    }

    fn quote_source(&self) -> Result<Box<dyn QuoteSource>, Box<dyn Error>> {
        match &self.prompt {
            Some(prompt) => {
                let author = self.author.as_deref().unwrap_or("anonymous");
                match Quote::new(prompt, author) {
                    Some(quote) => Ok(Box::new(quote)),
                    None => Cli::command()
                        .error(ErrorKind::ValueValidation, "prompt must not be empty")
                        .exit(),
                }
            }
            None => Ok(Box::new(QuoteBook::embedded()?)),
        }
    }
}

fn open_store(config: &Config) -> Box<dyn ScoreStore> {
    if !config.save_score {
        return Box::new(MemoryScoreStore::new());
    }
    match SqliteScoreStore::new() {
        Ok(store) => Box::new(store),
        Err(e) => {
            log::warn!("Score store unavailable, keeping scores in memory: {e}");
            Box::new(MemoryScoreStore::new())
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    logging::init(AppDirs::log_path().as_deref());

    let config_store = FileConfigStore::new();
    let config = cli.resolve(config_store.load());
    if cli.save_config {
        config_store.save(&config)?;
        log::info!("Saved config to {}", config_store.path().display());
    }

    let mut app = App::new(cli.quote_source()?, config.duration_secs, open_store(&config));

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(CrosstermEventSource::new(), FixedTicker::default());

    loop {
        terminal.draw(|f| f.render_widget(&*app, f.area()))?;

        match runner.step() {
            AppEvent::Tick => app.on_tick(Instant::now()),
            AppEvent::Resize => {}
            AppEvent::Key(key) => {
                if app.on_key(key, Instant::now()) == Action::Quit {
                    break;
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["chaabi"]);

        assert_eq!(cli.number_of_secs, None);
        assert_eq!(cli.prompt, None);
        assert_eq!(cli.author, None);
        assert!(!cli.no_save);
        assert!(!cli.save_config);
    }

    #[test]
    fn test_cli_number_of_secs() {
        let cli = Cli::parse_from(["chaabi", "-s", "60"]);
        assert_eq!(cli.number_of_secs, Some(60));

        let cli = Cli::parse_from(["chaabi", "--number-of-secs", "120"]);
        assert_eq!(cli.number_of_secs, Some(120));
    }

    #[test]
    fn test_cli_rejects_zero_seconds() {
        assert!(Cli::try_parse_from(["chaabi", "-s", "0"]).is_err());
    }

    #[test]
    fn test_cli_author_requires_prompt() {
        assert!(Cli::try_parse_from(["chaabi", "-a", "me"]).is_err());

        let cli = Cli::parse_from(["chaabi", "-p", "hello world", "-a", "me"]);
        assert_eq!(cli.prompt.as_deref(), Some("hello world"));
        assert_eq!(cli.author.as_deref(), Some("me"));
    }

    #[test]
    fn test_resolve_overrides_config() {
        let cli = Cli::parse_from(["chaabi", "-s", "45", "--no-save"]);
        let config = cli.resolve(Config::default());

        assert_eq!(config.duration_secs, 45);
        assert!(!config.save_score);
    }

    #[test]
    fn test_resolve_keeps_config_when_no_flags() {
        let cli = Cli::parse_from(["chaabi"]);
        let stored = Config {
            duration_secs: 90,
            save_score: true,
        };
        assert_eq!(cli.resolve(stored.clone()), stored);
    }

    #[test]
    fn test_custom_prompt_source() {
        let cli = Cli::parse_from(["chaabi", "--prompt", "  custom   text "]);
        let quote = cli.quote_source().unwrap().random();

        assert_eq!(quote.text, "custom text");
        assert_eq!(quote.author, "anonymous");
    }

    #[test]
    fn test_default_source_is_the_embedded_book() {
        let cli = Cli::parse_from(["chaabi"]);
        let quote = cli.quote_source().unwrap().random();
        assert!(!quote.text.is_empty());
    }

    #[test]
    fn test_no_save_uses_memory_store() {
        let config = Config {
            duration_secs: 300,
            save_score: false,
        };
        let mut store = open_store(&config);
        store.set_item("wpm", "1").unwrap();
        assert_eq!(store.get_item("wpm").unwrap().as_deref(), Some("1"));
    }
}
