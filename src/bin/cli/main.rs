mod app;
mod commands;
mod render;
#[cfg(feature = "tui")]
mod tui;

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use lexideck_lib::words::Difficulty;

#[derive(Parser)]
#[command(name = "lexideck", about = "Swedish vocabulary flashcards", version)]
struct Cli {
    /// Use a specific data directory (default: user data dir)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// List words grouped by topic
    List {
        /// Translation language to show (default: from settings)
        #[arg(long)]
        language: Option<String>,
        /// Only words with this difficulty
        #[arg(long)]
        difficulty: Option<Difficulty>,
        /// Include inactive words
        #[arg(long)]
        all: bool,
    },

    /// Add a word
    Add {
        /// Swedish term
        word: String,
        #[arg(long)]
        source: String,
        #[arg(long)]
        subtopic1: String,
        #[arg(long)]
        subtopic2: String,
        /// Swedish example sentence
        #[arg(long)]
        example: Option<String>,
        /// Translation as LANG=WORD (repeatable)
        #[arg(long = "tr", value_name = "LANG=WORD")]
        translations: Vec<String>,
        /// Translation example as LANG=SENTENCE (repeatable)
        #[arg(long = "tr-example", value_name = "LANG=SENTENCE")]
        examples: Vec<String>,
    },

    /// Toggle a word, or set a whole topic active/inactive
    Toggle {
        /// Word (Swedish term or id prefix)
        word: Option<String>,
        /// Topic source; with --on or --off applies to every word in it
        #[arg(long, conflicts_with = "word")]
        source: Option<String>,
        #[arg(long, requires = "source")]
        subtopic1: Option<String>,
        #[arg(long, requires = "subtopic1")]
        subtopic2: Option<String>,
        #[arg(long, requires = "source", conflicts_with = "off")]
        on: bool,
        #[arg(long, requires = "source")]
        off: bool,
    },

    /// Delete words
    Delete {
        /// Words (Swedish term or id prefix)
        #[arg(required = true)]
        words: Vec<String>,
    },

    /// Import words from a CSV file
    Import { path: PathBuf },

    /// Export all words to a CSV file
    Export { path: PathBuf },

    /// Import every CSV file in a folder
    Sync { dir: PathBuf },

    /// Suggest an example sentence for a word
    Suggest {
        word: String,
        /// Language code or name (default: Swedish)
        #[arg(long)]
        language: Option<String>,
    },

    /// Show or change gesture bindings
    #[command(subcommand)]
    Gestures(GesturesCommand),

    /// Launch the interactive study session
    #[cfg(feature = "tui")]
    Study,
}

#[derive(Subcommand)]
enum GesturesCommand {
    /// Show the current bindings
    Show,

    /// List every bindable action
    Actions,

    /// Bind an action to a direction
    Set {
        /// up, down, left or right
        direction: String,
        /// Action name, e.g. flip, readAloud, move-2, backAndBlur, markHard
        action: String,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let use_color = !cli.no_color && std::io::stdout().is_terminal();
    let data_dir = cli.data_dir.as_deref();

    match cli.command {
        None => {
            // No subcommand → launch TUI
            #[cfg(feature = "tui")]
            {
                tui::run(data_dir)?;
            }
            #[cfg(not(feature = "tui"))]
            {
                eprintln!("TUI not available (built without 'tui' feature). Use a subcommand.");
                eprintln!("Run with --help for usage.");
                std::process::exit(1);
            }
        }
        Some(Command::List { language, difficulty, all }) => {
            let app = app::App::new(data_dir)?;
            commands::list::run(&app, language.as_deref(), difficulty, all, &cli.format, use_color)?;
        }
        Some(Command::Add { word, source, subtopic1, subtopic2, example, translations, examples }) => {
            let app = app::App::new(data_dir)?;
            let args = commands::add::AddArgs {
                home_term: &word,
                source: &source,
                subtopic1: &subtopic1,
                subtopic2: &subtopic2,
                example: example.as_deref(),
                translations: &translations,
                examples: &examples,
            };
            commands::add::run(&app, args, &cli.format, use_color)?;
        }
        Some(Command::Toggle { word, source, subtopic1, subtopic2, on, off }) => {
            let app = app::App::new(data_dir)?;
            match (word, source) {
                (Some(word), _) => commands::toggle::run_word(&app, &word, &cli.format, use_color)?,
                (None, Some(source)) => {
                    if !on && !off {
                        anyhow::bail!("Use --on or --off with --source");
                    }
                    commands::toggle::run_topic(
                        &app,
                        &source,
                        subtopic1.as_deref(),
                        subtopic2.as_deref(),
                        on,
                        &cli.format,
                        use_color,
                    )?;
                }
                (None, None) => anyhow::bail!("Give a word or --source"),
            }
        }
        Some(Command::Delete { words }) => {
            let app = app::App::new(data_dir)?;
            commands::delete::run(&app, &words, &cli.format, use_color)?;
        }
        Some(Command::Import { path }) => {
            let app = app::App::new(data_dir)?;
            commands::exchange::run_import(&app, &path, &cli.format, use_color)?;
        }
        Some(Command::Export { path }) => {
            let app = app::App::new(data_dir)?;
            commands::exchange::run_export(&app, &path, &cli.format, use_color)?;
        }
        Some(Command::Sync { dir }) => {
            let app = app::App::new(data_dir)?;
            commands::exchange::run_sync(&app, &dir, &cli.format, use_color)?;
        }
        Some(Command::Suggest { word, language }) => {
            let app = app::App::new(data_dir)?;
            commands::suggest::run(&app, &word, language.as_deref(), &cli.format, use_color)?;
        }
        Some(Command::Gestures(subcmd)) => match subcmd {
            GesturesCommand::Show => {
                let app = app::App::new(data_dir)?;
                commands::gestures::run_show(&app, &cli.format, use_color)?;
            }
            GesturesCommand::Actions => commands::gestures::run_actions(&cli.format)?,
            GesturesCommand::Set { direction, action } => {
                let mut app = app::App::new(data_dir)?;
                commands::gestures::run_set(&mut app, &direction, &action, &cli.format, use_color)?;
            }
        },
        #[cfg(feature = "tui")]
        Some(Command::Study) => {
            tui::run(data_dir)?;
        }
    }

    Ok(())
}
