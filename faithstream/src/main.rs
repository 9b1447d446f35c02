// FaithStream - church media library and staff dashboard
// Entry point and command dispatch

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use faithstream::app::{self, AppState};
use faithstream::commands;
use faithstream::database::{AdminRole, Category, NewNotice, Priority};
use faithstream::services::{CategoryFilter, MediaQuery, SortKey, SortOrder};
use faithstream::storage::KeyValueStore;
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for faithstream
#[derive(Parser, Debug)]
#[command(name = "faithstream")]
#[command(about = "Church media library, notices and staff dashboard")]
#[command(version)]
struct Cli {
    /// Directory holding settings.json and the database
    #[arg(long, global = true, env = "FAITHSTREAM_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Keep all data in memory for this run only
    #[arg(long, global = true)]
    ephemeral: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Version, data directory and suggestion status
    Info,
    /// Latest media and active notices
    Home,
    #[command(subcommand)]
    Media(MediaCommand),
    #[command(subcommand)]
    Notices(NoticeCommand),
    #[command(subcommand)]
    Admins(AdminCommand),
    /// Start a staff session
    Login {
        email: String,
        #[arg(long, env = "FAITHSTREAM_PASSWORD")]
        password: String,
    },
    Logout,
    /// Show the logged-in admin
    Whoami,
    #[command(subcommand)]
    History(HistoryCommand),
    /// Suggest a title from a description, or retitle existing media
    Suggest {
        #[arg(required_unless_present = "apply")]
        description: Option<String>,
        /// Media id whose description is used and whose title is replaced
        #[arg(long, conflicts_with = "description")]
        apply: Option<String>,
    },
    #[command(subcommand)]
    Credentials(CredentialCommand),
    #[command(subcommand)]
    Settings(SettingsCommand),
    /// Show which page a path resolves to
    Route { path: String },
}

#[derive(Subcommand, Debug)]
enum MediaCommand {
    /// Search and sort the library
    List {
        query: Option<String>,
        #[arg(long, default_value = "all")]
        category: CategoryFilter,
        #[arg(long)]
        sort: Option<SortKey>,
        #[arg(long, requires = "sort")]
        ascending: bool,
    },
    Show { id: String },
    Add(MediaFields),
    Update {
        id: String,
        #[command(flatten)]
        fields: MediaFields,
    },
    Delete { id: String },
    /// Play media, counting one play
    Play { id: String },
    /// Count a download and print where to fetch it
    Download { id: String },
    /// Library totals
    Stats,
}

#[derive(Args, Debug)]
struct MediaFields {
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    preacher: Option<String>,
    #[arg(long)]
    category: Option<Category>,
    #[arg(long)]
    description: Option<String>,
    /// Date preached, YYYY-MM-DD
    #[arg(long)]
    date: Option<NaiveDate>,
    /// Length such as 45:20
    #[arg(long)]
    duration: Option<String>,
    /// MP3 file to reference
    #[arg(long)]
    audio: Option<PathBuf>,
    /// Thumbnail image to reference
    #[arg(long)]
    thumbnail: Option<PathBuf>,
}

impl From<MediaFields> for commands::MediaInput {
    fn from(fields: MediaFields) -> Self {
        Self {
            title: fields.title,
            preacher: fields.preacher,
            category: fields.category,
            description: fields.description,
            date_preached: fields.date,
            duration: fields.duration,
            audio: fields.audio,
            thumbnail: fields.thumbnail,
        }
    }
}

#[derive(Subcommand, Debug)]
enum NoticeCommand {
    List {
        /// Include inactive notices
        #[arg(long)]
        all: bool,
    },
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        message: String,
        #[arg(long, default_value = "normal")]
        priority: Priority,
        #[arg(long)]
        image_url: Option<String>,
        /// Store the notice without showing it
        #[arg(long)]
        inactive: bool,
    },
    Delete { id: String },
}

#[derive(Subcommand, Debug)]
enum AdminCommand {
    List,
    Add {
        email: String,
        #[arg(long, default_value = "viewer")]
        role: AdminRole,
    },
    Update {
        id: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        role: AdminRole,
    },
    Remove { id: String },
}

#[derive(Subcommand, Debug)]
enum HistoryCommand {
    List,
    Remove { term: String },
    Clear,
}

#[derive(Subcommand, Debug)]
enum CredentialCommand {
    /// Store the suggestion API key in the OS credential store
    Set { key: String },
    Clear,
    Status,
}

#[derive(Subcommand, Debug)]
enum SettingsCommand {
    Show,
    /// Change the suggestion model or API base URL
    Set {
        #[arg(long)]
        model: Option<String>,
        #[arg(long)]
        base_url: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout stays parseable JSON
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "faithstream=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let data_dir = match cli.data_dir {
        Some(dir) => dir,
        None => app::default_data_dir().context("No data directory available")?,
    };

    if cli.ephemeral {
        let state = app::setup_ephemeral(data_dir)
            .await
            .context("Failed to initialize application")?;
        run(&state, cli.command).await
    } else {
        let state = app::setup(data_dir)
            .await
            .context("Failed to initialize application")?;
        run(&state, cli.command).await
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run<S: KeyValueStore>(state: &AppState<S>, command: Command) -> Result<()> {
    match command {
        Command::Info => print_json(&commands::get_app_info(state).await?),
        Command::Home => print_json(&commands::get_home(state).await?),
        Command::Media(cmd) => run_media(state, cmd).await,
        Command::Notices(cmd) => run_notices(state, cmd).await,
        Command::Admins(cmd) => run_admins(state, cmd).await,
        Command::Login { email, password } => {
            print_json(&commands::login(state, &email, &password).await?)
        }
        Command::Logout => Ok(commands::logout(state).await?),
        Command::Whoami => print_json(&commands::whoami(state).await?),
        Command::History(cmd) => match cmd {
            HistoryCommand::List => print_json(&commands::list_history(state).await?),
            HistoryCommand::Remove { term } => {
                print_json(&commands::remove_history_term(state, &term).await?)
            }
            HistoryCommand::Clear => Ok(commands::clear_history(state).await?),
        },
        Command::Suggest { description, apply } => match (apply, description) {
            (Some(id), _) => print_json(&commands::apply_suggested_title(state, &id).await?),
            (None, Some(description)) => {
                print_json(&commands::suggest_metadata(state, &description).await?)
            }
            (None, None) => anyhow::bail!("Give a description or --apply <media-id>"),
        },
        Command::Credentials(cmd) => match cmd {
            CredentialCommand::Set { key } => Ok(commands::set_api_key(&key).await?),
            CredentialCommand::Clear => Ok(commands::clear_api_key().await?),
            CredentialCommand::Status => print_json(&commands::api_key_status().await?),
        },
        Command::Settings(cmd) => match cmd {
            SettingsCommand::Show => print_json(&commands::get_settings(state).await?),
            SettingsCommand::Set { model, base_url } => print_json(
                &commands::update_suggestion_settings(state, model, base_url).await?,
            ),
        },
        Command::Route { path } => print_json(&commands::resolve_route(state, &path).await?),
    }
}

async fn run_media<S: KeyValueStore>(state: &AppState<S>, cmd: MediaCommand) -> Result<()> {
    match cmd {
        MediaCommand::List {
            query,
            category,
            sort,
            ascending,
        } => {
            let mut media_query = MediaQuery::new(query.unwrap_or_default()).with_category(category);
            if let Some(key) = sort {
                let order = if ascending {
                    SortOrder::Ascending
                } else {
                    SortOrder::Descending
                };
                media_query = media_query.sorted_by(key, order);
            }
            print_json(&commands::list_media(state, &media_query).await?)
        }
        MediaCommand::Show { id } => print_json(&commands::get_media(state, &id).await?),
        MediaCommand::Add(fields) => {
            print_json(&commands::create_media(state, fields.into()).await?)
        }
        MediaCommand::Update { id, fields } => {
            print_json(&commands::update_media(state, &id, fields.into()).await?)
        }
        MediaCommand::Delete { id } => Ok(commands::delete_media(state, &id).await?),
        MediaCommand::Play { id } => print_json(&commands::play_media(state, &id).await?),
        MediaCommand::Download { id } => print_json(&commands::download_media(state, &id).await?),
        MediaCommand::Stats => print_json(&commands::get_stats(state).await?),
    }
}

async fn run_notices<S: KeyValueStore>(state: &AppState<S>, cmd: NoticeCommand) -> Result<()> {
    match cmd {
        NoticeCommand::List { all } => print_json(&commands::list_notices(state, all).await?),
        NoticeCommand::Add {
            title,
            message,
            priority,
            image_url,
            inactive,
        } => {
            let req = NewNotice {
                title,
                message,
                date: Utc::now(),
                priority,
                active: !inactive,
                image_url,
            };
            print_json(&commands::create_notice(state, req).await?)
        }
        NoticeCommand::Delete { id } => Ok(commands::delete_notice(state, &id).await?),
    }
}

async fn run_admins<S: KeyValueStore>(state: &AppState<S>, cmd: AdminCommand) -> Result<()> {
    match cmd {
        AdminCommand::List => print_json(&commands::list_admins(state).await?),
        AdminCommand::Add { email, role } => {
            print_json(&commands::add_admin(state, &email, role).await?)
        }
        AdminCommand::Update { id, email, role } => {
            print_json(&commands::update_admin(state, &id, &email, role).await?)
        }
        AdminCommand::Remove { id } => Ok(commands::remove_admin(state, &id).await?),
    }
}
