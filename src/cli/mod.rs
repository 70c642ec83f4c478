use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod auth;
pub mod chat;
pub mod init;
pub mod migrate;
pub mod serve;

use crate::core::db::{async_db, initialize_db};
use crate::core::{AppConfig, init_tracing};
use crate::kv::SqliteKv;
use crate::triage::Category;

#[derive(Subcommand)]
enum Command {
    /// Create the database
    Init {},
    /// Migrate the db schema and drop unscoped booking flags
    Migrate {},
    /// Run the API server
    Serve {
        /// Set the server host address
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Set the server port
        #[arg(long, default_value = "2222")]
        port: String,
    },
    /// Create an account and sign in
    Signup {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Sign in with an existing account
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Sign out
    Logout {},
    /// Show the signed in user
    Profile {},
    /// Start a symptom chat session
    Chat {},
    /// Print the chat transcript
    History {},
    /// Clear booking status so recommendations can be booked again
    Reset {},
    /// Book from the latest recommendation without the chat session
    Book {
        #[arg(value_parser = parse_category)]
        category: Category,
        /// Items to book, by name or 1-based position
        #[arg(required = true)]
        items: Vec<String>,
    },
}

fn parse_category(s: &str) -> Result<Category, String> {
    s.parse::<Category>().map_err(|e| e.to_string())
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

/// Open the key-value store, creating the table on first use.
pub async fn open_kv(config: &AppConfig) -> Result<SqliteKv> {
    std::fs::create_dir_all(&config.storage_path)?;
    let db = async_db(&config.db_path).await?;
    db.call(|conn| {
        initialize_db(conn)?;
        Ok(())
    })
    .await?;
    Ok(SqliteKv::new(db))
}

pub async fn run() -> Result<()> {
    let args = Cli::parse();
    let config = AppConfig::default();

    // Interactive commands only log problems unless RUST_LOG says otherwise
    if !matches!(args.command, Some(Command::Serve { .. })) {
        init_tracing(&format!("{}=warn", env!("CARGO_CRATE_NAME")));
    }

    // Handle each sub command
    match args.command {
        Some(Command::Init {}) => {
            init::run(&config).await?;
        }
        Some(Command::Migrate {}) => {
            migrate::run(&config).await?;
        }
        Some(Command::Serve { host, port }) => {
            serve::run(host, port, config).await?;
        }
        Some(Command::Signup { email, password }) => {
            auth::signup(&config, &email, &password).await?;
        }
        Some(Command::Login { email, password }) => {
            auth::login(&config, &email, &password).await?;
        }
        Some(Command::Logout {}) => {
            auth::logout(&config).await?;
        }
        Some(Command::Profile {}) => {
            auth::profile(&config).await?;
        }
        Some(Command::Chat {}) => {
            chat::run(&config).await?;
        }
        Some(Command::History {}) => {
            chat::history(&config).await?;
        }
        Some(Command::Reset {}) => {
            chat::reset(&config).await?;
        }
        Some(Command::Book { category, items }) => {
            chat::book(&config, category, &items).await?;
        }
        None => {}
    }

    Ok(())
}
