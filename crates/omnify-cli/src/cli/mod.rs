//! CLI entry and dispatch.

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use omnify_core::client::ApiClient;
use omnify_core::config::Config;
use omnify_core::session::{SessionManager, SessionStore};

mod commands;

#[derive(Parser)]
#[command(name = "omnify")]
#[command(version)]
#[command(about = "Omnify blogging client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Create an account and log in
    Signup {
        /// Display name
        #[arg(long)]
        name: String,
        /// Account email
        #[arg(long)]
        email: String,
        /// Account password
        #[arg(long)]
        password: String,
    },

    /// Log in with an existing account
    Login {
        /// Account email
        #[arg(long)]
        email: String,
        /// Account password
        #[arg(long)]
        password: String,
    },

    /// Log out (clears the stored session; no server call)
    Logout,

    /// Show the currently logged-in user
    Whoami,

    /// Browse and manage blog posts
    Posts {
        #[command(subcommand)]
        command: PostsCommands,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum PostsCommands {
    /// List one page of the feed (5 posts per page)
    List {
        /// Zero-based page index
        #[arg(long, default_value_t = 0)]
        page: u32,
    },
    /// Show a single post in full
    Show {
        /// The ID of the post to show
        #[arg(value_name = "POST_ID")]
        id: String,
    },
    /// Create a new post (requires login)
    Create {
        /// Post title
        #[arg(long)]
        title: String,
        /// Post body
        #[arg(long)]
        content: String,
    },
    /// Edit an existing post (requires login)
    Edit {
        /// The ID of the post to edit
        #[arg(value_name = "POST_ID")]
        id: String,
        /// New title
        #[arg(long)]
        title: String,
        /// New body
        #[arg(long)]
        content: String,
    },
    /// Delete a post (requires login)
    Delete {
        /// The ID of the post to delete
        #[arg(value_name = "POST_ID")]
        id: String,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
    /// Set the API base URL
    SetUrl {
        /// Base URL of the Omnify API, including any path prefix
        #[arg(value_name = "URL")]
        url: String,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;

    rt.block_on(async move { dispatch(cli).await })
}

async fn dispatch(cli: Cli) -> Result<()> {
    // Config-only commands don't need a gateway or a session.
    if let Commands::Config { command } = &cli.command {
        return match command {
            ConfigCommands::Path => {
                commands::config::path();
                Ok(())
            }
            ConfigCommands::Init => commands::config::init(),
            ConfigCommands::SetUrl { url } => commands::config::set_url(url),
        };
    }

    let config = Config::load().context("load config")?;
    let client = ApiClient::new(&config)?;
    let mut session = SessionManager::new(SessionStore::new());
    session.restore();

    match cli.command {
        Commands::Signup {
            name,
            email,
            password,
        } => commands::auth::signup(&client, &mut session, &name, &email, &password).await,
        Commands::Login { email, password } => {
            commands::auth::login(&client, &mut session, &email, &password).await
        }
        Commands::Logout => {
            commands::auth::logout(&mut session);
            Ok(())
        }
        Commands::Whoami => {
            commands::auth::whoami(&session);
            Ok(())
        }
        Commands::Posts { command } => match command {
            PostsCommands::List { page } => {
                commands::posts::list(&client, &session, page).await
            }
            PostsCommands::Show { id } => commands::posts::show(&client, &id).await,
            PostsCommands::Create { title, content } => {
                commands::posts::create(&client, &session, &title, &content).await
            }
            PostsCommands::Edit { id, title, content } => {
                commands::posts::edit(&client, &session, &id, &title, &content).await
            }
            PostsCommands::Delete { id } => {
                commands::posts::delete(&client, &session, &id).await
            }
        },
        Commands::Config { .. } => unreachable!("handled above"),
    }
}
