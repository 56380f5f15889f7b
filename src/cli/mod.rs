//! CLI commands for bangs.
//!
//! `bangs <query>` resolves and opens; subcommands cover printing, the
//! settings (list / default) and the HTTP redirector.

pub mod settings;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{CommandFactory, Parser, Subcommand};

use crate::config::Config;
use crate::executor::{self, Searcher};
use crate::logging;
use crate::platform::{StdoutNavigator, SystemNavigator};
use crate::server::{self, AppState};
use crate::storage::FileStore;

#[derive(Debug, Parser)]
#[command(name = "bangs")]
#[command(about = "Search with bangs: !g rust, rust w!", long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Config file (default: ~/.config/bangs/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print the URL instead of opening it
    #[arg(long, short)]
    pub print: bool,

    /// Default bang for this search, ignoring the stored one
    #[arg(long, short = 'd', value_name = "TAG")]
    pub default_bang: Option<String>,

    /// Search query, e.g. `!g rust` or `rust w!`
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub query: Vec<String>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the resolved URL for a query
    Resolve {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
        query: Vec<String>,
    },

    /// List available bangs
    List,

    /// Show or change the default bang
    Default {
        /// Tag to make the default
        tag: Option<String>,

        /// Go back to the built-in default
        #[arg(long, conflicts_with = "tag")]
        clear: bool,
    },

    /// Run the HTTP redirector
    Serve {
        /// Address to bind (default from config, 127.0.0.1)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind (default from config, 8008)
        #[arg(long, short)]
        port: Option<u16>,
    },
}

impl Cli {
    fn load_config(&self) -> Config {
        match &self.config {
            Some(path) => Config::load_from(path),
            None => Config::load(),
        }
    }
}

/// Parse arguments and run.
pub fn run() -> anyhow::Result<()> {
    run_with(Cli::parse())
}

pub fn run_with(cli: Cli) -> anyhow::Result<()> {
    let filter = match cli.command {
        Some(Commands::Serve { .. }) => logging::SERVER_FILTER,
        _ => logging::CLI_FILTER,
    };
    logging::init(filter);

    let config = cli.load_config();
    let table = config.bang_table();
    let mut store = FileStore::open(config.storage_path());

    match cli.command {
        Some(Commands::Resolve { query }) => {
            let searcher = Searcher::new(&table, &store);
            let action = searcher.plan(&query.join(" "), true);
            executor::execute(&action, &SystemNavigator::new(), &StdoutNavigator)?;
        }
        Some(Commands::List) => {
            let mut stdout = std::io::stdout().lock();
            settings::list_bangs(&mut stdout, &table, &store)?;
        }
        Some(Commands::Default { tag, clear }) => {
            let mut stdout = std::io::stdout().lock();
            settings::default_bang(&mut stdout, &table, &mut store, tag.as_deref(), clear)?;
        }
        Some(Commands::Serve { host, port }) => {
            let mut server_config = config.server.clone();
            if let Some(host) = host {
                server_config.host = host;
            }
            if let Some(port) = port {
                server_config.port = port;
            }

            let state = Arc::new(AppState::new(table, store));
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(server::serve(&server_config, state))?;
        }
        None if cli.query.is_empty() => {
            Cli::command().print_help()?;
        }
        None => {
            let mut searcher = Searcher::new(&table, &store);
            if let Some(tag) = cli.default_bang {
                searcher = searcher.with_default_tag(tag);
            }
            let action = searcher.plan(&cli.query.join(" "), cli.print);
            let browser = SystemNavigator::with_browser(config.general.browser.clone());
            executor::execute(&action, &browser, &StdoutNavigator)?;
        }
    }

    Ok(())
}
