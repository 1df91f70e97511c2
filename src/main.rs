use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use colored::Colorize;
use revieweval::models::EvalConfig;
use revieweval::Result;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "revieweval")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Human evaluation interface for peer reviews", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Config file (default: ./revieweval.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default revieweval.toml in the current directory
    Init {
        /// Overwrite an existing config
        #[arg(short, long)]
        force: bool,
    },

    /// Start the annotation web server
    Serve {
        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,

        /// Address to bind (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Data directory (overrides config)
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// PDF directory (overrides config)
        #[arg(long)]
        pdf_dir: Option<PathBuf>,

        /// Results CSV file (overrides config)
        #[arg(long)]
        results: Option<PathBuf>,

        /// Open the interface in a browser
        #[arg(long)]
        open: bool,
    },

    /// Parse a review text file and print its sections
    Parse {
        /// Review text file
        file: PathBuf,

        /// Output in JSON format
        #[arg(short, long)]
        json: bool,
    },

    /// List papers assigned to a user with their rated status
    Papers {
        /// Annotator name
        user: String,
    },

    /// Show annotation progress for every user
    Status {
        /// Output in JSON format
        #[arg(short, long)]
        json: bool,
    },

    /// Print stored ratings (CSV by default)
    Export {
        /// Output in JSON format
        #[arg(short, long)]
        json: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing();

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("{}", format!("Error: failed to create tokio runtime: {}", e).red());
            std::process::exit(1);
        }
    };

    if let Err(e) = runtime.block_on(run_async(cli)) {
        eprintln!("{}", format!("Error: {:#}", e).red());
        std::process::exit(1);
    }
}

async fn run_async(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Init { force } => {
            revieweval::cli::init::run(force)?;
        }

        Commands::Serve {
            port,
            host,
            data_dir,
            pdf_dir,
            results,
            open,
        } => {
            let mut config = EvalConfig::load(cli.config.as_deref())?;
            if let Some(port) = port {
                config.port = port;
            }
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(data_dir) = data_dir {
                config.data_dir = data_dir;
            }
            if let Some(pdf_dir) = pdf_dir {
                config.pdf_dir = pdf_dir;
            }
            if let Some(results) = results {
                config.results_path = results;
            }

            println!("{}", "📄 Starting Human Evaluation Interface...".cyan());
            revieweval::cli::serve::run(&config, open).await?;
        }

        Commands::Parse { file, json } => {
            revieweval::cli::parse::run(&file, json)?;
        }

        Commands::Papers { user } => {
            let config = EvalConfig::load(cli.config.as_deref())?;
            revieweval::cli::papers::run(&config, &user)?;
        }

        Commands::Status { json } => {
            let config = EvalConfig::load(cli.config.as_deref())?;
            revieweval::cli::status::run(&config, json)?;
        }

        Commands::Export { json } => {
            let config = EvalConfig::load(cli.config.as_deref())?;
            revieweval::cli::export::run(&config, json)?;
        }

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "revieweval", &mut io::stdout());
        }
    }

    Ok(())
}
