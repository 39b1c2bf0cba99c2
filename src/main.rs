use clap::Parser;
use strippedchain::cli::commands;
use strippedchain::cli::{validate_owner, Cli, Commands, Workspace};
use strippedchain::config::{LogFormat, Settings};
use strippedchain::errors::Result;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        strippedchain::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    // Commands that never touch the data directory.
    match cli.command {
        Commands::Version => return commands::version::execute(),
        Commands::Completions { shell } => return commands::completions::execute(shell),
        _ => {}
    }

    // Validate the owner early to catch typos.
    validate_owner(&cli.owner)?;

    let settings = Settings::load(&std::env::current_dir()?)?;
    init_tracing(&settings.log_level, settings.log_format);

    let ws = Workspace::open(cli, settings)?;

    match cli.command {
        Commands::Ingest {
            ref files,
            ref note,
        } => commands::ingest::execute(cli, &ws, files, note.as_deref()),
        Commands::Retrieve {
            ref name,
            ref output,
        } => commands::retrieve::execute(cli, &ws, name, output.as_deref()),
        Commands::Remove { ref name, force } => commands::remove::execute(cli, &ws, name, force),
        Commands::Verify => commands::verify::execute(&ws),
        Commands::Show => commands::show::execute(&ws),
        Commands::Files => commands::files::execute(cli, &ws),
        Commands::Version | Commands::Completions { .. } => Ok(()),
    }
}

/// Install the global tracing subscriber.  Logs go to stderr so that
/// `retrieve` can stream plaintext on stdout.
fn init_tracing(level: &str, format: LogFormat) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    match format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
}
