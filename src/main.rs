use clap::Parser;
use tracing_subscriber::EnvFilter;
use users_migrate::config::MigrationConfig;
use users_migrate::output::Format;

#[derive(Parser)]
#[command(
    name = "users-migrate",
    version,
    about = "Move one legacy user and their embedded tasks into the new schema",
    long_about = "Move one legacy user and their embedded tasks into the new schema.\n\n\
        Run after the challenges migration. Re-running for the same user inserts duplicates."
)]
struct Cli {
    /// Output format for the final report
    #[arg(long, value_enum, default_value = "json")]
    format: Format,
    /// Shorthand for --format pretty
    #[arg(long, hide = true)]
    pretty: bool,
    #[command(flatten)]
    config: MigrationConfig,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli, format: Format) -> users_migrate::error::Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(users_migrate::commands::migrate::run(&cli.config, format))
}

fn main() {
    let cli = Cli::parse();
    init_tracing();
    let format = if cli.pretty {
        Format::Pretty
    } else {
        cli.format
    };
    if let Err(e) = run(cli, format) {
        match format {
            Format::Json => {
                eprintln!(
                    "{}",
                    serde_json::json!({
                        "error": e.code(),
                        "message": e.to_string()
                    })
                );
            }
            Format::Pretty => eprintln!("error: {e}"),
        }
        std::process::exit(1);
    }
}
