use clap::Parser;
use kvc_console::cli::{Cli, Interrupted, INTERRUPTED_EXIT_CODE};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so KVC_API_BASE_URL and friends can live next to the project
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = kvc_console::cli::run(cli).await {
        // exit right away: a prompt thread may still be blocked on stdin
        if e.downcast_ref::<Interrupted>().is_some() {
            std::process::exit(INTERRUPTED_EXIT_CODE);
        }
        match std::env::var("CLI_VERBOSE").as_deref() {
            Ok("true") | Ok("1") => eprintln!("Error: {e:?}"),
            _ => eprintln!("Error: {e}"),
        }
        std::process::exit(1);
    }

    Ok(())
}
