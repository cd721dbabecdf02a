use ocsp_cache::cli::{handle_command, Cli};
use ocsp_cache::utils::errors::Result;

#[tokio::main]
async fn main() -> Result<()> {
    use clap::Parser;
    let cli = Cli::parse();

    if let Err(e) = handle_command(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(if e.is_client_error() { 2 } else { 1 });
    }

    Ok(())
}
