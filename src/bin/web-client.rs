//! Reference client: asks the proxy for one URL and prints the reply.
//!
//! Usage: `web-client [PROXY_HOST] [PROXY_PORT] [URL]`

use std::process::ExitCode;

use clap::Parser;

use forward_proxy::client::{WebClient, DEFAULT_IDLE};
use forward_proxy::observability::logging;

#[derive(Parser)]
#[command(name = "web-client")]
#[command(about = "Fetch a page through the forwarding proxy", long_about = None)]
struct Cli {
    #[arg(default_value = "localhost")]
    proxy_host: String,

    #[arg(default_value_t = 50015)]
    proxy_port: u16,

    #[arg(default_value = "http://example.com/")]
    url: String,

    /// Idle window for the reply, in seconds.
    #[arg(long, default_value_t = DEFAULT_IDLE.as_secs())]
    idle_secs: u64,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = logging::init_logging("warn") {
        eprintln!("Failed to initialize logging: {e}");
    }

    let client = WebClient::new(cli.proxy_host, cli.proxy_port)
        .with_idle_timeout(std::time::Duration::from_secs(cli.idle_secs));

    match client.fetch_text(&cli.url).await {
        Ok(page) => {
            println!("====================");
            println!("The received webpage:");
            println!("====================\n{page}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
