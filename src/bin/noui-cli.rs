use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "noui-cli")]
#[command(about = "Query a running noui.bot API", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:3000")]
    url: String,

    /// Client identifier to send as X-Forwarded-For.
    #[arg(long)]
    client: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Platform status and capabilities
    Status,
    /// Liveness and uptime
    Health,
    /// Aggregate submission counts
    Stats,
    /// Service directory
    Services,
}

impl Commands {
    fn path(&self) -> &'static str {
        match self {
            Commands::Status => "/api/v1/status",
            Commands::Health => "/api/v1/health",
            Commands::Stats => "/api/v1/stats",
            Commands::Services => "/api/v1/services",
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let mut request = client.get(format!("{}{}", cli.url.trim_end_matches('/'), cli.command.path()));
    if let Some(id) = &cli.client {
        request = request.header("x-forwarded-for", id);
    }

    print_response(request.send().await?).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let remaining = res
        .headers()
        .get("x-ratelimit-remaining")
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    if !status.is_success() {
        eprintln!("Error: API returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    if let Some(remaining) = remaining {
        eprintln!("Rate limit remaining: {}", remaining);
    }
    Ok(())
}
