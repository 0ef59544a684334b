use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "proxy-cli")]
#[command(about = "Management CLI for the forward proxy admin API", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:4300")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Per-category request counts
    Info,
    /// Print the active configuration file
    Config,
    /// Replace the configuration from a local JSON file
    Push {
        /// Path of the JSON document to upload
        file: std::path::PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Info => {
            let res = client.get(format!("{}/info", cli.url)).send().await?;
            print_response(res).await?;
        }
        Commands::Config => {
            let res = client
                .get(format!("{}/read_config-file", cli.url))
                .send()
                .await?;
            let status = res.status();
            if !status.is_success() {
                eprintln!("Error: Admin API returned status {}", status);
                return Ok(());
            }
            println!("{}", res.text().await?);
        }
        Commands::Push { file } => {
            let body = tokio::fs::read_to_string(&file).await?;
            // Parse locally first so a typo fails here, not at the API.
            let document: Value = serde_json::from_str(&body)?;
            let res = client
                .post(format!("{}/write_config-file", cli.url))
                .json(&document)
                .send()
                .await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: Admin API returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
