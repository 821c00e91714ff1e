use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "gateway-cli")]
#[command(about = "Management CLI for the API gateway", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:9100")]
    url: String,

    #[arg(short, long, env = "GATEWAY_ADMIN_KEY")]
    key: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check gateway status
    Status,
    /// List the route table
    Routes,
    /// Add a backend to a URL prefix
    Add {
        url_prefix: String,
        address: String,
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Remove a backend from a URL prefix
    Remove {
        url_prefix: String,
        address: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", cli.key))?,
    );

    let upstreams = format!("{}/admin/upstreams", cli.url);
    let res = match cli.command {
        Commands::Status => {
            client.get(format!("{}/admin/status", cli.url))
                .headers(headers)
                .send()
                .await?
        }
        Commands::Routes => {
            client.get(format!("{}/admin/routes", cli.url))
                .headers(headers)
                .send()
                .await?
        }
        Commands::Add { url_prefix, address, name } => {
            client.post(&upstreams)
                .headers(headers)
                .json(&json!({ "url_prefix": url_prefix, "address": address, "name": name }))
                .send()
                .await?
        }
        Commands::Remove { url_prefix, address } => {
            client.delete(&upstreams)
                .headers(headers)
                .json(&json!({ "url_prefix": url_prefix, "address": address }))
                .send()
                .await?
        }
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;
    let body = serde_json::from_str::<Value>(&text)
        .map(|json| serde_json::to_string_pretty(&json))
        .unwrap_or_else(|_| Ok(text.clone()))?;

    if status.is_success() {
        println!("{}", body);
    } else {
        eprintln!("Error: admin API returned status {}", status);
        eprintln!("{}", body);
    }
    Ok(())
}
