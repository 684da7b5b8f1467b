use clap::{Parser, Subcommand};
use reqwest::header::{LOCATION, SET_COOKIE};
use reqwest::redirect::Policy;
use serde_json::Value;
use url::Url;

use link_cloak::gate::{SESSION_COOKIE_NAME, SESSION_COOKIE_VALUE};

#[derive(Parser)]
#[command(name = "cloak-cli")]
#[command(about = "Inspect and exercise a running link-cloak server", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:5000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show environment and configuration presence
    Status,
    /// Request a path without following redirects and show the gate's answer
    Probe {
        /// Path and query, e.g. "/?creative=abc"
        path: String,
        /// Send the session cookie
        #[arg(long)]
        with_cookie: bool,
    },
    /// Build a tracked link carrying the credential
    Link {
        #[arg(short, long)]
        token: String,
        /// Extra query parameters as key=value, e.g. utm_source=FB
        #[arg(long = "param", value_parser = parse_pair)]
        params: Vec<(String, String)>,
    },
}

fn parse_pair(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got '{}'", raw))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let base = Url::parse(&cli.url)?;

    match cli.command {
        Commands::Status => {
            let res = reqwest::Client::new()
                .get(base.join("/debug")?)
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Probe { path, with_cookie } => {
            let client = reqwest::Client::builder()
                .redirect(Policy::none())
                .build()?;
            let mut req = client.get(base.join(&path)?);
            if with_cookie {
                req = req.header(
                    reqwest::header::COOKIE,
                    format!("{}={}", SESSION_COOKIE_NAME, SESSION_COOKIE_VALUE),
                );
            }
            let res = req.send().await?;

            println!("Status: {}", res.status());
            if let Some(location) = res.headers().get(LOCATION) {
                println!("Location: {}", location.to_str().unwrap_or("<binary>"));
            }
            for cookie in res.headers().get_all(SET_COOKIE) {
                println!("Set-Cookie: {}", cookie.to_str().unwrap_or("<binary>"));
            }
        }
        Commands::Link { token, params } => {
            let mut link = base.clone();
            {
                let mut query = link.query_pairs_mut();
                query.append_pair("creative", &token);
                for (k, v) in &params {
                    query.append_pair(k, v);
                }
            }
            println!("{}", link);
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: server returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
