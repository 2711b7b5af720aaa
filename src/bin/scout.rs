// src/bin/scout.rs
// CLI front end for the turf-radar service: runs a search against a
// running instance, prints a ranked table and optionally writes the raw
// JSON response to a file.

use anyhow::{bail, Context, Result};
use dotenv::dotenv;
use reqwest::Client;
use serde::Deserialize;
use std::env;
use std::fs;

// --- ANSI colors for the terminal ---
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    origin_address: Option<String>,
    #[serde(default)]
    radius_km: f64,
    #[serde(default)]
    count: usize,
    #[serde(default)]
    results: Vec<TurfRow>,
}

#[derive(Debug, Deserialize)]
struct TurfRow {
    name: String,
    address: String,
    distance_km: f64,
    rating: Option<f64>,
    user_rating_count: Option<i32>,
    open_now: Option<bool>,
    phone: Option<String>,
    maps_url: String,
}

struct CliArgs {
    location: String,
    radius_km: Option<f64>,
    keyword: Option<String>,
    max_results: Option<usize>,
    out_file: Option<String>,
}

fn usage() -> ! {
    eprintln!(
        "Usage: scout <address | lat,lng> [radius_km] [--keyword <kw>] [--max <n>] [--out <file.json>]"
    );
    eprintln!("Example: scout \"HSR Layout\" 5 --keyword \"box cricket\" --out turfs.json");
    std::process::exit(1);
}

fn parse_args() -> CliArgs {
    let mut args = env::args().skip(1);

    let location = match args.next() {
        Some(loc) => loc,
        None => usage(),
    };

    let mut cli = CliArgs {
        location,
        radius_km: None,
        keyword: None,
        max_results: None,
        out_file: None,
    };

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--keyword" => cli.keyword = args.next(),
            "--max" => cli.max_results = args.next().and_then(|v| v.parse().ok()),
            "--out" => cli.out_file = args.next(),
            other => {
                if cli.radius_km.is_none() {
                    match other.parse() {
                        Ok(r) => cli.radius_km = Some(r),
                        Err(_) => usage(),
                    }
                } else {
                    usage();
                }
            }
        }
    }

    cli
}

/// Interpret "12.91,77.64" as coordinates, anything else as an address
fn location_params(location: &str) -> Vec<(String, String)> {
    let parts: Vec<&str> = location.split(',').map(|p| p.trim()).collect();
    if parts.len() == 2 {
        if let (Ok(lat), Ok(lng)) = (parts[0].parse::<f64>(), parts[1].parse::<f64>()) {
            return vec![
                ("lat".to_string(), lat.to_string()),
                ("lng".to_string(), lng.to_string()),
            ];
        }
    }
    vec![("address".to_string(), location.to_string())]
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    env_logger::init();

    let cli = parse_args();

    let base_url =
        env::var("TURF_RADAR_URL").unwrap_or_else(|_| "http://127.0.0.1:8003".to_string());

    let mut params = location_params(&cli.location);
    if let Some(r) = cli.radius_km {
        params.push(("radius_km".to_string(), r.to_string()));
    }
    if let Some(ref kw) = cli.keyword {
        params.push(("keyword".to_string(), kw.clone()));
    }
    if let Some(max) = cli.max_results {
        params.push(("max_results".to_string(), max.to_string()));
    }

    println!(
        "{}{}Searching turfs near {} ...{}",
        BOLD, CYAN, cli.location, RESET
    );

    let client = Client::new();
    let response = client
        .get(format!("{}/turfs/search", base_url))
        .query(&params)
        .send()
        .await
        .with_context(|| format!("request to {} failed - is the service running?", base_url))?;

    let status = response.status();
    let body = response.text().await.context("failed to read response")?;

    if !status.is_success() {
        bail!("search failed ({}): {}", status, body);
    }

    let parsed: SearchResponse =
        serde_json::from_str(&body).context("failed to parse search response")?;

    if let Some(ref addr) = parsed.origin_address {
        println!("Origin: {}", addr);
    }
    println!(
        "{}{} turfs within {} km{}\n",
        BOLD, parsed.count, parsed.radius_km, RESET
    );

    for (idx, turf) in parsed.results.iter().enumerate() {
        let rating = match (turf.rating, turf.user_rating_count) {
            (Some(r), Some(n)) => format!("{:.1} ({} ratings)", r, n),
            (Some(r), None) => format!("{:.1}", r),
            _ => "unrated".to_string(),
        };
        let open = match turf.open_now {
            Some(true) => format!("{}open now{}", GREEN, RESET),
            Some(false) => format!("{}closed{}", YELLOW, RESET),
            None => "hours unknown".to_string(),
        };

        println!(
            "{}{:2}. {}{} - {:.2} km",
            BOLD,
            idx + 1,
            turf.name,
            RESET,
            turf.distance_km
        );
        println!("    {} | {} | {}", rating, open, turf.address);
        if let Some(ref phone) = turf.phone {
            println!("    {}", phone);
        }
        println!("    {}", turf.maps_url);
    }

    if let Some(ref out) = cli.out_file {
        fs::write(out, &body).with_context(|| format!("failed to write {}", out))?;
        println!("\n{}Wrote raw results to {}{}", GREEN, out, RESET);
    }

    Ok(())
}
