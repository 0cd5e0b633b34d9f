use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use chrono::Utc;
use clap::Parser;
use env_logger::Env;
use log::{error, info};

use nodepin::generator::{to_routing_doc, to_summary};
use nodepin::interfaces::fetch_all;
use nodepin::models::{AppState, TotalPolicy};
use nodepin::settings::update_settings_from_file;
use nodepin::web_handlers;
use nodepin::Settings;

/// Aggregate proxy subscription feeds into a dashboard summary and one Clash profile
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the configuration file (TOML or YAML)
    #[arg(short, long, value_name = "FILE")]
    config: Option<String>,

    /// Listen address (e.g., 127.0.0.1 or 0.0.0.0)
    #[arg(short, long, value_name = "ADDRESS")]
    address: Option<String>,

    /// Listen port
    #[arg(short, long, value_name = "PORT")]
    port: Option<u16>,

    /// Write the merged Clash profile to this file instead of starting the server
    #[arg(short, long, value_name = "OUTPUT_FILE")]
    output: Option<String>,

    /// Print the public summary as JSON instead of starting the server
    #[arg(long)]
    summary: bool,

    /// How to treat a reported total below the used traffic (inflate, as-reported)
    #[arg(long, value_name = "POLICY")]
    total_policy: Option<TotalPolicy>,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();

    // Settings are loaded before the logger so the configured level applies
    let load_result = match args.config.as_deref() {
        Some(path) => update_settings_from_file(path),
        None => Ok(()),
    };
    let mut settings = (*Settings::current()).clone();
    env_logger::init_from_env(Env::default().default_filter_or(settings.log_level.as_str()));
    if let Err(e) = load_result {
        error!("Failed to load settings: {}", e);
        std::process::exit(1);
    }

    if let Some(address) = args.address {
        settings.listen_address = address;
    }
    if let Some(port) = args.port {
        settings.listen_port = port;
    }
    if let Some(policy) = args.total_policy {
        settings.total_policy = policy;
    }

    let app_state = match AppState::new(Arc::new(settings)) {
        Ok(state) => Arc::new(state),
        Err(e) => {
            error!("Failed to create HTTP client: {}", e);
            std::process::exit(1);
        }
    };

    if args.output.is_some() || args.summary {
        let config = &app_state.config;
        let results = fetch_all(
            &app_state.fetcher,
            &config.subscriptions,
            &app_state.fetch_options(),
        )
        .await;

        if args.summary {
            match serde_json::to_string_pretty(&to_summary(&results)) {
                Ok(json) => println!("{}", json),
                Err(e) => error!("Failed to serialize summary: {}", e),
            }
        }
        if let Some(output_file) = args.output {
            let doc = to_routing_doc(&results, &config.profile, Utc::now().timestamp());
            std::fs::write(&output_file, doc.render())?;
            info!("Successfully wrote Clash profile to {}", output_file);
        }
        return Ok(());
    }

    let listen_address = {
        let config = &app_state.config;
        if config.listen_address.contains(':') && !config.listen_address.starts_with('[') {
            // Already has a port, use as is
            config.listen_address.clone()
        } else {
            format!("{}:{}", config.listen_address, config.listen_port)
        }
    };

    info!(
        "NodePin starting on {} with {} subscriptions",
        listen_address,
        app_state.config.subscriptions.len()
    );

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(Arc::clone(&app_state)))
            .configure(web_handlers::config)
    })
    .bind(listen_address)?
    .run()
    .await
}
