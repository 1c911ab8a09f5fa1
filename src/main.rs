use clap::Parser;

mod card_names;
mod cli;
mod commanders;
mod config;
mod query_builder;
mod scryfall;
#[cfg(test)]
mod tests;
mod web;

use commanders::CommanderDb;
use config::Config;
use scryfall::SearchClient;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = cli::Args::parse();
    let config = Config::load()?;

    match args.command {
        cli::Command::Daemon {} => {
            web::start_daemon(config);
            Ok(())
        }

        cli::Command::Query {
            prompt,
            execute,
            page,
            explain,
            live_commanders,
        } => {
            let prompt = prompt.join(" ");

            let db = if live_commanders {
                match CommanderDb::load_from_scryfall(
                    &config.scryfall_base_url,
                    config.request_timeout(),
                ) {
                    Ok(db) => db,
                    Err(err) => {
                        log::warn!("live commander load failed, using fallback: {err:?}");
                        CommanderDb::with_fallback()
                    }
                }
            } else {
                CommanderDb::with_fallback()
            };

            let compiled = query_builder::compile_prompt(&prompt, &db);

            if explain {
                println!("{}", serde_json::to_string_pretty(&compiled).unwrap());
            } else {
                println!("{}", compiled.query);
            }

            if execute {
                let client =
                    SearchClient::new(&config.scryfall_base_url, config.request_timeout());
                let results = client.search(&compiled.query, page)?;
                println!("{}", serde_json::to_string_pretty(&results.data).unwrap());
                if results.has_more {
                    log::info!("more results available, rerun with --page {}", page + 1);
                }
            }

            Ok(())
        }
    }
}
