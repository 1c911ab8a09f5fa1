use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compile a search phrase into a Scryfall query.
    Query {
        /// The phrase, e.g. "2 cmc rakdos instant"
        #[clap(trailing_var_arg = true, required = true)]
        prompt: Vec<String>,

        /// Execute the compiled query and print the matching cards
        #[clap(short, long, default_value = "false")]
        execute: bool,

        /// Result page to fetch (with --execute)
        #[clap(short, long, default_value = "1")]
        page: u32,

        /// Print the extracted filters and rule trace as JSON
        #[clap(long, default_value = "false")]
        explain: bool,

        /// Resolve commander names against the live catalog instead of
        /// the built-in fallback list
        #[clap(long, default_value = "false")]
        live_commanders: bool,
    },
    /// Start mtgq as a service.
    Daemon {},
}
