mod cli;

use clap::Parser;
use msendpoints::{output, ClientBuilder, Result};
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = cli::Args::parse();
    cli::log::init(&args);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            cli::log::failure(&error);
            ExitCode::from(error.exit_code())
        }
    }
}

fn run(args: &cli::Args) -> Result<()> {
    let query = cli::build_query(args)?;
    cli::log::query(&query);

    let client = ClientBuilder::new().build()?;
    let items = client.get_items(&query)?;

    match &args.outfile {
        Some(outfile) => output::write_to_file(outfile, &items, args.append),
        None => output::write_to_stdout(&items),
    }
}
