//! errlens CLI binary entry point.

use std::io::Read;

use clap::Parser;
use errlens::cli::{init_tracing, run, Cli};
use errlens::error::ErrlensError;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = execute(&cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn execute(cli: &Cli) -> Result<(), ErrlensError> {
    let ctx = cli.format_context()?;
    let input = match &cli.error {
        Some(text) => text.clone(),
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    println!("{}", run(cli, &ctx, &input)?);
    Ok(())
}
