mod cli;
mod extract_cmd;
mod page_range;
mod shared;
mod tables_cmd;

use clap::Parser;
use cli::Cli;

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        cli::Commands::Extract {
            ref file,
            ref pages,
            ref frames,
            ref output,
            pretty,
        } => extract_cmd::run(file, pages.as_deref(), frames.as_deref(), output, pretty),
        cli::Commands::Tables {
            ref file,
            ref pages,
            ref frames,
        } => tables_cmd::run(file, pages.as_deref(), frames.as_deref()),
    };

    if let Err(code) = result {
        std::process::exit(code);
    }
}
