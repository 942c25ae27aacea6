use clap::Parser;

fn main() -> miette::Result<()> {
    metagen_run::Cli::parse().run()
}
