use anyhow::Result;
use gitweek::cli::Cli;

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    cli.execute()
}
