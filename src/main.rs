use bamscan_core::commands::{self, Cli};
use clap::Parser as _;
use env_logger::Env;
use std::error::Error;
use std::io::{self, Write as _};

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let mut handle = io::BufWriter::new(io::stdout().lock());
    commands::run(cli, &mut handle)?;
    handle.flush()?;
    Ok(())
}
