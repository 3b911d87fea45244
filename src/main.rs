use clap::Parser;
use log::error;

use ocr_gateway::cli::{handle_recognize, Cli, Commands};
use ocr_gateway::server;

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match &cli.command {
        Some(Commands::Serve) | None => {
            actix_web::rt::System::new().block_on(server::run())?;
        }
        Some(Commands::Recognize { path }) => {
            if !handle_recognize(path)? {
                error!("OCR failed for {}", path.display());
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
