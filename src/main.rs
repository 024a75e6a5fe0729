use clap::Parser;

use epic_timeline::cli::{self, Cli};
use epic_timeline::config::Settings;
use epic_timeline::logging;

fn main() {
    let cli = Cli::parse();

    let settings_path = cli.config.clone().unwrap_or_else(Settings::default_path);
    // read before the logger exists, so failures go straight to stderr
    let settings = Settings::try_load(&settings_path).unwrap_or_else(|e| {
        eprintln!(
            "Warning: ignoring unreadable settings {}: {e}",
            settings_path.display()
        );
        Settings::default()
    });
    if let Err(e) = logging::init_logging(&settings.log_level) {
        eprintln!("Warning: {e}");
    }

    if let Err(e) = cli::run(cli, &settings) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
