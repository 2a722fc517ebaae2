use anyhow::Result;
use clap::Parser;
use std::fs;
use std::io::Read;

use relsync::config;
use relsync::lint::{self, LintOptions};
use relsync::ui;

#[derive(clap::Parser)]
#[command(
    name = "lint-commit",
    about = "Validate a commit message against the message grammar"
)]
struct Args {
    #[arg(help = "Path to the candidate message file, or '-' for stdin")]
    message_file: String,

    #[arg(long, help = "Require a Signed-off-by trailer")]
    require_signoff: bool,

    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let lint_config = match config::discover_config(args.config.as_deref()) {
        Ok(found) => found.map(|c| c.lint).unwrap_or_default(),
        Err(e) => {
            ui::display_error(&e.to_string());
            std::process::exit(1);
        }
    };

    let text = match read_message(&args.message_file) {
        Ok(text) => text,
        Err(e) => {
            ui::display_error(&format!("cannot read '{}': {}", args.message_file, e));
            std::process::exit(1);
        }
    };

    let opts = LintOptions {
        require_signoff: args.require_signoff || lint_config.require_signoff,
    };

    match lint::lint_message(&text, &opts) {
        Ok(report) => {
            for warning in &report.warnings {
                ui::display_warning(warning);
            }
            Ok(())
        }
        Err(reason) => {
            ui::display_error(&format!("commit message rejected: {}", reason));

            // Keep the rejected text around so the operator does not retype it
            if let Some(cache_file) = &lint_config.cache_file {
                match fs::write(cache_file, lint::strip_comments(&text)) {
                    Ok(()) => {
                        ui::display_status(&format!("rejected message saved to {}", cache_file))
                    }
                    Err(e) => {
                        ui::display_warning(&format!("could not save rejected message: {}", e))
                    }
                }
            }

            std::process::exit(1);
        }
    }
}

fn read_message(path: &str) -> std::io::Result<String> {
    if path == "-" {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        fs::read_to_string(path)
    }
}
