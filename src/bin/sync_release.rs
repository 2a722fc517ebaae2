use anyhow::Result;
use clap::Parser;

use relsync::config::{self, Vcs};
use relsync::git::Git2Repository;
use relsync::prompt::{PresetPrompt, Prompt, TerminalPrompt};
use relsync::{sync, ui};

#[derive(clap::Parser)]
#[command(
    name = "sync-release",
    about = "Synchronize anchored version fields and create a release tag"
)]
struct Args {
    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(long, help = "Answer every prompt with its default instead of asking")]
    non_interactive: bool,

    #[arg(long, help = "Deterministic default answers and no terminal output")]
    testing: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let quiet = args.testing;

    let config = match config::load_config(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            ui::display_error(&e.to_string());
            std::process::exit(1);
        }
    };

    if config.vcs == Vcs::Svn {
        ui::display_error("vcs = \"svn\" is configured, but only git repositories are supported");
        std::process::exit(1);
    }

    let repo = match Git2Repository::open(&config.repo_dir) {
        Ok(repo) => repo,
        Err(e) => {
            ui::display_error(&format!("Git repository error: {}", e));
            std::process::exit(1);
        }
    };

    let prompt: Box<dyn Prompt> = if args.non_interactive || args.testing {
        Box::new(PresetPrompt)
    } else {
        Box::new(TerminalPrompt)
    };

    let today = chrono::Local::now().date_naive();

    match sync::run_sync(&config, &repo, prompt.as_ref(), quiet, today) {
        Ok(outcome) => {
            if !quiet {
                match &outcome.tag {
                    Some(tag) => ui::display_success(&format!(
                        "Release {} complete ({} -> {})",
                        tag, outcome.change.old, outcome.change.new
                    )),
                    None => ui::display_status("Nothing to release."),
                }
            }
            Ok(())
        }
        Err(e) => {
            if !quiet {
                ui::display_error(&e.to_string());
            }
            std::process::exit(1);
        }
    }
}
