use anyhow::Result;
use clap::{Parser, Subcommand};
use scummtheme_lib::ThemeConfig;
use std::{ffi::OsString, path::Path};
use tracing::warn;

mod definition;
mod fs_utils;
mod packaging;

use definition::build_default_theme;
use packaging::{build_all_themes, build_theme, is_invalid_target};

const USAGE: &str = "\
===============================
ScummVM Theme Generation Script
===============================
Usage:
scummtheme make-all
    Builds all the available themes.

scummtheme make [themename]
    Builds the theme called 'themename'.

scummtheme default [themename]
    Creates a 'default.inc' file to embed the given theme in the source code.
";

#[derive(Parser, Debug)]
#[command(name = "scummtheme", disable_help_subcommand = true)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Command {
    /// Builds all the available themes
    #[command(alias = "makeall")]
    MakeAll,
    /// Builds the theme called NAME
    Make {
        #[arg(allow_hyphen_values = true)]
        name: OsString,
    },
    /// Creates default.inc from the .stx files of theme NAME
    Default {
        #[arg(allow_hyphen_values = true)]
        name: OsString,
    },
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}

/// Dispatches one invocation against `base`. Anything that is not one of the
/// three verbs prints the usage text and succeeds.
fn run<I, T>(args: I, base: &Path) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(_) => {
            print!("{USAGE}");
            return Ok(());
        }
    };

    let config = ThemeConfig::default();
    let outcome = match &cli.command {
        Command::MakeAll => build_all_themes(base, &config).map(|_| ()),
        Command::Make { name } => build_theme(base, name, &config).map(|_| ()),
        Command::Default { name } => build_default_theme(base, name, &config).map(|_| ()),
    };

    match outcome {
        Err(err) if is_invalid_target(&err) => {
            warn!(command = ?cli.command, "nothing built: {err}");
            Ok(())
        }
        other => other,
    }
}

fn main() -> Result<()> {
    init_tracing();
    let base = std::env::current_dir()?;
    run(std::env::args_os(), &base)
}
