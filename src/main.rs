use clap::{Parser, Subcommand};
use partwork::config::{self, ConfigError};
use partwork::site::{Generator, SiteError};
use partwork::watch::Watcher;
use partwork::output;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

fn version_string() -> &'static str {
    let on_tag = env!("PARTWORK_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("PARTWORK_GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "partwork")]
#[command(about = "Static site generator built from template parts and Markdown")]
#[command(long_about = "\
Static site generator built from template parts and Markdown

Site structure:

  site/
  ├── partwork.toml        # Site config (required, may be empty)
  ├── template/
  │   ├── index.html       # Base page; {{content}} receives page.html
  │   ├── page.html        # Single-document template
  │   └── header.html      # Any fragment, pulled in with {{part: header.html}}
  ├── content/
  │   ├── index.md         # → dist/index.html
  │   └── about.md         # → dist/about.html
  └── assets/              # Copied to dist/assets/

Placeholders:
  {{title}}        document title inside page.html, site title elsewhere
  {{content}}      document body (page.html) / rendered page.html (index.html)
  {{excerpt}}      first paragraph after the document heading
  {{keywords}} {{description}} {{timestamp}}

Run 'partwork gen-config' to print a documented partwork.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Site base directory
    #[arg(short, long, default_value = ".", global = true)]
    path: PathBuf,

    /// Rebuild whenever a file under the base directory changes
    #[arg(short, long, global = true)]
    watch: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Build the site into dist/ (the default)
    Build,
    /// Print a stock partwork.toml with all options documented
    GenConfig,
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    partwork::init_tracing(cli.verbose);

    match cli.command.unwrap_or(Command::Build) {
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
        Command::Build => {
            let base = resolve_base(&cli.path)?;
            let generator = match Generator::new(&base) {
                Ok(generator) => generator,
                Err(SiteError::Config(ConfigError::Missing(_))) => {
                    eprintln!("No partwork.toml found in this project.");
                    return Ok(ExitCode::FAILURE);
                }
                Err(e) => return Err(e.into()),
            };

            if cli.watch {
                match generator.run_pass() {
                    Ok(report) => output::print_pass_summary(&report, &base),
                    Err(e) => tracing::error!(error = %e, "build failed"),
                }
                println!("Watching {} for changes ...", base.display());
                Watcher::new(&generator).run(|report| output::print_pass_summary(report, &base));
            }

            let report = generator.run_pass()?;
            output::print_pass_summary(&report, &base);
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Make `path` absolute and require it to be a directory.
fn resolve_base(path: &Path) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let base = std::path::absolute(path)?;
    if !base.is_dir() {
        return Err(format!("directory does not exist: {}", base.display()).into());
    }
    Ok(base)
}
