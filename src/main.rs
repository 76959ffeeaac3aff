use anyhow::{Context, Error};
use clap::Parser;
use reshade_to_vkbasalt::convert::{DEFAULT_BRANCH, DEFAULT_GIT, DEFAULT_REPOSITORY};
use reshade_to_vkbasalt::{convert, Settings};

use std::path::PathBuf;
use std::process::ExitCode;

const USAGE: &str = "reshade-to-vkbasalt requires one argument: path to Reshade preset ini";

#[derive(Debug, Parser)]
#[command(name = "reshade-to-vkbasalt", version)]
#[command(about = "Convert a ReShade preset into a vkBasalt configuration")]
struct Cli {
  /// Path to the ReShade preset ini
  preset: Option<PathBuf>,

  /// Repository holding the shared ReShade shaders and textures
  #[arg(long, default_value = DEFAULT_REPOSITORY)]
  repository: String,

  /// Branch of the shader repository to clone
  #[arg(long, default_value = DEFAULT_BRANCH)]
  branch: String,

  /// Where the shader repository is cloned to [default: <temp dir>/reshade-shaders]
  #[arg(long)]
  cache_dir: Option<PathBuf>,

  /// Git executable used for cloning
  #[arg(long, default_value = DEFAULT_GIT)]
  git: PathBuf,

  /// Keep the cloned shader repository for later runs
  #[arg(long)]
  keep_cache: bool
}

impl Cli {
  fn settings(&self) -> Settings {
    let defaults = Settings::default();
    Settings {
      repository: self.repository.clone(),
      branch: self.branch.clone(),
      cache_dir: self.cache_dir.clone().unwrap_or(defaults.cache_dir),
      git: self.git.clone(),
      keep_cache: self.keep_cache
    }
  }
}

fn main() -> ExitCode {
  env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

  match run(Cli::parse()) {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      eprintln!("error: {err:#}");
      ExitCode::FAILURE
    }
  }
}

fn run(cli: Cli) -> Result<(), Error> {
  let Some(preset) = cli.preset.as_deref().filter(|preset| !preset.as_os_str().is_empty()) else {
    println!("{USAGE}");
    return Ok(());
  };

  let conversion = convert(preset, &cli.settings())
    .with_context(|| format!("failed to convert preset {}", preset.display()))?;
  print!("{}", conversion.instructions());

  Ok(())
}
