use crate::ini::Document;
use crate::paths::PresetPaths;
use crate::techniques::{self, ShaderMatch};
use crate::{assets, translate, Result};
use fs_err as fs;
use log::info;

use std::fmt;
use std::path::{Path, PathBuf};

pub const DEFAULT_REPOSITORY: &str = "https://github.com/crosire/reshade-shaders";
pub const DEFAULT_BRANCH: &str = "master";
pub const DEFAULT_GIT: &str = "git";
pub const CACHE_DIR_NAME: &str = "reshade-shaders";

pub const ENABLE_VARIABLE: &str = "ENABLE_VKBASALT";
pub const CONFIG_FILE_VARIABLE: &str = "VKBASALT_CONFIG_FILE";

/// Where the shared shader archive comes from and where it is cached while converting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
  pub repository: String,
  pub branch: String,
  pub cache_dir: PathBuf,
  pub git: PathBuf,
  /// Leave the cache directory in place after copying from it.
  pub keep_cache: bool
}

impl Default for Settings {
  fn default() -> Self {
    Settings {
      repository: DEFAULT_REPOSITORY.to_owned(),
      branch: DEFAULT_BRANCH.to_owned(),
      cache_dir: std::env::temp_dir().join(CACHE_DIR_NAME),
      git: PathBuf::from(DEFAULT_GIT),
      keep_cache: false
    }
  }
}

/// The result of a finished conversion.
#[derive(Debug, Clone)]
pub struct Conversion {
  pub paths: PresetPaths,
  pub shaders: Vec<ShaderMatch>,
  pub config: Document
}

impl Conversion {
  pub fn output_file(&self) -> &Path {
    &self.paths.output_file
  }

  /// Shell lines that point vkBasalt at the generated configuration.
  pub fn instructions(&self) -> Instructions<'_> {
    Instructions { output_file: self.output_file() }
  }
}

#[derive(Debug, Clone, Copy)]
pub struct Instructions<'c> {
  output_file: &'c Path
}

impl fmt::Display for Instructions<'_> {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    writeln!(f, "Export the following environment variables before running your game to use the generated vkBasalt preset:")?;
    writeln!(f, "export {ENABLE_VARIABLE}=1")?;
    writeln!(f, "export {CONFIG_FILE_VARIABLE}=\"{}\"", self.output_file.display())
  }
}

/// Converts the ReShade preset at `input` into a vkBasalt configuration next to
/// the preset's directory. The first failing step aborts the conversion.
pub fn convert(input: impl AsRef<Path>, settings: &Settings) -> Result<Conversion> {
  let input = input.as_ref();
  let paths = PresetPaths::resolve(input)?;
  info!("converting preset {:?} into {}", paths.preset_name, paths.output_dir.display());

  let source = fs::read_to_string(&paths.preset_file)?.parse::<Document>()?;

  recreate_dir(&paths.output_dir)?;

  assets::fetch_archive(settings)?;
  info!("copying shader archive");
  assets::copy_archive(&settings.cache_dir, &paths)?;
  if !settings.keep_cache {
    assets::remove_cache(&settings.cache_dir);
  };

  let mut config = Document::new();
  translate::insert_asset_paths(&mut config, &paths);

  let harvested = assets::harvest_preset_assets(&paths)?;
  info!("copied {harvested} shaders and textures from {}", paths.preset_dir.display());

  let requested = source.default_section().get(translate::TECHNIQUES_KEY)
    .map(techniques::requested_techniques)
    .unwrap_or_default();
  let shaders = techniques::match_shaders(&paths.shaders_dir(), &requested)?;
  info!("matched {} of {} techniques", shaders.len(), requested.len());

  translate::insert_effects(&mut config, &shaders);
  translate::insert_options(&mut config, &source, &shaders, &paths);

  fs::write(&paths.output_file, config.to_string())?;
  info!("wrote {}", paths.output_file.display());

  Ok(Conversion { paths, shaders, config })
}

fn recreate_dir(dir: &Path) -> Result<()> {
  if dir.exists() {
    fs::remove_dir_all(dir)?;
  };
  fs::create_dir(dir)?;
  Ok(())
}
