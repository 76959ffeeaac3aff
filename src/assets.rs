//! Populating the output directory: the shared ReShade shader archive first,
//! then whatever shaders and textures ship alongside the preset.

use crate::convert::Settings;
use crate::paths::PresetPaths;
use crate::{Error, Result};
use fs_err as fs;
use log::{debug, info, warn};
use walkdir::WalkDir;

use std::ffi::OsStr;
use std::path::Path;
use std::process::Command;

const SHADER_EXTENSIONS: [&str; 2] = ["fx", "fxh"];
const TEXTURE_EXTENSIONS: [&str; 3] = ["png", "bmp", "jpg"];

/// Makes sure the archive exists at `settings.cache_dir`, cloning it if needed.
///
/// An existing cache directory is reused without any validation.
pub fn fetch_archive(settings: &Settings) -> Result<()> {
  if settings.cache_dir.exists() {
    warn!("reusing existing shader archive at {}", settings.cache_dir.display());
    return Ok(());
  };

  info!("cloning {} ({}) into {}", settings.repository, settings.branch, settings.cache_dir.display());
  let output = Command::new(&settings.git)
    .arg("clone")
    .arg("--single-branch")
    .arg("--branch").arg(&settings.branch)
    .arg("--depth=1")
    .arg(&settings.repository)
    .arg(&settings.cache_dir)
    .output()?;

  if !output.status.success() {
    return Err(Error::FetchFailed {
      repository: settings.repository.clone(),
      status: output.status,
      stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned()
    });
  };

  Ok(())
}

/// Copies the archive's `Shaders` and `Textures` trees into the output directory.
pub fn copy_archive(cache_dir: &Path, paths: &PresetPaths) -> Result<()> {
  copy_dir_recursive(&cache_dir.join("Shaders"), &paths.shaders_dir())?;
  copy_dir_recursive(&cache_dir.join("Textures"), &paths.textures_dir())?;
  Ok(())
}

pub fn remove_cache(cache_dir: &Path) {
  if let Err(err) = fs::remove_dir_all(cache_dir) {
    warn!("failed to remove shader archive cache: {err}");
  };
}

/// Copies every shader and texture found under the preset directory into the
/// flat `Shaders`/`Textures` directories, replacing archive files of the same name.
///
/// Returns the number of files copied.
pub fn harvest_preset_assets(paths: &PresetPaths) -> Result<usize> {
  let shaders_dir = paths.shaders_dir();
  let textures_dir = paths.textures_dir();
  let mut copied = 0;

  for entry in WalkDir::new(&paths.preset_dir).sort_by_file_name() {
    let entry = entry?;
    if !entry.file_type().is_file() {
      continue;
    };

    let target_dir = match AssetKind::of(entry.path()) {
      Some(AssetKind::Shader) => &shaders_dir,
      Some(AssetKind::Texture) => &textures_dir,
      None => continue
    };

    let target = target_dir.join(entry.file_name());
    debug!("copying {} to {}", entry.path().display(), target.display());
    fs::copy(entry.path(), &target)?;
    copied += 1;
  };

  Ok(copied)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AssetKind {
  Shader,
  Texture
}

impl AssetKind {
  fn of(path: &Path) -> Option<Self> {
    let extension = path.extension().and_then(OsStr::to_str)?.to_ascii_lowercase();
    if SHADER_EXTENSIONS.contains(&extension.as_str()) {
      Some(AssetKind::Shader)
    } else if TEXTURE_EXTENSIONS.contains(&extension.as_str()) {
      Some(AssetKind::Texture)
    } else {
      None
    }
  }
}

/// Recursively copies `src` into `dest`, creating `dest` and overwriting files.
pub fn copy_dir_recursive(src: &Path, dest: &Path) -> Result<()> {
  fs::create_dir_all(dest)?;
  for entry in WalkDir::new(src).min_depth(1).sort_by_file_name() {
    let entry = entry?;
    let Ok(rel_path) = entry.path().strip_prefix(src) else {
      continue;
    };
    let new_path = dest.join(rel_path);

    if entry.file_type().is_dir() {
      fs::create_dir_all(&new_path)?;
    } else {
      fs::copy(entry.path(), &new_path)?;
    };
  };

  Ok(())
}
