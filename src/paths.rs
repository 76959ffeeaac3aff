use crate::{Error, Result};

use std::path::{Component, Path, PathBuf};

pub const OUTPUT_SUFFIX: &str = "_vkBasalt";

/// Where a conversion reads from and writes to, derived from the preset path alone.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PresetPaths {
  pub preset_file: PathBuf,
  pub preset_dir: PathBuf,
  pub preset_name: String,
  pub output_dir: PathBuf,
  pub output_file: PathBuf
}

impl PresetPaths {
  /// Resolves `input` against the current working directory.
  pub fn resolve(input: impl AsRef<Path>) -> Result<Self> {
    let cwd = std::env::current_dir()?;
    Self::resolve_in(input, &cwd)
  }

  /// Resolves `input` against `cwd`.
  ///
  /// A bare file name names the preset after the file itself; anything with a
  /// directory component names it after the directory holding the preset.
  pub fn resolve_in(input: impl AsRef<Path>, cwd: &Path) -> Result<Self> {
    let input = input.as_ref();
    let invalid = || Error::InvalidPresetPath(input.to_owned());

    let preset_file = normalize(&cwd.join(input));
    let is_bare_name = input.parent().is_none_or(|parent| parent.as_os_str().is_empty());

    let (preset_dir, preset_name) = if is_bare_name {
      let name = input.file_stem().ok_or_else(invalid)?;
      (normalize(cwd), name.to_string_lossy().into_owned())
    } else {
      let dir = preset_file.parent().ok_or_else(invalid)?.to_owned();
      let name = dir.file_name().ok_or_else(invalid)?.to_string_lossy().into_owned();
      (dir, name)
    };

    let output_name = format!("{preset_name}{OUTPUT_SUFFIX}");
    let output_dir = preset_dir.parent().ok_or_else(invalid)?.join(&output_name);
    let output_file = output_dir.join(format!("{output_name}.conf"));

    Ok(PresetPaths { preset_file, preset_dir, preset_name, output_dir, output_file })
  }

  pub fn shaders_dir(&self) -> PathBuf {
    self.output_dir.join("Shaders")
  }

  pub fn textures_dir(&self) -> PathBuf {
    self.output_dir.join("Textures")
  }
}

/// Lexically removes `.` and `..` components without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
  let mut out = PathBuf::new();
  for component in path.components() {
    match component {
      Component::CurDir => (),
      Component::ParentDir => {
        if !matches!(out.components().next_back(), None | Some(Component::RootDir | Component::Prefix(_))) {
          out.pop();
        };
      },
      component => out.push(component)
    };
  };

  out
}
