//! Building the vkBasalt configuration from a parsed ReShade preset.

use crate::ini::{Document, Section};
use crate::paths::PresetPaths;
use crate::techniques::ShaderMatch;

use std::path::Path;

pub const INCLUDE_PATH_KEY: &str = "reshadeIncludePath";
pub const TEXTURE_PATH_KEY: &str = "reshadeTexturePath";
pub const EFFECTS_KEY: &str = "effects";
pub const TECHNIQUES_KEY: &str = "Techniques";

const LUT_SHADER: &str = "lut";
const LUT_TEXTURE: &str = "lut.png";

/// The technique a preset section configures: the lowercased text before the first `.`.
pub fn section_technique(section_name: &str) -> String {
  section_name.split('.').next().unwrap_or_default().to_lowercase()
}

/// Writes the include and texture directories vkBasalt resolves shaders against.
pub fn insert_asset_paths(target: &mut Document, paths: &PresetPaths) {
  let section = target.default_section_mut();
  section.set(INCLUDE_PATH_KEY, path_value(&paths.shaders_dir()));
  section.set(TEXTURE_PATH_KEY, path_value(&paths.textures_dir()));
}

/// Writes one `<effect> = <path>` key per match and the colon-joined `effects` list.
pub fn insert_effects(target: &mut Document, matches: &[ShaderMatch]) {
  let section = target.default_section_mut();
  for shader in matches {
    section.set(shader.name.as_str(), path_value(&shader.path));
  };

  let effects = matches.iter()
    .map(|shader| shader.name.as_str())
    .collect::<Vec<_>>()
    .join(":");
  section.set(EFFECTS_KEY, effects);
}

/// Copies every option of every preset section into the target, prefixing each
/// key with the name of the matched shader the section belongs to.
///
/// A section belongs to a shader when its technique name starts with the
/// shader name, so `lut` also claims a `LUTAlt.fx` section.
pub fn insert_options(target: &mut Document, source: &Document, matches: &[ShaderMatch], paths: &PresetPaths) {
  let lut_texture = path_value(&paths.textures_dir().join(LUT_TEXTURE));
  for section in source.sections().filter(|section| !section.is_default()) {
    let technique = section_technique(section.name());
    for shader in matches.iter().filter(|shader| technique.starts_with(&shader.name)) {
      copy_options(target.default_section_mut(), &shader.name, section);
      if shader.name == LUT_SHADER {
        target.default_section_mut().set(format!("{}File", shader.name), lut_texture.as_str());
      };
    };
  };
}

fn copy_options(target: &mut Section, shader: &str, section: &Section) {
  for (key, value) in section.entries() {
    target.set(format!("{shader}{key}"), value);
  };
}

fn path_value(path: &Path) -> String {
  path.to_string_lossy().into_owned()
}
