use crate::Result;
use log::debug;
use walkdir::WalkDir;

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// ReShade technique names whose vkBasalt shader file is named differently.
const ALIASES: [(&str, &str); 2] = [
  ("contrastadaptivesharpen", "cas"),
  ("hdr", "fakehdr")
];

/// A shader file in the output directory that one of the preset's techniques asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShaderMatch {
  /// Lowercased file stem, used as the vkBasalt effect name.
  pub name: String,
  pub path: PathBuf
}

/// Splits a `Techniques` value on commas into lowercased technique names.
///
/// Entries are taken literally: a `Name@File.fx` entry or one with stray
/// whitespace never equals a shader name.
pub fn requested_techniques(value: &str) -> Vec<String> {
  value.split(',').map(str::to_lowercase).collect()
}

/// The shader name a technique is looked up under.
pub fn shader_name_for(technique: &str) -> &str {
  ALIASES.iter()
    .find(|(from, _)| *from == technique)
    .map_or(technique, |&(_, to)| to)
}

/// Returns the technique matching `shader`, if any. The first one in list order wins.
pub fn match_technique<'t>(shader: &str, techniques: &'t [String]) -> Option<&'t str> {
  techniques.iter()
    .map(String::as_str)
    .find(|technique| shader_name_for(technique) == shader)
}

/// Walks `shaders_dir` in file name order and records every `.fx` file whose
/// name a requested technique resolves to. Each file matches at most once and
/// techniques without a shader are dropped.
pub fn match_shaders(shaders_dir: &Path, techniques: &[String]) -> Result<Vec<ShaderMatch>> {
  let mut matches = Vec::new();
  for entry in WalkDir::new(shaders_dir).sort_by_file_name() {
    let entry = entry?;
    let path = entry.path();
    if !entry.file_type().is_file() || path.extension() != Some(OsStr::new("fx")) {
      continue;
    };

    let Some(stem) = path.file_stem().and_then(OsStr::to_str) else {
      continue;
    };

    let shader = stem.to_lowercase();
    if let Some(technique) = match_technique(&shader, techniques) {
      debug!("technique {technique} uses {}", path.display());
      matches.push(ShaderMatch { name: shader, path: path.to_owned() });
    };
  };

  Ok(matches)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn techniques(value: &str) -> Vec<String> {
    requested_techniques(value)
  }

  #[test]
  fn splits_and_lowercases() {
    assert_eq!(techniques("CAS,FakeHDR,SMAA"), ["cas", "fakehdr", "smaa"]);
    assert_eq!(techniques(""), [""]);
  }

  #[test]
  fn entries_are_kept_literally() {
    let requested = techniques("CAS@CAS.fx, FakeHDR");
    assert_eq!(requested, ["cas@cas.fx", " fakehdr"]);
    assert_eq!(match_technique("cas", &requested), None);
    assert_eq!(match_technique("fakehdr", &requested), None);
  }

  #[test]
  fn aliases_apply_only_when_comparing() {
    let requested = techniques("ContrastAdaptiveSharpen,HDR");
    assert_eq!(requested, ["contrastadaptivesharpen", "hdr"]);
    assert_eq!(match_technique("cas", &requested), Some("contrastadaptivesharpen"));
    assert_eq!(match_technique("fakehdr", &requested), Some("hdr"));
  }

  #[test]
  fn aliased_technique_does_not_match_its_literal_name() {
    let requested = techniques("HDR");
    assert_eq!(match_technique("hdr", &requested), None);
  }

  #[test]
  fn unknown_shader_matches_nothing() {
    assert_eq!(match_technique("bloom", &techniques("CAS,FakeHDR")), None);
    assert_eq!(match_technique("cas", &techniques("")), None);
  }
}
