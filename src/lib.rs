//! Converts a ReShade preset into a vkBasalt configuration, pulling in the
//! shaders and textures the converted preset needs.

pub mod assets;
pub mod convert;
pub mod ini;
pub mod paths;
pub mod techniques;
pub mod translate;

pub use crate::convert::{convert, Conversion, Settings};
pub use crate::ini::{Document, Section};
pub use crate::paths::PresetPaths;
pub use crate::techniques::ShaderMatch;

use thiserror::Error;

use std::path::PathBuf;
use std::process::ExitStatus;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
  #[error("line {line}: expected a key-value delimiter ('=' or ':'), found {text:?}")]
  MissingDelimiter { line: usize, text: String },
  #[error("line {line}: unclosed section header {text:?}")]
  UnclosedSection { line: usize, text: String },
  #[error("line {line}: empty key in {text:?}")]
  EmptyKey { line: usize, text: String },
  #[error("invalid preset path {0:?}, expected a file inside a named directory")]
  InvalidPresetPath(PathBuf),
  #[error("failed to clone {repository} ({status}): {stderr}")]
  FetchFailed { repository: String, status: ExitStatus, stderr: String },
  #[error(transparent)]
  Io(#[from] std::io::Error),
  #[error(transparent)]
  Walk(#[from] walkdir::Error)
}
