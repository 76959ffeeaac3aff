use reshade_to_vkbasalt::{convert, Document, Error, Settings};
use tempfile::TempDir;

use fs_err as fs;

use std::path::{Path, PathBuf};
use std::process::Command;

const PRESET: &str = "\
Techniques=CAS,FakeHDR,LUT,Bloom
TechniqueSorting=CAS,FakeHDR,LUT,Bloom

[CAS.fx]
Contrast=0.250000
Sharpening=1.000000

[FakeHDR.fx]
HDRPower=1.300000

[lut.Settings]
fLUT_Intensity=0.800000
";

struct Fixture {
  root: TempDir,
  preset: PathBuf,
  settings: Settings
}

impl Fixture {
  fn new(preset_text: &str) -> std::io::Result<Self> {
    let root = TempDir::new()?;

    let cache = root.path().join("cache");
    write(&cache.join("Shaders/cas.fx"), "// archive cas")?;
    write(&cache.join("Shaders/fakehdr.fx"), "// archive fakehdr")?;
    write(&cache.join("Shaders/smaa.fx"), "// archive smaa")?;
    write(&cache.join("Shaders/ReShade.fxh"), "// header")?;
    write(&cache.join("Shaders/Legacy/vignette.fx"), "// nested")?;
    write(&cache.join("Textures/lut.png"), "png")?;

    let preset_dir = root.path().join("presets/Vivid");
    let preset = preset_dir.join("Vivid.ini");
    write(&preset, preset_text)?;
    write(&preset_dir.join("lut.fx"), "// preset lut")?;
    write(&preset_dir.join("extra/cas.fx"), "// preset cas")?;
    write(&preset_dir.join("extra/Grain.PNG"), "png")?;
    write(&preset_dir.join("notes.txt"), "ignored")?;

    let settings = Settings {
      repository: root.path().join("no-such-repository").to_string_lossy().into_owned(),
      cache_dir: cache,
      ..Settings::default()
    };

    Ok(Fixture { root, preset, settings })
  }

  fn output_dir(&self) -> PathBuf {
    self.root.path().join("presets/Vivid_vkBasalt")
  }
}

fn write(path: &Path, contents: &str) -> std::io::Result<()> {
  fs::create_dir_all(path.parent().unwrap())?;
  fs::write(path, contents)
}

#[test]
fn converts_preset_into_vkbasalt_config() {
  let fixture = Fixture::new(PRESET).unwrap();
  let conversion = convert(&fixture.preset, &fixture.settings).unwrap();

  let output_dir = fixture.output_dir();
  let output_file = output_dir.join("Vivid_vkBasalt.conf");
  assert_eq!(conversion.output_file(), output_file);

  let written = fs::read_to_string(&output_file).unwrap().parse::<Document>().unwrap();
  assert_eq!(written, conversion.config);

  let config = written.default_section();
  let shaders = output_dir.join("Shaders");
  assert_eq!(config.get("reshadeIncludePath"), Some(shaders.to_str().unwrap()));
  assert_eq!(config.get("reshadeTexturePath"), Some(output_dir.join("Textures").to_str().unwrap()));
  assert_eq!(config.get("effects"), Some("cas:fakehdr:lut"));
  assert_eq!(config.get("cas"), Some(shaders.join("cas.fx").to_str().unwrap()));
  assert_eq!(config.get("fakehdr"), Some(shaders.join("fakehdr.fx").to_str().unwrap()));
  assert_eq!(config.get("lut"), Some(shaders.join("lut.fx").to_str().unwrap()));
  assert_eq!(config.get("casContrast"), Some("0.250000"));
  assert_eq!(config.get("casSharpening"), Some("1.000000"));
  assert_eq!(config.get("fakehdrHDRPower"), Some("1.300000"));
  assert_eq!(config.get("lutfLUT_Intensity"), Some("0.800000"));
  assert_eq!(config.get("lutFile"), Some(output_dir.join("Textures/lut.png").to_str().unwrap()));
  assert_eq!(config.get("bloom"), None);
}

#[test]
fn preset_assets_override_archive_files() {
  let fixture = Fixture::new(PRESET).unwrap();
  convert(&fixture.preset, &fixture.settings).unwrap();

  let output_dir = fixture.output_dir();
  assert_eq!(fs::read_to_string(output_dir.join("Shaders/cas.fx")).unwrap(), "// preset cas");
  assert_eq!(fs::read_to_string(output_dir.join("Shaders/ReShade.fxh")).unwrap(), "// header");
  assert!(output_dir.join("Shaders/Legacy/vignette.fx").is_file());
  assert!(output_dir.join("Textures/Grain.PNG").is_file());
  assert!(output_dir.join("Textures/lut.png").is_file());
  assert!(!output_dir.join("Shaders/notes.txt").exists());
  assert!(!output_dir.join("Textures/notes.txt").exists());
}

#[test]
fn cache_is_removed_after_use() {
  let fixture = Fixture::new(PRESET).unwrap();
  convert(&fixture.preset, &fixture.settings).unwrap();
  assert!(!fixture.settings.cache_dir.exists());
}

#[test]
fn rerun_leaves_no_stale_files() {
  let fixture = Fixture::new(PRESET).unwrap();
  let settings = Settings { keep_cache: true, ..fixture.settings.clone() };

  convert(&fixture.preset, &settings).unwrap();
  let stale = fixture.output_dir().join("Shaders/stale.fx");
  fs::write(&stale, "// left over").unwrap();

  let conversion = convert(&fixture.preset, &settings).unwrap();
  assert!(!stale.exists());
  assert!(settings.cache_dir.exists());
  assert_eq!(conversion.config.default_section().get("effects"), Some("cas:fakehdr:lut"));
}

#[test]
fn aliased_techniques_find_their_shaders() {
  let fixture = Fixture::new("Techniques=ContrastAdaptiveSharpen,HDR\n").unwrap();
  let conversion = convert(&fixture.preset, &fixture.settings).unwrap();
  assert_eq!(conversion.config.default_section().get("effects"), Some("cas:fakehdr"));
}

#[test]
fn unmatched_techniques_yield_empty_effects() {
  let fixture = Fixture::new("Techniques=Bloom,Vibrance\n").unwrap();
  let conversion = convert(&fixture.preset, &fixture.settings).unwrap();
  assert!(conversion.shaders.is_empty());
  assert_eq!(conversion.config.default_section().get("effects"), Some(""));
}

#[test]
fn instructions_name_output_file() {
  let fixture = Fixture::new(PRESET).unwrap();
  let conversion = convert(&fixture.preset, &fixture.settings).unwrap();

  let instructions = conversion.instructions().to_string();
  let lines = instructions.lines().collect::<Vec<_>>();
  assert_eq!(lines.len(), 3);
  assert_eq!(lines[1], "export ENABLE_VKBASALT=1");
  assert_eq!(lines[2], format!("export VKBASALT_CONFIG_FILE=\"{}\"", conversion.output_file().display()));
}

#[test]
fn failed_fetch_aborts_conversion() {
  let fixture = Fixture::new(PRESET).unwrap();
  fs::remove_dir_all(&fixture.settings.cache_dir).unwrap();

  let result = convert(&fixture.preset, &fixture.settings);
  assert!(matches!(result, Err(Error::FetchFailed { .. } | Error::Io(_))));
  assert!(!fixture.output_dir().join("Vivid_vkBasalt.conf").exists());
}

#[test]
fn malformed_preset_keeps_previous_output() {
  let fixture = Fixture::new(PRESET).unwrap();
  let settings = Settings { keep_cache: true, ..fixture.settings.clone() };
  convert(&fixture.preset, &settings).unwrap();

  fs::write(&fixture.preset, "Techniques=CAS\nnot a key value line\n").unwrap();
  let result = convert(&fixture.preset, &settings);
  assert!(matches!(result, Err(Error::MissingDelimiter { line: 2, .. })));
  assert!(fixture.output_dir().join("Vivid_vkBasalt.conf").is_file());
}

#[test]
fn missing_preset_is_an_error() {
  let fixture = Fixture::new(PRESET).unwrap();
  let missing = fixture.root.path().join("presets/Vivid/Missing.ini");
  assert!(matches!(convert(&missing, &fixture.settings), Err(Error::Io(_))));
  assert!(!fixture.output_dir().exists());
}

fn git(dir: &Path, args: &[&str]) {
  let status = Command::new("git")
    .args(["-c", "user.name=fixture", "-c", "user.email=fixture@localhost", "-c", "commit.gpgsign=false"])
    .args(args)
    .current_dir(dir)
    .status()
    .unwrap();
  assert!(status.success(), "git {args:?} failed in {}", dir.display());
}

#[test]
fn clones_archive_from_repository() {
  let fixture = Fixture::new("Techniques=CAS,SMAA\n").unwrap();
  fs::remove_dir_all(&fixture.settings.cache_dir).unwrap();

  let upstream = fixture.root.path().join("upstream");
  write(&upstream.join("Shaders/smaa.fx"), "// upstream smaa").unwrap();
  write(&upstream.join("Textures/noise.png"), "png").unwrap();
  git(&upstream, &["init", "-q"]);
  git(&upstream, &["symbolic-ref", "HEAD", "refs/heads/master"]);
  git(&upstream, &["add", "."]);
  git(&upstream, &["commit", "-q", "-m", "shaders"]);

  let settings = Settings {
    repository: format!("file://{}", upstream.display()),
    ..fixture.settings.clone()
  };
  let conversion = convert(&fixture.preset, &settings).unwrap();

  let output_dir = fixture.output_dir();
  assert_eq!(conversion.config.default_section().get("effects"), Some("cas:smaa"));
  assert_eq!(fs::read_to_string(output_dir.join("Shaders/smaa.fx")).unwrap(), "// upstream smaa");
  assert!(output_dir.join("Textures/noise.png").is_file());
  assert!(!settings.cache_dir.exists());
}
