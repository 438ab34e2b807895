use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tally_ingest::OcrSettings;

pub const CONFIG_FILE: &str = "tally.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub paths: PathsSection,
    pub normalize: NormalizeSection,
    pub ocr: OcrSection,
    pub run: RunSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsSection {
    /// Directory scanned for `.pdf` / `.txt` statements
    pub input: PathBuf,
    /// Directory the consolidated CSV is written to
    pub output: PathBuf,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeSection {
    /// Year for day-month dates when the file name has none (default: current year)
    pub default_year: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrSection {
    pub enabled: bool,
    pub dpi: u32,
    /// Tesseract page segmentation mode
    pub psm: u8,
    pub timeout_secs: u64,
    pub pdftoppm: Option<PathBuf>,
    pub tesseract: Option<PathBuf>,
    /// Directory for temporary page images
    pub scratch_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunSection {
    /// Documents processed in parallel
    pub jobs: usize,
}

impl Default for PathsSection {
    fn default() -> Self {
        Self {
            input: PathBuf::from("bank_statements"),
            output: PathBuf::from("output"),
        }
    }
}

impl Default for OcrSection {
    fn default() -> Self {
        let base = OcrSettings::default();
        Self {
            enabled: true,
            dpi: base.dpi,
            psm: base.psm,
            timeout_secs: base.timeout.as_secs(),
            pdftoppm: None,
            tesseract: None,
            scratch_dir: None,
        }
    }
}

impl Default for RunSection {
    fn default() -> Self {
        Self {
            jobs: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
        }
    }
}

impl OcrSection {
    pub fn settings(&self) -> OcrSettings {
        OcrSettings {
            dpi: self.dpi,
            psm: self.psm,
            timeout: Duration::from_secs(self.timeout_secs),
            pdftoppm: self.pdftoppm.clone(),
            tesseract: self.tesseract.clone(),
            scratch_dir: self.scratch_dir.clone(),
        }
    }
}

/// `--config` when given, else `./tally.toml`.
pub fn config_path(explicit: Option<&Path>) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE))
}

/// Load the config; a missing default file means defaults, a missing `--config` file is an error.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let p = config_path(explicit);
    if !p.exists() {
        if explicit.is_some() {
            bail!("config file not found: {}", p.display());
        }
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn save_config(cfg: &Config, p: &Path) -> Result<()> {
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config(explicit: Option<&Path>) -> Result<()> {
    let p = config_path(explicit);
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&Config::default(), &p)?;
    println!("Wrote {}", p.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let cfg: Config = toml::from_str(
            r#"
[paths]
input = "statements"

[normalize]
default_year = 2024

[ocr]
enabled = false
"#,
        )
        .unwrap();
        assert_eq!(cfg.paths.input, PathBuf::from("statements"));
        assert_eq!(cfg.paths.output, PathBuf::from("output"));
        assert_eq!(cfg.normalize.default_year, Some(2024));
        assert!(!cfg.ocr.enabled);
        assert_eq!(cfg.ocr.dpi, 300);
        assert!(cfg.run.jobs >= 1);
    }

    #[test]
    fn test_init_writes_loadable_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("tally.toml");
        init_config(Some(&p)).unwrap();
        assert_eq!(load_config(Some(&p)).unwrap(), Config::default());
    }

    #[test]
    fn test_missing_explicit_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config(Some(&dir.path().join("nope.toml"))).is_err());
    }

    #[test]
    fn test_ocr_settings() {
        let section = OcrSection {
            timeout_secs: 5,
            tesseract: Some(PathBuf::from("/opt/bin/tesseract")),
            scratch_dir: Some(PathBuf::from("/var/tmp/tally")),
            ..OcrSection::default()
        };
        let settings = section.settings();
        assert_eq!(settings.timeout, Duration::from_secs(5));
        assert_eq!(settings.tesseract.as_deref(), Some(Path::new("/opt/bin/tesseract")));
        assert_eq!(settings.pdftoppm, None);
        assert_eq!(settings.scratch_dir.as_deref(), Some(Path::new("/var/tmp/tally")));
    }
}
