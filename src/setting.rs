//! Report setting in TOML. Every field is optional.
//!
//! ```toml
//! output_dir = "figures"
//! width = 1600
//! height = 800
//! focus = "lusearch"
//! ```

use crate::errors::*;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// The report setting.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Setting {
    /// Directory the figures are written to.
    pub output_dir: PathBuf,

    /// Size of the grouped benchmark chart, in pixels.
    pub width: u32,
    pub height: u32,

    /// Size of the single-benchmark chart.
    pub focus_width: u32,
    pub focus_height: u32,

    /// Benchmark shown in the focused chart; the preset decides when unset.
    pub focus: Option<String>,

    /// Size of the fragmentation chart.
    pub fragmentation_width: u32,
    pub fragmentation_height: u32,
}

impl Default for Setting {
    fn default() -> Self {
        Setting {
            output_dir: PathBuf::from("."),
            width: 1600,
            height: 800,
            focus_width: 1000,
            focus_height: 600,
            focus: None,
            fragmentation_width: 1000,
            fragmentation_height: 600,
        }
    }
}

impl Setting {
    /// Initialize from a file.
    pub fn init<P: AsRef<Path>>(path: P) -> Result<Setting> {
        let path = path.as_ref();
        let mut file = File::open(path)
            .chain_err(|| format!("no setting file {}", path.display()))?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Reads the setting file if one is given, otherwise uses the defaults.
    pub fn load<P: AsRef<Path>>(path: Option<P>) -> Result<Setting> {
        match path {
            Some(p) => Setting::init(p),
            None => Ok(Setting::default()),
        }
    }

    /// Resolves a file name against `output_dir`, creating the directory.
    pub fn output_path(&self, file_name: &str) -> Result<PathBuf> {
        ::std::fs::create_dir_all(&self.output_dir)
            .chain_err(|| format!("cannot create {}", self.output_dir.display()))?;
        Ok(self.output_dir.join(file_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "width = 800\nfocus = \"eclipse\"").unwrap();

        let setting = Setting::init(file.path()).unwrap();
        assert_eq!(setting.width, 800);
        assert_eq!(setting.height, 800);
        assert_eq!(setting.focus, Some("eclipse".to_string()));
        assert_eq!(setting.output_dir, PathBuf::from("."));
    }

    #[test]
    fn no_file_means_default() {
        let setting = Setting::load(None::<&Path>).unwrap();
        assert_eq!(setting, Setting::default());
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(Setting::init("/nonexistent/heapfrag.toml").is_err());
    }

    #[test]
    fn output_path_creates_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut setting = Setting::default();
        setting.output_dir = dir.path().join("figs");

        let path = setting.output_path("a.png").unwrap();
        assert!(dir.path().join("figs").is_dir());
        assert_eq!(path, dir.path().join("figs").join("a.png"));
    }
}
