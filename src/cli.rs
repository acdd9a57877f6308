//! Options and error reporting shared by the binaries.

use crate::errors::*;
use crate::setting::Setting;
use std::path::PathBuf;
use std::process;
use structopt::StructOpt;

/// Where the figures go.
#[derive(StructOpt, Debug, Default)]
pub struct OutputOpt {
    /// Report setting (TOML); defaults are used without one.
    #[structopt(short = "s", long = "setting", parse(from_os_str))]
    pub setting: Option<PathBuf>,

    /// Output directory, overriding `output_dir` of the setting.
    #[structopt(short = "o", long = "out", parse(from_os_str))]
    pub out: Option<PathBuf>,
}

impl OutputOpt {
    /// Loads the setting and applies the overrides.
    pub fn setting(&self) -> Result<Setting> {
        let mut setting = Setting::load(self.setting.as_ref())?;
        if let Some(ref out) = self.out {
            setting.output_dir = out.clone();
        }
        debug!("{:?}", setting);
        Ok(setting)
    }
}

/// Logs the whole error chain and exits with status 1.
pub fn exit_on_error(result: Result<()>) {
    if let Err(e) = result {
        error!("{}", e);
        for cause in e.iter().skip(1) {
            error!("caused by: {}", cause);
        }
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn out_overrides_setting_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "output_dir = \"figures\"\nwidth = 800").unwrap();

        let opt = OutputOpt {
            setting: Some(file.path().to_path_buf()),
            out: Some(PathBuf::from("elsewhere")),
        };
        let setting = opt.setting().unwrap();
        assert_eq!(setting.output_dir, PathBuf::from("elsewhere"));
        assert_eq!(setting.width, 800);
    }

    #[test]
    fn flags_parse() {
        let opt = OutputOpt::from_iter(vec!["bin", "-o", "out"]);
        assert_eq!(opt.out, Some(PathBuf::from("out")));
        assert!(opt.setting.is_none());
        assert_eq!(OutputOpt::default().setting().unwrap(), Setting::default());
    }
}
