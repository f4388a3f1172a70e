//! Theme to cava update pipeline.
//!
//! Resolves the active theme, extracts its palette, patches the cava config
//! and writes it back. Invoked once per `cavasync update`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use cavasync_patcher::{patch, PatchError};
use cavasync_theme::{extract, resolve_active_theme, theme_name, ColorSet};

/// Reasons an update cycle is skipped. The cava config is left untouched.
#[derive(Debug, thiserror::Error)]
pub enum UpdateError {
    #[error("Could not find current Omarchy theme at {}", .0.display())]
    NoActiveTheme(PathBuf),

    #[error("Could not extract colors from theme {}", .0.display())]
    NoColorData(PathBuf),

    #[error("Cava config not found at {}", .0.display())]
    ConfigMissing(PathBuf),

    #[error("Failed to update cava config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Result of a successful update.
#[derive(Debug, Clone)]
pub struct UpdateReport {
    /// Theme directory name
    pub theme: String,
    /// Palette as extracted from the theme
    pub colors: ColorSet,
    /// `(index, color)` pairs written to the config
    pub applied: Vec<(usize, String)>,
    /// Colors skipped by validation
    pub rejected: Vec<PatchError>,
    /// Whether the config file was rewritten
    pub changed: bool,
}

/// Active theme -> palette -> cava config.
#[derive(Debug, Clone)]
pub struct UpdatePipeline {
    active_theme_link: PathBuf,
    cava_config: PathBuf,
}

impl UpdatePipeline {
    pub fn new(active_theme_link: PathBuf, cava_config: PathBuf) -> Self {
        Self {
            active_theme_link,
            cava_config,
        }
    }

    pub fn cava_config(&self) -> &Path {
        &self.cava_config
    }

    /// Run one update cycle.
    pub fn run(&self) -> Result<UpdateReport, UpdateError> {
        let theme_dir = resolve_active_theme(&self.active_theme_link)
            .ok_or_else(|| UpdateError::NoActiveTheme(self.active_theme_link.clone()))?;
        let theme = theme_name(&theme_dir);
        log::info!("Current theme: {}", theme);

        let colors =
            extract(&theme_dir).ok_or_else(|| UpdateError::NoColorData(theme_dir.clone()))?;
        log::info!(
            "Extracted {} colors (background kept as terminal default)",
            colors.accents.len()
        );

        if !self.cava_config.is_file() {
            return Err(UpdateError::ConfigMissing(self.cava_config.clone()));
        }
        let current = fs::read_to_string(&self.cava_config).map_err(|source| UpdateError::Io {
            path: self.cava_config.clone(),
            source,
        })?;

        let patched = patch(&current, &colors);
        for rejection in &patched.rejected {
            log::warn!("{}", rejection);
        }

        let changed = patched.text != current;
        if changed {
            write_config(&self.cava_config, &patched.text).map_err(|source| UpdateError::Io {
                path: self.cava_config.clone(),
                source,
            })?;
        } else {
            log::debug!("Cava config already matches theme {}", theme);
        }

        Ok(UpdateReport {
            theme,
            colors,
            applied: patched.applied,
            rejected: patched.rejected,
            changed,
        })
    }
}

/// Replace the config through a sibling temp file and a rename.
///
/// A symlinked config is followed so the link itself survives.
fn write_config(path: &Path, text: &str) -> io::Result<()> {
    let target = fs::canonicalize(path)?;
    let file_name = target
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("config");
    let tmp = target.with_file_name(format!(".{}.cavasync-tmp", file_name));

    fs::write(&tmp, text)?;
    let result = fs::metadata(&target)
        .and_then(|metadata| fs::set_permissions(&tmp, metadata.permissions()))
        .and_then(|_| fs::rename(&tmp, &target));
    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    result
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::fs::symlink;
    use tempfile::TempDir;

    const CAVA: &str = "[general]\nframerate = 60\n\n[color]\nbackground = '#000000'\ngradient = 0\n";

    struct Fixture {
        dir: TempDir,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = TempDir::new().unwrap();
            fs::create_dir_all(dir.path().join("omarchy/current")).unwrap();
            fs::create_dir_all(dir.path().join("cava")).unwrap();
            Self { dir }
        }

        fn link(&self) -> PathBuf {
            self.dir.path().join("omarchy/current/theme")
        }

        fn cava(&self) -> PathBuf {
            self.dir.path().join("cava/config")
        }

        fn theme(&self, name: &str, files: &[(&str, &str)]) {
            let theme = self.dir.path().join("omarchy/themes").join(name);
            fs::create_dir_all(&theme).unwrap();
            for (file, content) in files {
                fs::write(theme.join(file), content).unwrap();
            }
            let _ = fs::remove_file(self.link());
            symlink(&theme, self.link()).unwrap();
        }

        fn pipeline(&self) -> UpdatePipeline {
            UpdatePipeline::new(self.link(), self.cava())
        }
    }

    #[test]
    fn test_updates_config_from_structured_theme() {
        let fx = Fixture::new();
        fx.theme(
            "ristretto",
            &[(
                "custom_theme.json",
                r##"{ "colors": { "terminal": { "cyan": "#048ba8" } } }"##,
            )],
        );
        fs::write(fx.cava(), CAVA).unwrap();

        let report = fx.pipeline().run().unwrap();
        assert_eq!(report.theme, "ristretto");
        assert!(report.changed);
        assert_eq!(report.applied.len(), 6);

        let written = fs::read_to_string(fx.cava()).unwrap();
        assert!(written.contains("gradient_color_1 = '#048ba8'"));
        assert!(written.contains("gradient = 1"));
        assert!(written.contains("background = default"));
        assert!(written.starts_with("[general]\nframerate = 60\n"));
    }

    #[test]
    fn test_second_run_is_unchanged() {
        let fx = Fixture::new();
        fx.theme("nord", &[("alacritty.toml", "[colors.normal]\ncyan = \"0x88c0d0\"\n")]);
        fs::write(fx.cava(), CAVA).unwrap();

        assert!(fx.pipeline().run().unwrap().changed);
        let first = fs::read_to_string(fx.cava()).unwrap();

        assert!(!fx.pipeline().run().unwrap().changed);
        assert_eq!(fs::read_to_string(fx.cava()).unwrap(), first);
    }

    #[test]
    fn test_theme_switch_rewrites_colors() {
        let fx = Fixture::new();
        fs::write(fx.cava(), CAVA).unwrap();

        fx.theme("one", &[("alacritty.toml", "[colors.normal]\ncyan = \"#111111\"\n")]);
        fx.pipeline().run().unwrap();
        fx.theme("two", &[("alacritty.toml", "[colors.normal]\ncyan = \"#222222\"\n")]);
        fx.pipeline().run().unwrap();

        let written = fs::read_to_string(fx.cava()).unwrap();
        assert!(written.contains("gradient_color_1 = '#222222'"));
        assert!(!written.contains("#111111"));
    }

    #[test]
    fn test_no_active_theme() {
        let fx = Fixture::new();
        fs::write(fx.cava(), CAVA).unwrap();

        let err = fx.pipeline().run().unwrap_err();
        assert!(matches!(err, UpdateError::NoActiveTheme(_)));
    }

    #[test]
    fn test_no_color_data() {
        let fx = Fixture::new();
        fx.theme("empty", &[("hyprland.conf", "")]);
        fs::write(fx.cava(), CAVA).unwrap();

        let err = fx.pipeline().run().unwrap_err();
        assert!(matches!(err, UpdateError::NoColorData(_)));
        assert_eq!(fs::read_to_string(fx.cava()).unwrap(), CAVA);
    }

    #[test]
    fn test_config_missing() {
        let fx = Fixture::new();
        fx.theme("nord", &[("alacritty.toml", "[colors.normal]\ncyan = \"#111111\"\n")]);

        let err = fx.pipeline().run().unwrap_err();
        assert!(matches!(err, UpdateError::ConfigMissing(_)));
        assert!(!fx.cava().exists());
    }

    #[test]
    fn test_symlinked_config_is_followed() {
        let fx = Fixture::new();
        fx.theme("nord", &[("alacritty.toml", "[colors.normal]\ncyan = \"#111111\"\n")]);
        let real = fx.dir.path().join("dotfiles-cava");
        fs::write(&real, CAVA).unwrap();
        symlink(&real, fx.cava()).unwrap();

        fx.pipeline().run().unwrap();

        assert!(fs::symlink_metadata(fx.cava()).unwrap().file_type().is_symlink());
        assert!(fs::read_to_string(&real).unwrap().contains("gradient_color_1 = '#111111'"));
        assert!(!fx.dir.path().join(".dotfiles-cava.cavasync-tmp").exists());
    }
}
