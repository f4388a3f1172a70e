//! Command line interface.

use std::ffi::OsString;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use cavasync_config::{active_theme_link, Config};
use cavasync_logger::LogLevel;
use cavasync_updater::{UpdatePipeline, UpdateReport};
use cavasync_watcher::SubprocessRunner;

#[derive(Debug, Parser)]
#[command(
    name = "cavasync",
    about = "Keep cava gradient colors in sync with the active Omarchy theme",
    version
)]
pub struct Cli {
    /// Configuration file (default: ~/.config/cavasync/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Minimum log level (debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Apply the active theme's colors to the cava config once.
    Update(PathArgs),

    /// Watch for theme switches and update cava on every change.
    Watch(PathArgs),
}

/// Path overrides shared by both commands.
#[derive(Debug, Clone, Default, Args)]
pub struct PathArgs {
    /// Omarchy config root (default: ~/.config/omarchy)
    #[arg(long)]
    pub theme_root: Option<PathBuf>,

    /// Cava config file (default: ~/.config/cava/config)
    #[arg(long)]
    pub cava_config: Option<PathBuf>,
}

/// Effective settings after merging the config file and CLI flags.
#[derive(Debug, Clone)]
struct Settings {
    config: Config,
    config_file: Option<PathBuf>,
    level: LogLevel,
    theme_root: PathBuf,
    cava_config: PathBuf,
}

impl Settings {
    fn resolve(cli: &Cli, paths: &PathArgs) -> Result<Self> {
        let loaded = match &cli.config {
            Some(path) => Config::load_from(path),
            None => Config::load(),
        };
        let config = loaded.unwrap_or_else(|e| {
            eprintln!("Invalid configuration, using defaults: {:#}", e);
            Config::default()
        });

        let level_name = cli
            .log_level
            .clone()
            .unwrap_or_else(|| config.logging.min_level.clone());
        let level = level_name.parse().unwrap_or_else(|e| {
            eprintln!("{}, using info", e);
            LogLevel::Info
        });

        let theme_root = match &paths.theme_root {
            Some(path) => path.clone(),
            None => config.theme_root()?,
        };
        let cava_config = match &paths.cava_config {
            Some(path) => path.clone(),
            None => config.cava_config()?,
        };

        Ok(Self {
            config,
            config_file: cli.config.clone(),
            level,
            theme_root,
            cava_config,
        })
    }

    /// Arguments that make a child `cavasync update` see the same settings.
    fn update_args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["update".into()];
        if let Some(file) = &self.config_file {
            args.push("--config".into());
            args.push(file.into());
        }
        // Info output travels on stdout; stderr only carries warnings and errors
        let child_level = self.level.max(LogLevel::Warn);
        args.push("--log-level".into());
        args.push(child_level.to_str().to_lowercase().into());
        args.push("--theme-root".into());
        args.push(self.theme_root.clone().into());
        args.push("--cava-config".into());
        args.push(self.cava_config.clone().into());
        args
    }
}

pub fn run_from_env() -> Result<()> {
    let cli = Cli::parse();
    run(cli)
}

pub fn run(cli: Cli) -> Result<()> {
    match &cli.command {
        Commands::Update(paths) => {
            let settings = Settings::resolve(&cli, paths)?;
            cavasync_logger::init(None, settings.level);
            run_update(&settings)
        }
        Commands::Watch(paths) => {
            let settings = Settings::resolve(&cli, paths)?;
            let log_file = settings.config.log_file().ok();
            cavasync_logger::init(log_file, settings.level);
            run_watch(&settings)
        }
    }
}

fn run_update(settings: &Settings) -> Result<()> {
    println!("Updating Cava colors from current Omarchy theme...");

    let pipeline = UpdatePipeline::new(
        active_theme_link(&settings.theme_root),
        settings.cava_config.clone(),
    );
    let report = pipeline.run()?;

    for line in update_summary(&pipeline, &report) {
        println!("{}", line);
    }
    Ok(())
}

/// Lines printed after an update. The watcher relays them into its log.
fn update_summary(pipeline: &UpdatePipeline, report: &UpdateReport) -> Vec<String> {
    let mut lines = vec![
        format!("Current theme: {}", report.theme),
        format!("Extracted {} colors", report.colors.accents.len()),
    ];
    lines.extend(
        report
            .rejected
            .iter()
            .map(|rejection| format!("Warning: {}", rejection)),
    );

    if report.changed {
        lines.push(format!(
            "Cava colors updated successfully in {}",
            pipeline.cava_config().display()
        ));
    } else {
        lines.push("Cava colors already match the theme".to_string());
    }

    let applied: Vec<&str> = report.applied.iter().map(|(_, c)| c.as_str()).collect();
    lines.push(format!("Applied gradient colors: {}", applied.join(", ")));
    lines
}

fn run_watch(settings: &Settings) -> Result<()> {
    let runner =
        SubprocessRunner::current_exe(settings.update_args(), settings.config.update_timeout())?;

    cavasync_watcher::watch(&settings.theme_root, settings.config.debounce(), runner)
        .with_context(|| format!("Theme monitor failed for {}", settings.theme_root.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("cavasync").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_parse_update() {
        let cli = parse(&["update", "--theme-root", "/t", "--log-level", "debug"]);
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        match cli.command {
            Commands::Update(paths) => {
                assert_eq!(paths.theme_root, Some(PathBuf::from("/t")));
                assert!(paths.cava_config.is_none());
            }
            Commands::Watch(_) => panic!("Expected update command"),
        }
    }

    #[test]
    fn test_requires_subcommand() {
        assert!(Cli::try_parse_from(["cavasync"]).is_err());
    }

    #[test]
    fn test_flags_override_config_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("config.toml");
        std::fs::write(
            &file,
            concat!(
                "[paths]\ntheme_root = \"/from/file\"\ncava_config = \"/file/cava\"\n",
                "[logging]\nmin_level = \"warn\"\n",
            ),
        )
        .unwrap();
        let file_arg = file.to_str().unwrap();

        let cli = parse(&["--config", file_arg, "watch", "--theme-root", "/from/flag"]);
        let Commands::Watch(paths) = &cli.command else {
            panic!("Expected watch command");
        };
        let settings = Settings::resolve(&cli, paths).unwrap();

        assert_eq!(settings.theme_root, PathBuf::from("/from/flag"));
        assert_eq!(settings.cava_config, PathBuf::from("/file/cava"));
        assert_eq!(settings.level, LogLevel::Warn);
    }

    #[test]
    fn test_update_args_forward_settings() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("config.toml");
        let file_arg = file.to_str().unwrap();

        let cli = parse(&[
            "--config",
            file_arg,
            "watch",
            "--theme-root",
            "/o",
            "--cava-config",
            "/c",
        ]);
        let Commands::Watch(paths) = &cli.command else {
            panic!("Expected watch command");
        };
        let settings = Settings::resolve(&cli, paths).unwrap();
        let args: Vec<String> = settings
            .update_args()
            .into_iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();

        assert_eq!(
            args,
            vec![
                "update",
                "--config",
                file_arg,
                "--log-level",
                "warning",
                "--theme-root",
                "/o",
                "--cava-config",
                "/c"
            ]
        );

        // The forwarded arguments parse back into an update command
        let child =
            Cli::try_parse_from(std::iter::once("cavasync".to_string()).chain(args)).unwrap();
        assert!(matches!(child.command, Commands::Update(_)));
    }

    #[cfg(unix)]
    #[test]
    fn test_update_summary_reports_rejected_colors() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("omarchy");
        let theme = root.join("themes/broken");
        std::fs::create_dir_all(root.join("current")).unwrap();
        std::fs::create_dir_all(&theme).unwrap();
        std::fs::write(
            theme.join("custom_theme.json"),
            r##"{ "colors": { "terminal": { "blue": "#12G456" } } }"##,
        )
        .unwrap();
        std::os::unix::fs::symlink(&theme, active_theme_link(&root)).unwrap();
        let cava = dir.path().join("cava");
        std::fs::write(&cava, "[color]\ngradient = 0\n").unwrap();

        let pipeline = UpdatePipeline::new(active_theme_link(&root), cava);
        let report = pipeline.run().unwrap();
        let summary = update_summary(&pipeline, &report);

        assert_eq!(summary[0], "Current theme: broken");
        assert!(summary.contains(
            &"Warning: Invalid color format '#12G456' for gradient_color_2, skipping".to_string()
        ));
        assert!(summary.iter().any(|l| l.starts_with("Cava colors updated successfully")));
        assert!(!summary.last().unwrap().contains("#12G456"));
    }
}
