//! Theme watcher state machine and event loop.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::time::{Duration, Instant};

use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use signal_hook::consts::{SIGINT, SIGTERM};

use crate::filter::{TriggerFilter, UpdateThrottler};
use crate::runner::{RunOutcome, UpdateRunner};
use crate::WatchError;

/// How long the main loop blocks before re-checking the shutdown flag.
const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Watcher lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatcherState {
    /// Waiting for a qualifying event
    Idle,
    /// Trigger accepted, update running
    Debounced,
    /// Last update failed; reported, then back to `Idle`
    Error,
    /// Loop ended
    Stopped,
}

/// Filters theme events, throttles them and runs updates.
///
/// Owned by a single thread; events are handled one at a time.
#[derive(Debug)]
pub struct ThemeWatcher<R: UpdateRunner> {
    filter: TriggerFilter,
    throttler: UpdateThrottler,
    runner: R,
    state: WatcherState,
}

impl<R: UpdateRunner> ThemeWatcher<R> {
    pub fn new(theme_root: PathBuf, debounce: Duration, runner: R) -> Self {
        Self {
            filter: TriggerFilter::new(theme_root),
            throttler: UpdateThrottler::new(debounce),
            runner,
            state: WatcherState::Idle,
        }
    }

    pub fn state(&self) -> WatcherState {
        self.state
    }

    fn transition(&mut self, next: WatcherState) {
        if self.state != next {
            log::debug!("Watcher state {:?} -> {:?}", self.state, next);
            self.state = next;
        }
    }

    /// Handle one filesystem event observed at `now`.
    ///
    /// Returns the update outcome when the event triggered an update.
    pub fn handle_event(&mut self, event: &Event, now: Instant) -> Option<RunOutcome> {
        if !self.filter.is_relevant(event) {
            return None;
        }
        log::debug!("Relevant event {:?} on {:?}", event.kind, event.paths);
        self.trigger(now)
    }

    /// Run an update unless one was accepted within the debounce window.
    pub fn trigger(&mut self, now: Instant) -> Option<RunOutcome> {
        if !self.throttler.should_update(now) {
            log::debug!("Update suppressed by debounce window");
            return None;
        }

        self.transition(WatcherState::Debounced);
        log::info!("Theme change detected, updating Cava colors...");

        let outcome = self.runner.run_update();
        if !outcome.is_success() {
            self.transition(WatcherState::Error);
        }
        match &outcome {
            RunOutcome::Succeeded { stdout, stderr } => {
                log::info!("Cava colors updated successfully");
                for line in stdout.lines().filter(|l| !l.trim().is_empty()) {
                    log::info!("{}", line);
                }
                // Rejected colors and other warnings from the update
                for line in stderr.lines().filter(|l| !l.trim().is_empty()) {
                    log::warn!("{}", line);
                }
            }
            RunOutcome::Failed { code, stderr } => {
                let code = code.map_or_else(|| "signal".to_string(), |c| c.to_string());
                log::error!("Failed to update Cava colors (exit {}): {}", code, stderr.trim());
            }
            RunOutcome::TimedOut => log::error!("Update script timed out"),
            RunOutcome::LaunchFailed(reason) => {
                log::error!("Error running update script: {}", reason)
            }
        }

        self.transition(WatcherState::Idle);
        Some(outcome)
    }

    /// Initial update, then handle events until `shutdown` is set or the
    /// event source goes away.
    pub fn run(&mut self, events: &Receiver<notify::Result<Event>>, shutdown: &AtomicBool) {
        self.trigger(Instant::now());

        while !shutdown.load(Ordering::Relaxed) {
            match events.recv_timeout(POLL_INTERVAL) {
                Ok(Ok(event)) => {
                    self.handle_event(&event, Instant::now());
                }
                Ok(Err(e)) => log::error!("Watch error: {}", e),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    log::error!("Filesystem watcher stopped delivering events");
                    break;
                }
            }
        }

        self.transition(WatcherState::Stopped);
    }
}

/// Create a recursive watcher on `root` that forwards raw events.
pub fn create_watcher(
    root: &Path,
) -> Result<(RecommendedWatcher, Receiver<notify::Result<Event>>), WatchError> {
    let (tx, rx) = mpsc::channel();

    let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
        let _ = tx.send(res);
    })?;
    watcher.watch(root, RecursiveMode::Recursive)?;

    Ok((watcher, rx))
}

/// Watch `theme_root` until SIGINT or SIGTERM.
pub fn watch<R: UpdateRunner>(
    theme_root: &Path,
    debounce: Duration,
    runner: R,
) -> Result<(), WatchError> {
    if !theme_root.is_dir() {
        return Err(WatchError::ThemeRootMissing(theme_root.to_path_buf()));
    }

    let shutdown = Arc::new(AtomicBool::new(false));
    for signal in [SIGINT, SIGTERM] {
        signal_hook::flag::register(signal, Arc::clone(&shutdown)).map_err(WatchError::Signal)?;
    }

    log::info!("Starting Cava theme monitor...");
    log::info!("Watching: {}", theme_root.display());

    let (mut watcher, events) = create_watcher(theme_root)?;
    log::info!("Theme monitor started successfully");

    let mut theme_watcher = ThemeWatcher::new(theme_root.to_path_buf(), debounce, runner);
    theme_watcher.run(&events, &shutdown);

    log::info!("Shutting down theme monitor...");
    let _ = watcher.unwatch(theme_root);
    log::info!("Theme monitor stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, ModifyKind};
    use notify::EventKind;

    const ROOT: &str = "/home/u/.config/omarchy";

    /// Counts invocations and returns a fixed outcome.
    struct FakeRunner {
        calls: usize,
        outcome: RunOutcome,
    }

    impl FakeRunner {
        fn returning(outcome: RunOutcome) -> Self {
            Self { calls: 0, outcome }
        }
    }

    impl UpdateRunner for FakeRunner {
        fn run_update(&mut self) -> RunOutcome {
            self.calls += 1;
            self.outcome.clone()
        }
    }

    fn ok_runner() -> FakeRunner {
        FakeRunner::returning(RunOutcome::Succeeded {
            stdout: "Cava colors updated successfully!".to_string(),
            stderr: String::new(),
        })
    }

    fn theme_switch() -> Event {
        Event::new(EventKind::Create(CreateKind::File))
            .add_path(PathBuf::from(ROOT).join("current/theme"))
    }

    fn watcher(runner: FakeRunner) -> ThemeWatcher<FakeRunner> {
        ThemeWatcher::new(PathBuf::from(ROOT), Duration::from_secs(1), runner)
    }

    #[test]
    fn test_events_within_window_run_once() {
        let mut w = watcher(ok_runner());
        let start = Instant::now();

        assert!(w.handle_event(&theme_switch(), start).is_some());
        assert!(w
            .handle_event(&theme_switch(), start + Duration::from_millis(200))
            .is_none());
        assert_eq!(w.runner.calls, 1);
    }

    #[test]
    fn test_events_outside_window_run_twice() {
        let mut w = watcher(ok_runner());
        let start = Instant::now();

        w.handle_event(&theme_switch(), start);
        w.handle_event(&theme_switch(), start + Duration::from_millis(1500));
        assert_eq!(w.runner.calls, 2);
        assert_eq!(w.state(), WatcherState::Idle);
    }

    #[test]
    fn test_irrelevant_event_does_not_touch_window() {
        let mut w = watcher(ok_runner());
        let start = Instant::now();

        let unrelated = Event::new(EventKind::Modify(ModifyKind::Any))
            .add_path(PathBuf::from(ROOT).join("themes/nord/alacritty.toml"));
        assert!(w.handle_event(&unrelated, start).is_none());
        assert!(w
            .handle_event(&theme_switch(), start + Duration::from_millis(100))
            .is_some());
        assert_eq!(w.runner.calls, 1);
    }

    #[test]
    fn test_success_with_warnings_stays_healthy() {
        let outcome = RunOutcome::Succeeded {
            stdout: "Warning: Invalid color format '#12G456' for gradient_color_2, skipping\n"
                .to_string(),
            stderr: "2026-10-15 10:00:00 - WARNING - Invalid color format\n".to_string(),
        };
        let mut w = watcher(FakeRunner::returning(outcome.clone()));
        let start = Instant::now();

        assert_eq!(w.handle_event(&theme_switch(), start), Some(outcome));
        assert_eq!(w.state(), WatcherState::Idle);
        assert_eq!(w.runner.calls, 1);
    }

    #[test]
    fn test_failures_return_to_idle() {
        for outcome in [
            RunOutcome::Failed {
                code: Some(1),
                stderr: "Could not find current Omarchy theme".to_string(),
            },
            RunOutcome::TimedOut,
            RunOutcome::LaunchFailed("No such file or directory".to_string()),
        ] {
            let mut w = watcher(FakeRunner::returning(outcome.clone()));
            let start = Instant::now();

            assert_eq!(w.handle_event(&theme_switch(), start), Some(outcome));
            assert_eq!(w.state(), WatcherState::Idle);

            // Still accepting triggers after a failure
            w.handle_event(&theme_switch(), start + Duration::from_secs(2));
            assert_eq!(w.runner.calls, 2);
        }
    }

    #[test]
    fn test_run_does_initial_update_and_stops() {
        let (tx, rx) = mpsc::channel();
        tx.send(Ok(theme_switch())).unwrap();
        tx.send(Err(notify::Error::generic("inotify overflow"))).unwrap();
        drop(tx);

        let mut w = watcher(ok_runner());
        w.run(&rx, &AtomicBool::new(false));

        // Queued event falls inside the window opened by the initial update
        assert_eq!(w.runner.calls, 1);
        assert_eq!(w.state(), WatcherState::Stopped);
    }

    #[test]
    fn test_run_honours_shutdown_flag() {
        let (_tx, rx) = mpsc::channel::<notify::Result<Event>>();
        let mut w = watcher(ok_runner());
        w.run(&rx, &AtomicBool::new(true));

        assert_eq!(w.runner.calls, 1);
        assert_eq!(w.state(), WatcherState::Stopped);
    }

    #[test]
    fn test_watch_requires_theme_root() {
        let err = watch(
            Path::new("/nonexistent/omarchy"),
            Duration::from_secs(1),
            ok_runner(),
        )
        .unwrap_err();
        assert!(matches!(err, WatchError::ThemeRootMissing(_)));
    }
}
