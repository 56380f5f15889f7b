//! Platform abstraction for handing URLs to the outside world.
//!
//! Resolution produces a string; a [`Navigator`] decides what "going there"
//! means: the system browser, a configured browser command, or stdout.

use std::io::Write;
use std::process::{Command, Stdio};

use crate::error::{BangError, BangResult};

/// Something that can take the user to a URL.
pub trait Navigator {
    fn open_url(&self, url: &str) -> BangResult<()>;
}

/// Opens URLs with the platform opener or a configured browser.
#[derive(Debug, Clone, Default)]
pub struct SystemNavigator {
    browser: Option<String>,
}

impl SystemNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `browser` (e.g. `firefox`) instead of the platform opener.
    pub fn with_browser(browser: Option<String>) -> Self {
        Self {
            browser: browser.filter(|b| !b.trim().is_empty()),
        }
    }

    fn command(&self, url: &str) -> Command {
        if let Some(browser) = &self.browser {
            let mut cmd = Command::new(browser);
            cmd.arg(url);
            return cmd;
        }
        platform_opener(url)
    }
}

#[cfg(target_os = "linux")]
fn platform_opener(url: &str) -> Command {
    let mut cmd = Command::new("xdg-open");
    cmd.arg(url);
    cmd
}

#[cfg(target_os = "macos")]
fn platform_opener(url: &str) -> Command {
    let mut cmd = Command::new("open");
    cmd.arg(url);
    cmd
}

#[cfg(target_os = "windows")]
fn platform_opener(url: &str) -> Command {
    // The empty string is the window title `start` expects first
    let mut cmd = Command::new("cmd");
    cmd.args(["/C", "start", "", url]);
    cmd
}

#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
fn platform_opener(url: &str) -> Command {
    let mut cmd = Command::new("xdg-open");
    cmd.arg(url);
    cmd
}

impl Navigator for SystemNavigator {
    fn open_url(&self, url: &str) -> BangResult<()> {
        let mut cmd = self.command(url);
        tracing::debug!(command = ?cmd, "Opening URL");

        cmd.stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| BangError::Launch(format!("Failed to open URL: {}", e)))?;
        Ok(())
    }
}

/// Prints URLs on stdout, one per line.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutNavigator;

impl Navigator for StdoutNavigator {
    fn open_url(&self, url: &str) -> BangResult<()> {
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{}", url)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configured_browser_is_used() {
        let nav = SystemNavigator::with_browser(Some("firefox".to_string()));
        let cmd = nav.command("https://example.com");
        assert_eq!(cmd.get_program(), "firefox");
        let args: Vec<_> = cmd.get_args().collect();
        assert_eq!(args, ["https://example.com"]);
    }

    #[test]
    fn test_blank_browser_means_platform_default() {
        let nav = SystemNavigator::with_browser(Some("  ".to_string()));
        let cmd = nav.command("https://example.com");
        assert_ne!(cmd.get_program(), "  ");
        assert!(cmd.get_args().any(|a| a == "https://example.com"));
    }
}
