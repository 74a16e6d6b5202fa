//! Opening the home page in the user's browser.

use std::io;
use std::process::{Command, Stdio};

#[cfg(target_os = "macos")]
const LAUNCHER: (&str, &[&str]) = ("open", &[]);
#[cfg(target_os = "windows")]
const LAUNCHER: (&str, &[&str]) = ("cmd", &["/C", "start", ""]);
#[cfg(not(any(target_os = "macos", target_os = "windows")))]
const LAUNCHER: (&str, &[&str]) = ("xdg-open", &[]);

/// Hand `url` to the platform's URL launcher.
pub fn open_url(url: &str) -> io::Result<()> {
    let (program, args) = LAUNCHER;
    let status = Command::new(program)
        .args(args)
        .arg(url)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()?;

    if status.success() {
        Ok(())
    } else {
        Err(io::Error::other(format!("{} exited with {}", program, status)))
    }
}
