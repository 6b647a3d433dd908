//! Platform helper probing.
//!
//! Clipboard images, sharing and previews all go through external programs.
//! Whether one is usable is answered by a probe returning a [`Capability`],
//! taken once per export attempt. Export code matches on the result instead
//! of checking for programs inline.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

use tracing::debug;

use crate::error::{LinkDeckError, Result};

/// Argument placeholder replaced with the path of the PNG file.
pub const FILE_PLACEHOLDER: &str = "{file}";

/// An external program and its arguments.
///
/// If any argument contains [`FILE_PLACEHOLDER`] the tool gets a file path,
/// otherwise the PNG bytes are written to its stdin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelperTool {
    pub program: String,
    pub args: Vec<String>,
}

impl HelperTool {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Parses a user-written command line such as `my-share --to phone {file}`.
    /// A command without the placeholder gets the file appended as last argument.
    pub fn from_command_line(line: &str) -> Result<Self> {
        let parts = shell_words::split(line)
            .map_err(|e| LinkDeckError::InvalidValue(format!("bad command '{}': {}", line, e)))?;
        let Some((program, args)) = parts.split_first() else {
            return Err(LinkDeckError::InvalidValue("empty command".to_string()));
        };
        let mut tool = HelperTool::new(program.clone(), args.to_vec());
        if !tool.takes_file() {
            tool.args.push(FILE_PLACEHOLDER.to_string());
        }
        Ok(tool)
    }

    pub fn takes_file(&self) -> bool {
        self.args.iter().any(|a| a.contains(FILE_PLACEHOLDER))
    }

    fn command(&self, file: &Path) -> Command {
        let file = file.to_string_lossy();
        let mut cmd = Command::new(&self.program);
        cmd.args(self.args.iter().map(|a| a.replace(FILE_PLACEHOLDER, &file)));
        cmd
    }

    /// Runs the tool to completion. `Ok(false)` means it ran and exited non-zero.
    pub fn run(&self, file: &Path, stdin_data: &[u8]) -> Result<bool> {
        debug!(program = %self.program, args = ?self.args, "running helper");
        let mut cmd = self.command(file);
        cmd.stdout(Stdio::null()).stderr(Stdio::null());

        if self.takes_file() {
            let status = cmd.stdin(Stdio::null()).status().map_err(|e| {
                LinkDeckError::Api(format!("Failed to run {}: {}", self.program, e))
            })?;
            return Ok(status.success());
        }

        let mut child = cmd
            .stdin(Stdio::piped())
            .spawn()
            .map_err(|e| LinkDeckError::Api(format!("Failed to spawn {}: {}", self.program, e)))?;
        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(stdin_data).map_err(|e| {
                LinkDeckError::Api(format!("Failed to write to {}: {}", self.program, e))
            })?;
        }
        let status = child
            .wait()
            .map_err(|e| LinkDeckError::Api(format!("Failed to wait for {}: {}", self.program, e)))?;
        Ok(status.success())
    }

    /// Starts the tool without waiting for it, for openers that hand off to a GUI.
    pub fn launch(&self, file: &Path) -> Result<()> {
        debug!(program = %self.program, "launching helper");
        self.command(file)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| LinkDeckError::Api(format!("Failed to spawn {}: {}", self.program, e)))?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Capability {
    Supported(HelperTool),
    Unsupported(String),
}

impl Capability {
    pub fn is_supported(&self) -> bool {
        matches!(self, Capability::Supported(_))
    }

    /// Supported if `program` is on the PATH.
    pub fn if_installed(tool: HelperTool) -> Self {
        match which::which(&tool.program) {
            Ok(path) => {
                debug!(program = %tool.program, path = %path.display(), "helper found");
                Capability::Supported(tool)
            }
            Err(_) => Capability::Unsupported(format!("{} is not installed", tool.program)),
        }
    }
}

/// Probes for a share helper: the configured command first, then `termux-share`.
pub fn probe_share(share_command: Option<&str>) -> Capability {
    match share_command.map(str::trim).filter(|c| !c.is_empty()) {
        Some(line) => match HelperTool::from_command_line(line) {
            Ok(tool) => Capability::if_installed(tool),
            Err(e) => Capability::Unsupported(e.to_string()),
        },
        None => Capability::if_installed(HelperTool::new(
            "termux-share",
            ["-a", "send", "-c", "image/png", FILE_PLACEHOLDER],
        )),
    }
}

/// A share target must be a non-empty PNG file.
pub fn can_share_file(path: &Path) -> bool {
    let is_png = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));
    is_png && std::fs::metadata(path).is_ok_and(|m| m.is_file() && m.len() > 0)
}

/// Probes for the program that opens a file in its default viewer.
pub fn probe_opener() -> Capability {
    #[cfg(target_os = "macos")]
    {
        Capability::if_installed(HelperTool::new("open", [FILE_PLACEHOLDER]))
    }

    #[cfg(target_os = "windows")]
    {
        Capability::if_installed(HelperTool::new(
            "cmd",
            ["/C", "start", "", FILE_PLACEHOLDER],
        ))
    }

    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        Capability::if_installed(HelperTool::new("xdg-open", [FILE_PLACEHOLDER]))
    }
}
