use crate::capability::{Capability, HelperTool};

/// Finds a way to put a PNG on the system clipboard, in an OS-specific way.
/// - macOS: osascript, reading the PNG file as `«class PNGf»`
/// - Linux: wl-copy under Wayland, xclip under X11 (PNG on stdin)
/// - Windows: PowerShell with System.Windows.Forms
pub fn probe_clipboard_image() -> Capability {
    #[cfg(target_os = "macos")]
    {
        probe_macos()
    }

    #[cfg(target_os = "linux")]
    {
        probe_linux()
    }

    #[cfg(target_os = "windows")]
    {
        probe_windows()
    }

    #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
    {
        Capability::Unsupported("no image clipboard on this platform".to_string())
    }
}

#[cfg(target_os = "macos")]
fn probe_macos() -> Capability {
    use crate::capability::FILE_PLACEHOLDER;

    let script = format!(
        "set the clipboard to (read (POSIX file \"{}\") as «class PNGf»)",
        FILE_PLACEHOLDER
    );
    Capability::if_installed(HelperTool::new("osascript", ["-e".to_string(), script]))
}

#[cfg(target_os = "linux")]
fn probe_linux() -> Capability {
    let has_env = |name: &str| std::env::var_os(name).is_some_and(|v| !v.is_empty());

    if has_env("WAYLAND_DISPLAY") {
        let wayland =
            Capability::if_installed(HelperTool::new("wl-copy", ["--type", "image/png"]));
        if wayland.is_supported() {
            return wayland;
        }
    }
    if has_env("DISPLAY") {
        return Capability::if_installed(HelperTool::new(
            "xclip",
            ["-selection", "clipboard", "-t", "image/png", "-i"],
        ));
    }
    Capability::Unsupported(
        "no graphical session (neither WAYLAND_DISPLAY nor DISPLAY is set)".to_string(),
    )
}

#[cfg(target_os = "windows")]
fn probe_windows() -> Capability {
    use crate::capability::FILE_PLACEHOLDER;

    let script = format!(
        "Add-Type -AssemblyName System.Windows.Forms; Add-Type -AssemblyName System.Drawing; \
         [System.Windows.Forms.Clipboard]::SetImage([System.Drawing.Image]::FromFile('{}'))",
        FILE_PLACEHOLDER
    );
    Capability::if_installed(HelperTool::new(
        "powershell",
        ["-NoProfile".to_string(), "-STA".to_string(), "-Command".to_string(), script],
    ))
}
