//! Probes the host for pointer-position helpers used by multi-monitor capture.

use async_trait::async_trait;
use recall_core::monitor::{MonitorSupportProbe, MultiMonitorSupport};

/// Helpers checked on Linux, in order of preference.
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
const LINUX_TOOLS: [&str; 5] = ["xdotool", "kdotool", "ydotool", "hyprctl", "slurp"];

/// [`MonitorSupportProbe`] that inspects the running system.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemMonitorProbe;

#[async_trait]
impl MonitorSupportProbe for SystemMonitorProbe {
    #[cfg(target_os = "linux")]
    async fn check(&self) -> MultiMonitorSupport {
        let session_type =
            std::env::var("XDG_SESSION_TYPE").unwrap_or_else(|_| "unknown".to_string());
        let desktop = std::env::var("XDG_CURRENT_DESKTOP").unwrap_or_default();

        let mut available = Vec::new();
        for tool in LINUX_TOOLS {
            if is_on_path(tool).await {
                available.push(tool);
            }
        }

        let support = linux_support(&session_type, &desktop, &available);
        tracing::debug!(
            session_type = %support.session_type,
            available = ?support.available_tools,
            supported = support.supported,
            "Checked multi-monitor support"
        );
        support
    }

    #[cfg(target_os = "macos")]
    async fn check(&self) -> MultiMonitorSupport {
        MultiMonitorSupport {
            supported: true,
            session_type: "macos".to_string(),
            available_tools: vec!["osascript".to_string()],
            missing_tools: Vec::new(),
            install_command: "# No extra install needed on macOS".to_string(),
        }
    }

    #[cfg(not(any(target_os = "linux", target_os = "macos")))]
    async fn check(&self) -> MultiMonitorSupport {
        MultiMonitorSupport {
            supported: false,
            session_type: std::env::consts::OS.to_string(),
            available_tools: Vec::new(),
            missing_tools: vec!["win32api".to_string()],
            install_command: "# Not yet available on this platform".to_string(),
        }
    }
}

#[cfg(target_os = "linux")]
async fn is_on_path(tool: &str) -> bool {
    tokio::process::Command::new("which")
        .arg(tool)
        .output()
        .await
        .map(|output| output.status.success())
        .unwrap_or(false)
}

/// Builds the Linux report from the session environment and the helpers found.
///
/// Only `xdotool` is ever reported missing; the Wayland helpers are
/// alternatives rather than requirements.
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn linux_support(session_type: &str, desktop: &str, available: &[&str]) -> MultiMonitorSupport {
    let missing_tools = if available.contains(&"xdotool") {
        Vec::new()
    } else {
        vec!["xdotool".to_string()]
    };

    let desktop = desktop.to_lowercase();
    let install_command = if session_type == "wayland" {
        if desktop.contains("kde") {
            "sudo apt install kdotool  # or from the AUR on Arch"
        } else if desktop.contains("hyprland") {
            "# hyprctl ships with Hyprland"
        } else {
            "sudo apt install xdotool  # for XWayland compatibility"
        }
    } else {
        "sudo apt install xdotool"
    };

    MultiMonitorSupport {
        supported: !available.is_empty(),
        session_type: session_type.to_string(),
        available_tools: available.iter().map(|t| t.to_string()).collect(),
        missing_tools,
        install_command: install_command.to_string(),
    }
}
