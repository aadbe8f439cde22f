//! Multi-monitor warning commands.

use super::context::AppContext;
use anyhow::Result;

pub async fn check(ctx: &AppContext) -> Result<()> {
    let (show_warning, support) = ctx.monitor_warning.should_show().await?;

    println!("session:   {}", support.session_type);
    println!("supported: {}", support.supported);
    if !support.available_tools.is_empty() {
        println!("available: {}", support.available_tools.join(", "));
    }
    if !support.missing_tools.is_empty() {
        println!("missing:   {}", support.missing_tools.join(", "));
    }
    if show_warning {
        println!();
        println!("Multi-monitor capture needs a helper tool. Install one with:");
        println!("  {}", support.install_command);
    }
    Ok(())
}

pub async fn dismiss(ctx: &AppContext) -> Result<()> {
    ctx.monitor_warning.dismiss().await?;
    println!("The multi-monitor warning will not be shown again.");
    Ok(())
}

pub async fn copy_command(ctx: &AppContext) -> Result<()> {
    let command = ctx.monitor_warning.copy_install_command().await?;
    println!("Copied: {}", command);
    Ok(())
}
