//! Settings page commands.

use super::context::AppContext;
use anyhow::{Result, anyhow};
use recall_core::settings::{AppSettings, Theme};

fn print_settings(settings: &AppSettings) {
    println!("theme:                {}", settings.theme);
    println!("language:             {}", settings.language);
    println!("close_to_tray:        {}", settings.close_to_tray);
    println!("show_monitor_warning: {}", settings.show_monitor_warning);
}

pub async fn show(ctx: &AppContext) -> Result<()> {
    print_settings(&ctx.settings.get().await?);
    Ok(())
}

pub async fn theme(ctx: &AppContext, theme: &str) -> Result<()> {
    let theme: Theme = theme.parse().map_err(|e: String| anyhow!(e))?;
    print_settings(&ctx.settings.set_theme(theme).await?);
    Ok(())
}

pub async fn language(ctx: &AppContext, language: String) -> Result<()> {
    print_settings(&ctx.settings.set_language(language).await?);
    Ok(())
}

pub async fn close_to_tray(ctx: &AppContext) -> Result<()> {
    print_settings(&ctx.settings.toggle_close_to_tray().await?);
    Ok(())
}
