//! Conversation history commands.

use super::context::AppContext;
use anyhow::{Context, Result, bail};
use recall_core::conversation::{Conversation, ConversationRepository};
use recall_core::export::render_markdown;
use recall_core::overlay::OverlayMailbox;

async fn load(ctx: &AppContext, id: &str) -> Result<Conversation> {
    match ctx.repository.find_by_id(id).await? {
        Some(conversation) => Ok(conversation),
        None => bail!("Conversation '{}' not found", id),
    }
}

pub async fn list(ctx: &AppContext, search: Option<String>) -> Result<()> {
    ctx.history.activate().await;
    if let Some(query) = search {
        ctx.history.set_search_query(query);
    }

    let snapshot = ctx.history.snapshot();
    if snapshot.visible.is_empty() {
        if snapshot.search_query.trim().is_empty() {
            println!("No conversations yet.");
        } else {
            println!("No conversations match '{}'.", snapshot.search_query);
        }
        return Ok(());
    }

    for conversation in &snapshot.visible {
        println!(
            "{}  {}  ({} messages, updated {})",
            conversation.id,
            conversation.title,
            conversation.message_count(),
            conversation.updated_at
        );
    }
    Ok(())
}

pub async fn show(ctx: &AppContext, id: &str) -> Result<()> {
    let conversation = load(ctx, id).await?;
    ctx.history.view(conversation);

    if let Some(conversation) = ctx.history.snapshot().viewing {
        print!("{}", render_markdown(&conversation));
    }
    ctx.history.close_view();
    Ok(())
}

pub async fn export(ctx: &AppContext, id: &str) -> Result<()> {
    let conversation = load(ctx, id).await?;
    let path = ctx
        .history
        .download(&conversation)
        .await
        .with_context(|| format!("Failed to export conversation '{}'", id))?;
    println!("Saved {}", path.display());
    Ok(())
}

pub async fn delete(ctx: &AppContext, id: String) -> Result<()> {
    ctx.history.activate().await;
    ctx.history.request_delete(id.clone());

    match ctx.history.confirm_delete().await {
        Ok(Some(deleted)) => println!("Deleted {}", deleted),
        Ok(None) => println!("Nothing to delete."),
        Err(e) => return Err(e).with_context(|| format!("Failed to delete '{}'", id)),
    }
    Ok(())
}

pub async fn delete_many(ctx: &AppContext, ids: &[String]) -> Result<()> {
    ctx.history.activate().await;
    ctx.history.toggle_selection_mode();
    for id in ids {
        if !ctx.history.snapshot().is_selected(id) {
            ctx.history.toggle_select_item(id);
        }
    }

    if !ctx.history.request_batch_delete() {
        println!("Nothing selected.");
        return Ok(());
    }
    let Some(outcome) = ctx.history.confirm_batch_delete().await else {
        println!("Nothing selected.");
        return Ok(());
    };

    for id in &outcome.deleted {
        println!("Deleted {}", id);
    }
    for (id, e) in &outcome.failed {
        eprintln!("Failed to delete {}: {}", id, e);
    }
    if !outcome.is_complete() {
        bail!(
            "{} of {} conversations could not be deleted",
            outcome.failed.len(),
            outcome.failed.len() + outcome.deleted.len()
        );
    }
    Ok(())
}

pub async fn attach(ctx: &AppContext, id: &str) -> Result<()> {
    let conversation = load(ctx, id).await?;
    ctx.history
        .attach_to_overlay(&conversation.id)
        .await
        .context("Failed to attach conversation to overlay")?;
    println!("Attached '{}' to the overlay", conversation.title);
    Ok(())
}

pub async fn overlay_take(ctx: &AppContext) -> Result<()> {
    match ctx.overlay_mailbox.take().await? {
        Some(handoff) => match ctx.repository.find_by_id(&handoff.conversation_id).await? {
            Some(conversation) => print!("{}", render_markdown(&conversation)),
            None => println!(
                "Attached conversation '{}' no longer exists.",
                handoff.conversation_id
            ),
        },
        None => println!("No conversation attached."),
    }
    Ok(())
}
