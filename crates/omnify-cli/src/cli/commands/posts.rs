//! Posts command handlers.

use anyhow::{Result, bail};
use comfy_table::{Table, presets};

use omnify_core::client::{ApiClient, Credential};
use omnify_core::feed::Feed;
use omnify_core::session::SessionManager;
use omnify_types::{PageWindow, Post};

pub async fn list(client: &ApiClient, session: &SessionManager, page: u32) -> Result<()> {
    let mut feed = Feed::new();
    let window = feed.load_page(client, page).await?;

    if window.items.is_empty() {
        println!("No posts yet.");
        return Ok(());
    }

    let viewer = session.current().map(|s| s.user.name.as_str());
    print_window(window, viewer);
    Ok(())
}

pub async fn show(client: &ApiClient, id: &str) -> Result<()> {
    let post: Post = client.fetch_post(id).await?.into();

    println!("{}", post.title);
    println!("by {} on {}", post.author_name, format_date(&post.created_at));
    if post.updated_at != post.created_at {
        println!("updated {}", format_date(&post.updated_at));
    }
    println!();
    println!("{}", post.content);
    Ok(())
}

pub async fn create(
    client: &ApiClient,
    session: &SessionManager,
    title: &str,
    content: &str,
) -> Result<()> {
    let cred = require_login(session)?;
    let created: Post = client.create_post(&cred, title, content).await?.into();
    println!("Created post {} ({})", created.id, created.title);
    Ok(())
}

pub async fn edit(
    client: &ApiClient,
    session: &SessionManager,
    id: &str,
    title: &str,
    content: &str,
) -> Result<()> {
    let cred = require_login(session)?;
    let updated: Post = client.update_post(&cred, id, title, content).await?.into();
    println!("Updated post {} ({})", updated.id, updated.title);
    Ok(())
}

pub async fn delete(client: &ApiClient, session: &SessionManager, id: &str) -> Result<()> {
    let cred = require_login(session)?;

    // Route through the feed so local bookkeeping matches the interactive
    // flow, even though a one-shot CLI call has no window to trim.
    let mut feed = Feed::new();
    feed.delete_post(client, &cred, id).await?;
    println!("Deleted post {id}");
    Ok(())
}

fn require_login(session: &SessionManager) -> Result<Credential> {
    match session.credential() {
        Some(cred) => Ok(cred),
        None => bail!("Not logged in. Run `omnify login` first."),
    }
}

fn print_window(window: &PageWindow, viewer: Option<&str>) {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_header(["ID", "TITLE", "AUTHOR", "CREATED", "UPDATED"]);

    for post in &window.items {
        // Cosmetic ownership marker only; the server enforces authorization.
        let author = if viewer == Some(post.author_name.as_str()) {
            format!("{} (you)", post.author_name)
        } else {
            post.author_name.clone()
        };
        let updated = if post.updated_at == post.created_at {
            "-".to_string()
        } else {
            format_date(&post.updated_at)
        };
        table.add_row([
            post.id.clone(),
            truncate(&post.title, 48),
            author,
            format_date(&post.created_at),
            updated,
        ]);
    }

    println!("{table}");
    println!(
        "Page {} of {}",
        window.page_index + 1,
        window.total_pages.max(1)
    );
}

/// Renders a server timestamp as e.g. "Jan 01, 2025"; falls back to the raw
/// string when it isn't RFC 3339.
fn format_date(ts: &str) -> String {
    chrono::DateTime::parse_from_rfc3339(ts)
        .map(|dt| dt.format("%b %d, %Y").to_string())
        .unwrap_or_else(|_| ts.to_string())
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{cut}...")
}
