use std::sync::Arc;

use crate::app::{AppContext, Result};
use crate::config::Config;
use crate::digest;
use crate::domain::DigestResponse;
use crate::normalizer;
use crate::resolver::{HttpRedirectProbe, ShareLinkResolver};

pub async fn digest_thread(
    ctx: &AppContext,
    url: &str,
    json: bool,
    no_summary: bool,
) -> Result<()> {
    let resolved = ctx.resolver.resolve(url).await;
    let endpoint = normalizer::normalize(resolved.as_deref().unwrap_or(url));
    tracing::info!("fetching {}", endpoint);

    let payload = ctx.fetcher.fetch_thread(&endpoint).await?;
    let thread = digest::build(&payload, &ctx.digest_options)?;

    let summary = match (&ctx.summarizer, no_summary) {
        (Some(summarizer), false) => match summarizer.summarize(&thread).await {
            Ok(summary) => Some(summary),
            Err(e) => {
                tracing::warn!("summarization failed: {}", e);
                None
            }
        },
        _ => None,
    };

    let response = DigestResponse::from_digest(thread, summary);

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        render_digest(&response);
    }

    Ok(())
}

pub async fn resolve_url(config: &Config, url: &str, offline: bool) -> Result<()> {
    let resolved = if offline {
        None
    } else {
        let probe = Arc::new(HttpRedirectProbe::new(
            &config.settings.user_agent,
            config.timeout(),
        )?);
        ShareLinkResolver::new(probe).resolve(url).await
    };

    if let Some(canonical) = &resolved {
        println!("Share link resolved to: {}", canonical);
    }

    println!("{}", normalizer::normalize(resolved.as_deref().unwrap_or(url)));
    Ok(())
}

fn render_digest(response: &DigestResponse) {
    println!("{}", response.title);
    println!("by {} | {} comments", response.author, response.comment_count);

    if let Some(selftext) = &response.selftext {
        println!("\n{}", selftext);
    }

    if let Some(summary) = &response.summary {
        println!("\nSummary:\n{}", summary);
    }

    if !response.top_comments.is_empty() {
        println!("\nTop comments:");
        for comment in &response.top_comments {
            println!("  [{:>5}] {}: {}", comment.score, comment.author, comment.body);
        }
    }
}
