//! Index and session statistics overview.
//!
//! Prints a quick summary of what's indexed and what the coordinator has
//! done this session: document/chunk/vocabulary counts, truncated
//! documents, build recency, and the builds/queries/empty-response
//! counters. Used by `citeq stats` to give confidence that indexing and
//! retrieval are behaving as expected.

use anyhow::Result;

use crate::retriever::Retriever;

/// Run the stats command: build the index if needed and print a summary.
pub async fn run_stats(retriever: &Retriever) -> Result<()> {
    let index = retriever.rebuild().await?;
    let stats = index.stats();
    let metrics = retriever.metrics();

    println!("Cite Harness — Index Stats");
    println!("==========================");
    println!();
    println!("  Documents:    {}", stats.documents);
    println!("  Chunks:       {}", stats.chunks);
    println!("  Vocabulary:   {} terms", stats.vocabulary);
    match retriever.built_at() {
        Some(ts) => println!("  Built:        {}", format_ts_relative(ts.timestamp())),
        None => println!("  Built:        never"),
    }

    if !stats.truncated_documents.is_empty() {
        println!();
        println!("  Truncated documents (over size cap):");
        for id in &stats.truncated_documents {
            println!("    {id}");
        }
    }

    println!();
    println!("  Session counters:");
    println!("    Builds performed:  {}", metrics.builds_performed);
    println!("    Queries served:    {}", metrics.queries_served);
    println!("    Empty responses:   {}", metrics.empty_responses);
    println!();

    Ok(())
}

/// Format a Unix timestamp as a relative time string (e.g. "3 hours ago").
fn format_ts_relative(ts: i64) -> String {
    let now = chrono::Utc::now().timestamp();
    let delta = now - ts;

    if delta < 0 {
        return format_ts_iso(ts);
    }

    if delta < 60 {
        "just now".to_string()
    } else if delta < 3600 {
        let mins = delta / 60;
        format!("{} min{} ago", mins, if mins == 1 { "" } else { "s" })
    } else if delta < 86400 {
        let hours = delta / 3600;
        format!("{} hour{} ago", hours, if hours == 1 { "" } else { "s" })
    } else {
        format_ts_iso(ts)
    }
}

fn format_ts_iso(ts: i64) -> String {
    chrono::DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| ts.to_string())
}
