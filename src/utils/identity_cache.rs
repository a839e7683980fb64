use anyhow::Result;
use futures_util::StreamExt;
use moka::future::Cache;
use once_cell::sync::Lazy;
use sqlx::MySqlPool;
use std::time::Duration;

/// true  => identity (username or email) is TAKEN
/// false => identity is AVAILABLE (usually we store only taken)
pub static IDENTITY_CACHE: Lazy<Cache<String, bool>> = Lazy::new(|| {
    Cache::builder()
        .max_capacity(500_000) // tune based on memory
        .time_to_live(Duration::from_secs(86400)) // 24h TTL
        .build()
});

/// Mark a single identity as taken
pub async fn mark_taken(identity: &str) {
    IDENTITY_CACHE.insert(identity.to_lowercase(), true).await;
}

/// Check if an identity is taken
pub async fn is_taken(identity: &str) -> bool {
    IDENTITY_CACHE
        .get(&identity.to_lowercase())
        .await
        .unwrap_or(false)
}

/// Batch mark identities as taken
async fn batch_mark(identities: &[String]) {
    let futures: Vec<_> = identities
        .iter()
        .map(|i| IDENTITY_CACHE.insert(i.to_lowercase(), true))
        .collect();

    // Await all insertions concurrently
    futures::future::join_all(futures).await;
}

/// Load only RECENTLY active identities into the in-memory cache (batched)
pub async fn warmup_identity_cache(pool: &MySqlPool, days: u32, batch_size: usize) -> Result<()> {
    let mut stream = sqlx::query_as::<_, (String, String)>(
        r#"
        SELECT username, email
        FROM accounts
        WHERE last_login_at >= NOW() - INTERVAL ? DAY
        ORDER BY last_login_at DESC
        "#,
    )
    .bind(days)
    .fetch(pool);

    let mut batch = Vec::with_capacity(batch_size * 2);
    let mut total_count = 0usize;

    while let Some(row) = stream.next().await {
        let (username, email) = row?;
        batch.push(username);
        batch.push(email);
        total_count += 1;

        if batch.len() >= batch_size * 2 {
            batch_mark(&batch).await;
            batch.clear();
        }
    }

    // Insert any remaining identities
    if !batch.is_empty() {
        batch_mark(&batch).await;
    }

    log::info!(
        "Identity cache warmup complete: {} recent accounts (last {} days)",
        total_count,
        days
    );

    Ok(())
}
