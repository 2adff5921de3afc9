use affirm_application::AffirmServices;
use anyhow::Result;

pub async fn queue(services: &AffirmServices) -> Result<()> {
    let entries = services.queue.entries().await?;
    if entries.is_empty() {
        println!("No failed syncs");
        return Ok(());
    }

    println!("{} failed sync(s), oldest first (max {}):", entries.len(), services.queue.max_len());
    for entry in entries {
        println!(
            "  {}  profile {} ({})",
            entry.queued_at.to_rfc3339(),
            entry.profile_snapshot.id,
            entry.profile_snapshot.name
        );
    }
    Ok(())
}

pub async fn replay(services: &AffirmServices) -> Result<()> {
    let report = services.drain.replay().await;
    println!("Delivered: {}  Remaining: {}", report.succeeded, report.remaining);
    Ok(())
}
