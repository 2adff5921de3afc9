use affirm_application::AffirmServices;
use affirm_core::profile::{NewGoal, ProfilePatch, StatsDelta};
use anyhow::Result;
use chrono::NaiveDate;

pub async fn init(services: &AffirmServices) -> Result<()> {
    let profile = services.store.initialize().await?;
    println!("Profile {} (joined {})", profile.id, profile.joined_at.to_rfc3339());
    Ok(())
}

pub async fn show(services: &AffirmServices) -> Result<()> {
    let profile = services.store.initialize().await?;
    println!("{}", serde_json::to_string_pretty(&profile)?);
    Ok(())
}

pub async fn set_name(services: &AffirmServices, name: String) -> Result<()> {
    services.store.initialize().await?;
    services.store.update(ProfilePatch::new().name(name)).await?;
    println!("Name updated");
    Ok(())
}

pub async fn set_email(services: &AffirmServices, email: Option<String>) -> Result<()> {
    services.store.initialize().await?;
    let cleared = email.is_none();
    services.store.update(ProfilePatch::new().email(email)).await?;
    println!("{}", if cleared { "Email cleared" } else { "Email updated" });
    Ok(())
}

pub async fn add_goal(
    services: &AffirmServices,
    title: String,
    description: Option<String>,
    category: Option<String>,
    target_date: Option<NaiveDate>,
) -> Result<()> {
    services.store.initialize().await?;

    let mut new_goal = NewGoal::new(title);
    if let Some(description) = description {
        new_goal = new_goal.with_description(description);
    }
    if let Some(category) = category {
        new_goal = new_goal.with_category(category);
    }
    if let Some(date) = target_date {
        new_goal = new_goal.with_target_date(date);
    }

    let goal = services.store.add_goal(new_goal).await?;
    println!("Added goal {}: {}", goal.id, goal.title);
    Ok(())
}

pub async fn achieve_goal(services: &AffirmServices, goal_id: &str) -> Result<()> {
    services.store.initialize().await?;
    let goal = services.store.mark_goal_achieved(goal_id).await?;
    if let Some(at) = goal.achieved_at {
        println!("Achieved '{}' at {}", goal.title, at.to_rfc3339());
    }
    Ok(())
}

pub async fn record(
    services: &AffirmServices,
    sessions: u32,
    streak_days: u32,
    journal_entries: u32,
    minutes: u32,
) -> Result<()> {
    services.store.initialize().await?;
    services
        .store
        .record_activity(StatsDelta {
            sessions,
            streak_days,
            journal_entries,
            visualization_minutes: minutes,
        })
        .await?;

    if let Some(profile) = services.store.get() {
        let stats = profile.stats;
        println!(
            "Sessions: {}  Streak: {}  Journal: {}  Minutes: {}",
            stats.total_sessions, stats.streak_days, stats.journal_entries, stats.visualization_minutes
        );
    }
    Ok(())
}

pub async fn upgrade(services: &AffirmServices) -> Result<()> {
    services.store.initialize().await?;
    services.store.upgrade_to_premium().await?;
    println!("Premium enabled");
    Ok(())
}

pub async fn reset(services: &AffirmServices) -> Result<()> {
    services.store.reset().await?;
    println!("Local profile and pending syncs removed");
    Ok(())
}
