use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::bootstrap;
use crate::cli::leads::print_table;
use crate::runtime::session::{run_all, SessionDriver, SessionScript, ThinkTime};
use crate::state::AppState;

/// The five demo form submissions.
pub fn demo_scripts() -> Vec<SessionScript> {
    vec![
        SessionScript::new(
            "1",
            "Alice",
            ["Yes, that's fine.", "30", "USA", "AI Development Kit"],
        ),
        SessionScript::new(
            "2",
            "Bob",
            [
                "No, not interested right now.",
                "Actually, maybe I do have a question.",
            ],
        ),
        SessionScript::new(
            "3",
            "Charlie",
            ["Sure, go ahead.", "25", "Canada", "Cloud Computing Services"],
        ),
        SessionScript::new(
            "4",
            "David",
            ["Okay.", "45", "UK", "Data Analytics Platform"],
        ),
        SessionScript::new("5", "Eve", ["Not right now."]),
    ]
}

/// Run the demo sessions concurrently with the follow-up sweep, then print
/// every lead with its history.
pub async fn run(state: AppState, fast: bool, linger_secs: Option<u64>) -> anyhow::Result<()> {
    let sessions = &state.config.sessions;
    let (think_time, stagger) = if fast {
        (ThinkTime::none(), ThinkTime::none())
    } else {
        (
            ThinkTime::from(sessions.think_time()),
            ThinkTime::from(sessions.stagger()),
        )
    };
    let linger = linger_secs
        .map(Duration::from_secs)
        .unwrap_or_else(|| sessions.linger(state.config.followup.idle_threshold_secs));

    let shutdown = CancellationToken::new();
    let sweeper = bootstrap::spawn_background_tasks(&state, shutdown.clone());

    let driver = Arc::new(SessionDriver::new(state.engine.clone(), think_time).with_echo(true));
    let scripts = demo_scripts();
    let expected = scripts.len();
    let outcomes = run_all(driver, scripts, stagger).await;
    if outcomes.len() < expected {
        tracing::warn!(
            finished = outcomes.len(),
            expected,
            "some sessions did not finish"
        );
    }

    tracing::info!(linger_secs = linger.as_secs(), "sessions finished, watching for idle leads");
    tokio::select! {
        _ = tokio::time::sleep(linger) => {}
        _ = tokio::signal::ctrl_c() => tracing::info!("interrupted, shutting down"),
    }

    shutdown.cancel();
    if let Err(e) = sweeper.await {
        tracing::error!(error = %e, "follow-up scheduler task failed");
    }

    println!("\n--- Final Lead Data ---");
    print_table(&state.registry.snapshot(), true);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_ids_are_unique() {
        let scripts = demo_scripts();
        let mut ids: Vec<&str> = scripts.iter().map(|s| s.lead_id.as_str()).collect();
        ids.dedup();
        assert_eq!(ids, vec!["1", "2", "3", "4", "5"]);
    }
}
