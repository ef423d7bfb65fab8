use crate::state::AppState;

/// Route one open-ended message through the response generator.
pub async fn run(state: &AppState, lead_id: &str, message: &str) -> anyhow::Result<()> {
    match state.engine.open_reply(lead_id, message).await {
        Some(reply) => {
            println!("{reply}");
            Ok(())
        }
        None => anyhow::bail!("unknown lead '{lead_id}'"),
    }
}
