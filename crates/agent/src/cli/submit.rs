use crate::state::AppState;

/// Register a lead from a form submission without an id.
pub fn run(state: &AppState, name: &str) -> anyhow::Result<()> {
    let greeting = state
        .engine
        .submit(name)
        .ok_or_else(|| anyhow::anyhow!("could not register lead '{name}'"))?;
    println!("lead {}", greeting.lead.id());
    println!("(Agent for lead {} - {}): {}", greeting.lead.id(), greeting.lead.name(), greeting.message);
    Ok(())
}
