use lq_domain::{Field, Lead, LeadRecord};

use crate::state::AppState;

/// Print the persisted lead table.
pub fn run(state: &AppState, json: bool) -> anyhow::Result<()> {
    let leads = state.registry.snapshot();

    if json {
        let records: Vec<LeadRecord> = leads.iter().map(Lead::to_record).collect();
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if leads.is_empty() {
        println!("No leads yet.");
        return Ok(());
    }
    print_table(&leads, false);
    Ok(())
}

/// One summary line per lead, optionally followed by its history.
pub fn print_table(leads: &[Lead], with_history: bool) {
    for lead in leads {
        println!("{}", summary_line(lead));
        if with_history {
            println!("Conversation History:");
            for entry in lead.history() {
                println!("- {entry}");
            }
            println!("{}", "-".repeat(20));
        }
    }
}

pub fn summary_line(lead: &Lead) -> String {
    let field = |f: Field| lead.field(f).unwrap_or("-").to_owned();
    format!(
        "Lead ID: {}, Name: {}, Age: {}, Country: {}, Interest: {}, Status: {}",
        lead.id(),
        lead.name(),
        field(Field::Age),
        field(Field::Country),
        field(Field::Interest),
        lead.status(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use lq_domain::{FieldUpdate, LeadStatus};

    #[test]
    fn summary_marks_missing_fields() {
        let mut lead = Lead::new("4", "David");
        lead.record_field(FieldUpdate::Age("45".into()));
        lead.set_status(LeadStatus::WaitingForCountry);
        assert_eq!(
            summary_line(&lead),
            "Lead ID: 4, Name: David, Age: 45, Country: -, Interest: -, Status: waiting_for_country"
        );
    }
}
