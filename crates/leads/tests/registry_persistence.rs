use std::sync::Arc;

use lq_domain::{FieldUpdate, LeadStatus};
use lq_leads::{JsonLeadStore, LeadRegistry, LeadStore};

#[test]
fn concurrent_leads_all_reach_disk() {
    let dir = tempfile::tempdir().unwrap();
    let store: Arc<dyn LeadStore> = Arc::new(JsonLeadStore::new(dir.path()).unwrap());
    let registry = Arc::new(LeadRegistry::load(store.clone()));

    let threads: Vec<_> = (1..=12)
        .map(|i| {
            let registry = registry.clone();
            std::thread::spawn(move || {
                let id = i.to_string();
                registry.create_if_absent(&id, &format!("Lead {i}"));
                registry.apply(&id, |lead| {
                    lead.set_status(LeadStatus::WaitingForCountry);
                    lead.record_field(FieldUpdate::Age(format!("{}", 20 + i)));
                });
            })
        })
        .collect();
    for t in threads {
        t.join().unwrap();
    }

    let records = store.load_all().unwrap();
    let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
    let expected: Vec<String> = (1..=12).map(|i| i.to_string()).collect();
    assert_eq!(ids, expected.iter().map(String::as_str).collect::<Vec<_>>());
    assert!(records
        .iter()
        .all(|r| r.status == LeadStatus::WaitingForCountry && r.age.is_some()));
}

#[test]
fn reload_preserves_empty_fields_as_absent() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("leads.json"),
        r#"[{"id": "7", "name": "Gus", "age": "", "country": null, "interest": null, "status": "waiting_for_age"}]"#,
    )
    .unwrap();

    let registry = LeadRegistry::load(Arc::new(JsonLeadStore::new(dir.path()).unwrap()));
    let lead = registry.get("7").unwrap();
    assert_eq!(lead.field(lq_domain::Field::Age), None);

    // An empty slot still accepts its first answer.
    registry
        .apply("7", |lead| assert!(lead.record_field(FieldUpdate::Age("52".into()))))
        .unwrap();
    assert_eq!(registry.get("7").unwrap().field(lq_domain::Field::Age), Some("52"));
}
