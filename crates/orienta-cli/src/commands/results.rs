use std::error::Error;

use orienta_core::Database;

pub fn run(limit: usize, json: bool) -> Result<(), Box<dyn Error>> {
    let db = Database::open()?;
    let results = db.recent_results(limit)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    if results.is_empty() {
        println!("No results recorded yet.");
        return Ok(());
    }
    for record in results {
        let durability = if record.persisted { "" } else { " (local only)" };
        println!(
            "{}  {}  {}  {}min{}",
            record.completed_at.format("%Y-%m-%d %H:%M"),
            record.test_name,
            record.code,
            record.duration_min,
            durability
        );
    }
    Ok(())
}
