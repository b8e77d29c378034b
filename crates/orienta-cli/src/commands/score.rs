use std::error::Error;
use std::path::Path;

use orienta_core::scoring;
use orienta_core::AnswerSheet;

/// Score an answer-sheet JSON file (a map from question index to answer
/// record) and print the analysis as JSON.
pub fn run(file: &Path) -> Result<(), Box<dyn Error>> {
    let content = std::fs::read_to_string(file)?;
    let sheet: AnswerSheet = serde_json::from_str(&content)?;
    let analysis = scoring::score(&sheet);
    println!("{}", serde_json::to_string_pretty(&analysis)?);
    Ok(())
}
