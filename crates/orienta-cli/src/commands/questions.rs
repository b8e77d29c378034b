use std::error::Error;

use orienta_core::providers::QuestionProvider;
use orienta_core::storage::Config;
use orienta_core::{HttpApi, TestId};

pub fn run(test_id: &str, api: Option<String>, json: bool) -> Result<(), Box<dyn Error>> {
    let cfg = Config::load_or_default();
    let base_url = api.unwrap_or_else(|| cfg.api.base_url.clone());
    let api = HttpApi::new(&base_url)?;
    let set = api.fetch(&TestId::from(test_id))?;

    if json {
        println!("{}", serde_json::to_string_pretty(set.questions())?);
        return Ok(());
    }

    for (index, question) in set.questions().iter().enumerate() {
        if let Some(section) = &question.section {
            println!("[{section}]");
        }
        println!("{}. {}", index + 1, question.text);
        for option in &question.options {
            match option.dimension {
                Some(dimension) => println!("   - {} ({dimension})", option.text),
                None => println!("   - {}", option.text),
            }
        }
    }
    Ok(())
}
