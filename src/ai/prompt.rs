//! Reusable prompts using Handlebars for templating. Strict mode
//! makes a missing variable an error instead of an empty string so a
//! prompt never goes out with a hole in it.

use std::fmt;

use anyhow::{Error, Result};
use handlebars::Handlebars;
use serde_json::json;

#[derive(Debug)]
pub enum Prompt {
    SymptomTriage,
}

impl fmt::Display for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl From<Prompt> for String {
    fn from(item: Prompt) -> String {
        format!("{:?}", item)
    }
}

// The section headers here must match the ones the recommendation
// extractor looks for.
const SYMPTOM_TRIAGE_PROMPT: &str = "User described symptoms: \"{{symptoms}}\". Give a 1-line diagnosis, followed by:

Recommended Tests:
- Test 1
- Test 2

Suggested Medicines:
- Medicine A
- Medicine B
Always format as clean bullet lists.";

pub fn templates<'a>() -> Handlebars<'a> {
    let mut registry = Handlebars::new();
    registry.set_strict_mode(true);
    // Output is a chat prompt, not HTML
    registry.register_escape_fn(handlebars::no_escape);
    registry
        .register_template_string(&Prompt::SymptomTriage.to_string(), SYMPTOM_TRIAGE_PROMPT)
        .expect("Failed to register template");
    registry
}

/// Render the user prompt that wraps the latest symptom description.
pub fn symptom_triage_prompt(symptoms: &str) -> Result<String, Error> {
    let rendered = templates().render(
        &Prompt::SymptomTriage.to_string(),
        &json!({ "symptoms": symptoms }),
    )?;
    Ok(rendered)
}
