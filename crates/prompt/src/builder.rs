//! Prompt builder for rendering system and user templates.

use crate::types::{BuiltPrompt, PromptDefinition};
use handlebars::Handlebars;
use ragnews_core::{AppError, AppResult};
use serde_json::Value;

/// Build a prompt from a definition and input variables.
///
/// Both the system and the user template are rendered against the same
/// variables. Missing variables render as empty strings.
///
/// # Example
/// ```no_run
/// use ragnews_prompt::{build_prompt, load_prompt};
/// use serde_json::json;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let def = load_prompt(None, "news.keywords")?;
/// let built = build_prompt(&def, &json!({ "text": "Who won the debate?" }))?;
/// println!("User prompt: {}", built.user);
/// # Ok(())
/// # }
/// ```
pub fn build_prompt(definition: &PromptDefinition, variables: &Value) -> AppResult<BuiltPrompt> {
    tracing::debug!("Building prompt: {}", definition.id);

    let mut handlebars = Handlebars::new();

    // Disable HTML escaping for plain text
    handlebars.register_escape_fn(handlebars::no_escape);

    handlebars
        .register_template_string("user", &definition.template)
        .map_err(|e| AppError::Prompt(format!("Failed to register template: {}", e)))?;

    let system = match definition.system {
        Some(ref system_template) => {
            handlebars
                .register_template_string("system", system_template)
                .map_err(|e| {
                    AppError::Prompt(format!("Failed to register system template: {}", e))
                })?;
            Some(render(&handlebars, "system", variables)?)
        }
        None => None,
    };

    let user = render(&handlebars, "user", variables)?;

    let resolved_variables = variables
        .as_object()
        .map(|vars| vars.keys().cloned().collect())
        .unwrap_or_default();

    Ok(BuiltPrompt::new(
        system,
        user,
        definition.id.clone(),
        resolved_variables,
    ))
}

fn render(handlebars: &Handlebars<'_>, name: &str, variables: &Value) -> AppResult<String> {
    handlebars
        .render(name, variables)
        .map_err(|e| AppError::Prompt(format!("Failed to render {} template: {}", name, e)))
}
