//! Prompt loader for YAML prompt definitions.

use crate::builtin::{builtin_ids, builtin_source};
use crate::types::PromptDefinition;
use ragnews_core::{AppError, AppResult};
use std::path::Path;

/// Load a prompt definition by ID.
///
/// A file named `<id>.yml` in `prompts_dir` takes precedence; otherwise the
/// built-in definition with that id is used.
///
/// # Arguments
/// * `prompts_dir` - Optional directory of override prompts
/// * `prompt_id` - Prompt identifier (e.g., "news.answer")
///
/// # Example
/// ```no_run
/// use ragnews_prompt::load_prompt;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let prompt = load_prompt(None, "news.answer")?;
/// println!("Loaded prompt: {}", prompt.title);
/// # Ok(())
/// # }
/// ```
pub fn load_prompt(prompts_dir: Option<&Path>, prompt_id: &str) -> AppResult<PromptDefinition> {
    if let Some(dir) = prompts_dir {
        let prompt_file = dir.join(format!("{}.yml", prompt_id));
        if prompt_file.exists() {
            tracing::debug!("Loading prompt from: {:?}", prompt_file);

            let contents = std::fs::read_to_string(&prompt_file).map_err(|e| {
                AppError::Prompt(format!(
                    "Failed to read prompt file {:?}: {}",
                    prompt_file, e
                ))
            })?;

            let definition = parse_prompt(&contents, &format!("{:?}", prompt_file))?;
            tracing::info!("Loaded prompt: {} ({})", definition.id, definition.title);
            return Ok(definition);
        }
    }

    let source = builtin_source(prompt_id)
        .ok_or_else(|| AppError::Prompt(format!("Prompt not found: {}", prompt_id)))?;

    tracing::debug!("Using built-in prompt: {}", prompt_id);
    parse_prompt(source, prompt_id)
}

/// List all available prompt IDs: built-ins plus any `.yml` files in `prompts_dir`.
pub fn list_prompts(prompts_dir: Option<&Path>) -> AppResult<Vec<String>> {
    let mut prompt_ids: Vec<String> = builtin_ids().map(str::to_string).collect();

    if let Some(dir) = prompts_dir.filter(|d| d.exists()) {
        for entry in walkdir::WalkDir::new(dir)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("yml") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    prompt_ids.push(stem.to_string());
                }
            }
        }
    }

    prompt_ids.sort();
    prompt_ids.dedup();
    Ok(prompt_ids)
}

fn parse_prompt(contents: &str, origin: &str) -> AppResult<PromptDefinition> {
    let definition: PromptDefinition = serde_yaml::from_str(contents).map_err(|e| {
        AppError::Prompt(format!("Failed to parse prompt YAML {}: {}", origin, e))
    })?;

    validate_prompt(&definition)?;
    Ok(definition)
}

/// Validate a prompt definition.
fn validate_prompt(def: &PromptDefinition) -> AppResult<()> {
    if def.id.is_empty() {
        return Err(AppError::Prompt("Prompt ID cannot be empty".to_string()));
    }

    if def.title.is_empty() {
        return Err(AppError::Prompt("Prompt title cannot be empty".to_string()));
    }

    if def.api_version.is_empty() {
        return Err(AppError::Prompt(
            "Prompt apiVersion cannot be empty".to_string(),
        ));
    }

    if def.template.is_empty() {
        return Err(AppError::Prompt(
            "Prompt template cannot be empty".to_string(),
        ));
    }

    if !def.api_version.contains('.') {
        return Err(AppError::Prompt(format!(
            "Invalid apiVersion format: {}. Expected format: 'x.y'",
            def.api_version
        )));
    }

    Ok(())
}
