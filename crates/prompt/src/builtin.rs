//! Prompt definitions compiled into the binary.

const BUILTINS: &[(&str, &str)] = &[
    (
        "news.keywords",
        include_str!("../prompts/news.keywords.yml"),
    ),
    ("news.answer", include_str!("../prompts/news.answer.yml")),
    (
        "news.summarize",
        include_str!("../prompts/news.summarize.yml"),
    ),
    (
        "news.translate",
        include_str!("../prompts/news.translate.yml"),
    ),
    ("news.cloze", include_str!("../prompts/news.cloze.yml")),
];

/// YAML source of a built-in prompt.
pub fn builtin_source(prompt_id: &str) -> Option<&'static str> {
    BUILTINS
        .iter()
        .find(|(id, _)| *id == prompt_id)
        .map(|(_, source)| *source)
}

/// Ids of every built-in prompt.
pub fn builtin_ids() -> impl Iterator<Item = &'static str> {
    BUILTINS.iter().map(|(id, _)| *id)
}
