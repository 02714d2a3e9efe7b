//! Trait inference over a biographical excerpt
//!
//! A generative text service is asked to classify the subject of an excerpt
//! as male or female. The answer only picks a voice, so every failure mode
//! (no key, network error, malformed output, unknown label) collapses into
//! [`InferredCategory::Uncertain`].

pub mod extract;
pub mod gemini;

use serde::Serialize;

pub use gemini::GeminiClient;

/// JSON field the model is asked to fill
pub const CATEGORY_FIELD: &str = "genero";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InferredCategory {
    Male,
    Female,
    Uncertain,
}

impl InferredCategory {
    /// Label used on the wire
    pub fn label(&self) -> &'static str {
        match self {
            InferredCategory::Male => "masculino",
            InferredCategory::Female => "feminino",
            InferredCategory::Uncertain => "incerto",
        }
    }

    fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "masculino" => InferredCategory::Male,
            "feminino" => InferredCategory::Female,
            _ => InferredCategory::Uncertain,
        }
    }
}

impl std::fmt::Display for InferredCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Anything that can guess a category from text. Never fails.
pub trait TraitInferrer: Send + Sync {
    fn infer_category(&self, excerpt: &str) -> InferredCategory;
}

/// Leading `max_chars` characters of `text`, cut on a char boundary
pub fn truncate_excerpt(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Interpret raw model output; anything unexpected is `Uncertain`
pub fn parse_category(text: &str) -> InferredCategory {
    let Some(value) = extract::extract_json(text) else {
        log::warn!("Could not parse category JSON from model output: {:?}", text);
        return InferredCategory::Uncertain;
    };

    match value.get(CATEGORY_FIELD).and_then(|v| v.as_str()) {
        Some(label) => InferredCategory::from_label(label),
        None => {
            log::warn!("Model output has no \"{}\" label: {}", CATEGORY_FIELD, value);
            InferredCategory::Uncertain
        }
    }
}

/// Instruction sent along with the excerpt
pub fn category_prompt(excerpt: &str) -> String {
    format!(
        "Analise o texto biográfico abaixo e determine o gênero da pessoa descrita.
Responda apenas com um objeto JSON com uma única chave \"{field}\" cujo valor seja \"masculino\", \"feminino\" ou \"incerto\".
Não acrescente explicações, somente o JSON.

Texto:
\"\"\"
{excerpt}
\"\"\"",
        field = CATEGORY_FIELD,
        excerpt = excerpt
    )
}
