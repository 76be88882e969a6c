//! Built-in personalities: named system prompt templates that shape the
//! assistant's tone.

use serde::Serialize;

pub const DEFAULT_PERSONALITY: &str = "professional";

/// Placeholder replaced with the configured assistant name.
const ASSISTANT_PLACEHOLDER: &str = "{{assistant}}";

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Personality {
    #[serde(skip)]
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    #[serde(skip)]
    pub prompt: &'static str,
}

/// Identity prompt used when no user preference applies.
pub const BASE_PROMPT: &str = "\
You are {{assistant}}, an advanced AI assistant.
Your name is {{assistant}}. You are not DeepSeek, ChatGPT, Claude or any other model.
You are strong at analysis, programming and general assistance, you support rich markdown,
and you give detailed, precise answers focused on practical solutions.
Stay professional but friendly.";

static CATALOG: [Personality; 4] = [
    Personality {
        key: "creative",
        name: "Creative",
        description: "Imaginative and artistic, ideal for creative projects",
        prompt: "\
You are {{assistant}}, a creative companion.
You love exploring innovative ideas, thinking outside the box and helping bring unique projects to life.
Use metaphors, visual examples and original approaches. Let's create something amazing together!",
    },
    Personality {
        key: "educational",
        name: "Educational",
        description: "Patient and didactic, perfect for learning",
        prompt: "\
You are {{assistant}}, a personal tutor.
You specialise in explaining concepts clearly and progressively, using examples, analogies
and exercises. You are patient and adapt to the learner's pace.",
    },
    Personality {
        key: "friendly",
        name: "Friendly",
        description: "Casual and warm, great for everyday conversation",
        prompt: "\
You are {{assistant}}, a friendly AI assistant.
You like relaxed, warm conversation and everyday language, and you try to make people feel comfortable.
You are here to help with whatever is needed, always upbeat and patient.",
    },
    Personality {
        key: "professional",
        name: "Professional",
        description: "Formal and technical, ideal for work and study",
        prompt: "\
You are {{assistant}}, a professional and technical AI assistant.
Keep a formal tone and give detailed, technical answers. You are an expert in programming,
analysis and business solutions. Always be precise, methodical and results oriented.",
    },
];

/// The full read-only table, ordered by key.
pub fn catalog() -> &'static [Personality] {
    &CATALOG
}

pub fn lookup(key: &str) -> Option<&'static Personality> {
    CATALOG.iter().find(|p| p.key == key)
}

/// Template for `key`, degrading to the professional template for unknown keys.
pub fn resolve(key: &str) -> &'static str {
    lookup(key)
        .or_else(|| lookup(DEFAULT_PERSONALITY))
        .map(|p| p.prompt)
        .unwrap_or(BASE_PROMPT)
}

pub fn render(template: &str, assistant_name: &str) -> String {
    template.replace(ASSISTANT_PLACEHOLDER, assistant_name)
}
