pub const SYSTEM_PROMPT_TEMPLATE: &str = "You are a translator. Translate the user's text to {target_language}. \
     Output only the translated text without any explanations. \
     Preserve the original formatting including blank lines and whitespace.";

const BRACKET_DIRECTIVE: &str = "Do not forget to NOT TRANSLATE text inside the square brackets!";

/// A two-message chat prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

/// Builds the prompt for translating `user_text` into `target_language`.
///
/// Text inside square brackets must survive untranslated; the model is told
/// so in the user instruction, nothing here enforces it.
pub fn build(user_text: &str, target_language: &str, system_template: &str) -> Prompt {
    Prompt {
        system: build_system_prompt(system_template, target_language),
        user: format!("{user_text} Translate it to: {target_language}. {BRACKET_DIRECTIVE}"),
    }
}

#[allow(clippy::literal_string_with_formatting_args)]
pub fn build_system_prompt(template: &str, target_language: &str) -> String {
    // {target_language} is a placeholder for string replacement, not a format argument
    template.replace("{target_language}", target_language)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_user_instruction() {
        let prompt = build("Hello [Bob]", "French", SYSTEM_PROMPT_TEMPLATE);
        assert_eq!(
            prompt.user,
            "Hello [Bob] Translate it to: French. \
             Do not forget to NOT TRANSLATE text inside the square brackets!"
        );
    }

    #[test]
    fn test_build_contains_text_and_language() {
        for (text, language) in [
            ("Good morning", "German"),
            ("[ACME Corp] reported earnings", "Japanese"),
            ("multi\nline\ntext", "Chinese (Traditional)"),
        ] {
            let prompt = build(text, language, "You translate.");
            assert!(prompt.user.contains(text));
            assert!(prompt.user.contains(language));
        }
    }

    #[test]
    fn test_build_is_idempotent() {
        let first = build("Hello", "Spanish", SYSTEM_PROMPT_TEMPLATE);
        let second = build("Hello", "Spanish", SYSTEM_PROMPT_TEMPLATE);
        assert_eq!(first, second);
    }

    #[test]
    fn test_build_accepts_empty_text() {
        let prompt = build("", "French", SYSTEM_PROMPT_TEMPLATE);
        assert!(prompt.user.contains("Translate it to: French."));
    }

    #[test]
    fn test_build_system_prompt() {
        let prompt = build_system_prompt(SYSTEM_PROMPT_TEMPLATE, "Japanese");
        assert!(prompt.contains("Japanese"));
        assert!(!prompt.contains("{target_language}"));
    }

    #[test]
    fn test_system_template_without_placeholder() {
        let prompt = build("Hi", "French", "You are a helpful translator.");
        assert_eq!(prompt.system, "You are a helpful translator.");
    }

    #[test]
    fn test_system_prompt_template_has_placeholder() {
        assert!(SYSTEM_PROMPT_TEMPLATE.contains("{target_language}"));
    }
}
