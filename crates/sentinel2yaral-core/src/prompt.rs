//! Conversion prompt construction
//!
//! 変換プロンプトの組み立て。翻訳の意味論はホストされたモデル側にあり、
//! ここでは決定的な文字列組み立てのみを行う。

use crate::{CoreResult, SentinelRule};

/// Maximum number of reference YARA-L rules embedded in a prompt
pub const MAX_REFERENCE_RULES: usize = 3;

/// Fixed instruction block appended to every conversion prompt
const CONVERSION_INSTRUCTIONS: &str = r#"Please convert this to a Chronicle YARA-L rule format. Focus on:
1. Maintaining the same detection logic
2. Using appropriate Chronicle data sources and fields
3. Preserving the rule's intent and functionality
4. Following the same structure as the example YARA-L rules above
- rule block with curly braces
- meta section with description, author, rule_id, and severity
- events section with event types and variable assignments
- match section for conditions
- outcome section for risk scores and output variables
- condition section at the end"#;

/// Builder for the model prompt sent to Gemini.
///
/// The prompt embeds up to [`MAX_REFERENCE_RULES`] reference YARA-L rules
/// followed by the YAML-serialized Sentinel rule and a fixed instruction
/// block. Output is deterministic for a given rule and reference set.
pub struct ConversionPrompt<'a> {
    rule: &'a SentinelRule,
    references: Vec<&'a str>,
}

impl<'a> ConversionPrompt<'a> {
    /// Start a prompt for the given Sentinel rule
    pub fn new(rule: &'a SentinelRule) -> Self {
        Self {
            rule,
            references: Vec::new(),
        }
    }

    /// Attach reference YARA-L rules; anything past the cap is dropped
    pub fn with_references<I>(mut self, references: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        self.references = references
            .into_iter()
            .take(MAX_REFERENCE_RULES)
            .collect();
        self
    }

    /// Assemble the prompt string
    pub fn build(&self) -> CoreResult<String> {
        let rule_yaml = self.rule.to_yaml_string()?;

        let examples_text = self
            .references
            .iter()
            .enumerate()
            .map(|(i, example)| format!("Example {}:\n```\n{}\n```", i + 1, example))
            .collect::<Vec<_>>()
            .join("\n\n");

        Ok(format!(
            "Convert this Microsoft Sentinel detection rule to a Chronicle YARA-L rule.\n\
             Here are some examples of well-formatted YARA-L rules:\n\n\
             {}\n\n\
             Here's the Sentinel rule in YAML format that needs to be converted:\n\n\
             {}\n\n\
             {}",
            examples_text, rule_yaml, CONVERSION_INSTRUCTIONS
        ))
    }
}

/// Strip Markdown code fences from model output.
///
/// The hosted model frequently wraps the generated rule in ``` fences
/// (with or without a language tag); the displayed and persisted rule is
/// the bare YARA-L text.
pub fn clean_yaral_output(raw: &str) -> String {
    let trimmed = raw.trim();

    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed.to_string();
    };

    // Drop the language tag line, then the closing fence
    let body = match rest.split_once('\n') {
        Some((_tag, body)) => body,
        None => rest,
    };
    let body = body.strip_suffix("```").unwrap_or(body);

    body.trim().to_string()
}
