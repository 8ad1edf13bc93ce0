//! Built-in tool catalogue.
//!
//! Every tool the workbench offers is described by a [`ToolDescriptor`] in
//! the static [`TOOLS`] table. Descriptors are constructed once at compile
//! time and never mutated; the UI enumerates them in table order and looks
//! them up by id when the user makes a selection.

/// The kind of payload a tool expects back from the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modality {
    /// Plain text, rendered through the markdown formatter.
    Text,
    /// Base64 inline image data.
    Image,
}

/// Static description of a single tool.
///
/// For text tools the `instruction` is prepended to the user's input before
/// the request is built; image tools send the raw input and leave
/// `instruction` empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolDescriptor {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub placeholder: &'static str,
    pub instruction: &'static str,
    pub modality: Modality,
}

pub const TOOLS: &[ToolDescriptor] = &[
    ToolDescriptor {
        id: "prompt-enhancer",
        name: "AI Prompt Enhancer",
        description: "Enhance your prompts for better AI responses",
        placeholder: "Enter your basic prompt...",
        instruction: "You are an expert prompt engineer. Transform the user's basic prompt \
            into a detailed, effective prompt that will generate better AI responses. \
            Make it specific, clear, and actionable.",
        modality: Modality::Text,
    },
    ToolDescriptor {
        id: "summarizer",
        name: "AI Summarizer",
        description: "Summarize long texts into concise summaries",
        placeholder: "Enter text to summarize...",
        instruction: "You are an expert text summarizer. Provide a concise, accurate \
            summary of the given text while preserving the key information and main points.",
        modality: Modality::Text,
    },
    ToolDescriptor {
        id: "sql-explainer",
        name: "SQL Query Explainer",
        description: "Explain SQL queries in plain English",
        placeholder: "Enter SQL query...",
        instruction: "You are an expert SQL developer. Explain the given SQL query in \
            simple, plain English. Break down what each part does and the overall purpose \
            of the query.",
        modality: Modality::Text,
    },
    ToolDescriptor {
        id: "regex-generator",
        name: "Regex Generator",
        description: "Generate regular expressions from descriptions",
        placeholder: "Describe what you want to match...",
        instruction: "You are an expert in regular expressions. Generate a regex pattern \
            based on the user's description. Provide the regex pattern and explain what \
            it does.",
        modality: Modality::Text,
    },
    ToolDescriptor {
        id: "code-explainer",
        name: "Code Explainer",
        description: "Explain code functionality and logic",
        placeholder: "Enter code to explain...",
        instruction: "You are an expert software developer. Explain the given code in \
            simple terms. Describe what it does, how it works, and any important concepts \
            or patterns used.",
        modality: Modality::Text,
    },
    ToolDescriptor {
        id: "translator",
        name: "Language Translator",
        description: "Translate text between languages",
        placeholder: "Enter text to translate (specify target language)...",
        instruction: "You are an expert translator. Translate the given text to the \
            specified target language. Provide accurate and natural translations while \
            preserving the original meaning.",
        modality: Modality::Text,
    },
    ToolDescriptor {
        id: "sentiment-analyzer",
        name: "Sentiment Analyzer",
        description: "Analyze text sentiment and emotions",
        placeholder: "Enter text to analyze...",
        instruction: "You are an expert sentiment analyst. Analyze the sentiment of the \
            given text. Provide the sentiment (positive, negative, neutral), confidence \
            level, and key emotional indicators.",
        modality: Modality::Text,
    },
    ToolDescriptor {
        id: "image-generator",
        name: "AI Image Generator",
        description: "Generate images from text descriptions",
        placeholder: "Describe the image you want to create...",
        instruction: "",
        modality: Modality::Image,
    },
];

/// Look up a tool by id. Returns `None` for unknown ids.
pub fn lookup(id: &str) -> Option<&'static ToolDescriptor> {
    TOOLS.iter().find(|t| t.id == id)
}

/// All tools in display order.
pub fn all() -> &'static [ToolDescriptor] {
    TOOLS
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_ids_are_unique() {
        let mut seen = HashSet::new();
        for tool in TOOLS {
            assert!(seen.insert(tool.id), "duplicate tool id: {}", tool.id);
        }
    }

    #[test]
    fn test_lookup_known_id() {
        let tool = lookup("summarizer").expect("summarizer should exist");
        assert_eq!(tool.name, "AI Summarizer");
        assert_eq!(tool.modality, Modality::Text);
    }

    #[test]
    fn test_lookup_unknown_id() {
        assert!(lookup("nonexistent").is_none());
    }

    #[test]
    fn test_enumeration_order_is_stable() {
        let first = all().first().expect("registry should not be empty");
        assert_eq!(first.id, "prompt-enhancer");
        let last = all().last().unwrap();
        assert_eq!(last.id, "image-generator");
    }

    #[test]
    fn test_text_tools_carry_instructions() {
        for tool in TOOLS {
            match tool.modality {
                Modality::Text => assert!(
                    !tool.instruction.is_empty(),
                    "text tool {} has no instruction",
                    tool.id
                ),
                Modality::Image => assert!(
                    tool.instruction.is_empty(),
                    "image tool {} should not carry an instruction",
                    tool.id
                ),
            }
        }
    }
}
