/// Fixed catalog of AI chat services offered by the picker
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Application name used in window titles and the picker titlebar
pub const APP_NAME: &str = "SimpleAI";

/// One selectable chat service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceDescriptor {
    /// Unique id, also the process argument that opens the service directly
    pub id: &'static str,
    pub label: &'static str,
    pub url: &'static str,
    /// Rich text (`<b>`, `<br>`) shown in the picker's info panel
    pub description: &'static str,
}

impl ServiceDescriptor {
    /// Window title for an instance showing this service
    pub fn window_title(&self) -> String {
        format!("{} - {}", APP_NAME, self.label)
    }

    /// Description with markup removed, `<br>` turned into line breaks
    pub fn plain_description(&self) -> String {
        strip_markup(self.description)
    }
}

/// All services, in picker order
pub const SERVICES: &[ServiceDescriptor] = &[
    ServiceDescriptor {
        id: "chatgpt",
        label: "ChatGPT",
        url: "https://chatgpt.com",
        description: "<b>Most popular general-purpose AI</b><br><br>\
            Powered by OpenAI's GPT models. Excels at creative writing, code generation, \
            problem-solving, and conversational tasks, with multimodal input.<br><br>\
            <b>Best for:</b> Content creation, coding assistance, learning, brainstorming.",
    },
    ServiceDescriptor {
        id: "claude",
        label: "Claude (Sonnet)",
        url: "https://claude.ai",
        description: "<b>Deep reasoning and analysis</b><br><br>\
            Strong at nuanced understanding, long-context analysis, and following complex \
            instructions.<br><br>\
            <b>Best for:</b> Document analysis, research synthesis, technical writing, code review.",
    },
    ServiceDescriptor {
        id: "copilot",
        label: "Copilot",
        url: "https://copilot.microsoft.com",
        description: "<b>Microsoft ecosystem integration</b><br><br>\
            Integrated with Microsoft 365 apps and combined with Bing search for grounded, \
            up-to-date answers.<br><br>\
            <b>Best for:</b> Office productivity, business workflows, real-time web research.",
    },
    ServiceDescriptor {
        id: "deepseek",
        label: "Deepseek",
        url: "https://chat.deepseek.com/",
        description: "<b>Advanced reasoning and coding</b><br><br>\
            Open-weight model with strong mathematical and coding capabilities and \
            chain-of-thought reasoning.<br><br>\
            <b>Best for:</b> Complex coding tasks, mathematical problem-solving, algorithms.",
    },
    ServiceDescriptor {
        id: "gemini",
        label: "Gemini",
        url: "https://gemini.google.com",
        description: "<b>Google's multimodal powerhouse</b><br><br>\
            Multimodal understanding of text, images, video and audio, with Google Workspace \
            and Search integration.<br><br>\
            <b>Best for:</b> Visual tasks, Workspace tasks, research with web grounding.",
    },
    ServiceDescriptor {
        id: "grok",
        label: "Grok",
        url: "https://grok.com",
        description: "<b>Real-time X/Twitter integration</b><br><br>\
            Direct access to real-time X data and trending topics, with a conversational \
            style.<br><br>\
            <b>Best for:</b> Social media insights, current events, real-time news analysis.",
    },
    ServiceDescriptor {
        id: "meta",
        label: "Meta AI",
        url: "https://www.meta.ai",
        description: "<b>Social-first AI assistant</b><br><br>\
            LLaMA-powered assistant integrated across Facebook, Instagram, and WhatsApp.<br><br>\
            <b>Best for:</b> Social media content, casual conversations, image creation.",
    },
    ServiceDescriptor {
        id: "perplexity",
        label: "Perplexity",
        url: "https://www.perplexity.ai",
        description: "<b>AI-powered research engine</b><br><br>\
            Conversational answers backed by real-time web search, each with source \
            citations.<br><br>\
            <b>Best for:</b> Academic research, fact-checking, cited answers.",
    },
];

static BY_ID: Lazy<HashMap<&'static str, &'static ServiceDescriptor>> =
    Lazy::new(|| SERVICES.iter().map(|s| (s.id, s)).collect());

/// Look up a service by its exact id
pub fn find_service(id: &str) -> Option<&'static ServiceDescriptor> {
    BY_ID.get(id).copied()
}

fn strip_markup(rich: &str) -> String {
    let text = rich.replace("<br>", "\n");
    let mut out = String::with_capacity(text.len());
    let mut in_tag = false;
    for c in text.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_ids_are_unique() {
        let ids: HashSet<_> = SERVICES.iter().map(|s| s.id).collect();
        assert_eq!(ids.len(), SERVICES.len());
    }

    #[test]
    fn test_find_service() {
        let gemini = find_service("gemini").unwrap();
        assert_eq!(gemini.url, "https://gemini.google.com");
        assert!(find_service("GEMINI").is_none());
        assert!(find_service("").is_none());
    }

    #[test]
    fn test_window_title() {
        let claude = find_service("claude").unwrap();
        assert_eq!(claude.window_title(), "SimpleAI - Claude (Sonnet)");
    }

    #[test]
    fn test_plain_description() {
        let text = find_service("grok").unwrap().plain_description();
        assert!(text.starts_with("Real-time X/Twitter integration\n\n"));
        assert!(!text.contains('<'));
        assert!(text.contains("Best for: Social media"));
    }
}
