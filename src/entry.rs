use chrono::{DateTime, FixedOffset};
use pulldown_cmark::{Event, Parser, TagEnd};
use serde::Serialize;

/// Marks the end of the summary in a post body.
pub const SUMMARY_DIVIDER: &str = "<!--more-->";

/// One parsed post. Built once by [`parse`](crate::parse), read-only afterwards.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ContentEntry {
    pub(crate) title: String,
    pub(crate) date: DateTime<FixedOffset>,
    pub(crate) author: Option<String>,
    pub(crate) author_twitter: Option<String>,
    pub(crate) cover: Option<String>,
    pub(crate) tags: Vec<String>,
    pub(crate) keywords: Vec<String>,
    pub(crate) draft: bool,
    pub(crate) show_full_content: bool,
    pub(crate) body: String,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub text: String,
    pub truncated: bool,
}

impl ContentEntry {
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn date(&self) -> DateTime<FixedOffset> {
        self.date
    }

    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    pub fn author_twitter(&self) -> Option<&str> {
        self.author_twitter.as_deref()
    }

    pub fn cover(&self) -> Option<&str> {
        self.cover.as_deref()
    }

    /// Tags in the order they were written. May contain duplicates.
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn is_draft(&self) -> bool {
        self.draft
    }

    pub fn show_full_content(&self) -> bool {
        self.show_full_content
    }

    /// Raw Markdown after the closing fence.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Plain-text summary for listing pages.
    ///
    /// Text before [`SUMMARY_DIVIDER`] when the body has one, otherwise the
    /// first `max_words` words of the body.
    pub fn summary(&self, max_words: usize) -> Summary {
        if let Some(pos) = self.body.find(SUMMARY_DIVIDER) {
            return Summary {
                text: plain_text(&self.body[..pos]).join(" "),
                truncated: true,
            };
        }

        let words = plain_text(&self.body);
        let truncated = words.len() > max_words;
        Summary {
            text: words[..words.len().min(max_words)].join(" "),
            truncated,
        }
    }
}

fn plain_text(markdown: &str) -> Vec<String> {
    let mut text = String::new();
    for event in Parser::new(markdown) {
        match event {
            Event::Text(t) | Event::Code(t) => text.push_str(&t),
            Event::SoftBreak
            | Event::HardBreak
            | Event::End(TagEnd::Paragraph)
            | Event::End(TagEnd::Heading(_))
            | Event::End(TagEnd::Item)
            | Event::End(TagEnd::CodeBlock) => text.push(' '),
            _ => {}
        }
    }
    text.split_whitespace().map(str::to_string).collect()
}
