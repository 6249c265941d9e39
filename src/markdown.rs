//! Markdown block extraction
//!
//! Lexes a document with `pulldown-cmark` and keeps the top-level fenced
//! code blocks whose language belongs to the shell set. Everything else is
//! left to whoever renders the document.

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};
use std::collections::BTreeSet;
use tracing::debug;

use crate::config::DEFAULT_SHELL_LANGUAGES;
use crate::models::ExtractedBlock;

/// Extracts runnable blocks from markdown text
#[derive(Debug, Clone)]
pub struct BlockExtractor {
    /// Lower-cased fence languages considered shell code
    languages: BTreeSet<String>,
}

impl BlockExtractor {
    /// Create an extractor for the given languages
    pub fn new<I, S>(languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            languages: languages
                .into_iter()
                .map(|lang| lang.as_ref().trim().to_lowercase())
                .filter(|lang| !lang.is_empty())
                .collect(),
        }
    }

    /// Whether a fence language tag counts as shell code
    pub fn is_shell_language(&self, language: &str) -> bool {
        self.languages.contains(&language.to_lowercase())
    }

    /// Extract shell blocks in document order, indexed from 0
    pub fn extract(&self, content: &str) -> Vec<ExtractedBlock> {
        let mut blocks = Vec::new();
        let mut current: Option<(String, String)> = None;
        // Blockquotes, lists and footnotes nest their code blocks
        let mut container_depth = 0usize;

        for event in Parser::new_ext(content, parser_options()) {
            match event {
                Event::Start(Tag::BlockQuote(_) | Tag::List(_) | Tag::FootnoteDefinition(_)) => {
                    container_depth += 1;
                }
                Event::End(TagEnd::BlockQuote(_) | TagEnd::List(_) | TagEnd::FootnoteDefinition) => {
                    container_depth = container_depth.saturating_sub(1);
                }
                Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))) if container_depth == 0 => {
                    let language = fence_language(&info);
                    if self.is_shell_language(&language) {
                        current = Some((language, String::new()));
                    }
                }
                Event::Text(text) => {
                    if let Some((_, source)) = current.as_mut() {
                        source.push_str(&text);
                    }
                }
                Event::End(TagEnd::CodeBlock) => {
                    if let Some((language, mut source)) = current.take() {
                        if source.ends_with('\n') {
                            source.pop();
                        }
                        blocks.push(ExtractedBlock::new(blocks.len(), language, source));
                    }
                }
                _ => {}
            }
        }

        debug!("Extracted {} shell blocks", blocks.len());
        blocks
    }
}

impl Default for BlockExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_SHELL_LANGUAGES)
    }
}

/// Extract shell blocks using the default language set
pub fn extract_shell_blocks(content: &str) -> Vec<ExtractedBlock> {
    BlockExtractor::default().extract(content)
}

/// GitHub-flavored extensions, matching what documentation usually uses
fn parser_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
}

/// First word of the info string, lower-cased
fn fence_language(info: &str) -> String {
    info.split_whitespace()
        .next()
        .unwrap_or("")
        .to_lowercase()
}
