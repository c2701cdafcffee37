//! Grounding citations.
//!
//! Turns the grounding metadata of a model response into a deduplicated
//! "Verified Sources" list appended to the answer text.

use super::providers::ModelResponse;
use std::collections::HashSet;

pub const SOURCES_HEADER: &str = "\n\n**Verified Sources:**\n";
pub const UNTITLED_SOURCE: &str = "Official Documentation";

const MAX_TITLE_CHARS: usize = 100;
const TRUNCATED_TITLE_CHARS: usize = 97;

/// A web citation that survived extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedSource {
    pub uri: String,
    pub title: Option<String>,
}

impl VerifiedSource {
    /// Title as shown to the user: fallback for untitled sources, long titles
    /// cut to 97 characters plus `...`.
    pub fn display_title(&self) -> String {
        let title = self.title.as_deref().unwrap_or(UNTITLED_SOURCE);
        if title.chars().count() < MAX_TITLE_CHARS {
            title.to_string()
        } else {
            let mut truncated: String = title.chars().take(TRUNCATED_TITLE_CHARS).collect();
            truncated.push_str("...");
            truncated
        }
    }
}

/// Unique web sources of the first candidate, in first-seen order.
///
/// No candidates, no metadata, or no chunks yield an empty list. Chunks
/// without a web citation or with an empty URI are skipped. The first title
/// seen for a URI wins.
pub fn collect_sources(response: &ModelResponse) -> Vec<VerifiedSource> {
    let Some(metadata) = response
        .candidates
        .first()
        .and_then(|c| c.grounding_metadata.as_ref())
    else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    let mut sources = Vec::new();

    for web in metadata.grounding_chunks.iter().filter_map(|c| c.web.as_ref()) {
        let Some(uri) = web.uri.as_deref().filter(|u| !u.is_empty()) else {
            continue;
        };
        if seen.insert(uri.to_string()) {
            sources.push(VerifiedSource {
                uri: uri.to_string(),
                title: web.title.clone(),
            });
        }
    }

    sources
}

/// Markdown block listing `sources`, or an empty string for no sources.
pub fn render_sources(sources: &[VerifiedSource]) -> String {
    if sources.is_empty() {
        return String::new();
    }

    let mut block = String::from(SOURCES_HEADER);
    for source in sources {
        block.push_str(&format!("- [{}]({})\n", source.display_title(), source.uri));
    }
    block
}

/// Response text with its verified sources appended.
///
/// Returns the text and the number of sources appended.
pub fn annotate(response: &ModelResponse) -> (String, usize) {
    let mut text = response.text.clone().unwrap_or_default();
    let sources = collect_sources(response);
    text.push_str(&render_sources(&sources));
    (text, sources.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::providers::mock::grounded_response;
    use crate::services::providers::{Candidate, GroundingChunk, GroundingMetadata, WebSource};

    #[test]
    fn duplicate_uris_are_listed_once_in_first_seen_order() {
        let response = grounded_response(
            "Answer",
            &[
                ("https://b.example", Some("B")),
                ("https://a.example", Some("A")),
                ("https://b.example", Some("B again")),
            ],
        );

        let sources = collect_sources(&response);

        assert_eq!(
            sources,
            vec![
                VerifiedSource {
                    uri: "https://b.example".to_string(),
                    title: Some("B".to_string()),
                },
                VerifiedSource {
                    uri: "https://a.example".to_string(),
                    title: Some("A".to_string()),
                },
            ]
        );
    }

    #[test]
    fn annotate_appends_markdown_block() {
        let response = grounded_response(
            "TradeState tracks lifecycle.",
            &[
                ("https://cdm.finos.org/docs/event-model", Some("Event Model")),
                ("https://cdm.finos.org/docs/product-model", None),
            ],
        );

        let (text, count) = annotate(&response);

        assert_eq!(count, 2);
        assert_eq!(
            text,
            "TradeState tracks lifecycle.\n\n**Verified Sources:**\n\
             - [Event Model](https://cdm.finos.org/docs/event-model)\n\
             - [Official Documentation](https://cdm.finos.org/docs/product-model)\n"
        );
    }

    #[test]
    fn long_titles_are_truncated_to_97_chars_plus_ellipsis() {
        let title = "x".repeat(100);
        let source = VerifiedSource {
            uri: "https://example.com".to_string(),
            title: Some(title.clone()),
        };

        let shown = source.display_title();

        assert_eq!(shown, format!("{}...", &title[..97]));
        assert_eq!(shown.chars().count(), 100);
    }

    #[test]
    fn titles_under_100_chars_are_kept() {
        let title = "y".repeat(99);
        let source = VerifiedSource {
            uri: "https://example.com".to_string(),
            title: Some(title.clone()),
        };
        assert_eq!(source.display_title(), title);
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let title = "é".repeat(120);
        let source = VerifiedSource {
            uri: "https://example.com".to_string(),
            title: Some(title),
        };
        assert_eq!(source.display_title(), format!("{}...", "é".repeat(97)));
    }

    #[test]
    fn missing_title_uses_fallback() {
        let source = VerifiedSource {
            uri: "https://example.com".to_string(),
            title: None,
        };
        assert_eq!(source.display_title(), "Official Documentation");
    }

    #[test]
    fn no_metadata_leaves_text_unchanged() {
        let response = ModelResponse {
            text: Some("Hello there".to_string()),
            candidates: vec![Candidate::default()],
        };
        assert_eq!(annotate(&response), ("Hello there".to_string(), 0));

        let no_candidates = ModelResponse {
            text: Some("Hello there".to_string()),
            candidates: Vec::new(),
        };
        assert_eq!(annotate(&no_candidates), ("Hello there".to_string(), 0));
    }

    #[test]
    fn empty_chunk_list_leaves_text_unchanged() {
        let response = grounded_response("Hello there", &[]);
        assert_eq!(annotate(&response).0, "Hello there");
    }

    #[test]
    fn chunks_without_web_or_uri_are_skipped() {
        let response = ModelResponse {
            text: None,
            candidates: vec![Candidate {
                grounding_metadata: Some(GroundingMetadata {
                    grounding_chunks: vec![
                        GroundingChunk { web: None },
                        GroundingChunk {
                            web: Some(WebSource {
                                uri: None,
                                title: Some("no uri".to_string()),
                            }),
                        },
                        GroundingChunk {
                            web: Some(WebSource {
                                uri: Some(String::new()),
                                title: Some("empty uri".to_string()),
                            }),
                        },
                    ],
                }),
            }],
        };

        assert!(collect_sources(&response).is_empty());
        assert_eq!(annotate(&response).0, "");
    }

    #[test]
    fn only_first_candidate_is_inspected() {
        let mut response = grounded_response("text", &[]);
        response.candidates.push(Candidate {
            grounding_metadata: Some(GroundingMetadata {
                grounding_chunks: vec![GroundingChunk {
                    web: Some(WebSource {
                        uri: Some("https://second.example".to_string()),
                        title: None,
                    }),
                }],
            }),
        });

        assert!(collect_sources(&response).is_empty());
    }
}
