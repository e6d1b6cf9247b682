//! Chat message construction.
//!
//! Turns an optional text prompt and an ordered list of image URLs into the
//! single-message payload sent to `/v1/chat/completions`. Image URLs are passed
//! through verbatim; the server fetches them itself.

use crate::models::{ChatMessage, ContentPart, RequestPayload, Role};

/// Prompt used when the caller supplies no text.
pub const DEFAULT_PROMPT: &str = "What's in this image?";

/// Builds [`RequestPayload`]s for a fixed model and token bound.
#[derive(Debug, Clone)]
pub struct PayloadBuilder {
    model: String,
    max_tokens: u32,
    default_prompt: String,
}

impl PayloadBuilder {
    pub fn new(model: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            model: model.into(),
            max_tokens,
            default_prompt: DEFAULT_PROMPT.to_string(),
        }
    }

    pub fn with_default_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.default_prompt = prompt.into();
        self
    }

    pub fn build<S: AsRef<str>>(&self, text: Option<&str>, images: &[S]) -> RequestPayload {
        build(
            text,
            images,
            &self.default_prompt,
            &self.model,
            self.max_tokens,
        )
    }
}

/// Assembles the request payload.
///
/// The content is always `[text, image_1, ..., image_n]`: the caller's text, or
/// `default_prompt` when `text` is `None`, followed by one image part per URL in
/// input order. An empty `Some("")` is kept as-is.
pub fn build<S: AsRef<str>>(
    text: Option<&str>,
    images: &[S],
    default_prompt: &str,
    model: &str,
    max_tokens: u32,
) -> RequestPayload {
    let mut content = Vec::with_capacity(images.len() + 1);
    content.push(ContentPart::text(text.unwrap_or(default_prompt)));
    content.extend(images.iter().map(|url| ContentPart::image(url.as_ref())));

    RequestPayload {
        model: model.to_string(),
        messages: [ChatMessage {
            role: Role::User,
            content,
        }],
        max_tokens,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const NO_IMAGES: &[&str] = &[];

    fn builder() -> PayloadBuilder {
        PayloadBuilder::new("test-model", 300)
    }

    #[test]
    fn test_no_text_no_images_uses_default_prompt() {
        let payload = builder().build(None, NO_IMAGES);
        assert_eq!(
            payload.message().content,
            vec![ContentPart::text(DEFAULT_PROMPT)]
        );
    }

    #[test]
    fn test_no_text_with_images_prepends_default_prompt() {
        let payload = builder().build(None, &["u1", "u2", "u3"]);
        assert_eq!(
            payload.message().content,
            vec![
                ContentPart::text(DEFAULT_PROMPT),
                ContentPart::image("u1"),
                ContentPart::image("u2"),
                ContentPart::image("u3"),
            ]
        );
    }

    #[test]
    fn test_text_only() {
        let payload = builder().build(Some("Hello, how are you?"), NO_IMAGES);
        assert_eq!(
            payload.message().content,
            vec![ContentPart::text("Hello, how are you?")]
        );
    }

    #[test]
    fn test_text_then_images_in_input_order() {
        let payload = builder().build(Some("Describe"), &["u1", "u2"]);
        assert_eq!(
            payload.message().content,
            vec![
                ContentPart::text("Describe"),
                ContentPart::image("u1"),
                ContentPart::image("u2"),
            ]
        );
    }

    #[test]
    fn test_part_count_is_one_plus_images() {
        for n in 0..6 {
            let urls: Vec<String> = (0..n).map(|i| format!("https://example.com/{i}.jpg")).collect();
            let with_text = builder().build(Some("q"), &urls);
            let without_text = builder().build(None, &urls);
            assert_eq!(with_text.message().content.len(), n + 1);
            assert_eq!(without_text.message().content.len(), n + 1);
        }
    }

    #[test]
    fn test_empty_text_is_not_replaced() {
        let payload = builder().build(Some(""), &["u1"]);
        assert_eq!(payload.message().content[0], ContentPart::text(""));
    }

    #[test]
    fn test_urls_pass_through_unmodified() {
        let odd = [
            "",
            "not a url",
            "https://example.com/img.jpg?size=large&format=jpg#frag",
            "https://github.com/a/b.gif?raw=true",
        ];
        let payload = builder().build(Some("x"), &odd);
        let urls: Vec<&str> = payload.message().content[1..]
            .iter()
            .map(|part| match part {
                ContentPart::ImageUrl { image_url } => image_url.url.as_str(),
                ContentPart::Text { .. } => panic!("unexpected text part"),
            })
            .collect();
        assert_eq!(urls, odd);
    }

    #[test]
    fn test_custom_default_prompt() {
        let payload = builder()
            .with_default_prompt("Please describe each image.")
            .build(None, &["u1"]);
        assert_eq!(
            payload.message().content[0],
            ContentPart::text("Please describe each image.")
        );
    }

    #[test]
    fn test_model_role_and_max_tokens() {
        let payload = PayloadBuilder::new("custom-model", 50).build(Some("hi"), NO_IMAGES);
        assert_eq!(payload.model, "custom-model");
        assert_eq!(payload.max_tokens, 50);
        assert_eq!(payload.message().role, Role::User);
    }

    #[test]
    fn test_payload_survives_serialization() {
        let payload = builder().build(Some("Describe \"this\" 🐱"), &["u1", "u2"]);
        let json = serde_json::to_string(&payload).unwrap();
        let parsed: RequestPayload = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, payload);
    }
}
