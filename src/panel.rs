//! Tool panel state and dispatch orchestration.
//!
//! [`PanelState`] owns everything the tool view displays: the selected tool,
//! the input buffer, and at most one of output text / output image. All
//! mutation funnels through a handful of methods so the invariants hold in
//! one place:
//!
//! - selecting a different tool resets input and both outputs together
//! - applying a dispatch outcome clears both outputs, then sets exactly one
//! - the in-flight flag is set when a submission starts and cleared when its
//!   completion lands, on success and failure alike
//!
//! Each submission carries a generation number. Selecting another tool (or
//! resetting the panel) bumps the generation, so a completion that arrives
//! for a stale submission is discarded instead of overwriting state that now
//! belongs to a different tool.

use std::sync::Arc;

use tracing::warn;

use crate::provider::{Extraction, GenerationProvider, ImageRef};
use crate::registry::{self, Modality, ToolDescriptor};
use crate::validate::{self, Rejection};

/// Shown when no provider credential is available; dispatch never touches
/// the network in that case.
pub const MSG_NOT_CONFIGURED: &str =
    "Gemini API key not configured. Set GEMINI_API_KEY or add it to the config file.";
/// Shown when the provider returned a well-formed response with no content.
pub const MSG_NO_RESPONSE: &str = "No response from Gemini API.";
/// Shown for any transport-level failure (DNS, refused connection, bad body).
pub const MSG_REQUEST_FAILED: &str = "Error processing your request. Please try again.";
/// Prefix identifying errors the provider reported about itself.
pub const PROVIDER_ERROR_PREFIX: &str = "Gemini API Error: ";

/// What a dispatch produced. Every failure mode collapses to `Text`; the
/// output area makes no visual distinction between result kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Text(String),
    Image(ImageRef),
}

/// A submission accepted by [`PanelState::begin_submit`], ready to be
/// dispatched on a background task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub generation: u64,
    pub tool: &'static ToolDescriptor,
    pub input: String,
}

/// Mutable state behind the tool view.
#[derive(Debug, Default)]
pub struct PanelState {
    selected: Option<&'static str>,
    pub input: String,
    output_text: Option<String>,
    output_image: Option<ImageRef>,
    in_flight: bool,
    generation: u64,
}

impl PanelState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_tool(&self) -> Option<&'static ToolDescriptor> {
        self.selected.and_then(registry::lookup)
    }

    pub fn selected_id(&self) -> Option<&'static str> {
        self.selected
    }

    pub fn output_text(&self) -> Option<&str> {
        self.output_text.as_deref()
    }

    pub fn output_image(&self) -> Option<&ImageRef> {
        self.output_image.as_ref()
    }

    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    /// Select a tool by id. Switching to a different tool resets input and
    /// both outputs in the same step and invalidates any in-flight
    /// submission. Re-selecting the current tool is a no-op.
    pub fn select_tool(&mut self, id: &str) {
        if self.selected == Some(id) {
            return;
        }
        let Some(tool) = registry::lookup(id) else {
            warn!(id, "ignoring selection of unknown tool");
            return;
        };
        self.selected = Some(tool.id);
        self.input.clear();
        self.output_text = None;
        self.output_image = None;
        self.generation = self.generation.wrapping_add(1);
        self.in_flight = false;
    }

    /// Validate the current input and, if acceptable, mark the panel
    /// in-flight and hand back a [`Submission`] for dispatch.
    ///
    /// While a submission is in flight this returns `None` without touching
    /// any state; a second submission is simply impossible until the current
    /// one settles.
    pub fn begin_submit(&mut self) -> Option<Result<Submission, Rejection>> {
        if self.in_flight {
            return None;
        }
        if let Err(rejection) = validate::validate(self.selected, &self.input) {
            return Some(Err(rejection));
        }
        let Some(tool) = self.selected_tool() else {
            return Some(Err(Rejection::NoToolSelected));
        };
        self.in_flight = true;
        Some(Ok(Submission {
            generation: self.generation,
            tool,
            input: self.input.clone(),
        }))
    }

    /// Record a rejection: it is rendered verbatim where output would go.
    pub fn apply_rejection(&mut self, rejection: &Rejection) {
        self.output_text = Some(rejection.to_string());
        self.output_image = None;
    }

    /// Land a dispatch completion. Stale generations are dropped whole; the
    /// panel they belonged to no longer exists from the user's perspective.
    pub fn complete(&mut self, generation: u64, outcome: DispatchOutcome) {
        if generation != self.generation {
            warn!(generation, current = self.generation, "dropping stale dispatch result");
            return;
        }
        self.in_flight = false;
        self.apply(outcome);
    }

    /// One canonical rule: clear both outputs, then set exactly one.
    fn apply(&mut self, outcome: DispatchOutcome) {
        self.output_text = None;
        self.output_image = None;
        match outcome {
            DispatchOutcome::Text(text) => self.output_text = Some(text),
            DispatchOutcome::Image(image) => self.output_image = Some(image),
        }
    }

    /// User-triggered clear of the output text.
    pub fn clear_output(&mut self) {
        self.output_text = None;
    }
}

/// Build the provider prompt and run one network call, folding every failure
/// into a displayable outcome. Exactly one request per invocation; no
/// retries, no caching.
pub async fn dispatch(
    provider: Arc<dyn GenerationProvider>,
    tool: &ToolDescriptor,
    input: &str,
) -> DispatchOutcome {
    if !provider.is_configured() {
        return DispatchOutcome::Text(MSG_NOT_CONFIGURED.to_string());
    }

    let result = match tool.modality {
        Modality::Text => {
            let prompt = format!("{}\n{}", tool.instruction, input);
            provider.generate_text(&prompt).await
        }
        Modality::Image => provider.generate_image(input).await,
    };

    match result {
        Ok(Extraction::TextCandidate(text)) => DispatchOutcome::Text(text),
        Ok(Extraction::ImageCandidate(image)) => DispatchOutcome::Image(image),
        Ok(Extraction::ProviderError(message)) => {
            DispatchOutcome::Text(format!("{}{}", PROVIDER_ERROR_PREFIX, message))
        }
        Ok(Extraction::Empty) => DispatchOutcome::Text(MSG_NO_RESPONSE.to_string()),
        Err(err) => {
            warn!(tool = tool.id, error = %err, "dispatch failed");
            DispatchOutcome::Text(MSG_REQUEST_FAILED.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{anyhow, Result};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Scripted provider that records how many calls it received.
    struct FakeProvider {
        configured: bool,
        text_result: Option<Extraction>,
        image_result: Option<Extraction>,
        calls: AtomicUsize,
    }

    impl FakeProvider {
        fn text(extraction: Extraction) -> Self {
            Self {
                configured: true,
                text_result: Some(extraction),
                image_result: None,
                calls: AtomicUsize::new(0),
            }
        }

        fn image(extraction: Extraction) -> Self {
            Self {
                configured: true,
                text_result: None,
                image_result: Some(extraction),
                calls: AtomicUsize::new(0),
            }
        }

        fn unconfigured() -> Self {
            Self {
                configured: false,
                text_result: None,
                image_result: None,
                calls: AtomicUsize::new(0),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl GenerationProvider for FakeProvider {
        async fn generate_text(&self, _prompt: &str) -> Result<Extraction> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.text_result
                .clone()
                .ok_or_else(|| anyhow!("connection refused"))
        }

        async fn generate_image(&self, _prompt: &str) -> Result<Extraction> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.image_result
                .clone()
                .ok_or_else(|| anyhow!("connection refused"))
        }

        fn is_configured(&self) -> bool {
            self.configured
        }

        fn name(&self) -> &str {
            "fake"
        }
    }

    fn text_tool() -> &'static ToolDescriptor {
        registry::lookup("summarizer").unwrap()
    }

    fn image_tool() -> &'static ToolDescriptor {
        registry::lookup("image-generator").unwrap()
    }

    #[tokio::test]
    async fn test_dispatch_text_success() {
        let provider = Arc::new(FakeProvider::text(Extraction::TextCandidate("X".into())));
        let outcome = dispatch(provider.clone(), text_tool(), "input").await;
        assert_eq!(outcome, DispatchOutcome::Text("X".to_string()));
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_dispatch_image_success() {
        let image = ImageRef {
            mime_type: "image/png".to_string(),
            data: "AAAA".to_string(),
        };
        let provider = Arc::new(FakeProvider::image(Extraction::ImageCandidate(image)));
        let outcome = dispatch(provider, image_tool(), "a cat").await;
        match outcome {
            DispatchOutcome::Image(r) => assert_eq!(r.uri(), "data:image/png;base64,AAAA"),
            other => panic!("expected image outcome, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_dispatch_surfaces_provider_error() {
        let provider = Arc::new(FakeProvider::text(Extraction::ProviderError(
            "quota exceeded".into(),
        )));
        let outcome = dispatch(provider, text_tool(), "input").await;
        match outcome {
            DispatchOutcome::Text(t) => {
                assert!(t.contains("quota exceeded"));
                assert!(t.starts_with(PROVIDER_ERROR_PREFIX));
            }
            other => panic!("expected text outcome, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_dispatch_empty_maps_to_no_response() {
        let provider = Arc::new(FakeProvider::text(Extraction::Empty));
        let outcome = dispatch(provider, text_tool(), "input").await;
        assert_eq!(outcome, DispatchOutcome::Text(MSG_NO_RESPONSE.to_string()));
    }

    #[tokio::test]
    async fn test_dispatch_transport_failure_is_contained() {
        let provider = Arc::new(FakeProvider {
            configured: true,
            text_result: None,
            image_result: None,
            calls: AtomicUsize::new(0),
        });
        let outcome = dispatch(provider, text_tool(), "input").await;
        assert_eq!(outcome, DispatchOutcome::Text(MSG_REQUEST_FAILED.to_string()));
    }

    #[tokio::test]
    async fn test_dispatch_without_key_never_calls_network() {
        let provider = Arc::new(FakeProvider::unconfigured());
        let outcome = dispatch(provider.clone(), text_tool(), "input").await;
        assert_eq!(outcome, DispatchOutcome::Text(MSG_NOT_CONFIGURED.to_string()));
        assert_eq!(provider.call_count(), 0);
    }

    #[test]
    fn test_select_tool_resets_everything_at_once() {
        let mut panel = PanelState::new();
        panel.select_tool("summarizer");
        panel.input = "some text".to_string();
        panel.complete(
            panel.generation,
            DispatchOutcome::Image(ImageRef {
                mime_type: "image/png".to_string(),
                data: "AAAA".to_string(),
            }),
        );
        assert!(panel.output_image().is_some());

        panel.select_tool("translator");
        assert!(panel.input.is_empty());
        assert!(panel.output_text().is_none());
        assert!(panel.output_image().is_none());
    }

    #[test]
    fn test_reselecting_same_tool_keeps_state() {
        let mut panel = PanelState::new();
        panel.select_tool("summarizer");
        panel.input = "keep me".to_string();
        panel.select_tool("summarizer");
        assert_eq!(panel.input, "keep me");
    }

    #[test]
    fn test_submit_rejections_in_priority_order() {
        let mut panel = PanelState::new();
        panel.input = "hello".to_string();
        // No tool selected wins over everything.
        assert_eq!(
            panel.begin_submit(),
            Some(Err(Rejection::NoToolSelected))
        );

        panel.select_tool("summarizer");
        assert_eq!(panel.begin_submit(), Some(Err(Rejection::EmptyInput)));

        panel.input = "x".repeat(validate::MAX_INPUT_CHARS + 1);
        assert_eq!(panel.begin_submit(), Some(Err(Rejection::InputTooLong)));
    }

    #[test]
    fn test_in_flight_lifecycle() {
        let mut panel = PanelState::new();
        panel.select_tool("summarizer");
        panel.input = "hello".to_string();
        assert!(!panel.in_flight());

        let submission = panel.begin_submit().unwrap().unwrap();
        assert!(panel.in_flight());
        // Submission impossible while one is in flight.
        assert!(panel.begin_submit().is_none());

        panel.complete(submission.generation, DispatchOutcome::Text("done".into()));
        assert!(!panel.in_flight());
        assert_eq!(panel.output_text(), Some("done"));
    }

    #[test]
    fn test_in_flight_clears_on_failure_outcome_too() {
        let mut panel = PanelState::new();
        panel.select_tool("summarizer");
        panel.input = "hello".to_string();
        let submission = panel.begin_submit().unwrap().unwrap();
        panel.complete(
            submission.generation,
            DispatchOutcome::Text(MSG_REQUEST_FAILED.to_string()),
        );
        assert!(!panel.in_flight());
        assert_eq!(panel.output_text(), Some(MSG_REQUEST_FAILED));
    }

    #[test]
    fn test_stale_completion_is_dropped() {
        let mut panel = PanelState::new();
        panel.select_tool("summarizer");
        panel.input = "hello".to_string();
        let submission = panel.begin_submit().unwrap().unwrap();

        // Tool switch while in flight invalidates the submission.
        panel.select_tool("translator");
        panel.complete(submission.generation, DispatchOutcome::Text("late".into()));
        assert!(panel.output_text().is_none());
        assert!(!panel.in_flight());
    }

    #[test]
    fn test_error_outcome_clears_previous_image() {
        let mut panel = PanelState::new();
        panel.select_tool("image-generator");
        panel.input = "a cat".to_string();
        let first = panel.begin_submit().unwrap().unwrap();
        panel.complete(
            first.generation,
            DispatchOutcome::Image(ImageRef {
                mime_type: "image/png".to_string(),
                data: "AAAA".to_string(),
            }),
        );
        assert!(panel.output_image().is_some());

        panel.input = "another".to_string();
        let second = panel.begin_submit().unwrap().unwrap();
        panel.complete(
            second.generation,
            DispatchOutcome::Text(MSG_REQUEST_FAILED.to_string()),
        );
        assert!(panel.output_image().is_none());
        assert_eq!(panel.output_text(), Some(MSG_REQUEST_FAILED));
    }

    #[test]
    fn test_text_success_clears_previous_image() {
        let mut panel = PanelState::new();
        panel.select_tool("image-generator");
        panel.input = "a cat".to_string();
        let first = panel.begin_submit().unwrap().unwrap();
        panel.complete(
            first.generation,
            DispatchOutcome::Image(ImageRef {
                mime_type: "image/png".to_string(),
                data: "AAAA".to_string(),
            }),
        );

        panel.input = "again".to_string();
        let second = panel.begin_submit().unwrap().unwrap();
        panel.complete(second.generation, DispatchOutcome::Text("X".into()));
        assert_eq!(panel.output_text(), Some("X"));
        assert!(panel.output_image().is_none());
    }

    #[test]
    fn test_rejection_message_becomes_output_text() {
        let mut panel = PanelState::new();
        let rejection = Rejection::EmptyInput;
        panel.apply_rejection(&rejection);
        assert_eq!(panel.output_text(), Some(rejection.to_string().as_str()));
    }

    #[test]
    fn test_clear_output_resets_text_only() {
        let mut panel = PanelState::new();
        panel.select_tool("summarizer");
        panel.input = "hello".to_string();
        let s = panel.begin_submit().unwrap().unwrap();
        panel.complete(s.generation, DispatchOutcome::Text("hello back".into()));
        panel.clear_output();
        assert!(panel.output_text().is_none());
    }
}
