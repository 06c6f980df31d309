//! Turn handling: the bounded think/act loop over the capability registry.

use std::sync::Arc;

use tracing::{debug, info, info_span, warn, Instrument};
use wayfinder_ai::protocol::{self, Directive};
use wayfinder_ai::{AiClient, AiError, Message, Role, TokenTracker, ToolDefinition};
use wayfinder_common::new_correlation_id;

use crate::registry::CapabilityRegistry;
use crate::session::ConversationSession;

/// Think/act steps allowed per turn unless configured otherwise.
pub const DEFAULT_MAX_STEPS: u32 = 15;

const APOLOGY: &str = "I'm sorry, I couldn't work out an answer to that. \
                       Could you try rephrasing your question?";

/// Why a turn ended without a final answer.
#[derive(Debug, thiserror::Error)]
pub enum ReasoningError {
    #[error("reasoning engine failed: {0}")]
    Engine(#[from] AiError),
    #[error("no final answer after {steps} steps")]
    StepBudgetExhausted { steps: u32 },
}

impl ReasoningError {
    /// Text shown to the user in place of an answer.
    pub fn reply(&self) -> String {
        match self {
            ReasoningError::Engine(e) => {
                format!("An error occurred while processing your request: {e}")
            }
            ReasoningError::StepBudgetExhausted { .. } => APOLOGY.to_string(),
        }
    }
}

/// Owns one conversation and answers its turns one at a time.
pub struct Orchestrator {
    engine: Arc<dyn AiClient>,
    registry: Arc<CapabilityRegistry>,
    session: ConversationSession,
    tracker: TokenTracker,
    max_steps: u32,
    tools: Vec<ToolDefinition>,
    system_prompt: String,
}

impl Orchestrator {
    pub fn new(engine: Arc<dyn AiClient>, registry: Arc<CapabilityRegistry>) -> Self {
        let tools = registry.tool_definitions();
        let system_prompt = protocol::render_system_prompt(&tools);
        Self {
            engine,
            registry,
            session: ConversationSession::new(),
            tracker: TokenTracker::new(),
            max_steps: DEFAULT_MAX_STEPS,
            tools,
            system_prompt,
        }
    }

    pub fn with_max_steps(mut self, max_steps: u32) -> Self {
        self.max_steps = max_steps.max(1);
        self
    }

    /// Answer one user utterance. Always returns text; the session records
    /// the utterance and the reply.
    pub async fn handle(&mut self, utterance: &str) -> String {
        let span = info_span!(
            "turn",
            session = %self.session.id(),
            turn = %new_correlation_id()
        );

        self.session.push_user(utterance);
        let reply = match self.reason().instrument(span).await {
            Ok(answer) => answer,
            Err(e) => {
                warn!("turn ended without an answer: {e}");
                e.reply()
            }
        };
        self.session.push_assistant(reply.clone());
        reply
    }

    async fn reason(&mut self) -> Result<String, ReasoningError> {
        let mut scratchpad = self.context();
        let names = self.registry.names();

        for step in 1..=self.max_steps {
            let response = self.engine.send_message(&scratchpad, &self.tools).await?;
            self.tracker.record(self.engine.provider(), &response.usage);

            let directive = match protocol::parse_directive(&response) {
                Ok(directive) => directive,
                Err(e) => {
                    debug!(step, "unusable engine output: {e}");
                    scratchpad.push(Message::new(Role::Assistant, response.content));
                    scratchpad.push(Message::new(Role::Tool, protocol::correction(&e, &names)));
                    continue;
                }
            };

            let (tool, input) = match directive {
                Directive::Finish(answer) => {
                    info!(step, "final answer");
                    return Ok(answer);
                }
                Directive::Act { tool, input } => (tool, input),
            };

            let observation = match self.registry.resolve(&tool) {
                Ok(descriptor) => {
                    debug!(step, %tool, %input, "invoking capability");
                    protocol::observation(&tool, &descriptor.invoke(&input).await)
                }
                Err(e) => {
                    debug!(step, "{e}");
                    protocol::unknown_tool(&tool, &names)
                }
            };

            let act = if response.content.trim().is_empty() {
                format!("Action: {tool}\nAction Input: {input}")
            } else {
                response.content
            };
            scratchpad.push(Message::new(Role::Assistant, act));
            scratchpad.push(Message::new(Role::Tool, observation));
        }

        Err(ReasoningError::StepBudgetExhausted {
            steps: self.max_steps,
        })
    }

    /// System prompt followed by the full history, current utterance last.
    fn context(&self) -> Vec<Message> {
        let mut msgs = Vec::with_capacity(self.session.len() + 1);
        msgs.push(Message::new(Role::System, self.system_prompt.clone()));
        msgs.extend(self.session.turns().iter().cloned());
        msgs
    }

    pub fn session(&self) -> &ConversationSession {
        &self.session
    }

    /// Start a fresh conversation with the same engine and capabilities.
    pub fn reset_session(&mut self) {
        self.session = ConversationSession::new();
        self.tracker.reset();
    }

    pub fn tracker(&self) -> &TokenTracker {
        &self.tracker
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use wayfinder_ai::{AiResponse, TokenUsage, ToolCall};
    use wayfinder_travel::testing::ScriptedTransport;
    use wayfinder_travel::{
        Capability, PlacesCapability, PlacesSettings, Resolver, UpstreamError, WeatherCapability,
    };

    use crate::registry::CapabilityDescriptor;

    const NOMINATIM: &str = "https://nominatim.test/search";
    const METEO: &str = "https://meteo.test/v1/forecast";
    const OVERPASS: &str = "https://overpass.test/api/interpreter";

    /// Engine that replays scripted replies, then repeats `fallback`.
    struct ScriptedEngine {
        replies: Mutex<VecDeque<Result<AiResponse, AiError>>>,
        fallback: String,
        seen: Mutex<Vec<Vec<Message>>>,
    }

    impl ScriptedEngine {
        fn new(replies: Vec<Result<AiResponse, AiError>>, fallback: &str) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                fallback: fallback.to_string(),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> usize {
            self.seen.lock().unwrap().len()
        }

        fn last_context(&self) -> Vec<Message> {
            self.seen.lock().unwrap().last().cloned().unwrap_or_default()
        }
    }

    #[async_trait]
    impl AiClient for ScriptedEngine {
        async fn send_message(
            &self,
            messages: &[Message],
            _tools: &[ToolDefinition],
        ) -> Result<AiResponse, AiError> {
            self.seen.lock().unwrap().push(messages.to_vec());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(text(&self.fallback)))
        }

        fn provider(&self) -> &str {
            "scripted"
        }
    }

    fn text(content: &str) -> AiResponse {
        AiResponse {
            content: content.to_string(),
            tool_calls: Vec::new(),
            usage: TokenUsage {
                input_tokens: 10,
                output_tokens: 2,
            },
        }
    }

    fn act(tool: &str, input: &str) -> Result<AiResponse, AiError> {
        Ok(text(&format!(
            "Thought: I need a tool\nAction: {tool}\nAction Input: {input}"
        )))
    }

    fn finish(answer: &str) -> Result<AiResponse, AiError> {
        Ok(text(&format!("Final Answer: {answer}")))
    }

    fn registry(transport: &Arc<ScriptedTransport>) -> Arc<CapabilityRegistry> {
        let resolver = Arc::new(Resolver::new(transport.clone(), NOMINATIM));
        let hourly: Vec<u32> = (0..24).map(|h| if h == 10 { 40 } else { 0 }).collect();
        transport.respond(
            METEO,
            serde_json::json!({
                "current": { "temperature_2m": 18 },
                "hourly": { "precipitation_probability": hourly }
            }),
        );

        let weather = WeatherCapability::new(resolver.clone(), transport.clone(), METEO)
            .with_hour_source(Arc::new(|| 10));
        let places = PlacesCapability::new(
            resolver,
            transport.clone(),
            OVERPASS,
            PlacesSettings::default(),
        );

        let mut registry = CapabilityRegistry::new();
        registry
            .register(CapabilityDescriptor::from(Capability::from(weather)))
            .unwrap();
        registry
            .register(CapabilityDescriptor::from(Capability::from(places)))
            .unwrap();
        Arc::new(registry)
    }

    fn paris_transport() -> Arc<ScriptedTransport> {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond(NOMINATIM, serde_json::json!([{ "lat": "48.85", "lon": "2.35" }]));
        transport
    }

    #[tokio::test]
    async fn final_answer_without_tools() {
        let transport = paris_transport();
        let engine = Arc::new(ScriptedEngine::new(vec![finish("Hello, traveller!")], ""));
        let mut orchestrator = Orchestrator::new(engine.clone(), registry(&transport));

        let reply = orchestrator.handle("hi").await;

        assert_eq!(reply, "Hello, traveller!");
        assert_eq!(engine.calls(), 1);
        assert!(transport.calls().is_empty());
        let turns = orchestrator.session().turns();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0], Message::new(Role::User, "hi"));
        assert_eq!(turns[1], Message::new(Role::Assistant, "Hello, traveller!"));
    }

    #[tokio::test]
    async fn weather_observation_reaches_engine() {
        let transport = paris_transport();
        let engine = Arc::new(ScriptedEngine::new(
            vec![act("WeatherAgent", "Paris"), finish("18°C and 40% rain in Paris.")],
            "",
        ));
        let mut orchestrator = Orchestrator::new(engine.clone(), registry(&transport));

        let reply = orchestrator.handle("Weather in Paris?").await;

        assert_eq!(reply, "18°C and 40% rain in Paris.");
        let context = engine.last_context();
        let observation = context.last().unwrap();
        assert_eq!(observation.role, Role::Tool);
        assert!(observation.content.contains("In Paris it's currently 18°C"));
        assert!(observation.content.contains("40%"));
        assert_eq!(orchestrator.tracker().call_count(), 2);
    }

    #[tokio::test]
    async fn native_tool_calls_are_executed() {
        let transport = paris_transport();
        transport.respond(
            OVERPASS,
            serde_json::json!({ "elements": [{ "tags": { "name": "Louvre" } }] }),
        );
        let tool_call = AiResponse {
            content: String::new(),
            tool_calls: vec![ToolCall {
                id: "call_1".into(),
                name: "PlacesAgent".into(),
                arguments: serde_json::json!({ "input": "Paris" }),
            }],
            usage: TokenUsage::default(),
        };
        let engine = Arc::new(ScriptedEngine::new(
            vec![Ok(tool_call), finish("Visit the Louvre.")],
            "",
        ));
        let mut orchestrator = Orchestrator::new(engine.clone(), registry(&transport));

        orchestrator.handle("What to see in Paris?").await;

        let context = engine.last_context();
        let n = context.len();
        assert_eq!(
            context[n - 2].content,
            "Action: PlacesAgent\nAction Input: Paris"
        );
        assert!(context[n - 1].content.contains("* Louvre"));
    }

    #[tokio::test]
    async fn always_unparseable_ends_in_apology() {
        let transport = paris_transport();
        let engine = Arc::new(ScriptedEngine::new(
            Vec::new(),
            "Paris is lovely, I think it might rain?",
        ));
        let mut orchestrator =
            Orchestrator::new(engine.clone(), registry(&transport)).with_max_steps(4);

        let reply = orchestrator.handle("Weather in Paris?").await;

        assert!(!reply.is_empty());
        assert_eq!(reply, APOLOGY);
        assert_eq!(engine.calls(), 4);
        assert!(transport.calls().is_empty());
        assert_eq!(orchestrator.session().len(), 2);
    }

    #[tokio::test]
    async fn endless_actions_exhaust_budget() {
        let transport = paris_transport();
        let engine = Arc::new(ScriptedEngine::new(
            Vec::new(),
            "Thought: check again\nAction: WeatherAgent\nAction Input: Paris",
        ));
        let mut orchestrator =
            Orchestrator::new(engine.clone(), registry(&transport)).with_max_steps(3);

        let reply = orchestrator.handle("Weather in Paris?").await;

        assert_eq!(reply, APOLOGY);
        assert_eq!(engine.calls(), 3);
        assert_eq!(transport.calls_to(METEO), 3);
        assert_eq!(orchestrator.session().len(), 2);
    }

    #[tokio::test]
    async fn unknown_tool_is_corrected_and_loop_continues() {
        let transport = paris_transport();
        let engine = Arc::new(ScriptedEngine::new(
            vec![act("TaxiAgent", "Paris"), finish("I can only help with weather and sights.")],
            "",
        ));
        let mut orchestrator = Orchestrator::new(engine.clone(), registry(&transport));

        let reply = orchestrator.handle("Book me a taxi in Paris").await;

        assert_eq!(reply, "I can only help with weather and sights.");
        let context = engine.last_context();
        let correction = &context.last().unwrap().content;
        assert!(correction.contains("TaxiAgent is not a valid tool"));
        assert!(correction.contains("[WeatherAgent, PlacesAgent]"));
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn engine_failure_becomes_reply_and_session_survives() {
        let transport = paris_transport();
        let engine = Arc::new(ScriptedEngine::new(
            vec![Err(AiError::RateLimited), finish("Back again.")],
            "",
        ));
        let mut orchestrator = Orchestrator::new(engine.clone(), registry(&transport));

        let first = orchestrator.handle("hello?").await;
        assert!(first.starts_with("An error occurred while processing your request"));
        assert!(first.contains("Rate limited"));

        let second = orchestrator.handle("hello again").await;
        assert_eq!(second, "Back again.");
        assert_eq!(orchestrator.session().len(), 4);
        assert_eq!(orchestrator.session().last_reply(), Some("Back again."));
    }

    #[tokio::test]
    async fn places_failure_does_not_affect_later_weather() {
        let transport = paris_transport();
        transport.fail(
            OVERPASS,
            UpstreamError::Transport {
                url: OVERPASS.into(),
                message: "connection reset".into(),
            },
        );
        let engine = Arc::new(ScriptedEngine::new(
            vec![
                act("PlacesAgent", "Paris"),
                finish("Sorry, I couldn't load attractions."),
                act("WeatherAgent", "Paris"),
                finish("It's 18°C."),
            ],
            "",
        ));
        let mut orchestrator = Orchestrator::new(engine.clone(), registry(&transport));

        orchestrator.handle("What to see in Paris?").await;
        let failed = engine.last_context();
        assert!(failed
            .last()
            .unwrap()
            .content
            .contains("Error fetching places:"));

        let reply = orchestrator.handle("And the weather?").await;
        assert_eq!(reply, "It's 18°C.");
        let context = engine.last_context();
        assert!(context
            .last()
            .unwrap()
            .content
            .contains("In Paris it's currently 18°C with a chance of 40% to rain."));
        // history carries both completed turns into the second request
        assert_eq!(
            context
                .iter()
                .filter(|m| m.role == Role::User)
                .count(),
            2
        );
    }

    #[tokio::test]
    async fn unknown_place_reported_without_forecast_call() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond(NOMINATIM, serde_json::json!([]));
        let engine = Arc::new(ScriptedEngine::new(
            vec![act("WeatherAgent", "Xyzzyville"), finish("I couldn't find Xyzzyville.")],
            "",
        ));
        let mut orchestrator = Orchestrator::new(engine.clone(), registry(&transport));

        orchestrator.handle("Weather in Xyzzyville?").await;

        let observation = engine.last_context().last().unwrap().content.clone();
        assert!(observation.contains("I don't know if Xyzzyville exists"));
        assert_eq!(transport.calls_to(METEO), 0);
    }

    #[tokio::test]
    async fn reset_session_starts_fresh_history() {
        let transport = paris_transport();
        let engine = Arc::new(ScriptedEngine::new(Vec::new(), "Final Answer: ok"));
        let mut orchestrator = Orchestrator::new(engine, registry(&transport));

        orchestrator.handle("one").await;
        let first_id = orchestrator.session().id().clone();
        orchestrator.reset_session();

        assert!(orchestrator.session().is_empty());
        assert_ne!(orchestrator.session().id(), &first_id);
        assert_eq!(orchestrator.tracker().call_count(), 0);
    }
}
