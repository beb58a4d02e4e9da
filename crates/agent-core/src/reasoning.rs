//! Reasoning Loop
//!
//! Implements the ReAct (Reason + Act) pattern over a plain-text protocol.
//! Each step asks the model to either pick a tool with an argument or give a
//! final answer; tool observations are appended to the scratchpad and the
//! model is asked again, up to a fixed step cap.
//!
//! ```text
//!            ┌──────────┐  action  ┌────────────────┐
//!  start ──▶ │ Thinking │ ───────▶ │ ToolInvocation │
//!            └──────────┘          └────────────────┘
//!             │  ▲     │ rejected          │
//!      final  │  │     ▼                   ▼
//!             │  └── Observing ◀───────────┘
//!             ▼
//!           Final          Aborted (step cap reached)
//! ```

use std::sync::Arc;

use tracing::Instrument;
use uuid::Uuid;

use crate::error::{AgentError, Result};
use crate::message::Message;
use crate::provider::{DEFAULT_DECISION_MODEL, GenerationOptions, LlmProvider};
use crate::step::{AgentAction, AgentStep, parse_step};
use crate::tool::{Tool, ToolRegistry};
use crate::trace::{ExecutionTrace, StepRecord};

/// Maximum number of model decisions per request
pub const DEFAULT_MAX_ITERATIONS: usize = 5;

/// Stop sequence that keeps the model from inventing observations
pub const OBSERVATION_STOP: &str = "\nObservation";

/// Generic ReAct prompt. Slots: `{tools}`, `{tool_names}`, `{input}`,
/// `{agent_scratchpad}`.
pub const DEFAULT_REACT_PROMPT: &str = r"You are a helpful assistant. You have access to the following tools:

{tools}

To use a tool, you MUST use the following format:

Thought: Do I need to use a tool? Yes
Action: the action to take, should be one of [{tool_names}]
Action Input: the input to the action
Observation: the result of the action

When you have a response for the user, or if you do not need a tool, you MUST use this format:

Thought: Do I need to use a tool? No
Final Answer: [your response here]

Begin!

Question: {input}
Thought: {agent_scratchpad}";

/// Agent configuration
#[derive(Clone, Debug)]
pub struct AgentConfig {
    /// ReAct prompt template
    pub prompt_template: String,

    /// Maximum reasoning steps before giving up
    pub max_iterations: usize,

    /// Generation options for the decision model
    pub generation: GenerationOptions,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            prompt_template: DEFAULT_REACT_PROMPT.into(),
            max_iterations: DEFAULT_MAX_ITERATIONS,
            generation: GenerationOptions::for_model(DEFAULT_DECISION_MODEL)
                .with_temperature(0.1)
                .with_stop(OBSERVATION_STOP),
        }
    }
}

/// Why a run ended without a final answer
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AbortReason {
    /// The step cap was reached
    StepCapReached(usize),
}

impl std::fmt::Display for AbortReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StepCapReached(cap) => {
                write!(f, "step cap of {cap} reached without a final answer")
            }
        }
    }
}

/// Terminal state of a run
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Terminal {
    Final(String),
    Aborted(AbortReason),
}

/// Everything a finished run produced
#[derive(Clone, Debug)]
pub struct AgentRun {
    pub run_id: Uuid,
    pub terminal: Terminal,
    pub trace: ExecutionTrace,
    /// Model decisions made (never exceeds the configured cap)
    pub steps: usize,
}

enum LoopState {
    Thinking,
    ToolInvocation {
        tool: Arc<dyn Tool>,
        action: AgentAction,
    },
    Observing {
        step: StepRecord,
        observation: String,
        relay: bool,
    },
    Final(String),
    Aborted(AbortReason),
}

/// The decision loop: a model client plus a fixed tool set
pub struct Agent {
    provider: Arc<dyn LlmProvider>,
    tools: Arc<ToolRegistry>,
    config: AgentConfig,
}

impl Agent {
    /// Create a new agent
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        tools: Arc<ToolRegistry>,
        config: AgentConfig,
    ) -> Self {
        Self {
            provider,
            tools,
            config,
        }
    }

    /// Run the decision loop for one user message
    ///
    /// Parse failures and unknown tool names are recovered by re-prompting.
    /// Reaching the step cap is a normal `Aborted` outcome.
    ///
    /// # Errors
    ///
    /// Fails if the decision model or an invoked tool fails.
    pub async fn run(&self, input: &str) -> Result<AgentRun> {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("agent_run", %run_id);

        async move {
            let mut trace = ExecutionTrace::new();
            let mut steps = 0;
            let mut state = LoopState::Thinking;

            loop {
                state = match state {
                    LoopState::Thinking => {
                        let cap = self.config.max_iterations;
                        if steps >= cap {
                            LoopState::Aborted(AbortReason::StepCapReached(cap))
                        } else {
                            steps += 1;
                            let output = self.think(input, &trace, steps).await?;
                            self.decide(output)
                        }
                    }
                    LoopState::ToolInvocation { tool, action } => {
                        tracing::info!(tool = %action.tool, input = %action.input, "Invoking tool");
                        let observation = tool.call(&action.input).await.inspect_err(|e| {
                            tracing::error!(tool = %action.tool, error = %e, "Tool failed");
                        })?;
                        LoopState::Observing {
                            step: StepRecord::ToolInvocation(action),
                            observation,
                            relay: tool.descriptor().relay_observation,
                        }
                    }
                    LoopState::Observing { step, observation, relay } => {
                        tracing::debug!(%observation, relay, "Observation");
                        if relay {
                            trace.push_relayed(step, observation);
                        } else {
                            trace.push(step, observation);
                        }
                        LoopState::Thinking
                    }
                    LoopState::Final(answer) => {
                        let tools = trace.tool_invocations();
                        tracing::info!(steps, tools, "Final answer reached");
                        return Ok(AgentRun {
                            run_id,
                            terminal: Terminal::Final(answer),
                            trace,
                            steps,
                        });
                    }
                    LoopState::Aborted(reason) => {
                        tracing::warn!(steps, %reason, "Agent aborted");
                        return Ok(AgentRun {
                            run_id,
                            terminal: Terminal::Aborted(reason),
                            trace,
                            steps,
                        });
                    }
                };
            }
        }
        .instrument(span)
        .await
    }

    /// Ask the model for the next step
    async fn think(&self, input: &str, trace: &ExecutionTrace, step: usize) -> Result<String> {
        let prompt = render_prompt(
            &self.config.prompt_template,
            &[
                ("tools", &self.tools.render_descriptions()),
                ("tool_names", &self.tools.render_names()),
                ("input", input),
                ("agent_scratchpad", &trace.scratchpad()),
            ],
        );
        let messages = [Message::user(prompt)];
        let prompt_tokens = messages[0].estimate_tokens();
        tracing::debug!(step, prompt_tokens, "Prompting decision model");

        let completion = self
            .provider
            .complete(&messages, &self.config.generation)
            .await?;

        tracing::info!(step, output = %completion.content, "Model step");
        Ok(completion.content)
    }

    /// Map raw model output to the next loop state
    fn decide(&self, output: String) -> LoopState {
        match parse_step(&output) {
            Ok(AgentStep::Finish(finish)) => LoopState::Final(finish.answer),
            Ok(AgentStep::Action(action)) => match self.tools.get(&action.tool) {
                Some(tool) => LoopState::ToolInvocation { tool, action },
                None => {
                    tracing::warn!(tool = %action.tool, "Model named an unknown tool");
                    LoopState::Observing {
                        observation: format!(
                            "{} is not a valid tool, try one of [{}].",
                            action.tool,
                            self.tools.render_names()
                        ),
                        step: StepRecord::Rejected {
                            reason: AgentError::ToolNotFound(action.tool).to_string(),
                            log: action.log,
                        },
                        relay: false,
                    }
                }
            },
            Err(err) => {
                tracing::warn!(error = %err, "Could not parse model output");
                LoopState::Observing {
                    observation: err.observation(),
                    step: StepRecord::Rejected {
                        reason: AgentError::from(err).to_string(),
                        log: output,
                    },
                    relay: false,
                }
            }
        }
    }

    /// Get the tool registry
    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Get the decision model provider
    pub fn provider(&self) -> &dyn LlmProvider {
        self.provider.as_ref()
    }

    /// Get configuration
    pub const fn config(&self) -> &AgentConfig {
        &self.config
    }
}

/// Substitute `{name}` slots in one pass so user text is never re-expanded
fn render_prompt(template: &str, slots: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let value = after.find('}').and_then(|close| {
            let key = &after[..close];
            slots
                .iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| (*value, close))
        });

        if let Some((value, close)) = value {
            out.push_str(value);
            rest = &after[close + 1..];
        } else {
            out.push('{');
            rest = after;
        }
    }

    out.push_str(rest);
    out
}

/// Builder for Agent configuration
pub struct AgentBuilder {
    provider: Option<Arc<dyn LlmProvider>>,
    tools: ToolRegistry,
    config: AgentConfig,
}

impl Default for AgentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AgentBuilder {
    pub fn new() -> Self {
        Self {
            provider: None,
            tools: ToolRegistry::new(),
            config: AgentConfig::default(),
        }
    }

    pub fn provider(mut self, provider: Arc<dyn LlmProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn tool<T: Tool + 'static>(mut self, tool: T) -> Self {
        self.tools.register(tool);
        self
    }

    pub fn tools(mut self, tools: ToolRegistry) -> Self {
        self.tools = tools;
        self
    }

    pub fn prompt_template(mut self, template: impl Into<String>) -> Self {
        self.config.prompt_template = template.into();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.generation.model = model.into();
        self
    }

    pub const fn temperature(mut self, temp: f32) -> Self {
        self.config.generation.temperature = temp;
        self
    }

    pub const fn max_iterations(mut self, max: usize) -> Self {
        self.config.max_iterations = max;
        self
    }

    /// # Errors
    ///
    /// Fails when no provider was set or the step cap is zero.
    pub fn build(self) -> Result<Agent> {
        let provider = self.provider
            .ok_or_else(|| AgentError::Config("Provider is required".into()))?;

        if self.config.max_iterations == 0 {
            return Err(AgentError::Config("max_iterations must be at least 1".into()));
        }

        Ok(Agent::new(provider, Arc::new(self.tools), self.config))
    }
}
