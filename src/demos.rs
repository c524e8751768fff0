//! The four demos: fixed profiles wired onto the shared runtime

use crate::cli::Command;
use crate::console::{ConsoleObserver, ConsoleStyle};
use crate::gateway::{ModelGateway, ResponseMode};
use crate::llm::{LlmService, ReasoningEffort, SamplingParams, TokenLimitField};
use crate::runtime::{AgentRuntime, RuntimeError};
use crate::state_machine::ConvContext;
use crate::tools::ToolRegistry;
use crate::transcript::{TranscriptObserver, DEFAULT_LOG_PATH};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};

pub const POST_SYSTEM_PROMPT: &str = "You are a professional LinkedIn post generator. Create an engaging post in 2 lines for the given topic.";
pub const REACT_SYSTEM_PROMPT: &str =
    "You are my AI assistant, please answer my query and use tools when needed.";

const LOG_PATH_VAR: &str = "CHAT_AGENTS_LOG_PATH";

fn chat_sampling() -> SamplingParams {
    SamplingParams {
        temperature: 1.0,
        top_p: Some(1.0),
        max_tokens: 8192,
        token_limit_field: TokenLimitField::MaxCompletionTokens,
        reasoning_effort: Some(ReasoningEffort::Medium),
    }
}

fn post_sampling() -> SamplingParams {
    SamplingParams {
        temperature: 0.9,
        top_p: Some(1.0),
        max_tokens: 512,
        token_limit_field: TokenLimitField::MaxTokens,
        reasoning_effort: None,
    }
}

fn react_sampling() -> SamplingParams {
    SamplingParams {
        temperature: 1.0,
        top_p: None,
        max_tokens: 2048,
        token_limit_field: TokenLimitField::MaxCompletionTokens,
        reasoning_effort: None,
    }
}

fn react_system_prompt(tools: &ToolRegistry) -> String {
    format!("{REACT_SYSTEM_PROMPT}\n\n{}", tools.render_instructions())
}

/// Run the selected demo against `service`
pub async fn run(command: Command, service: Arc<dyn LlmService>) -> Result<(), RuntimeError> {
    let session_id = uuid::Uuid::new_v4().to_string();
    let context = ConvContext::new(session_id.clone(), service.model_id());
    tracing::info!(session_id = %session_id, model = service.model_id(), "Starting session");

    let mut input = BufReader::new(tokio::io::stdin()).lines();

    match command {
        Command::Chat => {
            let gateway = ModelGateway::new(service, chat_sampling())
                .with_mode(ResponseMode::Streaming);
            let mut runtime = AgentRuntime::new(
                context.with_history(false),
                &gateway,
                ToolRegistry::empty(),
            )
            .with_observer(ConsoleObserver::stdout(ConsoleStyle::Chat));
            chat_loop(&mut runtime, &mut input).await
        }

        Command::Memo { log_path } => {
            let path = log_path
                .or_else(|| std::env::var_os(LOG_PATH_VAR).map(PathBuf::from))
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_PATH));
            let gateway = ModelGateway::new(service, chat_sampling())
                .with_mode(ResponseMode::Streaming);
            let mut runtime = AgentRuntime::new(context, &gateway, ToolRegistry::empty())
                .with_observer(ConsoleObserver::stdout(ConsoleStyle::Chat))
                .with_observer(TranscriptObserver::new(path));
            chat_loop(&mut runtime, &mut input).await
        }

        Command::Post { topic } => {
            let topic = match topic {
                Some(topic) => topic,
                None => prompt_line(&mut input, "Enter Topic: ")
                    .await?
                    .unwrap_or_default(),
            };
            let gateway = ModelGateway::new(service, post_sampling())
                .with_system_prompt(POST_SYSTEM_PROMPT)
                .with_mode(ResponseMode::Streaming);
            let mut runtime = AgentRuntime::new(context, &gateway, ToolRegistry::empty())
                .with_observer(ConsoleObserver::stdout(ConsoleStyle::Post));
            runtime.submit(topic).await?;
            runtime.shutdown().await
        }

        Command::React {
            input: request,
            max_tool_rounds,
        } => {
            let tools = ToolRegistry::arithmetic();
            let gateway = ModelGateway::new(service, react_sampling())
                .with_system_prompt(react_system_prompt(&tools));
            let context = context
                .with_tools(true)
                .with_max_tool_rounds(max_tool_rounds);
            let mut runtime = AgentRuntime::new(context, &gateway, tools)
                .with_observer(ConsoleObserver::stdout(ConsoleStyle::Steps));
            runtime.submit(request).await?;
            runtime.shutdown().await
        }
    }
}

/// Prompt until `exit` or end of input, then shut the session down.
///
/// A failed turn is logged and the loop continues; the next input starts a
/// fresh turn.
async fn chat_loop<R>(
    runtime: &mut AgentRuntime<'_>,
    input: &mut Lines<R>,
) -> Result<(), RuntimeError>
where
    R: AsyncBufRead + Unpin,
{
    while let Some(line) = prompt_line(input, "Enter: ").await? {
        if is_exit(&line) {
            break;
        }
        if line.trim().is_empty() {
            continue;
        }
        if let Err(e) = runtime.submit(line).await {
            tracing::warn!(error = %e, "Turn failed, waiting for next input");
        }
    }
    runtime.shutdown().await
}

/// Only the bare word ends the session, in any letter case
fn is_exit(line: &str) -> bool {
    line.eq_ignore_ascii_case("exit")
}

/// Print `prompt` and read one line; `None` at end of input
async fn prompt_line<R>(input: &mut Lines<R>, prompt: &str) -> std::io::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    let mut stdout = std::io::stdout();
    stdout.write_all(prompt.as_bytes())?;
    stdout.flush()?;
    input.next_line().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::testing::{MockLlmService, ObserverLog, RecordingObserver};

    fn lines(text: &'static str) -> Lines<BufReader<&'static [u8]>> {
        BufReader::new(text.as_bytes()).lines()
    }

    #[test]
    fn test_exit_is_case_insensitive() {
        assert!(is_exit("exit"));
        assert!(is_exit("EXIT"));
        assert!(is_exit("Exit"));
        assert!(!is_exit(" exit "));
        assert!(!is_exit("exit now"));
        assert!(!is_exit(""));
    }

    #[test]
    fn test_react_prompt_lists_tools() {
        let prompt = react_system_prompt(&ToolRegistry::arithmetic());
        assert!(prompt.starts_with(REACT_SYSTEM_PROMPT));
        for name in ["add(a, b)", "subtract(a, b)", "multiply(a, b)"] {
            assert!(prompt.contains(name), "missing {name}");
        }
    }

    #[test]
    fn test_profiles() {
        assert_eq!(chat_sampling().max_tokens, 8192);
        assert_eq!(chat_sampling().reasoning_effort, Some(ReasoningEffort::Medium));
        assert_eq!(post_sampling().token_limit_field, TokenLimitField::MaxTokens);
        assert_eq!(react_sampling().max_tokens, 2048);
    }

    #[tokio::test]
    async fn test_chat_loop_stops_on_exit() {
        let mock = Arc::new(MockLlmService::new("test-model"));
        mock.queue_fragments(&["Hi!"]);
        let gateway =
            ModelGateway::new(mock.clone(), chat_sampling()).with_mode(ResponseMode::Streaming);
        let log = ObserverLog::default();
        let mut runtime = AgentRuntime::new(
            ConvContext::new("s", "test-model"),
            &gateway,
            ToolRegistry::empty(),
        )
        .with_observer(RecordingObserver::new(log.clone()));

        let mut input = lines("hello\n\nExit\nnever sent\n");
        chat_loop(&mut runtime, &mut input).await.unwrap();

        assert_eq!(mock.recorded_requests().len(), 1);
        assert_eq!(log.session_end_turns(), Some(2));
    }

    #[tokio::test]
    async fn test_chat_loop_survives_failed_turn_and_eof() {
        let mock = Arc::new(MockLlmService::new("test-model"));
        mock.queue_error(crate::llm::LlmError::server_error("Service unavailable"));
        mock.queue_fragments(&["ok"]);
        let gateway =
            ModelGateway::new(mock.clone(), chat_sampling()).with_mode(ResponseMode::Streaming);
        let mut runtime = AgentRuntime::new(
            ConvContext::new("s", "test-model").with_history(false),
            &gateway,
            ToolRegistry::empty(),
        );

        let mut input = lines("one\ntwo");
        chat_loop(&mut runtime, &mut input).await.unwrap();

        assert_eq!(mock.recorded_requests().len(), 2);
        assert_eq!(runtime.conversation().len(), 2);
    }

    #[tokio::test]
    async fn test_chat_loop_sends_input_as_typed() {
        let mock = Arc::new(MockLlmService::new("test-model"));
        mock.queue_fragments(&["sure"]);
        let gateway =
            ModelGateway::new(mock.clone(), chat_sampling()).with_mode(ResponseMode::Streaming);
        let mut runtime = AgentRuntime::new(
            ConvContext::new("s", "test-model"),
            &gateway,
            ToolRegistry::empty(),
        );

        let mut input = lines("  tell me a joke  \n exit \nexit\n");
        chat_loop(&mut runtime, &mut input).await.unwrap();

        let requests = mock.recorded_requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].messages[0].content, "  tell me a joke  ");
        assert_eq!(requests[1].messages.last().unwrap().content, " exit ");
    }
}
