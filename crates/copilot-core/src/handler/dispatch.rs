//! Dispatch of a multi-part answer into render and log effects.

use tracing::{debug, info};

use copilot_types::chat::{Message, ProgramContent};
use copilot_types::host::{CREATE_PROJECT_COMMAND, CommandButton};

/// Legacy project template served when a program arrives without its own.
pub const FALLBACK_TEMPLATE_URL: &str =
    "https://www.pulumi.com/ai/api/project/859bfc82-d039-4b24-ac02-751e3b4e22f6.zip";

/// Rendering surface supplied by the host for one turn.
pub trait ResponseStream {
    /// Append prose.
    fn markdown(&mut self, value: &str);

    /// Show a transient progress line.
    fn progress(&mut self, value: &str);

    /// Offer an actionable button.
    fn button(&mut self, button: CommandButton);
}

/// Counts of what one dispatch pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    /// Messages that reached the stream.
    pub rendered: usize,
    /// `trace` messages sent to the log.
    pub traced: usize,
    /// User-authored or unknown messages dropped.
    pub ignored: usize,
}

/// Template URL for a program: its own if present, the fallback otherwise.
pub fn template_url(program: &ProgramContent) -> &str {
    program
        .template_url
        .as_deref()
        .filter(|url| !url.is_empty())
        .unwrap_or(FALLBACK_TEMPLATE_URL)
}

/// The "Create Project" affordance for `program`.
pub fn create_project_button(program: &ProgramContent) -> CommandButton {
    CommandButton {
        command: CREATE_PROJECT_COMMAND.to_string(),
        title: "Create Project".to_string(),
        arguments: vec![template_url(program).to_string()],
    }
}

/// Route each assistant-authored message, in order, to `stream` or the log.
pub fn dispatch_messages<S: ResponseStream + ?Sized>(
    messages: &[Message],
    stream: &mut S,
) -> DispatchSummary {
    let mut summary = DispatchSummary::default();

    for message in messages {
        if !message.is_assistant() {
            summary.ignored += 1;
            continue;
        }
        match message {
            Message::Response { content, .. } => {
                stream.markdown(content);
                summary.rendered += 1;
            }
            Message::Status { content, .. } => {
                stream.progress(content);
                summary.rendered += 1;
            }
            Message::Trace { content, .. } => {
                info!(target: "copilot::trace", content = %content, "copilot trace message");
                summary.traced += 1;
            }
            Message::Program { content, .. } => {
                stream.markdown(&content.fenced());
                stream.button(create_project_button(content));
                summary.rendered += 1;
            }
            Message::Unknown => summary.ignored += 1,
        }
    }

    debug!(
        rendered = summary.rendered,
        traced = summary.traced,
        ignored = summary.ignored,
        "dispatched response messages"
    );
    summary
}
