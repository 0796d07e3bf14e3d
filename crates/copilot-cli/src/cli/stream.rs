//! Response streams for the terminal and for `--json` output.

use serde::Serialize;

use copilot_core::handler::dispatch::ResponseStream;
use copilot_types::host::CommandButton;

use super::activity::Activity;
use super::chat::renderer::ChatRenderer;

/// Prints each answer part as it is dispatched. Status lines replace the
/// spinner text instead of being printed.
pub struct TerminalStream<'a> {
    renderer: &'a ChatRenderer,
    activity: &'a Activity,
}

impl<'a> TerminalStream<'a> {
    pub fn new(renderer: &'a ChatRenderer, activity: &'a Activity) -> Self {
        Self { renderer, activity }
    }
}

impl ResponseStream for TerminalStream<'_> {
    fn markdown(&mut self, value: &str) {
        self.activity.stop();
        println!();
        print!("{}", self.renderer.render_markdown(value));
        println!();
    }

    fn progress(&mut self, value: &str) {
        self.activity.set_message(value);
    }

    fn button(&mut self, button: CommandButton) {
        self.activity.stop();
        println!("{}", self.renderer.render_button(&button));
    }
}

/// One rendered effect, as emitted by `--json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StreamEffect {
    Markdown { value: String },
    Progress { value: String },
    Button(CommandButton),
}

/// Collects effects for machine-readable output.
#[derive(Debug, Default)]
pub struct CollectingStream {
    pub effects: Vec<StreamEffect>,
}

impl ResponseStream for CollectingStream {
    fn markdown(&mut self, value: &str) {
        self.effects.push(StreamEffect::Markdown {
            value: value.to_string(),
        });
    }

    fn progress(&mut self, value: &str) {
        self.effects.push(StreamEffect::Progress {
            value: value.to_string(),
        });
    }

    fn button(&mut self, button: CommandButton) {
        self.effects.push(StreamEffect::Button(button));
    }
}
