//! Plain-text renderer for terminals and logs.

use std::io::{self, Write};
use std::sync::Mutex;

use serde_json::Value;

use crate::auth::AuthError;

use super::{exchange_response_panel, Panel, Step, StepContext, StepView, ViewRenderer};

/// Writes each step as plain text to `W`.
///
/// Write failures are logged and otherwise ignored.
pub struct TerminalRenderer<W: Write + Send> {
    out: Mutex<W>,
}

impl TerminalRenderer<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    /// Consume the renderer and return the writer.
    pub fn into_inner(self) -> W {
        match self.out.into_inner() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn emit(&self, text: &str) {
        let mut out = match self.out.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Err(e) = out.write_all(text.as_bytes()).and_then(|_| out.flush()) {
            tracing::warn!(error = %e, "failed to write walkthrough output");
        }
    }
}

impl<W: Write + Send> ViewRenderer for TerminalRenderer<W> {
    fn render_step(&self, step: Step, context: &StepContext<'_>) {
        self.emit(&format_step(&StepView::build(step, context)));
    }

    fn render_intermediate_exchange_response(&self, response: &Value) {
        let panel = exchange_response_panel(response, &chrono::Local::now());
        self.emit(&format_panel(&panel));
    }

    fn render_error(&self, step: Step, error: &AuthError) {
        self.emit(&format!("\n!! {} failed: {error}\n", step.title()));
    }
}

/// Plain-text layout of a step.
pub fn format_step(view: &StepView) -> String {
    let step = view.step;
    let mut text = format!(
        "\n== Step {}/{}: {} ==\n{}\n",
        step.index() + 1,
        Step::count(),
        step.title(),
        step.description()
    );
    if let Some(activation) = &view.activation {
        text.push_str(&format!(
            "\n  Visit       {} ({})\n  Enter code  {}\n  Or scan     {}\n",
            activation.link_text, activation.link_href, activation.user_code, activation.qr_payload
        ));
    }
    for panel in [&view.request, &view.response].into_iter().flatten() {
        if !panel.title.is_empty() || !panel.body.is_empty() {
            text.push_str(&format_panel(panel));
        }
    }
    if let Some(token_set) = &view.token_set {
        text.push_str(&format_panel(&Panel::new("Token Set", token_set.as_str())));
    }
    text
}

fn format_panel(panel: &Panel) -> String {
    format!("\n-- {} --\n{}\n", panel.title, panel.body)
}
