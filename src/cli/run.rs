//! Handlers for `devflow run` and `devflow preview`.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio_util::sync::CancellationToken;

use crate::auth::{AuthError, TokenSet, UserInfo};
use crate::error::DevflowError;
use crate::view::{sample_authorization, Step, StepContext, TerminalRenderer, ViewRenderer};
use crate::walkthrough::{Completion, Confirmation, Walkthrough};

use super::{PreviewArgs, RunArgs};

/// Handle `devflow run`.
pub async fn handle_run(args: RunArgs) -> Result<(), DevflowError> {
    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received, stopping");
            on_signal.cancel();
        }
    });

    let done = run_session(&args, Arc::new(TerminalRenderer::stdout()), &cancel).await?;
    if let Some(sub) = done.user_info.subject() {
        println!("\nDevice activated for {sub}");
    }
    Ok(())
}

/// Build the session `args` describe and run it to completion.
async fn run_session(
    args: &RunArgs,
    renderer: Arc<dyn ViewRenderer>,
    cancel: &CancellationToken,
) -> Result<Completion, DevflowError> {
    let mut walkthrough = Walkthrough::new(args.config.to_config(), renderer)?;
    if let Some(secs) = args.timeout {
        walkthrough = walkthrough.with_deadline(Duration::from_secs(secs));
    }
    if !args.yes {
        walkthrough = walkthrough.with_confirmation(Arc::new(EnterPrompt));
    }
    Ok(walkthrough.run(cancel).await?)
}

/// Waits for Enter on stdin.
struct EnterPrompt;

#[async_trait]
impl Confirmation for EnterPrompt {
    async fn confirm(&self, _cancel: &CancellationToken) -> Result<(), AuthError> {
        let mut out = tokio::io::stdout();
        out.write_all(b"\nPress Enter to authorize the device...")
            .await
            .map_err(prompt_error)?;
        out.flush().await.map_err(prompt_error)?;
        let mut line = String::new();
        BufReader::new(tokio::io::stdin())
            .read_line(&mut line)
            .await
            .map_err(prompt_error)?;
        Ok(())
    }
}

fn prompt_error(error: std::io::Error) -> AuthError {
    AuthError::Transport(format!("reading confirmation from stdin: {error}"))
}

/// Handle `devflow preview <step>`.
pub fn handle_preview(args: PreviewArgs) -> Result<(), DevflowError> {
    let config = args.config.to_config();
    config.validate()?;

    let authorization = sample_authorization(&config);
    let tokens = sample_tokens();
    let user_info = sample_user_info();
    let context = match args.step {
        Step::Configure | Step::Authorize => StepContext::new(&config),
        Step::Exchange => StepContext::new(&config).with_authorization(&authorization),
        Step::Complete => StepContext::new(&config)
            .with_tokens(&tokens)
            .with_user_info(&user_info),
    };
    TerminalRenderer::stdout().render_step(args.step, &context);
    Ok(())
}

fn sample_tokens() -> TokenSet {
    let mut tokens = TokenSet::bearer("eyJhbGciOiJSUzI1NiIsInR5cCI6IkpXVCJ9.sample");
    tokens.refresh_token = Some("v1.MRrT-sample-refresh-token".to_string());
    tokens.expires_in = Some(86400);
    tokens.scope = Some("openid profile offline_access".to_string());
    tokens
}

fn sample_user_info() -> UserInfo {
    match json!({
        "sub": "auth0|5f7c8ec7c33c6c004bbafe82",
        "name": "Jane Doe",
        "nickname": "jane",
        "picture": "https://s.gravatar.com/avatar/sample.png",
        "updated_at": "2024-01-01T00:00:00.000Z"
    }) {
        serde_json::Value::Object(claims) => UserInfo(claims),
        _ => UserInfo::default(),
    }
}
