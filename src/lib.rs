//! devflow: an interactive walkthrough of the OAuth 2.0 Device
//! Authorization Grant (RFC 8628).
//!
//! A session requests a device code, shows the user code and activation
//! link, polls the token endpoint at the provider's interval until the user
//! approves, then fetches `/userinfo`. Every request is also shown as a
//! `curl` command so the exchange can be followed by hand.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use devflow::prelude::*;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> Result<()> {
//! let config = PlaygroundConfig::builder()
//!     .tenant("example.auth0.com")
//!     .client_id("abc123")
//!     .scopes(vec!["openid".into(), "profile".into()])
//!     .build();
//! let walkthrough = Walkthrough::new(config, Arc::new(TerminalRenderer::stdout()))?;
//! walkthrough.run(&CancellationToken::new()).await?;
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod prelude;
pub mod util;
pub mod view;
pub mod walkthrough;

#[cfg(feature = "cli")]
pub mod cli;
