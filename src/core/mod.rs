//! Line editor core.
//!
//! - **key**: Terminal-independent key press model
//! - **buffer**: The unsent input line
//! - **dispatcher**: Key press to editing action
//! - **protocol**: Messages sent to the remote shell
//! - **session**: Event handling, output reconciliation and lifecycle
//!
//! # Architecture
//!
//! ```text
//! keys ──┐
//!        ├─> SessionEvent queue ─> Session ─┬─> Surface (echo, output, prompt)
//! socket ┘                                  └─> Transport (lines, tokens)
//! ```

pub mod buffer;
pub mod dispatcher;
pub mod key;
pub mod protocol;
pub mod session;
