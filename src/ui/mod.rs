//! Terminal display and input handling.
//!
//! - **surface**: `Surface` trait and the crossterm-backed terminal surface
//! - **prompt**: Prompt and connected-banner rendering
//! - **keymapper**: crossterm key events to editor key presses
//! - **input**: Background listener feeding keys and resizes to the session

pub mod input;
pub mod keymapper;
pub mod prompt;
pub mod surface;

pub use input::InputPump;
pub use prompt::{Banner, Prompt, INTERRUPT_ECHO};
pub use surface::{Surface, TerminalSurface, NEWLINE};
