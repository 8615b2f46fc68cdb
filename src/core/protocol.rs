//! Client to remote message protocol
//!
//! Everything travels as plain text frames. Control requests are reserved
//! payloads that the remote shell recognises by convention.

/// Interrupt request
pub const INTERRUPT_TOKEN: &str = "__CTRL_C__";
/// History-previous request
pub const HISTORY_PREV_TOKEN: &str = "__UP__";
/// History-next request
pub const HISTORY_NEXT_TOKEN: &str = "__DOWN__";
/// Completion request prefix, followed by the partial line
pub const COMPLETE_PREFIX: &str = "__TAB__";

/// A message sent to the remote shell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    /// A submitted input line, possibly empty
    Submit(String),
    Interrupt,
    HistoryPrev,
    HistoryNext,
    /// Completion request for the current partial line
    Complete(String),
}

impl Outbound {
    /// Text frame payload for this message
    pub fn to_wire(&self) -> String {
        match self {
            Outbound::Submit(line) => line.clone(),
            Outbound::Interrupt => INTERRUPT_TOKEN.to_string(),
            Outbound::HistoryPrev => HISTORY_PREV_TOKEN.to_string(),
            Outbound::HistoryNext => HISTORY_NEXT_TOKEN.to_string(),
            Outbound::Complete(partial) => format!("{}{}", COMPLETE_PREFIX, partial),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_tokens() {
        assert_eq!(Outbound::Interrupt.to_wire(), "__CTRL_C__");
        assert_eq!(Outbound::HistoryPrev.to_wire(), "__UP__");
        assert_eq!(Outbound::HistoryNext.to_wire(), "__DOWN__");
    }

    #[test]
    fn test_submit_is_verbatim() {
        assert_eq!(Outbound::Submit("ls -la".into()).to_wire(), "ls -la");
        assert_eq!(Outbound::Submit(String::new()).to_wire(), "");
    }

    #[test]
    fn test_completion_appends_line() {
        assert_eq!(Outbound::Complete("ca".into()).to_wire(), "__TAB__ca");
        assert_eq!(Outbound::Complete(String::new()).to_wire(), "__TAB__");
    }
}
