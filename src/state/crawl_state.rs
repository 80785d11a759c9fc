//! Crawl session lifecycle
//!
//! ```text
//! Idle --crawl(seeds)--> Running --frontier empty-----> Completed
//!                         Running --max_pages reached--> Exhausted
//!                         Running --cancel requested---> Cancelled
//! ```

use serde::Serialize;
use std::fmt;

/// Represents the current state of a crawl session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CrawlState {
    /// Session created, no seeds submitted yet
    Idle,

    /// Frontier non-empty and page budget remaining
    Running,

    // ===== Terminal States =====
    /// The frontier emptied
    Completed,

    /// `max_pages` items were produced; the rest of the frontier was discarded
    Exhausted,

    /// A cancellation request stopped dequeuing
    Cancelled,
}

impl CrawlState {
    /// Returns true if the session can no longer produce items
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Exhausted | Self::Cancelled)
    }

    /// Returns true if moving from `self` to `next` is a legal transition
    pub fn can_transition_to(&self, next: CrawlState) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::Running)
                | (Self::Running, Self::Completed)
                | (Self::Running, Self::Exhausted)
                | (Self::Running, Self::Cancelled)
        )
    }

    /// Stable string representation used in exports and storage
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Exhausted => "exhausted",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parses a state from its string representation
    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "idle" => Some(Self::Idle),
            "running" => Some(Self::Running),
            "completed" => Some(Self::Completed),
            "exhausted" => Some(Self::Exhausted),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

impl fmt::Display for CrawlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [CrawlState; 5] = [
        CrawlState::Idle,
        CrawlState::Running,
        CrawlState::Completed,
        CrawlState::Exhausted,
        CrawlState::Cancelled,
    ];

    #[test]
    fn test_is_terminal() {
        assert!(!CrawlState::Idle.is_terminal());
        assert!(!CrawlState::Running.is_terminal());

        assert!(CrawlState::Completed.is_terminal());
        assert!(CrawlState::Exhausted.is_terminal());
        assert!(CrawlState::Cancelled.is_terminal());
    }

    #[test]
    fn test_legal_transitions() {
        assert!(CrawlState::Idle.can_transition_to(CrawlState::Running));
        assert!(CrawlState::Running.can_transition_to(CrawlState::Completed));
        assert!(CrawlState::Running.can_transition_to(CrawlState::Exhausted));
        assert!(CrawlState::Running.can_transition_to(CrawlState::Cancelled));
    }

    #[test]
    fn test_terminal_states_are_final() {
        for from in ALL.iter().filter(|s| s.is_terminal()) {
            for to in ALL {
                assert!(
                    !from.can_transition_to(to),
                    "{:?} -> {:?} should be illegal",
                    from,
                    to
                );
            }
        }
    }

    #[test]
    fn test_idle_cannot_skip_running() {
        assert!(!CrawlState::Idle.can_transition_to(CrawlState::Completed));
        assert!(!CrawlState::Idle.can_transition_to(CrawlState::Exhausted));
    }

    #[test]
    fn test_roundtrip_db_string() {
        for state in ALL {
            assert_eq!(CrawlState::from_db_string(state.to_db_string()), Some(state));
        }
        assert_eq!(CrawlState::from_db_string("invalid"), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", CrawlState::Exhausted), "exhausted");
    }
}
