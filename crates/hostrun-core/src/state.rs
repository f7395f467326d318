//! Host state machine types

use std::fmt;

/// Lifecycle of one host within a run
///
/// `Unconnected -> Connected -> (Executing -> Recorded)* -> Closed`. A host
/// whose connection fails goes straight from `Unconnected` to `Closed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostState {
    Unconnected,
    Connected,
    Executing,
    Recorded,
    Closed,
}

impl HostState {
    /// Check whether moving to `next` is allowed
    #[must_use]
    pub fn can_transition_to(self, next: HostState) -> bool {
        use HostState::{Closed, Connected, Executing, Recorded, Unconnected};

        matches!(
            (self, next),
            (Unconnected, Connected | Closed)
                | (Connected | Recorded, Executing | Closed)
                | (Executing, Recorded)
        )
    }
}

impl fmt::Display for HostState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HostState::Unconnected => "unconnected",
            HostState::Connected => "connected",
            HostState::Executing => "executing",
            HostState::Recorded => "recorded",
            HostState::Closed => "closed",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path_transitions() {
        let path = [
            HostState::Unconnected,
            HostState::Connected,
            HostState::Executing,
            HostState::Recorded,
            HostState::Executing,
            HostState::Recorded,
            HostState::Closed,
        ];
        for pair in path.windows(2) {
            assert!(pair[0].can_transition_to(pair[1]), "{} -> {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_connect_failure_closes_directly() {
        assert!(HostState::Unconnected.can_transition_to(HostState::Closed));
    }

    #[test]
    fn test_invalid_transitions() {
        assert!(!HostState::Unconnected.can_transition_to(HostState::Executing));
        assert!(!HostState::Executing.can_transition_to(HostState::Closed));
        assert!(!HostState::Closed.can_transition_to(HostState::Connected));
        assert!(!HostState::Recorded.can_transition_to(HostState::Recorded));
    }
}
