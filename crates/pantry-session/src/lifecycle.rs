//! Request lifecycle of a search, filter or random-batch interaction.
//!
//! `Idle -> Loading -> {Success | Failure} -> Idle`. Each request gets a
//! ticket with a sequence number; only the latest ticket may complete, so a
//! slow response can never overwrite the result of a newer request.

use serde::Serialize;

/// What triggered a request. Decides the user-facing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestKind {
    Search,
    Filter,
    Random,
    Detail,
}

impl RequestKind {
    pub fn empty_message(&self) -> &'static str {
        match self {
            RequestKind::Search => "No recipes found. Try different ingredients or filters.",
            RequestKind::Filter => "No recipes found matching your criteria.",
            RequestKind::Random => "No recipes available. Please try again later.",
            RequestKind::Detail => "Recipe not found.",
        }
    }

    pub fn failure_message(&self) -> &'static str {
        match self {
            RequestKind::Search => "Failed to fetch recipes. Please try again.",
            RequestKind::Filter => "Failed to apply filters. Please try again.",
            RequestKind::Random => "Failed to load recipes. Please try again.",
            RequestKind::Detail => "Failed to load recipe details. Please try again.",
        }
    }
}

/// Handle for one outstanding request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket {
    pub seq: u64,
    pub kind: RequestKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestStatus {
    #[default]
    Idle,
    Loading(RequestTicket),
}

/// Terminal result of a request, kept until the next one starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success { count: usize },
    Failure { message: String },
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Outcome::Failure { message } => Some(message),
            Outcome::Success { .. } => None,
        }
    }
}

/// Issues tickets and rejects stale completions.
#[derive(Debug, Default)]
pub struct RequestTracker {
    next_seq: u64,
    status: RequestStatus,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter `Loading`. Any ticket issued earlier becomes stale.
    pub fn begin(&mut self, kind: RequestKind) -> RequestTicket {
        self.next_seq += 1;
        let ticket = RequestTicket {
            seq: self.next_seq,
            kind,
        };
        self.status = RequestStatus::Loading(ticket);
        ticket
    }

    /// Return to `Idle` if `ticket` is the one in flight.
    pub fn finish(&mut self, ticket: RequestTicket) -> bool {
        match self.status {
            RequestStatus::Loading(current) if current == ticket => {
                self.status = RequestStatus::Idle;
                true
            }
            _ => false,
        }
    }

    pub fn status(&self) -> RequestStatus {
        self.status
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.status, RequestStatus::Loading(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_and_finish() {
        let mut tracker = RequestTracker::new();
        assert_eq!(tracker.status(), RequestStatus::Idle);

        let ticket = tracker.begin(RequestKind::Search);
        assert!(tracker.is_loading());

        assert!(tracker.finish(ticket));
        assert_eq!(tracker.status(), RequestStatus::Idle);
        assert!(!tracker.finish(ticket));
    }

    #[test]
    fn test_superseded_ticket_is_stale() {
        let mut tracker = RequestTracker::new();
        let first = tracker.begin(RequestKind::Search);
        let second = tracker.begin(RequestKind::Filter);

        assert!(!tracker.finish(first));
        assert!(tracker.is_loading());
        assert!(tracker.finish(second));
    }
}
