//! Bookkeeping for host requests that are answered later through an entry point.
//!
//! The host never correlates answers with requests, so a request that is never answered
//! would otherwise leave a panel silently stale. Each request gets an id and a send time;
//! the first answer of the matching kind resolves the oldest request of that kind, and
//! anything older than the timeout is reported as stale.

use std::time::{Duration, Instant};

#[derive(Hash, Eq, PartialEq, Debug, Copy, Clone)]
pub enum RequestKind {
    Backstories,
    Players,
    ItemsCatalog,
    AdminPermission,
}

#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Copy, Clone)]
pub struct RequestId(pub u64);

#[derive(Debug, Clone)]
struct PendingRequest {
    id: RequestId,
    kind: RequestKind,
    sent_at: Instant,
}

#[derive(Debug, Default)]
pub struct PendingRequests {
    next_id: u64,
    pending: Vec<PendingRequest>,
}

impl PendingRequests {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a request sent at `now` and returns its id.
    pub fn begin(&mut self, kind: RequestKind, now: Instant) -> RequestId {
        self.next_id += 1;
        let id = RequestId(self.next_id);
        self.pending.push(PendingRequest {
            id,
            kind,
            sent_at: now,
        });
        id
    }

    /// Resolves the oldest outstanding request of `kind`.
    ///
    /// Returns `None` for unsolicited answers (the host may push lists on its own).
    pub fn resolve(&mut self, kind: RequestKind) -> Option<RequestId> {
        let index = self.pending.iter().position(|p| p.kind == kind)?;
        Some(self.pending.remove(index).id)
    }

    /// Drops the request `id`, for example when it never reached the host.
    pub fn forget(&mut self, id: RequestId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.id != id);
        self.pending.len() != before
    }

    pub fn is_pending(&self, kind: RequestKind) -> bool {
        self.pending.iter().any(|p| p.kind == kind)
    }

    /// True when a request of `kind` has waited longer than `timeout`.
    pub fn is_stale(&self, kind: RequestKind, now: Instant, timeout: Duration) -> bool {
        self.pending
            .iter()
            .any(|p| p.kind == kind && now.saturating_duration_since(p.sent_at) > timeout)
    }

    /// Kinds with at least one request older than `timeout`, in first-sent order.
    pub fn stale_kinds(&self, now: Instant, timeout: Duration) -> Vec<RequestKind> {
        let mut kinds = Vec::new();
        for request in &self.pending {
            if now.saturating_duration_since(request.sent_at) > timeout
                && !kinds.contains(&request.kind)
            {
                kinds.push(request.kind);
            }
        }
        kinds
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_increase_per_request() {
        let mut requests = PendingRequests::new();
        let now = Instant::now();
        let a = requests.begin(RequestKind::Players, now);
        let b = requests.begin(RequestKind::Players, now);
        assert!(b > a);
        assert_eq!(requests.len(), 2);
    }

    #[test]
    fn resolve_takes_the_oldest_request_of_a_kind() {
        let mut requests = PendingRequests::new();
        let now = Instant::now();
        let first = requests.begin(RequestKind::Players, now);
        requests.begin(RequestKind::ItemsCatalog, now);
        let second = requests.begin(RequestKind::Players, now);

        assert_eq!(requests.resolve(RequestKind::Players), Some(first));
        assert_eq!(requests.resolve(RequestKind::Players), Some(second));
        assert_eq!(requests.resolve(RequestKind::Players), None);
        assert!(requests.is_pending(RequestKind::ItemsCatalog));
    }

    /// Forgetting a request leaves older ones of the same kind in place.
    #[test]
    fn forget_removes_only_the_given_request() {
        let mut requests = PendingRequests::new();
        let now = Instant::now();
        let older = requests.begin(RequestKind::Players, now);
        let newer = requests.begin(RequestKind::Players, now);

        assert!(requests.forget(newer));
        assert!(!requests.forget(newer));
        assert_eq!(requests.resolve(RequestKind::Players), Some(older));
        assert!(requests.is_empty());
    }

    #[test]
    fn unanswered_requests_go_stale_after_the_timeout() {
        let mut requests = PendingRequests::new();
        let sent = Instant::now();
        requests.begin(RequestKind::Backstories, sent);

        let timeout = Duration::from_secs(10);
        assert!(!requests.is_stale(RequestKind::Backstories, sent + Duration::from_secs(5), timeout));
        assert!(requests.is_stale(RequestKind::Backstories, sent + Duration::from_secs(11), timeout));
        assert_eq!(
            requests.stale_kinds(sent + Duration::from_secs(11), timeout),
            vec![RequestKind::Backstories]
        );

        requests.resolve(RequestKind::Backstories);
        assert!(requests.stale_kinds(sent + Duration::from_secs(60), timeout).is_empty());
        assert!(requests.is_empty());
    }
}
