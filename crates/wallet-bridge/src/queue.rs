use std::collections::{HashMap, HashSet, VecDeque};
use uuid::Uuid;

/// Something a [`RequestQueue`] can track by id.
pub(crate) trait Identified {
    fn id(&self) -> Uuid;
}

impl Identified for crate::types::RpcRequest {
    fn id(&self) -> Uuid {
        self.id
    }
}

/// Requests waiting for the page, and the responses it sent back.
///
/// A request is handed out once by [`dispatch_next`](Self::dispatch_next) and stays tracked until
/// its response arrives or it is removed. [`redispatch`](Self::redispatch) hands unanswered
/// requests out again.
#[derive(Debug)]
pub(crate) struct RequestQueue<Req, Res> {
    requests: VecDeque<Req>,
    dispatched: HashSet<Uuid>,
    responses: HashMap<Uuid, Res>,
}

impl<Req, Res> Default for RequestQueue<Req, Res> {
    fn default() -> Self {
        Self { requests: VecDeque::new(), dispatched: HashSet::new(), responses: HashMap::new() }
    }
}

impl<Req: Identified + Clone, Res> RequestQueue<Req, Res> {
    pub fn add_request(&mut self, request: Req) {
        self.requests.push_back(request);
    }

    pub fn has_request(&self, id: &Uuid) -> bool {
        self.requests.iter().any(|r| r.id() == *id)
    }

    /// Oldest request not handed out yet.
    pub fn dispatch_next(&mut self) -> Option<Req> {
        let next = self.requests.iter().find(|r| !self.dispatched.contains(&r.id()))?.clone();
        self.dispatched.insert(next.id());
        Some(next)
    }

    /// Makes every unanswered request available to [`dispatch_next`](Self::dispatch_next) again.
    /// Returns how many were already handed out.
    pub fn redispatch(&mut self) -> usize {
        let count = self.dispatched.len();
        self.dispatched.clear();
        count
    }

    pub fn remove_request(&mut self, id: &Uuid) {
        self.requests.retain(|r| r.id() != *id);
        self.dispatched.remove(id);
    }

    /// Stores the response to a pending request and retires the request. Responses for unknown
    /// ids are refused.
    pub fn add_response(&mut self, id: Uuid, response: Res) -> bool {
        if !self.has_request(&id) {
            return false;
        }
        self.remove_request(&id);
        self.responses.insert(id, response);
        true
    }

    /// Takes the response for `id`, if it arrived.
    pub fn take_response(&mut self, id: &Uuid) -> Option<Res> {
        self.responses.remove(id)
    }

    pub fn pending(&self) -> usize {
        self.requests.len()
    }
}
