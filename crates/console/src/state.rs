use protocol::{Evaluation, UseCaseDraft};
use std::collections::{HashMap, VecDeque};
use uuid::Uuid;

/// Per-browser state. Nothing here outlives the process.
#[derive(Debug, Default, Clone)]
pub(crate) struct Session {
    /// Last submitted form values, shown again after a failed attempt.
    pub(crate) draft: Option<UseCaseDraft>,
    /// Key typed into the form when none is configured server-side.
    pub(crate) api_key: Option<String>,
    pub(crate) evaluation: Option<Evaluation>,
}

impl Session {
    pub(crate) fn clear(&mut self) {
        self.draft = None;
        self.evaluation = None;
    }
}

pub(crate) struct SessionStore {
    sessions: HashMap<Uuid, Session>,
    order: VecDeque<Uuid>,
    max_sessions: usize,
}

impl SessionStore {
    pub(crate) fn new(max_sessions: usize) -> Self {
        Self {
            sessions: HashMap::new(),
            order: VecDeque::new(),
            max_sessions: max_sessions.max(1),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.sessions.len()
    }

    pub(crate) fn get(&self, id: &Uuid) -> Option<&Session> {
        self.sessions.get(id)
    }

    /// Returns the session for `id`, creating it if it is unknown or was
    /// evicted. The oldest session is dropped once the cap is reached.
    pub(crate) fn get_or_create(&mut self, id: Uuid) -> &mut Session {
        if !self.sessions.contains_key(&id) {
            while self.sessions.len() >= self.max_sessions {
                let Some(oldest) = self.order.pop_front() else {
                    break;
                };
                self.sessions.remove(&oldest);
                tracing::info!(session = %oldest, "session evicted");
            }
            self.order.push_back(id);
        }
        self.sessions.entry(id).or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evicts_oldest_session_at_capacity() {
        let mut store = SessionStore::new(2);
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        let third = Uuid::new_v4();
        store.get_or_create(first).api_key = Some("a".to_string());
        store.get_or_create(second);
        store.get_or_create(first);
        assert_eq!(store.len(), 2);

        store.get_or_create(third);
        assert_eq!(store.len(), 2);
        assert!(store.get(&first).is_none());
        assert!(store.get(&second).is_some());
        assert!(store.get(&third).is_some());
    }

    #[test]
    fn clear_keeps_entered_key() {
        let mut session = Session {
            draft: Some(UseCaseDraft::default()),
            api_key: Some("gsk".to_string()),
            evaluation: None,
        };
        session.clear();
        assert!(session.draft.is_none());
        assert_eq!(session.api_key.as_deref(), Some("gsk"));
    }
}
