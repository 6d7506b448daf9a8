//! In-memory conversation histories keyed by conversation identifier.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::types::ConversationTurn;

pub const NO_PREVIOUS_CONVERSATION: &str = "No previous conversation.";

/// Per-conversation histories plus one serialization gate per identifier.
///
/// Histories live for the process lifetime; only [`ConversationStore::clear`]
/// removes one. A gate outlives its guard only while the identifier still
/// has a history, see [`ConversationStore::release`].
#[derive(Default)]
pub struct ConversationStore {
    histories: Mutex<HashMap<String, Vec<ConversationTurn>>>,
    gates: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

/// Held while a message for one conversation is being handled
pub type ConversationGuard = OwnedMutexGuard<()>;

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to a conversation.
    pub async fn acquire(&self, conversation_id: &str) -> ConversationGuard {
        let gate = {
            let mut gates = self.gates.lock().await;
            gates
                .entry(conversation_id.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        gate.lock_owned().await
    }

    /// Give up a guard from [`ConversationStore::acquire`], dropping the gate
    /// when nobody else is waiting on it and the conversation has no history.
    pub async fn release(&self, conversation_id: &str, guard: ConversationGuard) {
        let mut gates = self.gates.lock().await;
        drop(guard);

        let idle = gates
            .get(conversation_id)
            .is_some_and(|gate| Arc::strong_count(gate) == 1);
        if idle && !self.histories.lock().await.contains_key(conversation_id) {
            gates.remove(conversation_id);
        }
    }

    pub async fn append(&self, conversation_id: &str, turn: ConversationTurn) {
        self.histories
            .lock()
            .await
            .entry(conversation_id.to_string())
            .or_default()
            .push(turn);
    }

    /// Append a user message and its answer in one step.
    pub async fn append_exchange(&self, conversation_id: &str, user: &str, assistant: &str) {
        let mut histories = self.histories.lock().await;
        let history = histories.entry(conversation_id.to_string()).or_default();
        history.push(ConversationTurn::user(user));
        history.push(ConversationTurn::assistant(assistant));
    }

    /// Last `max_turns` turns, oldest first, as `ROLE: content` lines.
    pub async fn recent(&self, conversation_id: &str, max_turns: usize) -> String {
        let histories = self.histories.lock().await;
        let Some(history) = histories.get(conversation_id).filter(|h| !h.is_empty()) else {
            return NO_PREVIOUS_CONVERSATION.to_string();
        };
        if max_turns == 0 {
            return NO_PREVIOUS_CONVERSATION.to_string();
        }

        let start = history.len().saturating_sub(max_turns);
        history[start..]
            .iter()
            .map(|turn| format!("{}: {}", turn.role.as_str().to_uppercase(), turn.content))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub async fn turns(&self, conversation_id: &str) -> Vec<ConversationTurn> {
        self.histories
            .lock()
            .await
            .get(conversation_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Drop a conversation. Returns whether it had any turns.
    pub async fn clear(&self, conversation_id: &str) -> bool {
        self.histories
            .lock()
            .await
            .remove(conversation_id)
            .is_some_and(|history| !history.is_empty())
    }

    #[cfg(test)]
    pub(crate) async fn gate_count(&self) -> usize {
        self.gates.lock().await.len()
    }

    /// Identifiers with at least one recorded turn
    pub async fn active_conversations(&self) -> usize {
        self.histories
            .lock()
            .await
            .values()
            .filter(|history| !history.is_empty())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::types::TurnRole;

    #[tokio::test]
    async fn recent_is_a_sentinel_for_unknown_conversations() {
        let store = ConversationStore::new();
        assert_eq!(store.recent("+15550100", 10).await, NO_PREVIOUS_CONVERSATION);
    }

    #[tokio::test]
    async fn recent_returns_last_turns_oldest_first() {
        let store = ConversationStore::new();
        store.append_exchange("a", "first", "one").await;
        store.append_exchange("a", "second", "two").await;

        assert_eq!(store.recent("a", 3).await, "ASSISTANT: one\nUSER: second\nASSISTANT: two");
        assert_eq!(
            store.recent("a", 10).await,
            "USER: first\nASSISTANT: one\nUSER: second\nASSISTANT: two"
        );
    }

    #[tokio::test]
    async fn conversations_do_not_leak_into_each_other() {
        let store = ConversationStore::new();
        store.append("a", ConversationTurn::user("for a")).await;
        store.append("b", ConversationTurn::user("for b")).await;

        let turns = store.turns("a").await;
        assert_eq!(turns.len(), 1);
        assert_eq!(turns[0].role, TurnRole::User);
        assert_eq!(turns[0].content, "for a");
    }

    #[tokio::test]
    async fn clear_removes_history_and_active_count() {
        let store = ConversationStore::new();
        assert!(!store.clear("nobody").await);

        store.append_exchange("a", "hi", "hello").await;
        store.append_exchange("b", "hi", "hello").await;
        assert_eq!(store.active_conversations().await, 2);

        assert!(store.clear("a").await);
        assert_eq!(store.active_conversations().await, 1);
        assert_eq!(store.recent("a", 10).await, NO_PREVIOUS_CONVERSATION);
        assert!(!store.clear("a").await);
    }

    #[tokio::test]
    async fn acquire_serialises_the_same_conversation() {
        let store = Arc::new(ConversationStore::new());
        let guard = store.acquire("a").await;

        let contender = {
            let store = store.clone();
            tokio::spawn(async move {
                let _guard = store.acquire("a").await;
            })
        };
        // A different identifier is not blocked
        let _other = store.acquire("b").await;

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!contender.is_finished());

        drop(guard);
        tokio::time::timeout(Duration::from_secs(1), contender)
            .await
            .expect("contender should proceed")
            .expect("task completes");
    }

    #[tokio::test]
    async fn clearing_unknown_conversations_leaves_no_gates() {
        let store = ConversationStore::new();
        for n in 0..1000 {
            let id = format!("ghost-{n}");
            let guard = store.acquire(&id).await;
            assert!(!store.clear(&id).await);
            store.release(&id, guard).await;
        }
        assert_eq!(store.gate_count().await, 0);
    }

    #[tokio::test]
    async fn release_keeps_gates_that_are_still_needed() {
        let store = Arc::new(ConversationStore::new());

        let guard = store.acquire("kept").await;
        store.append_exchange("kept", "hi", "hello").await;
        store.release("kept", guard).await;
        assert_eq!(store.gate_count().await, 1);

        let guard = store.acquire("busy").await;
        let waiter = {
            let store = store.clone();
            tokio::spawn(async move {
                let guard = store.acquire("busy").await;
                store.release("busy", guard).await;
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        store.release("busy", guard).await;
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter should proceed")
            .expect("task completes");

        assert_eq!(store.gate_count().await, 1);
        assert!(store.clear("kept").await);
        let guard = store.acquire("kept").await;
        store.release("kept", guard).await;
        assert_eq!(store.gate_count().await, 0);
    }
}
