//! In-process room hub.
//!
//! Every connection opened through a `LocalHub` shares the same set of rooms, so
//! several clients in one process (or one test) can chat with each other exactly
//! as they would through the hosted service.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use super::{
    ChatTransport, Connector, MessageList, OutgoingMessage, SessionChatMessage, SessionEvent,
    SessionEventSender, TransportError, TypingPresence,
};

type ConnId = u64;

#[derive(Clone, Default)]
pub struct LocalHub {
    inner: Arc<Mutex<HubState>>,
}

#[derive(Default)]
struct HubState {
    next_conn: ConnId,
    shut_down: bool,
    connections: HashMap<ConnId, SessionEventSender>,
    rooms: HashMap<String, Room>,
}

#[derive(Default)]
struct Room {
    members: HashMap<ConnId, Member>,
    history: Vec<SessionChatMessage>,
    /// Permanent ids of members currently typing.
    typing: BTreeSet<String>,
}

struct Member {
    nickname: String,
    icon: Option<String>,
    perm_id: String,
}

impl Room {
    fn broadcast(
        &self,
        connections: &HashMap<ConnId, SessionEventSender>,
        event: &SessionEvent,
        except: Option<ConnId>,
    ) {
        for conn in self.members.keys() {
            if Some(*conn) == except {
                continue;
            }
            if let Some(tx) = connections.get(conn) {
                // Receiver gone means the client is mid-teardown
                let _ = tx.send(event.clone());
            }
        }
    }

    fn presence(&self) -> TypingPresence {
        TypingPresence {
            anyone_typing: !self.typing.is_empty(),
            users_typing: self.typing.iter().cloned().collect(),
        }
    }
}

fn system_message(member: &Member, body: &str) -> SessionChatMessage {
    SessionChatMessage {
        is_system_message: true,
        user_icon: None,
        user_nickname: Some(member.nickname.clone()),
        body: body.to_string(),
        perm_id: member.perm_id.clone(),
        timestamp: Utc::now().timestamp_millis(),
    }
}

impl HubState {
    fn is_connected(&self, conn: ConnId) -> bool {
        self.connections.contains_key(&conn)
    }

    /// Remove `conn` from `room_id`, notifying whoever stays behind.
    fn leave(&mut self, conn: ConnId, room_id: &str) {
        let HubState {
            rooms, connections, ..
        } = self;
        let Some(room) = rooms.get_mut(room_id) else {
            return;
        };
        let Some(member) = room.members.remove(&conn) else {
            return;
        };

        if room.typing.remove(&member.perm_id) {
            room.broadcast(connections, &SessionEvent::TypingPresence(room.presence()), None);
        }

        let left = system_message(&member, "left the party");
        room.history.push(left.clone());
        room.broadcast(connections, &SessionEvent::ChatMessage(left), None);
        debug!(room_id, nickname = %member.nickname, "member left room");

        if room.members.is_empty() {
            rooms.remove(room_id);
            debug!(room_id, "room closed");
        }
    }
}

impl LocalHub {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, HubState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Close every live session, as if the service went away.
    pub fn shutdown(&self) {
        let mut state = self.state();
        state.shut_down = true;
        for (_, tx) in state.connections.drain() {
            let _ = tx.send(SessionEvent::ConnectionClosed);
        }
        info!("local hub shut down");
    }

    pub fn room_count(&self) -> usize {
        self.state().rooms.len()
    }

    pub fn connection_count(&self) -> usize {
        self.state().connections.len()
    }
}

impl Connector for LocalHub {
    fn connect(&self, events: SessionEventSender) -> Box<dyn ChatTransport> {
        let mut state = self.state();
        let conn = state.next_conn;
        state.next_conn += 1;

        if state.shut_down {
            let _ = events.send(SessionEvent::ConnectionClosed);
        } else {
            let _ = events.send(SessionEvent::ConnectionReady);
            state.connections.insert(conn, events);
        }
        drop(state);

        debug!(conn, "local session opened");
        Box::new(LocalTransport {
            hub: self.clone(),
            conn,
            perm_id: Uuid::new_v4().simple().to_string(),
            room: None,
        })
    }
}

/// A single client's session on a `LocalHub`.
pub struct LocalTransport {
    hub: LocalHub,
    conn: ConnId,
    perm_id: String,
    room: Option<String>,
}

impl LocalTransport {
    fn member(&self, nickname: &str, icon: Option<&str>) -> Result<Member, TransportError> {
        let nickname = nickname.trim();
        if nickname.is_empty() {
            return Err(TransportError::InvalidNickname);
        }
        Ok(Member {
            nickname: nickname.to_string(),
            icon: icon.map(str::to_string),
            perm_id: self.perm_id.clone(),
        })
    }
}

#[async_trait]
impl ChatTransport for LocalTransport {
    async fn create_room(
        &mut self,
        nickname: &str,
        icon: Option<&str>,
    ) -> Result<String, TransportError> {
        let member = self.member(nickname, icon)?;
        let hub = self.hub.clone();
        let mut state = hub.state();
        if !state.is_connected(self.conn) {
            return Err(TransportError::NotConnected);
        }
        if let Some(previous) = self.room.take() {
            state.leave(self.conn, &previous);
        }

        let room_id = Uuid::new_v4().simple().to_string();
        let created = system_message(&member, "created the party");
        let mut room = Room::default();
        room.members.insert(self.conn, member);
        room.history.push(created.clone());
        room.broadcast(&state.connections, &SessionEvent::ChatMessage(created), None);
        state.rooms.insert(room_id.clone(), room);

        info!(%room_id, "room created");
        self.room = Some(room_id.clone());
        Ok(room_id)
    }

    async fn join_room(
        &mut self,
        nickname: &str,
        room_id: &str,
        icon: Option<&str>,
    ) -> Result<MessageList, TransportError> {
        let member = self.member(nickname, icon)?;
        let hub = self.hub.clone();
        let mut state = hub.state();
        if !state.is_connected(self.conn) {
            return Err(TransportError::NotConnected);
        }
        if !state.rooms.contains_key(room_id) {
            return Err(TransportError::UnknownRoom(room_id.to_string()));
        }
        if let Some(previous) = self.room.take() {
            state.leave(self.conn, &previous);
        }

        let HubState {
            rooms, connections, ..
        } = &mut *state;
        let room = rooms
            .get_mut(room_id)
            .ok_or_else(|| TransportError::UnknownRoom(room_id.to_string()))?;

        let joined = system_message(&member, "joined the party");
        room.members.insert(self.conn, member);
        room.history.push(joined.clone());
        room.broadcast(connections, &SessionEvent::ChatMessage(joined), Some(self.conn));

        info!(room_id, members = room.members.len(), "room joined");
        self.room = Some(room_id.to_string());
        Ok(MessageList {
            messages: room.history.clone(),
        })
    }

    fn send_message(&mut self, message: OutgoingMessage) -> Result<(), TransportError> {
        let mut state = self.hub.state();
        if !state.is_connected(self.conn) {
            return Err(TransportError::NotConnected);
        }
        let room_id = self.room.as_deref().ok_or(TransportError::NotInRoom)?;

        let HubState {
            rooms, connections, ..
        } = &mut *state;
        let room = rooms.get_mut(room_id).ok_or(TransportError::NotInRoom)?;
        let member = room.members.get(&self.conn).ok_or(TransportError::NotInRoom)?;

        match message {
            OutgoingMessage::Chat { body } => {
                let msg = SessionChatMessage {
                    is_system_message: false,
                    user_icon: member.icon.clone(),
                    user_nickname: Some(member.nickname.clone()),
                    body,
                    perm_id: member.perm_id.clone(),
                    timestamp: Utc::now().timestamp_millis(),
                };
                room.history.push(msg.clone());
                room.broadcast(connections, &SessionEvent::ChatMessage(msg), None);
            }
            OutgoingMessage::Typing { typing } => {
                let perm_id = member.perm_id.clone();
                if typing {
                    room.typing.insert(perm_id);
                } else {
                    room.typing.remove(&perm_id);
                }
                room.broadcast(connections, &SessionEvent::TypingPresence(room.presence()), None);
            }
        }
        Ok(())
    }

    fn teardown(&mut self) {
        let mut state = self.hub.state();
        if let Some(room_id) = self.room.take() {
            state.leave(self.conn, &room_id);
        }
        if state.connections.remove(&self.conn).is_some() {
            debug!(conn = self.conn, "local session closed");
        }
    }
}

impl Drop for LocalTransport {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};

    fn open(hub: &LocalHub) -> (Box<dyn ChatTransport>, UnboundedReceiver<SessionEvent>) {
        let (tx, rx) = unbounded_channel();
        (hub.connect(tx), rx)
    }

    fn drain(rx: &mut UnboundedReceiver<SessionEvent>) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    fn chat_bodies(events: &[SessionEvent]) -> Vec<String> {
        events
            .iter()
            .filter_map(|e| match e {
                SessionEvent::ChatMessage(m) => Some(m.body.clone()),
                _ => None,
            })
            .collect()
    }

    #[tokio::test]
    async fn test_connect_signals_ready() {
        let hub = LocalHub::new();
        let (_t, mut rx) = open(&hub);
        assert_eq!(drain(&mut rx), vec![SessionEvent::ConnectionReady]);
        assert_eq!(hub.connection_count(), 1);
    }

    #[tokio::test]
    async fn test_create_and_join_share_history() {
        let hub = LocalHub::new();
        let (mut alice, mut alice_rx) = open(&hub);
        let (mut bob, mut bob_rx) = open(&hub);
        drain(&mut alice_rx);
        drain(&mut bob_rx);

        let room_id = alice.create_room("alice", None).await.unwrap();
        assert_eq!(chat_bodies(&drain(&mut alice_rx)), vec!["created the party"]);

        let history = bob.join_room("bob", &room_id, None).await.unwrap();
        let bodies: Vec<&str> = history.messages.iter().map(|m| m.body.as_str()).collect();
        assert_eq!(bodies, vec!["created the party", "joined the party"]);
        assert!(history.messages.iter().all(|m| m.is_system_message));

        // Joiner gets the join through history only
        assert!(drain(&mut bob_rx).is_empty());
        assert_eq!(chat_bodies(&drain(&mut alice_rx)), vec!["joined the party"]);
    }

    #[tokio::test]
    async fn test_chat_is_echoed_to_sender() {
        let hub = LocalHub::new();
        let (mut alice, mut alice_rx) = open(&hub);
        let (mut bob, mut bob_rx) = open(&hub);
        let room_id = alice.create_room("alice", Some("icon-data")).await.unwrap();
        bob.join_room("bob", &room_id, None).await.unwrap();
        drain(&mut alice_rx);
        drain(&mut bob_rx);

        alice
            .send_message(OutgoingMessage::Chat { body: "hi".into() })
            .unwrap();

        for rx in [&mut alice_rx, &mut bob_rx] {
            let events = drain(rx);
            let SessionEvent::ChatMessage(msg) = &events[0] else {
                panic!("expected chat message, got {:?}", events);
            };
            assert_eq!(msg.body, "hi");
            assert_eq!(msg.user_nickname.as_deref(), Some("alice"));
            assert_eq!(msg.user_icon.as_deref(), Some("icon-data"));
            assert!(!msg.is_system_message);
        }
    }

    #[tokio::test]
    async fn test_typing_presence_broadcast() {
        let hub = LocalHub::new();
        let (mut alice, mut alice_rx) = open(&hub);
        let (mut bob, mut bob_rx) = open(&hub);
        let room_id = alice.create_room("alice", None).await.unwrap();
        bob.join_room("bob", &room_id, None).await.unwrap();
        drain(&mut alice_rx);
        drain(&mut bob_rx);

        bob.send_message(OutgoingMessage::Typing { typing: true })
            .unwrap();
        let events = drain(&mut alice_rx);
        let SessionEvent::TypingPresence(presence) = &events[0] else {
            panic!("expected presence, got {:?}", events);
        };
        assert!(presence.anyone_typing);
        assert_eq!(presence.users_typing.len(), 1);

        bob.send_message(OutgoingMessage::Typing { typing: false })
            .unwrap();
        assert_eq!(
            drain(&mut bob_rx).last(),
            Some(&SessionEvent::TypingPresence(TypingPresence::default()))
        );
    }

    #[tokio::test]
    async fn test_unknown_room_and_missing_membership() {
        let hub = LocalHub::new();
        let (mut t, _rx) = open(&hub);
        assert_eq!(
            t.join_room("bob", "nope", None).await,
            Err(TransportError::UnknownRoom("nope".into()))
        );
        assert_eq!(
            t.send_message(OutgoingMessage::Chat { body: "x".into() }),
            Err(TransportError::NotInRoom)
        );
        assert_eq!(
            t.create_room("   ", None).await,
            Err(TransportError::InvalidNickname)
        );
    }

    #[tokio::test]
    async fn test_teardown_is_idempotent_and_notifies_room() {
        let hub = LocalHub::new();
        let (mut alice, mut alice_rx) = open(&hub);
        let (mut bob, _bob_rx) = open(&hub);
        let room_id = alice.create_room("alice", None).await.unwrap();
        bob.join_room("bob", &room_id, None).await.unwrap();
        bob.send_message(OutgoingMessage::Typing { typing: true })
            .unwrap();
        drain(&mut alice_rx);

        bob.teardown();
        bob.teardown();

        let events = drain(&mut alice_rx);
        assert_eq!(
            events[0],
            SessionEvent::TypingPresence(TypingPresence::default())
        );
        assert_eq!(chat_bodies(&events), vec!["left the party"]);
        assert_eq!(hub.connection_count(), 1);
        assert_eq!(
            bob.send_message(OutgoingMessage::Chat { body: "x".into() }),
            Err(TransportError::NotConnected)
        );
    }

    #[tokio::test]
    async fn test_room_is_dropped_when_last_member_leaves() {
        let hub = LocalHub::new();
        let (mut alice, _alice_rx) = open(&hub);
        let (mut bob, _bob_rx) = open(&hub);
        let room_id = alice.create_room("alice", None).await.unwrap();
        bob.join_room("bob", &room_id, None).await.unwrap();

        alice.teardown();
        assert_eq!(hub.room_count(), 1);

        // Moving to another room empties the first one too
        let second = bob.create_room("bob", None).await.unwrap();
        assert_eq!(hub.room_count(), 1);

        let (mut carol, _carol_rx) = open(&hub);
        assert_eq!(
            carol.join_room("carol", &room_id, None).await,
            Err(TransportError::UnknownRoom(room_id.clone()))
        );

        bob.teardown();
        assert_eq!(hub.room_count(), 0);
        assert_eq!(
            carol.join_room("carol", &second, None).await,
            Err(TransportError::UnknownRoom(second.clone()))
        );
    }

    #[tokio::test]
    async fn test_shutdown_closes_sessions() {
        let hub = LocalHub::new();
        let (_t, mut rx) = open(&hub);
        drain(&mut rx);

        hub.shutdown();
        assert_eq!(drain(&mut rx), vec![SessionEvent::ConnectionClosed]);

        let (_late, mut late_rx) = open(&hub);
        assert_eq!(drain(&mut late_rx), vec![SessionEvent::ConnectionClosed]);
    }
}
