//! Event processing from backend

use super::PartyChatApp;
use crate::events;
use crate::protocol::GuiEvent;

impl PartyChatApp {
    pub fn process_events(&mut self) {
        while let Ok(event) = self.event_rx.try_recv() {
            if matches!(event, GuiEvent::ConnectionClosed) {
                // The session is gone: no stop signal may follow
                self.typing.reset();
            }
            events::process_single_event(&mut self.state, event, self.typing.is_typing());
        }
    }
}
