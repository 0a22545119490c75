//! A live session: the transport plus the stream of events it produces.

use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};
use tracing::debug;

use crate::transport::{ChatTransport, Connector, SessionEvent};

pub struct Session {
    pub transport: Box<dyn ChatTransport>,
    pub events: UnboundedReceiver<SessionEvent>,
}

impl Session {
    pub fn open(connector: &dyn Connector) -> Self {
        let (tx, events) = unbounded_channel();
        let transport = connector.connect(tx);
        debug!("session opened");
        Self { transport, events }
    }

    /// Release the transport. Events still queued are discarded.
    pub fn close(mut self) {
        self.transport.teardown();
        self.events.close();
        debug!("session closed");
    }
}
