//! Backend main event loop.

use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender, TryRecvError};
use tokio::runtime::Runtime;
use tracing::{error, info};

use super::handlers;
use super::session::Session;
use crate::protocol::{BackendAction, GuiEvent};
use crate::transport::{Connector, SessionEvent};

const IDLE_POLL: Duration = Duration::from_millis(10);

/// Run the backend event loop on a tokio runtime.
///
/// Returns after `BackendAction::Shutdown` or once the UI drops its sender.
pub fn run_backend(
    action_rx: Receiver<BackendAction>,
    event_tx: Sender<GuiEvent>,
    connector: Arc<dyn Connector>,
) {
    // Create a Tokio runtime for this thread
    let rt = match Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            error!(error = %e, "failed to create tokio runtime");
            let _ = event_tx.send(GuiEvent::ConnectionClosed);
            return;
        }
    };

    rt.block_on(async move {
        let mut session: Option<Session> = None;

        'outer: loop {
            // Check for actions from the UI (non-blocking)
            loop {
                match action_rx.try_recv() {
                    Ok(action) => {
                        let flow = handlers::handle_backend_action(
                            action,
                            &mut session,
                            connector.as_ref(),
                            &event_tx,
                        )
                        .await;
                        if let ControlFlow::Break(()) = flow {
                            break 'outer;
                        }
                    }
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        if let Some(s) = session.take() {
                            s.close();
                        }
                        break 'outer;
                    }
                }
            }

            // Forward whatever the session pushed
            let mut closed = false;
            if let Some(s) = session.as_mut() {
                while let Ok(event) = s.events.try_recv() {
                    closed |= event == SessionEvent::ConnectionClosed;
                    let _ = event_tx.send(handlers::handle_session_event(event));
                }
            }
            if closed {
                info!("connection closed by service");
                if let Some(s) = session.take() {
                    s.close();
                }
            }

            tokio::time::sleep(IDLE_POLL).await;
        }
        info!("backend stopped");
    });
}
