use std::sync::Arc;

use proto::ui::node_client::NodeClient;
use proto::{InvokeError, NodeOperation};
use tokio::sync::{mpsc, oneshot, watch};
use tonic::transport::Channel;
use tracing::{debug, info, warn, Instrument};

use crate::message::BridgeMessage;
use crate::shell::{self, Shell};

/// Lets the host's owner ask the front end to shut down.
#[derive(Debug, Clone)]
pub struct QuitSignal(Arc<watch::Sender<bool>>);

impl QuitSignal {
    pub fn request(&self) {
        self.0.send_replace(true);
    }
}

/// Privileged side of the bridge. Owns the connection to the node.
pub struct BridgeHost<S> {
    receiver: mpsc::Receiver<BridgeMessage>,
    client: NodeClient<Channel>,
    shell: Arc<S>,
    quit: QuitSignal,
}

impl<S: Shell> BridgeHost<S> {
    pub(crate) fn new(
        receiver: mpsc::Receiver<BridgeMessage>,
        channel: Channel,
        shell: S,
        quit: watch::Sender<bool>,
    ) -> Self {
        BridgeHost {
            receiver,
            client: NodeClient::new(channel),
            shell: Arc::new(shell),
            quit: QuitSignal(Arc::new(quit)),
        }
    }

    pub fn quit_signal(&self) -> QuitSignal {
        self.quit.clone()
    }

    pub fn shell(&self) -> Arc<S> {
        Arc::clone(&self.shell)
    }

    /// Serves messages until every handle is dropped.
    ///
    /// Each message is handled on its own task, so a slow call never holds up the others.
    pub async fn run(mut self) {
        info!("bridge host started");
        while let Some(message) = self.receiver.recv().await {
            match message {
                BridgeMessage::Invoke {
                    method,
                    payload,
                    reply,
                } => self.invoke(method, payload, reply),
                BridgeMessage::Shell(request) => {
                    let integrations = Arc::clone(&self.shell);
                    tokio::spawn(
                        async move { shell::answer(integrations.as_ref(), request).await }
                            .in_current_span(),
                    );
                }
            }
        }
        info!("all bridge handles dropped, host stopping");
    }

    fn invoke(
        &self,
        method: String,
        payload: Vec<u8>,
        reply: oneshot::Sender<Result<Vec<u8>, InvokeError>>,
    ) {
        let Some(operation) = NodeOperation::from_name(&method) else {
            warn!(%method, "rejected undeclared operation");
            let _ = reply.send(Err(InvokeError::UnknownOperation(method)));
            return;
        };

        let mut client = self.client.clone();
        let span = tracing::debug_span!("dispatch", operation = operation.name());
        tokio::spawn(
            async move {
                let result = operation.dispatch(&mut client, &payload).await;
                match &result {
                    Ok(reply) => debug!(reply_bytes = reply.len(), "operation completed"),
                    Err(err) => warn!(%err, "operation failed"),
                }
                // The caller may have given up waiting.
                let _ = reply.send(result);
            }
            .instrument(span),
        );
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use proto::Invoke;
    use tonic::transport::Endpoint;
    use tracing_test::traced_test;

    use super::*;
    use crate::{attach, Headless};

    fn unreachable_node() -> Channel {
        Endpoint::from_static("http://127.0.0.1:1").connect_lazy()
    }

    #[tokio::test]
    #[traced_test]
    async fn undeclared_operations_are_rejected_and_logged() {
        let (handle, host) = attach(unreachable_node(), Headless::default(), 4);
        tokio::spawn(host.run().in_current_span());

        assert_matches!(
            handle.invoke("deleteEverything", vec![1, 2, 3]).await,
            Err(InvokeError::UnknownOperation(name)) if name == "deleteEverything"
        );
        assert!(logs_contain("rejected undeclared operation"));
    }

    #[tokio::test]
    async fn quit_reaches_every_handle() {
        let (handle, host) = attach(unreachable_node(), Headless::default(), 4);
        let quit = host.quit_signal();
        let other = handle.clone();

        quit.request();

        handle.wait_for_quit().await.unwrap();
        other.wait_for_quit().await.unwrap();
        drop(host);
    }

    #[tokio::test]
    async fn dropped_host_disconnects() {
        let (handle, host) = attach(unreachable_node(), Headless::default(), 4);
        drop(host);

        assert_matches!(
            handle.invoke("getAllContainers", vec![]).await,
            Err(InvokeError::Disconnected)
        );
        assert_matches!(handle.wait_for_quit().await, Err(InvokeError::Disconnected));
    }
}
