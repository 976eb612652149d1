//! Network actor - runs API calls in the Tokio async runtime

use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::messages::{NetworkCommand, NetworkResponse};
use crate::network::client::ApiClient;

/// Network actor that executes API calls concurrently.
///
/// Calls are never cancelled once issued: a reply for a screen the user has
/// already left is still delivered to the app layer.
pub struct NetworkActor {
    client: ApiClient,
    response_tx: mpsc::UnboundedSender<NetworkResponse>,
    active_requests: JoinSet<()>,
}

impl NetworkActor {
    pub fn new(client: ApiClient, response_tx: mpsc::UnboundedSender<NetworkResponse>) -> Self {
        NetworkActor {
            client,
            response_tx,
            active_requests: JoinSet::new(),
        }
    }

    /// Run the network actor message loop
    pub async fn run(mut self, mut cmd_rx: mpsc::UnboundedReceiver<NetworkCommand>) {
        loop {
            tokio::select! {
                biased;

                cmd = cmd_rx.recv() => {
                    match cmd {
                        Some(NetworkCommand::Call { id, call }) => {
                            let response_tx = self.response_tx.clone();
                            let client = self.client.clone();

                            self.active_requests.spawn(async move {
                                tracing::info!(id, action = call.name(), path = call.path(), "Executing API call");
                                let reply = client.execute(&call).await;
                                tracing::info!(id, success = reply.is_success(), "API call completed");
                                let _ = response_tx.send(NetworkResponse::Completed { id, reply });
                            });
                        }

                        Some(NetworkCommand::Shutdown) | None => {
                            self.active_requests.abort_all();
                            break;
                        }
                    }
                }

                // Clean up completed tasks
                Some(_result) = self.active_requests.join_next() => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::api::{ApiCall, ApiReply};
    use std::time::Duration;

    #[tokio::test]
    async fn test_unreachable_server_replies_failure() {
        // Bind then drop to get a port nothing listens on.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = ApiClient::new(format!("http://{}", addr), Duration::from_secs(2));
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (resp_tx, mut resp_rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(NetworkActor::new(client, resp_tx).run(cmd_rx));

        cmd_tx
            .send(NetworkCommand::Call {
                id: 7,
                call: ApiCall::StartScan {
                    device_id: "pi".into(),
                },
            })
            .unwrap();

        let NetworkResponse::Completed { id, reply } = resp_rx.recv().await.unwrap();
        assert_eq!(id, 7);
        assert_eq!(reply, ApiReply::Failure);

        cmd_tx.send(NetworkCommand::Shutdown).unwrap();
        handle.await.unwrap();
    }
}
