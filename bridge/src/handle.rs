use std::path::PathBuf;

use async_trait::async_trait;
use proto::{Invoke, InvokeError};
use tokio::sync::{mpsc, oneshot, watch};

use crate::message::{BridgeMessage, ShellRequest};

/// The front end's only way to reach the node or the host shell.
///
/// Cheap to clone; every clone feeds the same host.
#[derive(Debug, Clone)]
pub struct BridgeHandle {
    sender: mpsc::Sender<BridgeMessage>,
    quit: watch::Receiver<bool>,
}

impl BridgeHandle {
    pub(crate) fn new(sender: mpsc::Sender<BridgeMessage>, quit: watch::Receiver<bool>) -> Self {
        BridgeHandle { sender, quit }
    }

    async fn send(&self, message: BridgeMessage) -> Result<(), InvokeError> {
        self.sender
            .send(message)
            .await
            .map_err(|_| InvokeError::Disconnected)
    }

    async fn ask<T>(
        &self,
        request: impl FnOnce(oneshot::Sender<T>) -> ShellRequest,
    ) -> Result<T, InvokeError> {
        let (reply, response) = oneshot::channel();
        self.send(BridgeMessage::Shell(request(reply))).await?;
        response.await.map_err(|_| InvokeError::Disconnected)
    }

    /// Asks the host for a file. `None` if the user cancelled or there is no picker.
    pub async fn select_file(&self) -> Result<Option<PathBuf>, InvokeError> {
        self.ask(ShellRequest::SelectFile).await
    }

    pub async fn select_folder(&self) -> Result<Option<PathBuf>, InvokeError> {
        self.ask(ShellRequest::SelectFolder).await
    }

    pub async fn read_clipboard(&self) -> Result<String, InvokeError> {
        self.ask(ShellRequest::ReadClipboard).await
    }

    pub async fn write_clipboard(&self, text: impl Into<String>) -> Result<(), InvokeError> {
        let text = text.into();
        self.ask(|reply| ShellRequest::WriteClipboard(text, reply))
            .await
    }

    /// Tells the host the front end is done and the process may exit.
    pub async fn confirm_quit(&self) -> Result<(), InvokeError> {
        self.ask(ShellRequest::ConfirmQuit).await
    }

    /// Resolves once the host has asked the front end to quit.
    pub async fn wait_for_quit(&self) -> Result<(), InvokeError> {
        let mut quit = self.quit.clone();
        quit.wait_for(|requested| *requested)
            .await
            .map(|_| ())
            .map_err(|_| InvokeError::Disconnected)
    }
}

#[async_trait]
impl Invoke for BridgeHandle {
    async fn invoke(&self, method: &str, payload: Vec<u8>) -> Result<Vec<u8>, InvokeError> {
        let (reply, response) = oneshot::channel();
        self.send(BridgeMessage::Invoke {
            method: method.to_owned(),
            payload,
            reply,
        })
        .await?;
        response.await.map_err(|_| InvokeError::Disconnected)?
    }
}
