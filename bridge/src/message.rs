use std::path::PathBuf;

use proto::InvokeError;
use tokio::sync::oneshot;

/// Everything that may cross the boundary. Only data: a name, bytes and a reply slot.
#[derive(Debug)]
pub(crate) enum BridgeMessage {
    Invoke {
        method: String,
        payload: Vec<u8>,
        reply: oneshot::Sender<Result<Vec<u8>, InvokeError>>,
    },
    Shell(ShellRequest),
}

/// Host integrations outside the operation table.
#[derive(Debug)]
pub(crate) enum ShellRequest {
    SelectFile(oneshot::Sender<Option<PathBuf>>),
    SelectFolder(oneshot::Sender<Option<PathBuf>>),
    ReadClipboard(oneshot::Sender<String>),
    WriteClipboard(String, oneshot::Sender<()>),
    ConfirmQuit(oneshot::Sender<()>),
}
