use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use tracing::warn;

use crate::message::ShellRequest;

/// Desktop integrations the privileged side offers besides the operation table.
#[async_trait]
pub trait Shell: Send + Sync + 'static {
    async fn select_file(&self) -> Option<PathBuf>;
    async fn select_folder(&self) -> Option<PathBuf>;
    async fn read_clipboard(&self) -> String;
    async fn write_clipboard(&self, text: String);
    /// The front end has finished its own shutdown after a quit request.
    async fn confirm_quit(&self);
}

/// Shell for terminals and tests: no pickers, clipboard kept in memory.
#[derive(Debug, Default)]
pub struct Headless {
    clipboard: Mutex<String>,
    quit_confirmed: AtomicBool,
}

impl Headless {
    pub fn quit_confirmed(&self) -> bool {
        self.quit_confirmed.load(Ordering::SeqCst)
    }

    /// A panic while holding the lock cannot leave a `String` half-written.
    fn clipboard(&self) -> MutexGuard<'_, String> {
        self.clipboard.lock().unwrap_or_else(|poisoned| {
            warn!("clipboard lock was poisoned, recovering");
            poisoned.into_inner()
        })
    }
}

#[async_trait]
impl Shell for Headless {
    async fn select_file(&self) -> Option<PathBuf> {
        None
    }

    async fn select_folder(&self) -> Option<PathBuf> {
        None
    }

    async fn read_clipboard(&self) -> String {
        self.clipboard().clone()
    }

    async fn write_clipboard(&self, text: String) {
        *self.clipboard() = text;
    }

    async fn confirm_quit(&self) {
        self.quit_confirmed.store(true, Ordering::SeqCst);
    }
}

/// Serves one shell request. A caller that stopped waiting is not an error.
pub(crate) async fn answer<S: Shell + ?Sized>(shell: &S, request: ShellRequest) {
    match request {
        ShellRequest::SelectFile(reply) => {
            let _ = reply.send(shell.select_file().await);
        }
        ShellRequest::SelectFolder(reply) => {
            let _ = reply.send(shell.select_folder().await);
        }
        ShellRequest::ReadClipboard(reply) => {
            let _ = reply.send(shell.read_clipboard().await);
        }
        ShellRequest::WriteClipboard(text, reply) => {
            shell.write_clipboard(text).await;
            let _ = reply.send(());
        }
        ShellRequest::ConfirmQuit(reply) => {
            shell.confirm_quit().await;
            let _ = reply.send(());
        }
    }
}
