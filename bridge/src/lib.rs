//! The isolation boundary between the front end and the node.
//!
//! The front end holds a [`BridgeHandle`] and can do exactly two things with it:
//! invoke a declared operation by name with an opaque payload, or ask the host
//! shell for one of a few fixed integrations. Both travel as plain data over a
//! channel to the [`BridgeHost`], which alone owns the network connection and
//! dispatches on the closed [`proto::NodeOperation`] table.

mod config;
mod handle;
mod host;
mod message;
mod shell;

pub use config::{BridgeConfig, BridgeError};
pub use handle::BridgeHandle;
pub use host::{BridgeHost, QuitSignal};
pub use shell::{Headless, Shell};

use tokio::sync::{mpsc, watch};
use tonic::transport::Channel;

/// Builds both ends of a bridge to the node named in `config`.
///
/// The connection is lazy: nothing is dialed until the first operation.
pub fn connect<S: Shell>(
    config: &BridgeConfig,
    shell: S,
) -> Result<(BridgeHandle, BridgeHost<S>), BridgeError> {
    let channel = config.endpoint()?.connect_lazy();
    Ok(attach(channel, shell, config.queue_depth))
}

/// Builds both ends of a bridge over an existing channel.
pub fn attach<S: Shell>(
    channel: Channel,
    shell: S,
    queue_depth: usize,
) -> (BridgeHandle, BridgeHost<S>) {
    let (sender, receiver) = mpsc::channel(queue_depth.max(1));
    let (quit_sender, quit_receiver) = watch::channel(false);
    let handle = BridgeHandle::new(sender, quit_receiver);
    let host = BridgeHost::new(receiver, channel, shell, quit_sender);
    (handle, host)
}
