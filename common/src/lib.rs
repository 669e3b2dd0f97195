//! Client-side view of the content-addressed store: identifiers, object records,
//! the graph reconstructor and the object store client.

mod error;
pub mod graph;
mod id;
mod node;
mod record;
mod store;

pub use error::DriveError;
pub use graph::reconstruct;
pub use id::{ContainerId, ContentHash, HASH_LEN};
pub use node::{ContainerTree, Drive, File, Folder, FsNode, MillisSinceEpoch, NodeInfo};
pub use record::{FileMetadata, ObjectRecord, Payload};
pub use store::ObjectStore;
