//! Wire schema for the node's UI service and the typed surface generated from it.

pub mod rpc_common {
    tonic::include_proto!("rpc_common");
}

pub mod fs {
    tonic::include_proto!("fs");
}

pub mod ui {
    tonic::include_proto!("ui");
}

pub mod invoke;

/// Typed client, serializer and operation table for `ui.Node`, generated by `codegen`.
pub mod service {
    include!(concat!(env!("OUT_DIR"), "/node_service.rs"));
}

pub use invoke::{Invoke, InvokeError};
pub use service::{NodeOperation, NodeServiceClient, NodeServiceSerializer};
