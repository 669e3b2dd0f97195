#![allow(dead_code)]

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use bridge::{BridgeHandle, Headless};
use proto::fs::{
    file_system_object::Type, Directory, File, FileSystemObject, ObjectList, ObjectWithHash,
};
use proto::rpc_common::{DataUsage, Empty, Guid, GuidList, Hash};
use proto::ui::node_server::{Node, NodeServer};
use proto::ui::*;
use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::{Channel, Endpoint, Server};
use tonic::{Request, Response, Status};

pub const DOCS: &str = "2f0c4a1e-0000-4000-8000-000000000001";

pub fn hash(name: &str) -> Vec<u8> {
    let mut bytes = vec![0; 64];
    blake3::Hasher::new()
        .update(name.as_bytes())
        .finalize_xof()
        .fill(&mut bytes);
    bytes
}

fn object(name: &str, r#type: Type, created_millis: i64) -> ObjectWithHash {
    ObjectWithHash {
        hash: hash(name),
        object: Some(FileSystemObject {
            name: name.to_owned(),
            r#type: Some(r#type),
            timestamps: Some(proto::fs::Timestamps {
                created_millis,
                modified_millis: 0,
            }),
        }),
    }
}

pub fn directory(name: &str, entries: &[&str]) -> ObjectWithHash {
    let entries = entries.iter().map(|entry| hash(entry)).collect();
    object(name, Type::Directory(Directory { entries }), 0)
}

pub fn file(name: &str, size: i64, created_millis: i64) -> ObjectWithHash {
    object(name, Type::File(File { size, hashes: None }), created_millis)
}

/// In-memory node answering the UI service, counting every call it receives.
#[derive(Debug, Clone, Default)]
pub struct MockNode {
    calls: Arc<AtomicUsize>,
    containers: Arc<Mutex<BTreeMap<String, Vec<ObjectWithHash>>>>,
    block_list: Arc<Mutex<Vec<String>>>,
    stall: Duration,
}

impl MockNode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_container(self, guid: &str, objects: Vec<ObjectWithHash>) -> Self {
        self.containers
            .lock()
            .unwrap()
            .insert(guid.to_owned(), objects);
        self
    }

    /// Makes `downloadContainer` hang for `stall` before answering.
    pub fn stalling(mut self, stall: Duration) -> Self {
        self.stall = stall;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    fn objects(&self, guid: &str) -> Result<Vec<ObjectWithHash>, Status> {
        self.containers
            .lock()
            .unwrap()
            .get(guid)
            .cloned()
            .ok_or_else(|| Status::not_found(format!("no container {guid}")))
    }
}

#[tonic::async_trait]
impl Node for MockNode {
    async fn get_object_path(&self, request: Request<Hash>) -> Result<Response<Path>, Status> {
        self.hit();
        let wanted = request.into_inner().data;
        let containers = self.containers.lock().unwrap();
        containers
            .values()
            .flatten()
            .find(|object| object.hash == wanted)
            .and_then(|object| object.object.as_ref())
            .map(|object| {
                Response::new(Path {
                    path: format!("/data/{}", object.name),
                })
            })
            .ok_or_else(|| Status::not_found("unknown object"))
    }

    async fn reveal_object_in_explorer(
        &self,
        _request: Request<Hash>,
    ) -> Result<Response<Empty>, Status> {
        self.hit();
        Ok(Response::new(Empty {}))
    }

    async fn get_all_containers(
        &self,
        _request: Request<Empty>,
    ) -> Result<Response<GuidList>, Status> {
        self.hit();
        let guid = self.containers.lock().unwrap().keys().cloned().collect();
        Ok(Response::new(GuidList { guid }))
    }

    async fn get_download_progress(
        &self,
        _request: Request<Hash>,
    ) -> Result<Response<Progress>, Status> {
        self.hit();
        Ok(Response::new(Progress {
            current: 5,
            total: 10,
        }))
    }

    async fn get_container_objects(
        &self,
        request: Request<Guid>,
    ) -> Result<Response<ObjectList>, Status> {
        self.hit();
        let data = self.objects(&request.into_inner().guid)?;
        Ok(Response::new(ObjectList { data }))
    }

    async fn get_container_root_hash(
        &self,
        request: Request<Guid>,
    ) -> Result<Response<Hash>, Status> {
        self.hit();
        let guid = request.into_inner().guid;
        let root = self
            .objects(&guid)?
            .into_iter()
            .next()
            .ok_or_else(|| Status::not_found(format!("container {guid} is empty")))?;
        Ok(Response::new(Hash { data: root.hash }))
    }

    async fn import_object_from_disk(
        &self,
        request: Request<ObjectFromDiskOptions>,
    ) -> Result<Response<Guid>, Status> {
        self.hit();
        let options = request.into_inner();
        let name = options
            .path
            .rsplit('/')
            .next()
            .filter(|name| !name.is_empty())
            .ok_or_else(|| Status::invalid_argument("empty path"))?
            .to_owned();
        let mut containers = self.containers.lock().unwrap();
        let guid = format!("2f0c4a1e-0000-4000-8000-{:012}", containers.len() + 1);
        containers.insert(guid.clone(), vec![file(&name, 0, 0)]);
        Ok(Response::new(Guid { guid }))
    }

    async fn publish_to_tracker(
        &self,
        _request: Request<PublishingOptions>,
    ) -> Result<Response<Empty>, Status> {
        self.hit();
        Ok(Response::new(Empty {}))
    }

    async fn download_container(
        &self,
        _request: Request<DownloadContainerOptions>,
    ) -> Result<Response<Empty>, Status> {
        self.hit();
        tokio::time::sleep(self.stall).await;
        Ok(Response::new(Empty {}))
    }

    async fn pause_container_download(
        &self,
        _request: Request<Guid>,
    ) -> Result<Response<Empty>, Status> {
        self.hit();
        Ok(Response::new(Empty {}))
    }

    async fn resume_container_download(
        &self,
        _request: Request<Guid>,
    ) -> Result<Response<Empty>, Status> {
        self.hit();
        Ok(Response::new(Empty {}))
    }

    async fn cancel_container_download(
        &self,
        _request: Request<Guid>,
    ) -> Result<Response<Empty>, Status> {
        self.hit();
        Ok(Response::new(Empty {}))
    }

    async fn search_for_objects(
        &self,
        _request: Request<SearchRequest>,
    ) -> Result<Response<SearchResponseList>, Status> {
        self.hit();
        Ok(Response::new(SearchResponseList::default()))
    }

    async fn get_data_usage(
        &self,
        _request: Request<UsageRequest>,
    ) -> Result<Response<DataUsage>, Status> {
        self.hit();
        Err(Status::unavailable("tracker unreachable"))
    }

    async fn modify_block_list_entry(
        &self,
        request: Request<BlockListRequest>,
    ) -> Result<Response<Empty>, Status> {
        self.hit();
        let request = request.into_inner();
        let mut entries = self.block_list.lock().unwrap();
        entries.retain(|entry| *entry != request.url);
        if !request.should_remove {
            entries.push(request.url);
        }
        Ok(Response::new(Empty {}))
    }

    async fn get_block_list(
        &self,
        _request: Request<Empty>,
    ) -> Result<Response<BlockListResponse>, Status> {
        self.hit();
        let entries = self.block_list.lock().unwrap().clone();
        Ok(Response::new(BlockListResponse { entries }))
    }

    async fn log_message(&self, _request: Request<LogRequest>) -> Result<Response<Empty>, Status> {
        self.hit();
        Ok(Response::new(Empty {}))
    }

    async fn reveal_log_file(&self, _request: Request<Empty>) -> Result<Response<Empty>, Status> {
        self.hit();
        Ok(Response::new(Empty {}))
    }

    async fn shutdown(&self, _request: Request<Empty>) -> Result<Response<Empty>, Status> {
        self.hit();
        Ok(Response::new(Empty {}))
    }

    async fn apply_fs_operation(
        &self,
        request: Request<FsOperation>,
    ) -> Result<Response<Empty>, Status> {
        self.hit();
        let operation = request.into_inner();
        self.objects(&operation.container_guid)?;
        Ok(Response::new(Empty {}))
    }
}

/// Serves `node` on an ephemeral local port.
pub async fn serve(node: MockNode) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(
        Server::builder()
            .add_service(NodeServer::new(node))
            .serve_with_incoming(TcpListenerStream::new(listener)),
    );
    addr
}

pub fn channel(addr: SocketAddr) -> Channel {
    Endpoint::from_shared(format!("http://{addr}"))
        .unwrap()
        .connect_lazy()
}

/// Serves `node` and runs a bridge host against it.
pub async fn bridge(node: MockNode) -> BridgeHandle {
    let addr = serve(node).await;
    let (handle, host) = bridge::attach(channel(addr), Headless::default(), 16);
    tokio::spawn(host.run());
    handle
}
