use futures::future::try_join_all;
use proto::{Invoke, NodeServiceClient};
use tracing::{debug, info};

use crate::{graph, ContainerId, ContainerTree, ContentHash, Drive, DriveError, ObjectRecord};

/// Fetches object records per container and turns them into trees.
///
/// Nothing is cached; every call goes to the node. Failures are not retried.
#[derive(Debug, Clone)]
pub struct ObjectStore<B> {
    client: NodeServiceClient<B>,
}

impl<B> ObjectStore<B> {
    pub fn new(client: NodeServiceClient<B>) -> Self {
        ObjectStore { client }
    }

    pub fn client(&self) -> &NodeServiceClient<B> {
        &self.client
    }
}

impl<B: Invoke> ObjectStore<B> {
    #[tracing::instrument(skip(self))]
    pub async fn list_containers(&self) -> Result<Vec<ContainerId>, DriveError> {
        let list = self.client.get_all_containers().await?;
        let containers = list
            .guid
            .iter()
            .map(|guid| guid.parse())
            .collect::<Result<Vec<ContainerId>, _>>()?;
        debug!(count = containers.len(), "listed containers");
        Ok(containers)
    }

    #[tracing::instrument(skip(self))]
    pub async fn list_objects(
        &self,
        container: ContainerId,
    ) -> Result<Vec<ObjectRecord>, DriveError> {
        let list = self.client.get_container_objects(container.to_proto()).await?;
        debug!(count = list.data.len(), "fetched object records");
        list.data
            .into_iter()
            .map(|object| ObjectRecord::from_proto(container, object))
            .collect()
    }

    #[tracing::instrument(skip(self))]
    pub async fn root_hash(&self, container: ContainerId) -> Result<ContentHash, DriveError> {
        let hash = self.client.get_container_root_hash(container.to_proto()).await?;
        ContentHash::try_from(&hash)
    }

    /// Fetches and reconstructs one container.
    pub async fn container_tree(
        &self,
        container: ContainerId,
    ) -> Result<ContainerTree, DriveError> {
        let records = self.list_objects(container).await?;
        graph::reconstruct(container, &records)
    }

    /// Fetches every container concurrently. One failing container fails the drive.
    #[tracing::instrument(skip(self))]
    pub async fn drive(&self) -> Result<Drive, DriveError> {
        let containers = self.list_containers().await?;
        let trees = try_join_all(containers.into_iter().map(|id| self.container_tree(id))).await?;
        let drive = Drive { containers: trees };
        info!(
            containers = drive.containers.len(),
            files = drive.files().count(),
            folders = drive.folders().count(),
            "drive loaded"
        );
        Ok(drive)
    }
}
