use std::collections::BTreeSet;

use crate::{ContainerId, ContentHash};

/// Backend-supplied time in milliseconds since the unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MillisSinceEpoch(pub i64);

impl MillisSinceEpoch {
    /// Zero on the wire means the backend did not say.
    pub fn from_wire(millis: i64) -> Option<Self> {
        (millis != 0).then_some(MillisSinceEpoch(millis))
    }
}

/// Attributes shared by files and folders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeInfo {
    pub id: ContentHash,
    pub container: ContainerId,
    pub name: String,
    /// Every directory of the container listing this node as an entry.
    pub parent_ids: BTreeSet<ContentHash>,
    pub created_at: Option<MillisSinceEpoch>,
    pub modified_at: Option<MillisSinceEpoch>,
}

impl NodeInfo {
    pub fn is_root(&self) -> bool {
        self.parent_ids.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
    pub info: NodeInfo,
    pub size: u64,
    /// Zero along with `chunk_count` when the backend sent no chunk list.
    pub chunk_size: u32,
    pub chunk_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Folder {
    pub info: NodeInfo,
    /// True iff the folder's own entry list is non-empty.
    pub has_children: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FsNode {
    File(File),
    Folder(Folder),
}

impl FsNode {
    pub fn info(&self) -> &NodeInfo {
        match self {
            FsNode::File(file) => &file.info,
            FsNode::Folder(folder) => &folder.info,
        }
    }
}

/// Classified nodes of one container, rebuilt on every fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerTree {
    pub container: ContainerId,
    pub files: Vec<File>,
    pub folders: Vec<Folder>,
}

impl ContainerTree {
    pub fn new(container: ContainerId) -> Self {
        ContainerTree {
            container,
            files: Vec::new(),
            folders: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.files.len() + self.folders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn nodes(&self) -> impl Iterator<Item = FsNode> + '_ {
        self.folders
            .iter()
            .cloned()
            .map(FsNode::Folder)
            .chain(self.files.iter().cloned().map(FsNode::File))
    }

    pub fn get(&self, id: &ContentHash) -> Option<FsNode> {
        self.nodes().find(|node| node.info().id == *id)
    }
}

/// All containers the node knows about.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Drive {
    pub containers: Vec<ContainerTree>,
}

impl Drive {
    pub fn files(&self) -> impl Iterator<Item = &File> {
        self.containers.iter().flat_map(|tree| tree.files.iter())
    }

    pub fn folders(&self) -> impl Iterator<Item = &Folder> {
        self.containers.iter().flat_map(|tree| tree.folders.iter())
    }
}
