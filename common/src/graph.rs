//! Rebuilds the file/folder view of a container from its flat object list.
//!
//! Objects carry no back-pointers. A node's parents are exactly the directories of
//! the same container that list its hash as an entry.

use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use crate::{
    ContainerId, ContainerTree, ContentHash, DriveError, File, Folder, NodeInfo, ObjectRecord,
    Payload,
};

/// `child -> parents`, from one pass over every (directory, entry) pair.
pub fn parent_index(records: &[ObjectRecord]) -> HashMap<ContentHash, BTreeSet<ContentHash>> {
    let mut parents: HashMap<ContentHash, BTreeSet<ContentHash>> = HashMap::new();
    for record in records {
        if let Payload::Directory(entries) = &record.payload {
            for entry in entries {
                parents.entry(*entry).or_default().insert(record.hash);
            }
        }
    }
    parents
}

/// Classifies `records` into files and folders annotated with their parents.
///
/// Every record must belong to `container`. Any failure aborts the whole
/// reconstruction; a partial tree is never returned.
pub fn reconstruct(
    container: ContainerId,
    records: &[ObjectRecord],
) -> Result<ContainerTree, DriveError> {
    if let Some(stray) = records.iter().find(|record| record.container != container) {
        return Err(DriveError::InvalidInput(format!(
            "object {} belongs to container {}, not {container}",
            stray.hash, stray.container
        )));
    }

    let parents = parent_index(records);
    let mut tree = ContainerTree::new(container);
    for record in records {
        let info = NodeInfo {
            id: record.hash,
            container,
            name: record.name.clone(),
            parent_ids: parents.get(&record.hash).cloned().unwrap_or_default(),
            created_at: record.created_at,
            modified_at: record.modified_at,
        };
        match &record.payload {
            Payload::File(metadata) => tree.files.push(File {
                info,
                size: metadata.size,
                chunk_size: metadata.chunk_size,
                chunk_count: metadata.chunk_count,
            }),
            Payload::Directory(entries) => tree.folders.push(Folder {
                info,
                has_children: !entries.is_empty(),
            }),
            Payload::Link { .. } => {
                return Err(DriveError::UnsupportedObjectKind {
                    hash: record.hash,
                    kind: record.payload.kind(),
                })
            }
        }
    }

    debug!(
        %container,
        files = tree.files.len(),
        folders = tree.folders.len(),
        "reconstructed container"
    );
    Ok(tree)
}
