use proto::fs::{file_system_object::Type, FileSystemObject, ObjectWithHash};

use crate::{ContainerId, ContentHash, DriveError, MillisSinceEpoch};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMetadata {
    pub size: u64,
    pub chunk_size: u32,
    pub chunk_count: usize,
}

/// What a record carries; also decides its kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    File(FileMetadata),
    /// Ordered hashes of the child objects.
    Directory(Vec<ContentHash>),
    Link { target: String },
}

impl Payload {
    pub fn kind(&self) -> &'static str {
        match self {
            Payload::File(_) => "file",
            Payload::Directory(_) => "directory",
            Payload::Link { .. } => "link",
        }
    }
}

/// One object of a container as the backend described it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectRecord {
    pub container: ContainerId,
    pub hash: ContentHash,
    pub name: String,
    pub payload: Payload,
    pub created_at: Option<MillisSinceEpoch>,
    pub modified_at: Option<MillisSinceEpoch>,
}

impl ObjectRecord {
    pub fn from_proto(container: ContainerId, proto: ObjectWithHash) -> Result<Self, DriveError> {
        let hash = ContentHash::from_slice(&proto.hash)?;
        let FileSystemObject {
            name,
            r#type,
            timestamps,
        } = proto
            .object
            .ok_or_else(|| DriveError::NotFound(format!("object {hash} has no record")))?;

        if name.is_empty() {
            return Err(DriveError::InvalidInput(format!("object {hash} has no name")));
        }

        let payload = match r#type {
            Some(Type::File(file)) => {
                let size = u64::try_from(file.size).map_err(|_| {
                    DriveError::InvalidInput(format!("file {hash} has size {}", file.size))
                })?;
                let (chunk_size, chunk_count) = match file.hashes {
                    Some(chunks) => {
                        let chunk_size = u32::try_from(chunks.chunk_size).map_err(|_| {
                            DriveError::InvalidInput(format!(
                                "file {hash} has chunk size {}",
                                chunks.chunk_size
                            ))
                        })?;
                        (chunk_size, chunks.hash.len())
                    }
                    None => (0, 0),
                };
                Payload::File(FileMetadata {
                    size,
                    chunk_size,
                    chunk_count,
                })
            }
            Some(Type::Directory(directory)) => Payload::Directory(
                directory
                    .entries
                    .iter()
                    .map(|entry| ContentHash::from_slice(entry))
                    .collect::<Result<_, _>>()?,
            ),
            Some(Type::Link(link)) => Payload::Link {
                target: link.target_path,
            },
            None => {
                return Err(DriveError::UnsupportedObjectKind {
                    hash,
                    kind: "unset",
                })
            }
        };

        let (created_at, modified_at) = timestamps
            .map(|t| {
                (
                    MillisSinceEpoch::from_wire(t.created_millis),
                    MillisSinceEpoch::from_wire(t.modified_millis),
                )
            })
            .unwrap_or_default();

        Ok(ObjectRecord {
            container,
            hash,
            name,
            payload,
            created_at,
            modified_at,
        })
    }
}
