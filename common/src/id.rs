use std::fmt;
use std::str::FromStr;

use proto::rpc_common::{Guid, Hash};
use uuid::Uuid;

use crate::DriveError;

/// Length of a SHA3-512 digest.
pub const HASH_LEN: usize = 64;

/// Identity of an object within a container. Assigned by the backend, never by us.
///
/// Its textual form is lower-case hex and round-trips exactly.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContentHash([u8; HASH_LEN]);

impl ContentHash {
    pub const fn new(bytes: [u8; HASH_LEN]) -> Self {
        ContentHash(bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, DriveError> {
        let bytes: [u8; HASH_LEN] = bytes.try_into().map_err(|_| {
            DriveError::InvalidInput(format!(
                "content hash must be {HASH_LEN} bytes, got {}",
                bytes.len()
            ))
        })?;
        Ok(ContentHash(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; HASH_LEN] {
        &self.0
    }

    pub fn to_proto(&self) -> Hash {
        Hash {
            data: self.0.to_vec(),
        }
    }
}

impl TryFrom<&Hash> for ContentHash {
    type Error = DriveError;

    fn try_from(hash: &Hash) -> Result<Self, Self::Error> {
        ContentHash::from_slice(&hash.data)
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ContentHash").field(&self.to_string()).finish()
    }
}

impl FromStr for ContentHash {
    type Err = DriveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s)
            .map_err(|err| DriveError::InvalidInput(format!("content hash `{s}`: {err}")))?;
        ContentHash::from_slice(&bytes)
    }
}

/// Namespace holding a set of objects. Its textual form is the hyphenated GUID.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContainerId(Uuid);

impl ContainerId {
    pub const fn from_uuid(uuid: Uuid) -> Self {
        ContainerId(uuid)
    }

    pub fn to_proto(&self) -> Guid {
        Guid {
            guid: self.to_string(),
        }
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0.hyphenated(), f)
    }
}

impl fmt::Debug for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContainerId({self})")
    }
}

impl FromStr for ContainerId {
    type Err = DriveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(ContainerId)
            .map_err(|err| DriveError::InvalidInput(format!("container id `{s}`: {err}")))
    }
}
