//! Build-time generator for the typed bridge surface.
//!
//! Reads the protobuf descriptor set that `tonic-build` writes and emits, for one
//! service, a typed client that talks through `Invoke`, a bridge-less serializer,
//! and the closed operation table the privileged side dispatches on.

use std::collections::BTreeMap;

use prost::Message;
use prost_types::FileDescriptorSet;

mod emit;
mod error;
mod schema;

pub use error::GenerationError;
pub use schema::{lower_first, rust_method_name, MessageRef, Method, Service};

#[derive(Debug, Clone)]
pub struct Generator {
    namespaces: BTreeMap<String, String>,
    no_argument: Option<String>,
    no_result: Option<String>,
    support: String,
}

impl Default for Generator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator {
    pub fn new() -> Self {
        Generator {
            namespaces: BTreeMap::new(),
            no_argument: None,
            no_result: None,
            support: "crate::invoke".to_owned(),
        }
    }

    /// Maps a protobuf package to the Rust module its messages live in.
    /// Types from packages not registered here fail generation.
    pub fn namespace(mut self, package: impl Into<String>, module: impl Into<String>) -> Self {
        self.namespaces.insert(package.into(), module.into());
        self
    }

    /// Fully qualified type (e.g. `.rpc_common.Empty`) meaning "no argument".
    pub fn no_argument(mut self, type_name: impl Into<String>) -> Self {
        self.no_argument = Some(type_name.into());
        self
    }

    /// Fully qualified type meaning "no result".
    pub fn no_result(mut self, type_name: impl Into<String>) -> Self {
        self.no_result = Some(type_name.into());
        self
    }

    /// Module path providing `Invoke` and `InvokeError` to generated code.
    pub fn support(mut self, module: impl Into<String>) -> Self {
        self.support = module.into();
        self
    }

    /// Resolves `service` (`package.Service`) against an encoded descriptor set.
    pub fn resolve(&self, descriptors: &[u8], service: &str) -> Result<Service, GenerationError> {
        let descriptors = FileDescriptorSet::decode(descriptors)?;
        self.resolve_set(&descriptors, service)
    }

    pub fn resolve_set(
        &self,
        descriptors: &FileDescriptorSet,
        service: &str,
    ) -> Result<Service, GenerationError> {
        schema::Resolver {
            namespaces: &self.namespaces,
            no_argument: self.no_argument.as_deref(),
            no_result: self.no_result.as_deref(),
        }
        .service(descriptors, service)
    }

    /// Produces the Rust source for `service`.
    pub fn generate(&self, descriptors: &[u8], service: &str) -> Result<String, GenerationError> {
        let service = self.resolve(descriptors, service)?;
        self.emit(&service)
    }

    pub fn emit(&self, service: &Service) -> Result<String, GenerationError> {
        let emitter = emit::Emitter {
            service,
            support: emit::support_path(&self.support)?,
        };
        emit::render(emitter.file()?)
    }
}
