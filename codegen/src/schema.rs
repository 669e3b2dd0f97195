use std::collections::{BTreeMap, HashMap};

use heck::{ToSnakeCase, ToUpperCamelCase};
use prost_types::{DescriptorProto, FileDescriptorSet, MethodDescriptorProto};

use crate::GenerationError;

/// A message type as seen from generated code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageRef {
    /// The designated empty type (no argument, or no result), with its Rust path.
    Sentinel(String),
    /// Fully qualified Rust path of the prost message, e.g. `crate::fs::ObjectList`.
    Message(String),
}

impl MessageRef {
    /// Rust path of the underlying message, sentinel or not.
    pub fn path(&self) -> &str {
        match self {
            MessageRef::Sentinel(path) | MessageRef::Message(path) => path,
        }
    }

    pub fn is_sentinel(&self) -> bool {
        matches!(self, MessageRef::Sentinel(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Method {
    /// Name as declared in the schema, e.g. `GetAllContainers`.
    pub name: String,
    /// Name that crosses the bridge, e.g. `getAllContainers`.
    pub wire_name: String,
    /// Rust method name, matching tonic's generated client, e.g. `get_all_containers`.
    pub rust_name: String,
    pub request: MessageRef,
    pub response: MessageRef,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Service {
    pub name: String,
    /// Rust path of the module holding tonic's `<service>_client` module.
    pub module: String,
    pub methods: Vec<Method>,
}

impl Service {
    /// Path of tonic's generated client type, e.g. `crate::ui::node_client::NodeClient`.
    pub fn tonic_client_path(&self) -> String {
        format!(
            "{}::{}_client::{}Client",
            self.module,
            self.name.to_snake_case(),
            self.name.to_upper_camel_case()
        )
    }
}

/// Lower-cases the first character and leaves the rest alone.
///
/// `GetAllContainers` becomes `getAllContainers`; this is not a general case converter.
pub fn lower_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Rust method name as prost and tonic spell it.
///
/// Keywords usable as raw identifiers stay as they are and are emitted raw; the few
/// that cannot be raw get an underscore suffix.
pub fn rust_method_name(name: &str) -> String {
    let snake = name.to_snake_case();
    match snake.as_str() {
        "self" | "super" | "extern" | "crate" => snake + "_",
        _ => snake,
    }
}

/// A message as declared: its file's package and the messages it is nested in.
struct Declared<'d> {
    package: &'d str,
    outer: Vec<&'d str>,
    name: &'d str,
}

impl Declared<'_> {
    /// `Outer.Inner` in package `ui` lives at `<module>::outer::Inner` in prost's output.
    fn rust_path(&self, module: &str) -> String {
        let mut path = module.to_owned();
        for outer in &self.outer {
            path.push_str("::");
            path.push_str(&outer.to_snake_case());
        }
        path.push_str("::");
        path.push_str(&self.name.to_upper_camel_case());
        path
    }
}

/// Every message of the set by fully qualified name, leading dot included.
fn declared_messages(descriptors: &FileDescriptorSet) -> HashMap<String, Declared<'_>> {
    fn visit<'d>(
        index: &mut HashMap<String, Declared<'d>>,
        package: &'d str,
        outer: &[&'d str],
        message: &'d DescriptorProto,
    ) {
        let name = message.name();
        let mut qualified = String::from(".");
        for segment in std::iter::once(package)
            .filter(|package| !package.is_empty())
            .chain(outer.iter().copied())
        {
            qualified.push_str(segment);
            qualified.push('.');
        }
        qualified.push_str(name);
        index.insert(
            qualified,
            Declared {
                package,
                outer: outer.to_vec(),
                name,
            },
        );

        let mut nested_outer = outer.to_vec();
        nested_outer.push(name);
        for nested in &message.nested_type {
            visit(index, package, &nested_outer, nested);
        }
    }

    let mut index = HashMap::new();
    for file in &descriptors.file {
        for message in &file.message_type {
            visit(&mut index, file.package(), &[], message);
        }
    }
    index
}

pub(crate) struct Resolver<'a> {
    pub namespaces: &'a BTreeMap<String, String>,
    pub no_argument: Option<&'a str>,
    pub no_result: Option<&'a str>,
}

impl Resolver<'_> {
    /// Finds `service` (as `package.Service`) and resolves every method's types.
    pub fn service(
        &self,
        descriptors: &FileDescriptorSet,
        service: &str,
    ) -> Result<Service, GenerationError> {
        let (package, service_name) = service.rsplit_once('.').unwrap_or(("", service));

        let declared = descriptors
            .file
            .iter()
            .filter(|file| file.package() == package)
            .flat_map(|file| file.service.iter())
            .find(|candidate| candidate.name() == service_name)
            .ok_or_else(|| GenerationError::ServiceNotFound(service.to_owned()))?;

        let module = self.namespace(package, service)?.to_owned();
        let messages = declared_messages(descriptors);
        let methods = declared
            .method
            .iter()
            .map(|method| self.method(&messages, method))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Service {
            name: service_name.to_owned(),
            module,
            methods,
        })
    }

    fn method(
        &self,
        messages: &HashMap<String, Declared<'_>>,
        method: &MethodDescriptorProto,
    ) -> Result<Method, GenerationError> {
        let name = method.name().to_owned();
        if method.client_streaming() || method.server_streaming() {
            return Err(GenerationError::Streaming(name));
        }

        let request = self.message(
            messages,
            &name,
            "request",
            method.input_type.as_deref(),
            self.no_argument,
        )?;
        let response = self.message(
            messages,
            &name,
            "response",
            method.output_type.as_deref(),
            self.no_result,
        )?;

        Ok(Method {
            wire_name: lower_first(&name),
            rust_name: rust_method_name(&name),
            name,
            request,
            response,
        })
    }

    fn message(
        &self,
        messages: &HashMap<String, Declared<'_>>,
        method: &str,
        direction: &'static str,
        type_name: Option<&str>,
        sentinel: Option<&str>,
    ) -> Result<MessageRef, GenerationError> {
        let type_name = type_name
            .filter(|name| !name.is_empty())
            .ok_or_else(|| GenerationError::MissingType {
                method: method.to_owned(),
                direction,
            })?;

        // Relative names never appear in descriptors protoc writes.
        let qualified = type_name.trim_start_matches('.');
        let declared = messages
            .get(&format!(".{qualified}"))
            .ok_or_else(|| GenerationError::UndeclaredType {
                method: method.to_owned(),
                type_name: qualified.to_owned(),
            })?;
        let module = self.namespace(declared.package, qualified)?;
        let path = declared.rust_path(module);

        if sentinel == Some(type_name) {
            Ok(MessageRef::Sentinel(path))
        } else {
            Ok(MessageRef::Message(path))
        }
    }

    fn namespace(&self, namespace: &str, type_name: &str) -> Result<&str, GenerationError> {
        self.namespaces
            .get(namespace)
            .map(String::as_str)
            .ok_or_else(|| GenerationError::UnknownNamespace {
                namespace: namespace.to_owned(),
                type_name: type_name.to_owned(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lower_first_is_a_pure_rename() {
        assert_eq!(lower_first("GetAllContainers"), "getAllContainers");
        assert_eq!(lower_first("getAllContainers"), "getAllContainers");
        assert_eq!(lower_first("ABC"), "aBC");
        assert_eq!(lower_first("X"), "x");
        assert_eq!(lower_first(""), "");
    }

    #[test]
    fn method_names_follow_prost() {
        assert_eq!(rust_method_name("GetAllContainers"), "get_all_containers");
        assert_eq!(rust_method_name("Type"), "type");
        assert_eq!(rust_method_name("Crate"), "crate_");
        assert_eq!(rust_method_name("Self"), "self_");
    }

    #[test]
    fn nested_messages_map_to_prost_modules() {
        let declared = Declared {
            package: "ui",
            outer: vec!["SearchResponse", "RootEntry"],
            name: "Chunk",
        };
        assert_eq!(
            declared.rust_path("crate::ui"),
            "crate::ui::search_response::root_entry::Chunk"
        );
    }

    #[test]
    fn tonic_client_path() {
        let service = Service {
            name: "Node".to_owned(),
            module: "crate::ui".to_owned(),
            methods: vec![],
        };
        assert_eq!(service.tonic_client_path(), "crate::ui::node_client::NodeClient");
    }
}
