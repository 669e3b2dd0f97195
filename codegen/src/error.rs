use thiserror::Error;

/// Schema or configuration mismatch found while generating. Always fatal for the build.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("descriptor set could not be decoded: {0}")]
    Descriptor(#[from] prost::DecodeError),

    #[error("service `{0}` is not declared in the descriptor set")]
    ServiceNotFound(String),

    #[error("type `{type_name}` comes from unknown namespace `{namespace}`")]
    UnknownNamespace { namespace: String, type_name: String },

    #[error("method `{0}` streams; only unary methods can cross the bridge")]
    Streaming(String),

    #[error("method `{method}` does not declare a {direction} type")]
    MissingType {
        method: String,
        direction: &'static str,
    },

    #[error("method `{method}` uses `{type_name}`, which no file in the descriptor set declares")]
    UndeclaredType { method: String, type_name: String },

    #[error("`{0}` is not a valid Rust path")]
    InvalidPath(String),

    #[error("emitted code does not parse: {0}")]
    Syntax(#[from] syn::Error),
}
