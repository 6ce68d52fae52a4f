use thiserror::Error;

/// Unified error type for the modelschema library.
#[derive(Error, Debug)]
pub enum Error {
    /// Generic configuration error (bad option values, inconsistent descriptors).
    #[error("Config Error: {0}")]
    ConfigError(String),

    /// A removed option was supplied. Callers must migrate instead of relying on a silent no-op.
    #[error("Config Error: option '{option}' has been removed: {hint}")]
    LegacyOption { option: String, hint: &'static str },

    /// An explicit filter entry names something the model does not declare.
    #[error("Config Error: model '{model}' has no attribute or association named '{name}'")]
    UnknownFilterEntry { model: String, name: String },

    /// A model name that is not present in the registry.
    #[error("Config Error: unknown model '{0}'")]
    UnknownModel(String),

    /// Two models registered under the same name.
    #[error("Config Error: model '{0}' is already registered")]
    DuplicateModel(String),

    /// An association kind outside hasOne/belongsTo/hasMany/belongsToMany.
    #[error("Config Error: unrecognized relationship kind '{0}'")]
    UnknownAssociationKind(String),

    /// An array-valued attribute without an element type.
    #[error("Config Error: array type '{0}' requires an explicit inner type")]
    MissingInnerType(String),

    /// A type tag rejected by a strict mapper.
    #[error("Config Error: unsupported attribute type '{0}'")]
    UnsupportedType(String),

    /// A schema fragment that cannot be processed (e.g. no `type` for the nullability adapter).
    #[error("Malformed Input: {0}")]
    MalformedFragment(String),

    /// Wraps an error raised while mapping a single attribute.
    #[error("attribute '{model}.{attribute}': {source}")]
    Attribute {
        model: String,
        attribute: String,
        #[source]
        source: Box<Error>,
    },

    /// JSON (de)serialization failure.
    #[error("Serialization Error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Coarse classification of [`Error`] values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Fatal, caused by options or descriptors supplied by the caller.
    Configuration,
    /// Fatal, caused by a fragment that violates the adapter contract.
    MalformedInput,
    /// Reading or writing JSON failed.
    Serialization,
}

impl Error {
    /// Returns the category this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MalformedFragment(_) => ErrorKind::MalformedInput,
            Error::Json(_) => ErrorKind::Serialization,
            Error::Attribute { source, .. } => source.kind(),
            _ => ErrorKind::Configuration,
        }
    }
}

/// A specialized `Result` type for modelschema operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classification() {
        assert_eq!(Error::UnknownModel("Foo".into()).kind(), ErrorKind::Configuration);
        assert_eq!(Error::MalformedFragment("x".into()).kind(), ErrorKind::MalformedInput);

        let wrapped = Error::Attribute {
            model: "User".into(),
            attribute: "payload".into(),
            source: Box::new(Error::MalformedFragment("no type".into())),
        };
        assert_eq!(wrapped.kind(), ErrorKind::MalformedInput);
    }

    #[test]
    fn test_display_messages() {
        let err = Error::LegacyOption { option: "private".into(), hint: "use 'exclude' instead" };
        assert_eq!(
            err.to_string(),
            "Config Error: option 'private' has been removed: use 'exclude' instead"
        );

        let err = Error::UnknownAssociationKind("hasSeveral".into());
        assert_eq!(err.to_string(), "Config Error: unrecognized relationship kind 'hasSeveral'");
    }
}
