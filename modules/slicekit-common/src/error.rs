use thiserror::Error;

#[derive(Error, Debug)]
pub enum SlicekitError {
    #[error("Missing injectable type: a non-empty kind such as \"reducers\" is required")]
    MissingType,

    #[error("Missing key for {kind} entry: every injectable needs a non-empty key")]
    MissingKey { kind: String },

    #[error("Missing error reducer for action type {action_type}")]
    MissingErrorReducer { action_type: String },

    #[error("Invalid matcher: expected a string, an array of strings or a predicate, got {0}")]
    InvalidMatcher(String),

    #[error("Global reducer key {key} collides with the {key} feature slice")]
    StateKeyCollision { key: String },

    #[error("Injector for {kind} is already mounted")]
    AlreadyMounted { kind: String },

    #[error("Dispatch cascade exceeded {limit} actions (last action type: {action_type})")]
    DispatchOverflow { limit: usize, action_type: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, SlicekitError>;
