#[derive(thiserror::Error, Debug)]
pub enum CreateErrorKind {
    #[error("no creator registered for name={name}")]
    NoCreator { name: String },
    #[error("creator takes {expected} argument(s), {actual} provided")]
    ArgCount { expected: usize, actual: usize },
    #[error("argument {index} is not assignable to {expected}")]
    ArgType { index: usize, expected: &'static str },
    #[error(transparent)]
    Factory(#[from] anyhow::Error),
}
