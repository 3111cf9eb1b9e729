use super::create::CreateErrorKind;

#[derive(thiserror::Error, Debug)]
pub enum ResolveErrorKind {
    #[error("no binding registered for name={name}")]
    NoBinding { name: String },
    #[error("binding name={name} does not hold the requested {expected}")]
    IncorrectType { name: String, expected: &'static str },
    #[error(transparent)]
    Instantiate(#[from] CreateErrorKind),
}
