#[derive(thiserror::Error, Debug)]
pub enum InjectErrorKind {
    #[error("{} injection point(s) left unresolved: {}", .keys.len(), .keys.join(", "))]
    UnresolvedPoints { keys: Vec<String> },
}
