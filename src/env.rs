//! The environment fallback source queried when an injection point has no
//! registry binding.

/// Read-only key/value lookup backing the typed environment fallback.
///
/// Keys are upper-cased by the injector before the lookup.
pub trait EnvSource: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
}

/// [`EnvSource`] over the process environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

#[derive(thiserror::Error, Debug)]
#[error("cannot parse {raw:?} as {target}")]
pub struct EnvParseError {
    pub raw: String,
    pub target: &'static str,
}

/// Best-effort textual conversion for injection-point leaf types.
///
/// Implemented for `String`, signed/unsigned integers of any width,
/// floating point, and `bool`.
pub trait FromEnvStr: Sized {
    /// # Errors
    /// Returns [`EnvParseError`] if `raw` has no textual form of `Self`.
    fn from_env_str(raw: &str) -> Result<Self, EnvParseError>;
}

impl FromEnvStr for String {
    fn from_env_str(raw: &str) -> Result<Self, EnvParseError> {
        Ok(raw.to_owned())
    }
}

impl FromEnvStr for bool {
    fn from_env_str(raw: &str) -> Result<Self, EnvParseError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(EnvParseError {
                raw: raw.to_owned(),
                target: "bool",
            }),
        }
    }
}

macro_rules! impl_from_env_str_parse {
    ($($ty:ty),*) => {
        $(
            impl FromEnvStr for $ty {
                fn from_env_str(raw: &str) -> Result<Self, EnvParseError> {
                    raw.trim().parse().map_err(|_| EnvParseError {
                        raw: raw.to_owned(),
                        target: stringify!($ty),
                    })
                }
            }
        )*
    };
}

impl_from_env_str_parse!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

#[cfg(test)]
mod tests {
    use super::FromEnvStr;

    #[test]
    fn test_parse_integers() {
        assert_eq!(i64::from_env_str(" 42 ").unwrap(), 42);
        assert_eq!(u16::from_env_str("8080").unwrap(), 8080);
        assert!(u8::from_env_str("-1").is_err());
        assert!(i32::from_env_str("ten").is_err());
    }

    #[test]
    fn test_parse_floats() {
        assert_eq!(f64::from_env_str("0.5").unwrap(), 0.5);
        assert!(f32::from_env_str("half").is_err());
    }

    #[test]
    fn test_parse_bool_forms() {
        for raw in ["1", "true", "Yes", "ON"] {
            assert!(bool::from_env_str(raw).unwrap());
        }
        for raw in ["0", "false", "No", "off"] {
            assert!(!bool::from_env_str(raw).unwrap());
        }
        assert!(bool::from_env_str("maybe").is_err());
    }

    #[test]
    fn test_parse_string_is_verbatim() {
        assert_eq!(String::from_env_str(" spaced ").unwrap(), " spaced ");
    }
}
