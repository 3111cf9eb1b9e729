/// Behavior switches for a container, fixed at construction time.
/// ## Fields
/// - `allow_absent`:
///   If `true`, unresolved dependencies are recoverable: `resolve` returns an
///   error the caller decides about, and injection leaves failed points unset
///   with an error-level event.
///
///   If `false` (the default), the same conditions are escalated to panics
///   with a diagnostic naming the offender.
#[derive(Clone, Copy)]
pub struct Config {
    pub allow_absent: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self { allow_absent: false }
    }
}

impl Config {
    /// Lenient configuration: unresolved dependencies are returned as errors.
    #[inline]
    #[must_use]
    pub const fn lenient() -> Self {
        Self { allow_absent: true }
    }

    /// Strict configuration: unresolved dependencies panic.
    #[inline]
    #[must_use]
    pub const fn strict() -> Self {
        Self { allow_absent: false }
    }
}
