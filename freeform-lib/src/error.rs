use std::fmt;

#[derive(Debug)]
pub enum FreeformError {
    LengthMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },
    DerivedThickness { layer: String, value: f64 },
    TooFewKnots(usize),
    Record(String),
}

pub type Result<T> = std::result::Result<T, FreeformError>;

impl fmt::Display for FreeformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LengthMismatch {
                what,
                expected,
                found,
            } => write!(f, "{what}: expected {expected} values, found {found}"),
            Self::DerivedThickness { layer, value } => write!(
                f,
                "thickness cannot be set for '{layer}' (got {value}); it is the sum of dz"
            ),
            Self::TooFewKnots(n) => write!(f, "need at least 2 knots, got {n}"),
            Self::Record(msg) => write!(f, "layer record: {msg}"),
        }
    }
}

impl std::error::Error for FreeformError {}
