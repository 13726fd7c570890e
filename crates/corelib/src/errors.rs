use thiserror::Error;

/// Host-face failures of rational arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArithError {
    #[error("division by zero")]
    DivisionByZero,
    #[error("cannot simplify 0/0")]
    SimplifyDegenerate,
    #[error("decimal '{input}' does not terminate within supported precision")]
    PrecisionOverflow { input: String },
    #[error("magnitude exceeds {bits} bits")]
    MagnitudeOutOfRange { bits: u32 },
}

/// Failures observed while evaluating or constructing a circuit.
///
/// Only the evaluator reports these discriminated kinds; a built constraint
/// system surfaces every violated relation as one unsatisfied proof.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CircuitError {
    #[error("division by zero")]
    DivisionByZero,
    #[error("cannot simplify 0/0")]
    SimplifyDegenerate,
    #[error("decimal '{input}' does not terminate within supported precision")]
    PrecisionOverflow { input: String },
    #[error("magnitude exceeds {bits} bits")]
    MagnitudeOutOfRange { bits: u32 },
    #[error("hash does not match committed preimage")]
    HashCommitmentMismatch,
    #[error("bit decomposition does not round-trip")]
    BitDecompositionMismatch,
    #[error("selection index outside [0, max)")]
    BoundViolation,
    #[error("relation '{0}' does not hold")]
    RelationViolated(&'static str),
    #[error("revealed artifact does not match selected position")]
    SelectionMismatch,
    #[error("invalid selection bound: {0}")]
    InvalidBound(String),
    #[error("no assignment for input '{0}'")]
    MissingAssignment(String),
}

impl From<ArithError> for CircuitError {
    fn from(e: ArithError) -> Self {
        match e {
            ArithError::DivisionByZero => CircuitError::DivisionByZero,
            ArithError::SimplifyDegenerate => CircuitError::SimplifyDegenerate,
            ArithError::PrecisionOverflow { input } => CircuitError::PrecisionOverflow { input },
            ArithError::MagnitudeOutOfRange { bits } => CircuitError::MagnitudeOutOfRange { bits },
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config: {0}")]
    Invalid(String),
    #[error("reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// Engine-side compile failures.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("curve '{curve}' not supported by engine '{engine}'")]
    CurveUnsupported { engine: String, curve: String },
    #[error("proving scheme '{scheme}' not supported by engine '{engine}'")]
    SchemeUnsupported { engine: String, scheme: String },
    #[error("circuit definition failed: {0}")]
    Circuit(#[from] CircuitError),
}

/// Engine-side proving failures.
///
/// `Unsatisfied` deliberately carries no detail about which relation failed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProofError {
    #[error("proof failed")]
    Unsatisfied,
    #[error("proving key does not match constraint system")]
    KeyMismatch,
    #[error("malformed proof: {0}")]
    Malformed(String),
}
