use ulid::Ulid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Bad field value: day name, inverted time range, capacity shrink.
    Validation(String),
    /// Candidate collides with this existing interval of the same teacher.
    Overlap(Ulid),
    CapacityExceeded(u32),
    /// Student holds no reservation on this interval.
    NotReserved(Ulid),
    AlreadyReserved(Ulid),
    NotFound(Ulid),
    Forbidden(&'static str),
    LimitExceeded(&'static str),
}

impl EngineError {
    /// Stable label used in replies and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            EngineError::Validation(_) => "validation",
            EngineError::Overlap(_) => "overlap",
            EngineError::CapacityExceeded(_) => "capacity_exceeded",
            EngineError::NotReserved(_) => "not_reserved",
            EngineError::AlreadyReserved(_) => "already_reserved",
            EngineError::NotFound(_) => "not_found",
            EngineError::Forbidden(_) => "forbidden",
            EngineError::LimitExceeded(_) => "limit_exceeded",
        }
    }
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::Validation(msg) => write!(f, "validation failed: {msg}"),
            EngineError::Overlap(id) => write!(f, "overlaps existing interval: {id}"),
            EngineError::CapacityExceeded(cap) => {
                write!(f, "no remaining capacity: all {cap} seats reserved")
            }
            EngineError::NotReserved(id) => write!(f, "no reservation on interval: {id}"),
            EngineError::AlreadyReserved(id) => {
                write!(f, "already reserved interval: {id}")
            }
            EngineError::NotFound(id) => write!(f, "not found: {id}"),
            EngineError::Forbidden(msg) => write!(f, "forbidden: {msg}"),
            EngineError::LimitExceeded(msg) => write!(f, "limit exceeded: {msg}"),
        }
    }
}

impl std::error::Error for EngineError {}
