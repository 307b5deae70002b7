use ulid::Ulid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    /// Bad field value: empty name, malformed email, unknown weekday.
    Validation(String),
    NotFound(Ulid),
    /// No department carries this number.
    UnknownDepartment(i64),
    Forbidden(&'static str),
    /// Username, email, department or course number already taken.
    AlreadyExists(String),
    /// Student is not a participant of this course.
    NotEnrolled(Ulid),
    LimitExceeded(&'static str),
}

impl DirectoryError {
    /// Stable label used in replies.
    pub fn kind(&self) -> &'static str {
        match self {
            DirectoryError::Validation(_) => "validation",
            DirectoryError::NotFound(_) | DirectoryError::UnknownDepartment(_) => "not_found",
            DirectoryError::Forbidden(_) => "forbidden",
            DirectoryError::AlreadyExists(_) => "already_exists",
            DirectoryError::NotEnrolled(_) => "not_enrolled",
            DirectoryError::LimitExceeded(_) => "limit_exceeded",
        }
    }
}

impl std::fmt::Display for DirectoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DirectoryError::Validation(msg) => write!(f, "validation failed: {msg}"),
            DirectoryError::NotFound(id) => write!(f, "not found: {id}"),
            DirectoryError::UnknownDepartment(n) => write!(f, "no department numbered {n}"),
            DirectoryError::Forbidden(msg) => write!(f, "forbidden: {msg}"),
            DirectoryError::AlreadyExists(what) => write!(f, "already exists: {what}"),
            DirectoryError::NotEnrolled(id) => write!(f, "not enrolled in course: {id}"),
            DirectoryError::LimitExceeded(msg) => write!(f, "limit exceeded: {msg}"),
        }
    }
}

impl std::error::Error for DirectoryError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(
            DirectoryError::UnknownDepartment(42).to_string(),
            "no department numbered 42"
        );
        let id = Ulid::new();
        assert_eq!(
            DirectoryError::NotEnrolled(id).to_string(),
            format!("not enrolled in course: {id}")
        );
    }

    #[test]
    fn lookup_misses_share_not_found_kind() {
        assert_eq!(DirectoryError::NotFound(Ulid::new()).kind(), "not_found");
        assert_eq!(DirectoryError::UnknownDepartment(1).kind(), "not_found");
    }
}
