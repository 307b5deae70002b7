/// Default cap on intervals one teacher may publish. Overridable via `Config`.
pub const MAX_INTERVALS_PER_TEACHER: usize = 200;

/// Seats in a single interval.
pub const MAX_CAPACITY: u32 = 1_000;

pub const MAX_NAME_LEN: usize = 128;
pub const MAX_USERNAME_LEN: usize = 150;
pub const MAX_EMAIL_LEN: usize = 254;
pub const MAX_DESCRIPTION_LEN: usize = 4_096;
pub const MAX_BIO_LEN: usize = 4_096;
