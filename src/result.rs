pub type Result<T, E = crate::Error> = std::result::Result<T, E>;
