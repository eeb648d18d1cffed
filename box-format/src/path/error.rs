/// Why an entry name could not be turned into a contained relative path.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SanitizeError {
    #[error("path component `{}` is not valid Unicode", .component.escape_debug())]
    NotUnicode { component: String },

    #[error("path component `{}` is blank", .component.escape_debug())]
    Blank { component: String },

    #[error("path component `{}` contains forbidden character {ch:?}", .component.escape_debug())]
    ForbiddenChar { component: String, ch: char },

    #[error("name has no usable path components")]
    Empty,
}

impl From<SanitizeError> for std::io::Error {
    fn from(e: SanitizeError) -> Self {
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e)
    }
}
