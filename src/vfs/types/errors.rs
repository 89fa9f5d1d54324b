/*!
 * VFS Error Types
 * Structured error taxonomy shared by every protocol adapter
 */

use miette::Diagnostic;
use thiserror::Error;

use super::operation::FileOperation;
use crate::vfs::url::FileUrl;

/// VFS operation result
pub type VfsResult<T> = Result<T, VfsError>;

/// VFS errors
///
/// Callers branch on the variant: `Unsupported` hides an action,
/// `AuthenticationRequired` prompts for credentials, everything transport
/// related is surfaced as-is.
#[derive(Error, Debug, Clone, Diagnostic)]
pub enum VfsError {
    #[error("Malformed locator: {0}")]
    #[diagnostic(
        code(vfs::malformed_locator),
        help("Locators look like scheme://[login[:password]@]host[:port]/path[?query]")
    )]
    MalformedLocator(String),

    #[error("Unknown scheme: {0}")]
    #[diagnostic(
        code(vfs::unknown_scheme),
        help("Register a scheme handler and file provider before resolving this locator.")
    )]
    UnknownScheme(String),

    #[error("Operation not supported: {0}")]
    #[diagnostic(code(vfs::unsupported))]
    Unsupported(FileOperation),

    #[error("Authentication required for {url}: {message}")]
    #[diagnostic(
        code(vfs::authentication_required),
        help("Set credentials on the locator and retry the operation.")
    )]
    AuthenticationRequired { url: Box<FileUrl>, message: String },

    #[error("Transport failure: {0}")]
    #[diagnostic(code(vfs::transport))]
    Transport(String),

    #[error("Too many redirects (gave up after {0})")]
    #[diagnostic(code(vfs::too_many_redirects))]
    TooManyRedirects(u32),

    #[error("Cyclic reference: {0}")]
    #[diagnostic(
        code(vfs::cyclic_reference),
        help("A symbolic link chain points back to one of its own members.")
    )]
    CyclicReference(String),

    #[error("Not found: {0}")]
    #[diagnostic(code(vfs::not_found))]
    NotFound(String),

    #[error("Already exists: {0}")]
    #[diagnostic(code(vfs::already_exists))]
    AlreadyExists(String),

    #[error("Permission denied: {0}")]
    #[diagnostic(code(vfs::permission_denied))]
    PermissionDenied(String),

    #[error("Not a directory: {0}")]
    #[diagnostic(code(vfs::not_a_directory))]
    NotADirectory(String),

    #[error("Invalid argument: {0}")]
    #[diagnostic(code(vfs::invalid_argument))]
    InvalidArgument(String),

    #[error("I/O error: {0}")]
    #[diagnostic(code(vfs::io))]
    Io(String),
}

impl VfsError {
    /// Build an `AuthenticationRequired` error for the given locator
    pub fn authentication_required(url: &FileUrl, message: impl Into<String>) -> Self {
        VfsError::AuthenticationRequired {
            url: Box::new(url.clone()),
            message: message.into(),
        }
    }

    /// True if the adapter does not implement the requested capability
    #[inline]
    #[must_use]
    pub const fn is_unsupported(&self) -> bool {
        matches!(self, VfsError::Unsupported(_))
    }

    /// True for connection, protocol and redirect failures
    #[inline]
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, VfsError::Transport(_) | VfsError::TooManyRedirects(_))
    }

    /// Locator that needs credentials, if this is an authentication failure
    #[must_use]
    pub fn requires_authentication(&self) -> Option<&FileUrl> {
        match self {
            VfsError::AuthenticationRequired { url, .. } => Some(url),
            _ => None,
        }
    }

    /// Map a `std::io::Error` with a context string
    pub fn from_io(e: std::io::Error, context: impl Into<String>) -> Self {
        use std::io::ErrorKind;
        let context = context.into();
        match e.kind() {
            ErrorKind::NotFound => VfsError::NotFound(context),
            ErrorKind::PermissionDenied => VfsError::PermissionDenied(context),
            ErrorKind::AlreadyExists => VfsError::AlreadyExists(context),
            _ => VfsError::Io(format!("{}: {}", context, e)),
        }
    }
}

impl From<std::io::Error> for VfsError {
    fn from(e: std::io::Error) -> Self {
        let context = e.kind().to_string();
        VfsError::from_io(e, context)
    }
}

impl From<VfsError> for std::io::Error {
    fn from(e: VfsError) -> Self {
        use std::io::ErrorKind;
        let kind = match &e {
            VfsError::NotFound(_) => ErrorKind::NotFound,
            VfsError::PermissionDenied(_) | VfsError::AuthenticationRequired { .. } => {
                ErrorKind::PermissionDenied
            }
            VfsError::AlreadyExists(_) => ErrorKind::AlreadyExists,
            VfsError::Unsupported(_) => ErrorKind::Unsupported,
            VfsError::InvalidArgument(_) | VfsError::MalformedLocator(_) => {
                ErrorKind::InvalidInput
            }
            _ => ErrorKind::Other,
        };
        std::io::Error::new(kind, e)
    }
}
