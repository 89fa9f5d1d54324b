/*!
 * MIME Types
 * Extension lookup and the browsable (HTML-like) test
 */

/// MIME type for a file extension, case-insensitive
pub fn mime_for_extension(extension: &str) -> Option<&'static str> {
    let mime = match extension.to_ascii_lowercase().as_str() {
        "html" | "htm" | "shtml" | "php" | "asp" | "aspx" | "jsp" => "text/html",
        "xhtml" | "xht" => "application/xhtml+xml",
        "xml" => "application/xml",
        "txt" | "text" => "text/plain",
        "css" => "text/css",
        "csv" => "text/csv",
        "js" => "application/javascript",
        "json" => "application/json",
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        "gz" | "tgz" => "application/gzip",
        "tar" => "application/x-tar",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "mp3" => "audio/mpeg",
        "mp4" => "video/mp4",
        _ => return None,
    };
    Some(mime)
}

/// Extension of a filename: text after the last `.`, if any
pub fn extension(name: &str) -> Option<&str> {
    let pos = name.rfind('.')?;
    let ext = &name[pos + 1..];
    (!ext.is_empty()).then_some(ext)
}

/// True for content types a directory listing can be scraped from
pub fn is_browsable(mime: &str) -> bool {
    let mime = mime.trim_start().to_ascii_lowercase();
    mime.starts_with("text/html")
        || mime.starts_with("application/xhtml+xml")
        || mime.starts_with("application/xml")
}

/// True if the filename's extension maps to a browsable type
pub fn is_browsable_name(name: &str) -> bool {
    extension(name)
        .and_then(mime_for_extension)
        .is_some_and(is_browsable)
}
