/*!
 * Locator Parser
 * Turns `scheme://[login[:password]@]host[:port]path[?query]` into a FileUrl
 */

use super::{percent_decode, Credentials, FileUrl};
use crate::vfs::scheme::SchemeRegistry;
use crate::vfs::types::{VfsError, VfsResult};

const SCHEME_DELIMITER: &str = "://";

fn malformed(text: &str, reason: &str) -> VfsError {
    VfsError::MalformedLocator(format!("{}: {}", text, reason))
}

fn valid_scheme(scheme: &str) -> bool {
    let mut chars = scheme.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

fn parse_port(text: &str, raw: &str) -> VfsResult<Option<u16>> {
    if raw.is_empty() {
        return Ok(None);
    }
    if !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed(text, "port is not numeric"));
    }
    match raw.parse::<u16>() {
        Ok(0) | Err(_) => Err(malformed(text, "port out of range")),
        Ok(port) => Ok(Some(port)),
    }
}

/// Split `host[:port]` or `[v6]:port`
fn parse_host_port<'a>(text: &str, raw: &'a str) -> VfsResult<(Option<&'a str>, Option<u16>)> {
    if let Some(bracketed) = raw.strip_prefix('[') {
        let end = bracketed
            .find(']')
            .ok_or_else(|| malformed(text, "unterminated IPv6 host"))?;
        let host = &bracketed[..end];
        let rest = &bracketed[end + 1..];
        let port = match rest.strip_prefix(':') {
            Some(port) => parse_port(text, port)?,
            None if rest.is_empty() => None,
            None => return Err(malformed(text, "unexpected characters after IPv6 host")),
        };
        return Ok(((!host.is_empty()).then_some(host), port));
    }

    let (host, port) = match raw.find(':') {
        Some(pos) => (&raw[..pos], parse_port(text, &raw[pos + 1..])?),
        None => (raw, None),
    };
    if host.chars().any(char::is_whitespace) {
        return Err(malformed(text, "host contains whitespace"));
    }
    Ok(((!host.is_empty()).then_some(host), port))
}

/// Split `login[:password]`; both parts are percent-decoded
fn parse_credentials(raw: &str) -> Option<Credentials> {
    let (login, password) = match raw.find(':') {
        Some(pos) => (&raw[..pos], &raw[pos + 1..]),
        None => (raw, ""),
    };
    let credentials = Credentials::new(percent_decode(login), percent_decode(password));
    (!credentials.is_empty()).then_some(credentials)
}

/// Parse a locator using the handlers registered in `registry`
///
/// The grammar is checked before the scheme is looked up, so syntactically
/// broken input is always [`VfsError::MalformedLocator`] and a well-formed
/// locator with an unregistered scheme is [`VfsError::UnknownScheme`].
pub(crate) fn parse(text: &str, registry: &SchemeRegistry) -> VfsResult<FileUrl> {
    let delimiter = text
        .find(SCHEME_DELIMITER)
        .ok_or_else(|| malformed(text, "missing '://'"))?;
    let scheme = &text[..delimiter];
    if !valid_scheme(scheme) {
        return Err(malformed(text, "invalid scheme"));
    }
    let rest = &text[delimiter + SCHEME_DELIMITER.len()..];

    // Authority runs up to the first '/' or '?'; credentials end at its last '@'
    let (authority, remainder) = match rest.find(|c: char| c == '/' || c == '?') {
        Some(pos) => (&rest[..pos], &rest[pos..]),
        None => (rest, ""),
    };
    let (credentials, host_port) = match authority.rfind('@') {
        Some(pos) => (parse_credentials(&authority[..pos]), &authority[pos + 1..]),
        None => (None, authority),
    };
    let (host, port) = parse_host_port(text, host_port)?;

    let handler = registry.handler(scheme)?;
    let (path, query) = if handler.is_query_parsed() {
        match remainder.find('?') {
            Some(pos) => (&remainder[..pos], Some(&remainder[pos + 1..])),
            None => (remainder, None),
        }
    } else {
        (remainder, None)
    };

    let mut url = FileUrl::new(scheme, handler);
    url.set_credentials(credentials);
    url.set_host(host);
    url.set_port(port);
    url.set_path(path);
    url.set_query(query);
    Ok(url)
}
