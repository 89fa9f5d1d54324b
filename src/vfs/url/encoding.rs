/*!
 * Credential Encoding
 * Percent-encoding of login and password segments
 */

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::borrow::Cow;

/// Everything but ASCII alphanumerics and `-._*` is escaped, which covers the
/// URL reserved set `: @ & = + $ , / ? # [ ]`, a literal `%` and non-ASCII bytes.
const CREDENTIALS: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'*');

/// Percent-encode a login or password for inclusion in a locator
pub fn encode_credential(raw: &str) -> Cow<'_, str> {
    utf8_percent_encode(raw, CREDENTIALS).into()
}

/// Percent-decode a login, password or path segment
///
/// Invalid UTF-8 sequences are replaced rather than rejected.
pub fn percent_decode(encoded: &str) -> String {
    percent_decode_str(encoded).decode_utf8_lossy().into_owned()
}
