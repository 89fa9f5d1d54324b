/*!
 * Builtin Schemes
 * Handler policies for the schemes known out of the box
 */

use super::{AuthenticationType, SchemeHandler};
use crate::vfs::url::Credentials;

pub(super) fn file() -> SchemeHandler {
    SchemeHandler::default()
}

pub(super) fn http() -> SchemeHandler {
    web(80)
}

pub(super) fn https() -> SchemeHandler {
    web(443)
}

fn web(port: u16) -> SchemeHandler {
    SchemeHandler {
        standard_port: Some(port),
        authentication: AuthenticationType::Optional,
        query_parsed: true,
        ..SchemeHandler::default()
    }
}

pub(super) fn ftp() -> SchemeHandler {
    SchemeHandler {
        standard_port: Some(21),
        guest_credentials: Some(Credentials::new("anonymous", "")),
        authentication: AuthenticationType::Required,
        ..SchemeHandler::default()
    }
}

pub(super) fn sftp() -> SchemeHandler {
    SchemeHandler {
        standard_port: Some(22),
        authentication: AuthenticationType::Required,
        ..SchemeHandler::default()
    }
}

pub(super) fn smb() -> SchemeHandler {
    SchemeHandler {
        guest_credentials: Some(Credentials::new("GUEST", "")),
        authentication: AuthenticationType::Optional,
        ..SchemeHandler::default()
    }
}
