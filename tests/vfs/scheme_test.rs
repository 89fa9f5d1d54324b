/*!
 * Scheme Registry Tests
 * Builtin policies, custom providers and the factory step
 */

use pretty_assertions::assert_eq;
use std::io::Read;
use std::sync::Arc;

use remote_vfs::vfs::{
    AbstractFile, AuthenticationType, Credentials, FileOperation, FileProvider, FileUrl,
    SchemeHandler, SchemeRegistry, VfsError, VfsResult,
};

use super::common::{default_registry, StubFile};

#[test]
fn test_builtin_schemes() {
    let registry = default_registry();
    assert_eq!(
        registry.schemes(),
        vec!["file", "ftp", "http", "https", "sftp", "smb"]
    );

    let ftp = registry.handler("ftp").unwrap();
    assert_eq!(ftp.standard_port(), Some(21));
    assert_eq!(ftp.authentication_type(), AuthenticationType::Required);
    assert_eq!(
        ftp.guest_credentials(),
        Some(&Credentials::new("anonymous", ""))
    );

    let smb = registry.handler("SMB").unwrap();
    assert_eq!(smb.standard_port(), None);
    assert_eq!(smb.authentication_type(), AuthenticationType::Optional);
    assert!(!smb.is_query_parsed());

    let https = registry.handler("https").unwrap();
    assert_eq!(https.standard_port(), Some(443));
    assert!(https.is_query_parsed());

    assert_eq!(
        registry.handler("file").unwrap().authentication_type(),
        AuthenticationType::None
    );
}

#[test]
fn test_adapters_only_for_supported_schemes() {
    let registry = default_registry();
    assert!(registry.has_provider("file"));
    assert!(registry.has_provider("http"));
    assert!(registry.has_provider("https"));
    assert!(!registry.has_provider("ftp"));

    let url = registry.parse("sftp://host/home").unwrap();
    assert!(matches!(
        registry.get_file(url),
        Err(VfsError::UnknownScheme(_))
    ));
}

#[test]
fn test_handler_builder_validation() {
    assert!(SchemeHandler::builder().standard_port(0).build().is_err());
    assert!(SchemeHandler::builder().path_separator("").build().is_err());
    assert!(SchemeHandler::builder()
        .guest_credentials(Credentials::new("guest", ""))
        .build()
        .is_err());

    let handler = SchemeHandler::builder()
        .standard_port(9000)
        .authentication(AuthenticationType::Optional)
        .guest_credentials(Credentials::new("guest", ""))
        .path_separator("\\")
        .build()
        .unwrap();
    assert_eq!(handler.path_separator(), "\\");
}

/// Provider producing stub files, counting calls
#[derive(Default)]
struct StubProvider {
    created: parking_lot::Mutex<Vec<String>>,
}

impl FileProvider for StubProvider {
    fn create(&self, url: FileUrl, _registry: &Arc<SchemeRegistry>) -> VfsResult<AbstractFile> {
        self.created.lock().push(url.to_string());
        let name = url.filename().unwrap_or_default().to_string();
        Ok(Arc::new(StubFile::new(&name, false, 7, 0)))
    }
}

#[test]
fn test_custom_provider() {
    let registry = Arc::new(SchemeRegistry::new());
    let provider = Arc::new(StubProvider::default());
    registry
        .register(
            "mem",
            SchemeHandler::builder().build().unwrap(),
            Arc::clone(&provider) as Arc<dyn FileProvider>,
        )
        .unwrap();

    let file = registry.resolve("mem://box/dir/item").unwrap();
    assert_eq!(file.name(), "item");
    assert_eq!(file.size(), 7);
    assert_eq!(*provider.created.lock(), vec!["mem://box/dir/item".to_string()]);

    assert!(matches!(
        registry.register_handler("MEM", SchemeHandler::default()),
        Err(VfsError::AlreadyExists(_))
    ));
}

#[test]
fn test_custom_path_separator() {
    let registry = SchemeRegistry::new();
    registry
        .register_handler(
            "win",
            SchemeHandler::builder().path_separator("\\").build().unwrap(),
        )
        .unwrap();

    let url = registry.root_url("win").unwrap();
    assert_eq!(url.path(), "\\");
    assert!(url.is_root());

    let child = url.child("dir").child("file.txt");
    assert_eq!(child.path(), "\\dir\\file.txt");
    assert_eq!(child.filename(), Some("file.txt"));
    assert_eq!(child.parent().unwrap().path(), "\\dir\\");
}

#[test]
fn test_default_read_at_refuses_offsets() {
    let file = StubFile::file("greeting.txt");

    let mut body = String::new();
    file.open_read_at(0).unwrap().read_to_string(&mut body).unwrap();
    assert_eq!(body, "greeting.txt");

    assert!(matches!(
        file.open_read_at(4).map(|_| ()),
        Err(VfsError::Unsupported(FileOperation::ReadFile))
    ));
}
