/*!
 * Network Adapter Tests
 * Lazy resolution, scraped listings, redirects and ranged reads over a scripted transport
 */

use mockall::mock;
use pretty_assertions::assert_eq;
use reqwest::header::{HeaderMap, CONTENT_TYPE, LAST_MODIFIED};
use reqwest::{Method, StatusCode};
use std::io::{self, Read, Seek, SeekFrom};
use std::sync::Arc;
use std::time::{Duration, UNIX_EPOCH};

use remote_vfs::vfs::http::{HttpClient, HttpRequest, HttpResponse};
use remote_vfs::vfs::{
    Credentials, FileOperation, SchemeRegistry, VfsError, VfsResult, UNKNOWN_SIZE,
};
use remote_vfs::ClientConfig;

use super::common::{names, Route, ScriptedServer};

fn setup() -> (Arc<ScriptedServer>, Arc<SchemeRegistry>) {
    let server = ScriptedServer::new();
    let registry = server.registry(&ClientConfig::default());
    (server, registry)
}

fn sorted(mut names: Vec<String>) -> Vec<String> {
    names.sort();
    names
}

// =============================================================================
// Construction and lazy resolution
// =============================================================================

#[test]
fn test_container_heuristic_without_network() {
    let (server, registry) = setup();

    for locator in [
        "http://host",
        "http://host/dir/",
        "http://host/index.html",
        "http://host/search?q=rust",
    ] {
        let file = registry.resolve(locator).unwrap();
        assert!(file.is_directory(), "{} should look like a directory", locator);
        assert_eq!(file.size(), UNKNOWN_SIZE);
    }
    assert_eq!(server.request_count(), 0);
}

#[test]
fn test_resolution_uses_head_once() {
    let (server, registry) = setup();
    server.route(
        "http://host/archive.zip",
        Route::ok("application/zip", vec![0u8; 4096])
            .with_header(LAST_MODIFIED, "Sun, 06 Nov 1994 08:49:37 GMT"),
    );

    let file = registry.resolve("http://host/archive.zip").unwrap();
    assert_eq!(server.request_count(), 0);

    assert_eq!(file.size(), 4096);
    assert!(file.exists());
    assert!(!file.is_directory());
    assert_eq!(
        file.last_modified(),
        UNIX_EPOCH + Duration::from_secs(784_111_777)
    );

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, Method::HEAD);
}

#[test]
fn test_resolution_flips_directory_for_html() {
    let (server, registry) = setup();
    server.route("http://host/listing", Route::html(""));

    let file = registry.resolve("http://host/listing").unwrap();
    assert!(file.is_directory());
    assert_eq!(server.request_count(), 1);
}

#[test]
fn test_failed_resolution_is_not_retried() {
    let (server, registry) = setup();
    let file = registry.resolve("http://host/missing.bin").unwrap();

    assert!(!file.exists());
    assert_eq!(file.size(), UNKNOWN_SIZE);
    assert!(!file.exists());
    assert_eq!(server.request_count(), 1);
}

#[test]
fn test_exists_resolves_provisional_directory() {
    let (server, registry) = setup();
    server.route("http://host/dir/", Route::html("<html></html>"));

    let file = registry.resolve("http://host/dir/").unwrap();
    assert!(file.exists());
    assert!(file.exists());
    assert_eq!(server.request_count(), 1);
}

#[test]
fn test_construction_requires_host() {
    let (_server, registry) = setup();
    assert!(matches!(
        registry.resolve("http:///nowhere"),
        Err(VfsError::InvalidArgument(_))
    ));
}

#[test]
fn test_read_only_capabilities() {
    let (server, registry) = setup();
    let file = registry.resolve("http://host/my%20notes.txt").unwrap();

    assert_eq!(file.name(), "my notes.txt");
    assert!(file.is_supported(FileOperation::ReadFile));
    assert!(file.is_supported(FileOperation::RandomReadFile));
    assert!(file.is_supported(FileOperation::ListChildren));
    assert!(!file.is_supported(FileOperation::WriteFile));
    assert_eq!(file.permissions().to_rwx_string(), "r--------");
    assert_eq!(file.changeable_permissions(), 0);
    assert!(file.owner().is_none());

    assert!(matches!(
        file.delete(),
        Err(VfsError::Unsupported(FileOperation::Delete))
    ));
    assert!(matches!(
        file.mkdir(),
        Err(VfsError::Unsupported(FileOperation::CreateDirectory))
    ));
    assert!(matches!(
        file.open_write().map(|_| ()),
        Err(VfsError::Unsupported(FileOperation::WriteFile))
    ));
    assert!(matches!(
        file.free_space(),
        Err(VfsError::Unsupported(FileOperation::GetFreeSpace))
    ));
    assert_eq!(server.request_count(), 0);
}

#[test]
fn test_parent_is_cached_and_offline() {
    let (server, registry) = setup();
    let file = registry.resolve("http://host/a/b.txt").unwrap();

    let parent = file.parent().unwrap().unwrap();
    assert_eq!(parent.name(), "a");
    assert!(parent.is_directory());
    assert!(Arc::ptr_eq(&parent, &file.parent().unwrap().unwrap()));

    let root = parent.parent().unwrap().unwrap();
    assert!(root.is_root());
    assert_eq!(root.name(), "host");
    assert!(root.parent().unwrap().is_none());
    assert_eq!(server.request_count(), 0);
}

// =============================================================================
// Authentication
// =============================================================================

mock! {
    pub Transport {}

    impl HttpClient for Transport {
        fn execute(&self, request: HttpRequest) -> VfsResult<HttpResponse>;
    }
}

fn status_response(request: &HttpRequest, status: StatusCode) -> HttpResponse {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, "text/plain".parse().unwrap());
    HttpResponse {
        status,
        final_url: request.url.clone(),
        headers,
        body: Box::new(io::Cursor::new(b"secret".to_vec())),
    }
}

#[test]
fn test_unauthorized_requires_authentication() {
    let mut transport = MockTransport::new();
    transport
        .expect_execute()
        .times(1)
        .returning(|request| Ok(status_response(&request, StatusCode::UNAUTHORIZED)));

    let registry =
        SchemeRegistry::with_http_client(Arc::new(transport), &ClientConfig::default()).unwrap();
    let file = registry.resolve("https://host/private.txt").unwrap();

    let err = file.open_read().err().unwrap();
    let url = err.requires_authentication().expect("authentication error");
    assert_eq!(url.to_string(), "https://host/private.txt");
    assert!(!err.is_transport());
}

#[test]
fn test_caller_retries_with_credentials() {
    let mut transport = MockTransport::new();
    transport.expect_execute().times(2).returning(|request| {
        let status = match &request.credentials {
            Some(c) if c.login() == "alice" => StatusCode::OK,
            _ => StatusCode::UNAUTHORIZED,
        };
        Ok(status_response(&request, status))
    });

    let registry =
        SchemeRegistry::with_http_client(Arc::new(transport), &ClientConfig::default()).unwrap();
    let file = registry.resolve("https://host/private.txt").unwrap();

    let err = file.open_read().err().unwrap();
    let mut url = err.requires_authentication().unwrap().clone();
    url.set_credentials(Some(Credentials::new("alice", "pw")));

    let mut body = String::new();
    registry
        .get_file(url)
        .unwrap()
        .open_read()
        .unwrap()
        .read_to_string(&mut body)
        .unwrap();
    assert_eq!(body, "secret");
}

#[test]
fn test_not_found_is_transport_failure() {
    let (_server, registry) = setup();
    let file = registry.resolve("http://host/missing.txt").unwrap();
    let err = file.open_read().err().unwrap();
    assert!(matches!(err, VfsError::Transport(_)));
}

// =============================================================================
// Listing
// =============================================================================

const LISTING: &str = r##"<html><body>
<a href="a.txt">a</a> <a href='sub/'>sub</a>
<a href="/moved/b.html#frag">b</a> <a href="mailto:x@y.z">mail</a> <a href="#top">top</a>
<a href="javascript:void(0)">js</a> <a href="../outside.txt">out</a> <a href="http://other/moved/x">x</a>
<a href="a.txt">again</a> <a href="./">self</a> <a href="?sort=name">sorted</a>
</body></html>
"##;

#[test]
fn test_list_follows_redirect_and_scrapes_links() {
    let (server, registry) = setup();
    server.route("http://host/dir/", Route::redirect("/moved/"));
    server.route("http://host/moved/", Route::html(LISTING));

    let dir = registry.resolve("http://user:pw@host/dir/").unwrap();
    let children = dir.list().unwrap();

    assert_eq!(sorted(names(&children)), vec!["a.txt", "b.html", "sub"]);
    for child in &children {
        assert!(child.url().to_string().starts_with("http://host/moved/"));
        assert_eq!(child.url().login(), Some("user"));
    }

    let requests = server.requests();
    assert_eq!(requests.len(), 2);
    assert!(requests.iter().all(|r| r.method == Method::GET && !r.follow_redirects));
    assert_eq!(requests[1].url, "http://host/moved/");
    assert_eq!(requests[1].login.as_deref(), Some("user"));
}

#[test]
fn test_credentials_stay_on_their_host() {
    let (server, registry) = setup();
    server.route("http://host/pub/", Route::redirect("http://mirror/pub/"));
    server.route(
        "http://mirror/pub/",
        Route::html(r#"<a href="file.tar.gz">f</a>"#),
    );

    let dir = registry.resolve("http://user:pw@host/pub/").unwrap();
    let children = dir.list().unwrap();

    assert_eq!(names(&children), vec!["file.tar.gz"]);
    assert_eq!(children[0].url().host(), Some("mirror"));
    assert!(!children[0].url().contains_credentials());

    let requests = server.requests();
    assert_eq!(requests[0].login.as_deref(), Some("user"));
    assert_eq!(requests[1].url, "http://mirror/pub/");
    assert_eq!(requests[1].login, None);
}

#[test]
fn test_credentials_dropped_for_rest_of_redirect_chain() {
    let (server, registry) = setup();
    server.route("http://host/a/", Route::redirect("/b/"));
    server.route("http://host/b/", Route::redirect("http://MIRROR/c/"));
    server.route("http://mirror/c/", Route::redirect("http://host/d/"));
    server.route("http://host/d/", Route::html(r#"<a href="x">x</a>"#));

    let dir = registry.resolve("http://user:pw@HOST/a/").unwrap();
    dir.list().unwrap();

    let logins: Vec<Option<String>> = server.requests().into_iter().map(|r| r.login).collect();
    assert_eq!(
        logins,
        vec![Some("user".to_string()), Some("user".to_string()), None, None]
    );
}

#[test]
fn test_too_many_redirects() {
    let server = ScriptedServer::new();
    let registry = server.registry(&ClientConfig::default().with_max_redirects(2));
    server.route("http://host/loop/", Route::redirect("/loop/"));

    let dir = registry.resolve("http://host/loop/").unwrap();
    let err = dir.list().err().unwrap();
    assert!(matches!(err, VfsError::TooManyRedirects(2)));
    assert!(err.is_transport());
    assert_eq!(server.request_count(), 3);
}

#[test]
fn test_list_requires_browsable_content() {
    let (server, registry) = setup();
    server.route("http://host/data/", Route::ok("application/json", "{}"));

    let dir = registry.resolve("http://host/data/").unwrap();
    assert!(matches!(dir.list(), Err(VfsError::Transport(_))));
}

#[test]
fn test_list_keeps_links_read_before_failure() {
    let (server, registry) = setup();
    let first_line = "<a href=\"one.txt\">1</a>\n";
    let body = format!("{}<a href=\"two.txt\">2</a>\n", first_line);
    server.route(
        "http://host/flaky/",
        Route::html(&body).failing_after(first_line.len()),
    );

    let dir = registry.resolve("http://host/flaky/").unwrap();
    assert_eq!(names(&dir.list().unwrap()), vec!["one.txt"]);
}

// =============================================================================
// Reads
// =============================================================================

#[test]
fn test_open_read_at_uses_range() {
    let (server, registry) = setup();
    server.route(
        "http://host/notes.txt",
        Route::ok("text/plain", "hello world").with_ranges(),
    );

    let file = registry.resolve("http://host/notes.txt").unwrap();
    let mut tail = String::new();
    file.open_read_at(6)
        .unwrap()
        .read_to_string(&mut tail)
        .unwrap();

    assert_eq!(tail, "world");
    assert_eq!(server.requests()[0].range.as_deref(), Some("bytes=6-"));
}

#[test]
fn test_open_read_at_refuses_full_restart() {
    let (server, registry) = setup();
    server.route("http://host/notes.txt", Route::ok("text/plain", "hello world"));

    let file = registry.resolve("http://host/notes.txt").unwrap();
    assert!(matches!(
        file.open_read_at(6).map(|_| ()),
        Err(VfsError::Transport(_))
    ));

    let mut all = String::new();
    file.open_read_at(0)
        .unwrap()
        .read_to_string(&mut all)
        .unwrap();
    assert_eq!(all, "hello world");
}

#[test]
fn test_random_read_fetches_one_window_per_seek() {
    let (server, registry) = setup();
    let data: Vec<u8> = (0..3000u32).map(|i| (i % 251) as u8).collect();
    server.route(
        "http://host/data.bin",
        Route::ok("application/octet-stream", data.clone()).with_ranges(),
    );

    let file = registry.resolve("http://host/data.bin").unwrap();
    let mut reader = file.open_random_read().unwrap();
    assert_eq!(reader.length(), 3000);

    let mut buf = [0u8; 10];
    reader.read_exact(&mut buf).unwrap();
    assert_eq!(&buf[..], &data[..10]);
    // Served from the buffered window
    reader.read_exact(&mut buf).unwrap();
    assert_eq!(&buf[..], &data[10..20]);

    reader.seek(SeekFrom::Start(2500)).unwrap();
    reader.read_exact(&mut buf).unwrap();
    assert_eq!(&buf[..], &data[2500..2510]);

    reader.seek(SeekFrom::Start(5)).unwrap();
    reader.read_exact(&mut buf[..4]).unwrap();
    assert_eq!(&buf[..4], &data[5..9]);

    let ranges: Vec<String> = server
        .requests()
        .into_iter()
        .filter_map(|r| r.range)
        .collect();
    assert_eq!(ranges, vec!["bytes=0-1023", "bytes=2500-2999", "bytes=5-1028"]);

    reader.close().unwrap();
    reader.close().unwrap();
    assert!(reader.read(&mut buf).is_err());
}

#[test]
fn test_random_read_needs_known_length() {
    let (_server, registry) = setup();
    let file = registry.resolve("http://host/gone.bin").unwrap();
    assert!(matches!(
        file.open_random_read().map(|_| ()),
        Err(VfsError::Transport(_))
    ));
}
