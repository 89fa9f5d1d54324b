/*!
 * Network Resource Adapter
 * Read-only HTTP/HTTPS files with lazy HEAD resolution and scraped listings
 */

mod client;
mod links;
mod mime;

pub use client::{HttpClient, HttpRequest, HttpResponse, ReqwestClient};
pub use links::{is_pseudo_link, LinkScanner};
pub use mime::{is_browsable, is_browsable_name, mime_for_extension};

use reqwest::header::{DATE, LAST_MODIFIED, LOCATION};
use reqwest::StatusCode;
use std::collections::HashSet;
use std::fmt;
use std::io::{BufRead, BufReader, Read};
use std::sync::Arc;
use std::time::SystemTime;
use time::format_description::well_known::Rfc2822;
use time::OffsetDateTime;
use tracing::{debug, instrument, trace, warn};
use url::Url;

use super::block::{BlockRandomReader, BlockSource};
use super::lazy::{LazyAttributes, ParentCache, ResolutionState};
use super::scheme::{FileProvider, SchemeRegistry};
use super::traits::{AbstractFile, InputStream, ProtocolFile, RandomAccessRead};
use super::types::*;
use super::url::{Credentials, FileUrl};
use crate::core::config::ClientConfig;

const HTTP_OPERATIONS: OperationSet = OperationSet::of(&[
    FileOperation::ReadFile,
    FileOperation::RandomReadFile,
    FileOperation::ListChildren,
]);

/// State shared by every file a provider creates
struct HttpContext {
    client: Arc<dyn HttpClient>,
    config: ClientConfig,
    scanner: LinkScanner,
}

/// Creates [`HttpFile`]s for `http://` and `https://` locators
pub struct HttpProvider {
    context: Arc<HttpContext>,
}

impl HttpProvider {
    pub fn new(client: Arc<dyn HttpClient>, config: ClientConfig) -> VfsResult<Self> {
        Ok(Self {
            context: Arc::new(HttpContext {
                client,
                config,
                scanner: LinkScanner::new()?,
            }),
        })
    }
}

impl FileProvider for HttpProvider {
    fn create(&self, url: FileUrl, registry: &Arc<SchemeRegistry>) -> VfsResult<AbstractFile> {
        let file = HttpFile::new(url, Arc::clone(registry), Arc::clone(&self.context))?;
        Ok(Arc::new(file))
    }
}

impl fmt::Debug for HttpProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpProvider")
            .field("config", &self.context.config)
            .finish_non_exhaustive()
    }
}

/// Map a response status to the error taxonomy
///
/// 401 asks for credentials; anything else outside 200..400 (404 included)
/// is a transport failure.
fn check_status(url: &FileUrl, response: &HttpResponse) -> VfsResult<()> {
    match response.status {
        StatusCode::UNAUTHORIZED => Err(VfsError::authentication_required(
            url,
            response.status_line(),
        )),
        status if status.as_u16() < 200 || status.as_u16() >= 400 => Err(VfsError::Transport(
            format!("{}: {}", url, response.status_line()),
        )),
        _ => Ok(()),
    }
}

/// Parse an HTTP date header (`Sun, 06 Nov 1994 08:49:37 GMT`)
fn header_date(response: &HttpResponse, name: reqwest::header::HeaderName) -> Option<SystemTime> {
    let raw = response.header(name)?;
    let normalized = raw.trim().replace(" GMT", " +0000").replace(" UTC", " +0000");
    OffsetDateTime::parse(&normalized, &Rfc2822)
        .ok()
        .map(SystemTime::from)
}

/// Directory part of a URL: no query or fragment, path cut after the last `/`
fn containing_directory(url: &Url) -> String {
    let mut dir = url.clone();
    dir.set_query(None);
    dir.set_fragment(None);
    let path = dir.path().to_string();
    let cut = path.rfind('/').map_or(path.len(), |pos| pos + 1);
    dir.set_path(&path[..cut]);
    dir.to_string()
}

/// Read-only file reached over HTTP
///
/// Creating an instance never touches the network. Attributes come from a
/// single HEAD request issued the first time a getter needs them, unless the
/// locator looks like an HTML page, in which case the file is taken to be a
/// browsable directory and only [`ProtocolFile::exists`] resolves.
pub struct HttpFile {
    url: FileUrl,
    endpoint: Url,
    registry: Arc<SchemeRegistry>,
    context: Arc<HttpContext>,
    attributes: LazyAttributes,
    parent: ParentCache,
}

impl HttpFile {
    fn new(
        url: FileUrl,
        registry: Arc<SchemeRegistry>,
        context: Arc<HttpContext>,
    ) -> VfsResult<Self> {
        let scheme = url.scheme().to_ascii_lowercase();
        if scheme != "http" && scheme != "https" {
            return Err(VfsError::InvalidArgument(format!(
                "not an HTTP locator: {}",
                url
            )));
        }
        if url.host().is_none() {
            return Err(VfsError::InvalidArgument(format!(
                "HTTP locator without host: {}",
                url
            )));
        }
        let endpoint = Url::parse(&url.to_string_opts(false, false, true))
            .map_err(|e| VfsError::MalformedLocator(format!("{}: {}", url, e)))?;

        let looks_browsable = match url.filename() {
            None => true,
            Some(name) => {
                url.path().ends_with('/') || url.query().is_some() || is_browsable_name(name)
            }
        };
        let mut provisional = FileAttributes::unresolved(FilePermissions::user_readonly());
        provisional.directory = looks_browsable;

        Ok(Self {
            url,
            endpoint,
            registry,
            context,
            attributes: LazyAttributes::new(provisional, looks_browsable),
            parent: ParentCache::new(),
        })
    }

    /// Resolution progress, mostly for diagnostics
    pub fn resolution_state(&self) -> ResolutionState {
        self.attributes.state()
    }

    /// URL requests are sent to (credentials travel separately)
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn send(&self, request: HttpRequest) -> VfsResult<HttpResponse> {
        self.send_as(request, self.url.credentials().cloned())
    }

    fn send_as(
        &self,
        request: HttpRequest,
        credentials: Option<Credentials>,
    ) -> VfsResult<HttpResponse> {
        let request = request.with_credentials(credentials);
        let response = self.context.client.execute(request)?;
        check_status(&self.url, &response)?;
        Ok(response)
    }

    #[instrument(level = "debug", skip(self), fields(url = %self.url))]
    fn resolve(&self) -> VfsResult<FileAttributes> {
        let response = self.send(HttpRequest::head(self.endpoint.clone()))?;

        let mut attributes = FileAttributes::unresolved(FilePermissions::user_readonly());
        attributes.exists = true;
        attributes.size = response
            .content_length()
            .and_then(|len| i64::try_from(len).ok())
            .unwrap_or(UNKNOWN_SIZE);
        attributes.last_modified = header_date(&response, LAST_MODIFIED)
            .or_else(|| header_date(&response, DATE))
            .unwrap_or_else(SystemTime::now);
        attributes.directory = response.content_type().is_some_and(is_browsable);
        Ok(attributes)
    }

    fn current(&self) -> &FileAttributes {
        self.attributes.get(&self.url, || self.resolve())
    }

    fn resolved(&self) -> &FileAttributes {
        self.attributes.force(&self.url, || self.resolve())
    }

    /// GET without automatic redirects, following `Location` by hand.
    /// Credentials are dropped for good once a hop leaves the original host.
    fn connect_tracking_redirects(&self) -> VfsResult<HttpResponse> {
        let max_redirects = self.context.config.max_redirects;
        let mut target = self.endpoint.clone();
        let mut credentials = self.url.credentials().cloned();

        for _ in 0..=max_redirects {
            let host = target
                .host_str()
                .map(|h| h.trim_start_matches('[').trim_end_matches(']'));
            if credentials.is_some() && !self.same_host(host) {
                debug!(to = %target, "Redirect left the host, dropping credentials");
                credentials = None;
            }
            let request = HttpRequest::get(target.clone()).without_redirects();
            let response = self.send_as(request, credentials.clone())?;
            if response.status.is_redirection() {
                if let Some(location) = response.header(LOCATION) {
                    let next = target.join(location).map_err(|e| {
                        VfsError::Transport(format!("bad redirect to {}: {}", location, e))
                    })?;
                    debug!(from = %target, to = %next, "Following redirect");
                    target = next;
                    continue;
                }
            }
            return Ok(response);
        }
        Err(VfsError::TooManyRedirects(max_redirects))
    }

    fn same_host(&self, host: Option<&str>) -> bool {
        match (host, self.url.host()) {
            (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
            _ => false,
        }
    }

    /// Build the child designated by a scraped link, `None` if it lies
    /// outside the listed directory
    fn child_for(
        &self,
        link: &str,
        context: &Url,
        container: &str,
    ) -> VfsResult<Option<AbstractFile>> {
        let mut resolved = context
            .join(link)
            .map_err(|e| VfsError::MalformedLocator(format!("{}: {}", link, e)))?;
        resolved.set_fragment(None);

        let mut bare = resolved.clone();
        bare.set_query(None);
        if !resolved.as_str().starts_with(container) || bare.as_str() == container {
            return Ok(None);
        }

        let mut child_url = self.registry.parse(resolved.as_str())?;
        if self.same_host(child_url.host()) {
            child_url.set_credentials(self.url.credentials().cloned());
        }
        self.registry.get_file(child_url).map(Some)
    }

    /// Scan the body line by line; an I/O error keeps what was found so far
    fn scrape(&self, body: Box<dyn Read + Send>, context: &Url) -> Vec<AbstractFile> {
        let container = containing_directory(context);
        let mut reader = BufReader::new(body);
        let mut seen = HashSet::new();
        let mut children = Vec::new();
        let mut line = Vec::new();

        loop {
            line.clear();
            match reader.read_until(b'\n', &mut line) {
                Ok(0) => break,
                Ok(_) => {}
                Err(e) => {
                    warn!(url = %self.url, error = %e, found = children.len(), "Listing interrupted");
                    break;
                }
            }

            let text = String::from_utf8_lossy(&line);
            for link in self.context.scanner.scan(&text) {
                if is_pseudo_link(link) || seen.contains(link) {
                    continue;
                }
                match self.child_for(link, context, &container) {
                    Ok(Some(child)) => {
                        seen.insert(link.to_string());
                        children.push(child);
                    }
                    Ok(None) => trace!(link, "Skipping link outside directory"),
                    Err(e) => debug!(link, error = %e, "Cannot create child"),
                }
            }
        }
        children
    }
}

impl ProtocolFile for HttpFile {
    fn url(&self) -> &FileUrl {
        &self.url
    }

    fn supported_operations(&self) -> OperationSet {
        HTTP_OPERATIONS
    }

    /// Always resolves once, even for files taken to be directories
    fn exists(&self) -> bool {
        self.resolved().exists
    }

    fn is_directory(&self) -> bool {
        self.current().directory
    }

    fn size(&self) -> i64 {
        self.current().size
    }

    fn last_modified(&self) -> SystemTime {
        self.current().last_modified
    }

    fn permissions(&self) -> FilePermissions {
        FilePermissions::user_readonly()
    }

    fn is_hidden(&self) -> bool {
        false
    }

    fn parent(&self) -> VfsResult<Option<AbstractFile>> {
        self.parent.get_or_create(&self.url, &self.registry)
    }

    #[instrument(level = "debug", skip(self), fields(url = %self.url))]
    fn list(&self) -> VfsResult<Vec<AbstractFile>> {
        let response = self.connect_tracking_redirects()?;
        match response.content_type() {
            Some(content_type) if is_browsable(content_type) => {}
            _ => {
                return Err(VfsError::Transport(format!(
                    "{}: document cannot be parsed (not HTML or XHTML)",
                    self.url
                )))
            }
        }

        let context = response.final_url.clone();
        let children = self.scrape(response.body, &context);
        debug!(count = children.len(), "Listed directory");
        Ok(children)
    }

    #[instrument(level = "debug", skip(self), fields(url = %self.url))]
    fn open_read(&self) -> VfsResult<InputStream> {
        Ok(self.send(HttpRequest::get(self.endpoint.clone()))?.body)
    }

    /// Resume with `Range: bytes=offset-`; a server ignoring the range fails
    #[instrument(level = "debug", skip(self), fields(url = %self.url))]
    fn open_read_at(&self, offset: u64) -> VfsResult<InputStream> {
        if offset == 0 {
            return self.open_read();
        }
        let response =
            self.send(HttpRequest::get(self.endpoint.clone()).with_range(offset, None))?;
        if response.status != StatusCode::PARTIAL_CONTENT {
            return Err(VfsError::Transport(format!(
                "{}: server ignored range request ({})",
                self.url,
                response.status_line()
            )));
        }
        Ok(response.body)
    }

    fn open_random_read(&self) -> VfsResult<Box<dyn RandomAccessRead>> {
        let size = self.resolved().size;
        let length = u64::try_from(size).map_err(|_| {
            VfsError::Transport(format!("{}: content length unknown", self.url))
        })?;

        let source = RangeSource {
            url: self.url.clone(),
            endpoint: self.endpoint.clone(),
            context: Arc::clone(&self.context),
        };
        Ok(Box::new(BlockRandomReader::new(
            source,
            length,
            self.context.config.block_size,
        )))
    }
}

impl fmt::Debug for HttpFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpFile")
            .field("url", &self.url)
            .field("attributes", &self.attributes)
            .finish_non_exhaustive()
    }
}

/// Byte ranges of one HTTP resource
struct RangeSource {
    url: FileUrl,
    endpoint: Url,
    context: Arc<HttpContext>,
}

impl BlockSource for RangeSource {
    #[instrument(level = "trace", skip(self), fields(url = %self.url))]
    fn fetch(&mut self, offset: u64, len: usize) -> VfsResult<Vec<u8>> {
        if len == 0 {
            return Ok(Vec::new());
        }
        let end = offset + len as u64 - 1;
        let request = HttpRequest::get(self.endpoint.clone())
            .with_range(offset, Some(end))
            .with_credentials(self.url.credentials().cloned());
        let response = self.context.client.execute(request)?;
        check_status(&self.url, &response)?;
        if response.status != StatusCode::PARTIAL_CONTENT {
            return Err(VfsError::Transport(format!(
                "{}: range requests not supported ({})",
                self.url,
                response.status_line()
            )));
        }

        let mut block = Vec::with_capacity(len);
        response
            .body
            .take(len as u64)
            .read_to_end(&mut block)
            .map_err(|e| VfsError::Transport(format!("{}: {}", self.url, e)))?;
        Ok(block)
    }
}
