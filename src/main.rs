/*!
 * vfs - Directory Browser
 *
 * Lists a local or remote location through the virtual file system:
 * - parses the locator against the default scheme registry
 * - retries once with credentials when the server asks for them
 * - filters and sorts the listing before printing it
 */

use clap::{Parser, ValueEnum};
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use std::sync::Arc;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tracing::info;

use remote_vfs::monitoring::{init_tracing, span_operation};
use remote_vfs::vfs::filter::{AndFilter, AttributeFilter, FileAttribute, RegexFilenameFilter};
use remote_vfs::vfs::{
    AbstractFile, Credentials, CredentialsPrompt, FileAttributes, FileComparator, FileFilter,
    FileUrl, SchemeRegistry, SortCriterion, VfsError, VfsResult,
};
use remote_vfs::ClientConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Only {
    Dirs,
    Files,
}

/// List a local or remote location
#[derive(Debug, Parser)]
#[command(name = "vfs", version, about)]
struct Cli {
    /// Locator, e.g. `file:///tmp` or `https://example.com/pub/`
    locator: String,

    /// Sort key: name, size, date or extension
    #[arg(long, default_value = "name")]
    sort: SortCriterion,

    #[arg(long)]
    descending: bool,

    /// List directories before files
    #[arg(long)]
    dirs_first: bool,

    /// Case-sensitive name ordering and pattern matching
    #[arg(long)]
    case_sensitive: bool,

    #[arg(long, value_enum)]
    only: Option<Only>,

    #[arg(long)]
    hide_hidden: bool,

    /// Keep names fully matching this regular expression
    #[arg(long)]
    pattern: Option<String>,

    /// Print the listing as JSON
    #[arg(long)]
    json: bool,

    /// Login used if the server asks for credentials (or VFS_LOGIN)
    #[arg(long)]
    login: Option<String>,

    /// Password used if the server asks for credentials (or VFS_PASSWORD)
    #[arg(long)]
    password: Option<String>,
}

/// Credentials from command-line flags, then the environment
struct FlagPrompt {
    login: Option<String>,
    password: Option<String>,
}

impl CredentialsPrompt for FlagPrompt {
    fn credentials_for(&self, url: &FileUrl) -> Option<Credentials> {
        let login = self
            .login
            .clone()
            .or_else(|| std::env::var("VFS_LOGIN").ok())
            .or_else(|| url.guest_credentials().map(|c| c.login().to_string()))?;
        let password = self
            .password
            .clone()
            .or_else(|| std::env::var("VFS_PASSWORD").ok())
            .unwrap_or_default();
        Some(Credentials::new(login, password))
    }
}

#[derive(Serialize)]
struct Entry {
    name: String,
    url: String,
    #[serde(flatten)]
    attributes: FileAttributes,
}

/// Children of a directory, or the file itself
fn browse(registry: &Arc<SchemeRegistry>, url: FileUrl) -> VfsResult<Vec<AbstractFile>> {
    let span = span_operation("browse", &url.to_string());
    let file = registry.get_file(url)?;

    let result = if file.is_directory() {
        file.list()
    } else if file.exists() {
        Ok(vec![file])
    } else {
        Err(VfsError::NotFound(file.url().to_string()))
    };

    match &result {
        Ok(files) => span.record_items(files.len()),
        Err(e) => span.record_error(e),
    }
    result
}

fn build_filter(cli: &Cli) -> Result<AndFilter> {
    let mut filter = AndFilter::new();
    match cli.only {
        Some(Only::Dirs) => filter.push(Box::new(AttributeFilter::new(FileAttribute::Directory))),
        Some(Only::Files) => filter.push(Box::new(AttributeFilter::new(FileAttribute::File))),
        None => {}
    }
    if cli.hide_hidden {
        filter.push(Box::new(AttributeFilter::inverted(FileAttribute::Hidden)));
    }
    if let Some(pattern) = &cli.pattern {
        filter.push(Box::new(RegexFilenameFilter::new(
            pattern,
            cli.case_sensitive,
        )?));
    }
    Ok(filter)
}

fn format_date(attributes: &FileAttributes) -> String {
    OffsetDateTime::from(attributes.last_modified)
        .format(&Rfc3339)
        .unwrap_or_else(|_| "-".to_string())
}

fn print_listing(files: &[AbstractFile], json: bool) -> Result<()> {
    let entries: Vec<Entry> = files
        .iter()
        .map(|file| Entry {
            name: file.name(),
            url: file.url().to_string(),
            attributes: file.attributes(),
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&entries).into_diagnostic()?);
        return Ok(());
    }

    for entry in &entries {
        let attrs = &entry.attributes;
        let size = if attrs.has_known_size() {
            attrs.size.to_string()
        } else {
            "-".to_string()
        };
        println!(
            "{}{} {:>12} {} {}",
            if attrs.directory { 'd' } else { '-' },
            attrs.permissions.to_rwx_string(),
            size,
            format_date(attrs),
            entry.name
        );
    }
    Ok(())
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = ClientConfig::from_env();
    let registry = SchemeRegistry::with_defaults(&config)?;
    let url = registry.parse(&cli.locator)?;
    info!(url = %url, "Browsing");

    let mut files = match browse(&registry, url.clone()) {
        Err(VfsError::AuthenticationRequired { .. }) => {
            let prompt = FlagPrompt {
                login: cli.login.clone(),
                password: cli.password.clone(),
            };
            let credentials = prompt.credentials_for(&url).ok_or_else(|| {
                VfsError::authentication_required(&url, "no credentials supplied")
            })?;
            let mut url = url;
            url.set_credentials(Some(credentials));
            browse(&registry, url)?
        }
        other => other?,
    };

    build_filter(&cli)?.filter_in_place(&mut files);
    FileComparator::new(cli.sort, !cli.descending, cli.case_sensitive, cli.dirs_first)
        .sort(&mut files);

    print_listing(&files, cli.json)
}
