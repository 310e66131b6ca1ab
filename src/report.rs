use std::path::Path;
use url::Url;

use crate::options::MutationOptions;

/// Entry page PIT writes into a non-timestamped report directory.
pub const INDEX_FILE: &str = "index.html";

/// Where to point the user once the run ends. With timestamped reports PIT
/// nests its own dated folder below the report path, so the link stops at
/// the directory; otherwise it goes straight to the index page.
pub fn report_link(options: &MutationOptions, report_path: Option<&str>) -> Option<String> {
    let path = report_path?;
    if options.is_timestamped_reports() {
        Some(path.to_string())
    } else {
        Some(format!("{path}/{INDEX_FILE}"))
    }
}

/// `file://` URL for a report link, percent-encoded so it survives being
/// embedded in a terminal hyperlink.
pub fn file_url(link: &str) -> String {
    let path = Path::new(link);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    };
    match Url::from_file_path(&absolute) {
        Ok(url) => url.to_string(),
        Err(()) => {
            tracing::warn!("cannot express {} as a file URL", absolute.display());
            absolute.display().to_string()
        }
    }
}
