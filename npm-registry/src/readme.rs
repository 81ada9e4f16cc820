//! README lookup across branch-naming conventions.
//!
//! The registry only reports where the source lives. The README is fetched
//! from the raw-content host by trying `main`, then `master`, then a
//! branch-less path that relies on the host redirecting to its default
//! branch. The first 2xx wins; partial content is never merged.

use url::Url;

use crate::client::NpmClient;
use crate::error::{NpmError, Result};

/// Branches tried in order before the branch-less fallback.
pub const README_BRANCHES: [&str; 2] = ["main", "master"];

pub const README_NOT_FOUND: &str = "README not found in main, master, or default branch.";

/// Strip a leading `git+` so the URL can be shown and parsed.
pub fn normalize_repository_url(url: &str) -> &str {
    let url = url.trim();
    url.strip_prefix("git+").unwrap_or(url)
}

/// `{owner}/{repo}` from a repository URL such as
/// `git+https://github.com/acme/example-pkg.git`.
pub fn repository_slug(repository_url: &str) -> Result<String> {
    let parsed = Url::parse(normalize_repository_url(repository_url))?;
    let path = parsed.path().trim_start_matches('/').trim_end_matches('/');
    let slug = path.strip_suffix(".git").unwrap_or(path);
    if slug.is_empty() {
        return Err(NpmError::invalid_argument(format!(
            "repository URL has no path: {repository_url}"
        )));
    }
    Ok(slug.to_owned())
}

/// Candidate README URLs in the order they are tried.
pub fn readme_candidates(raw_content_base: &str, slug: &str) -> Vec<String> {
    README_BRANCHES
        .iter()
        .map(|branch| format!("{raw_content_base}/{slug}/refs/heads/{branch}/README.md"))
        .chain(std::iter::once(format!("{raw_content_base}/{slug}/README.md")))
        .collect()
}

impl NpmClient {
    /// Fetch the README for a repository URL.
    ///
    /// Any failed attempt, including a transport error, moves on to the next
    /// candidate. When every candidate fails the result is
    /// [`NpmError::ResourceNotFound`].
    pub async fn fetch_readme(&self, repository_url: &str) -> Result<String> {
        let slug = repository_slug(repository_url)?;
        let candidates = readme_candidates(&self.configuration().raw_content_base, &slug);

        for url in &candidates {
            match self.get_text(url).await {
                Ok(text) => {
                    tracing::debug!(%url, "README found");
                    return Ok(text);
                }
                Err(err) => tracing::debug!(%url, error = %err, "README candidate failed"),
            }
        }

        Err(NpmError::resource_not_found(README_NOT_FOUND))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_strips_git_prefix_and_suffix() {
        assert_eq!(
            repository_slug("git+https://github.com/acme/example-pkg.git").unwrap(),
            "acme/example-pkg"
        );
        assert_eq!(
            repository_slug("https://github.com/acme/widget").unwrap(),
            "acme/widget"
        );
        assert_eq!(
            repository_slug("git://github.com/acme/widget.git/").unwrap(),
            "acme/widget"
        );
    }

    #[test]
    fn unparseable_url_is_an_error() {
        assert!(matches!(
            repository_slug("not a url"),
            Err(NpmError::InvalidUrl(_))
        ));
        assert!(matches!(
            repository_slug("https://github.com/"),
            Err(NpmError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn candidates_are_main_master_then_default() {
        let urls = readme_candidates("https://raw.example", "acme/pkg");
        assert_eq!(
            urls,
            vec![
                "https://raw.example/acme/pkg/refs/heads/main/README.md",
                "https://raw.example/acme/pkg/refs/heads/master/README.md",
                "https://raw.example/acme/pkg/README.md",
            ]
        );
    }

    #[test]
    fn normalize_keeps_git_suffix() {
        assert_eq!(
            normalize_repository_url("git+https://github.com/acme/example-pkg.git"),
            "https://github.com/acme/example-pkg.git"
        );
    }
}
