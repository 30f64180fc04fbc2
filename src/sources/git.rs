//! Git revisions of dependency checkouts.

use std::path::Path;

use git2::Repository;

use crate::builder::errors::BuildError;
use crate::sources::RevisionProvider;

/// Reads the commit `HEAD` points at.
///
/// The repository is discovered from the checkout upwards, so a dependency
/// vendored as a plain directory is keyed on the enclosing repository.
#[derive(Debug, Default, Clone, Copy)]
pub struct GitRevisionProvider;

impl GitRevisionProvider {
    pub fn new() -> Self {
        GitRevisionProvider
    }
}

impl RevisionProvider for GitRevisionProvider {
    fn revision(&self, checkout: &Path) -> Result<String, BuildError> {
        let to_error = |source| BuildError::Revision {
            path: checkout.to_path_buf(),
            source,
        };

        let repo = Repository::discover(checkout).map_err(to_error)?;
        let commit = repo
            .head()
            .and_then(|head| head.peel_to_commit())
            .map_err(to_error)?;

        Ok(commit.id().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use git2::Signature;
    use tempfile::TempDir;

    fn commit_file(repo: &Repository, name: &str, content: &str) -> git2::Oid {
        let workdir = repo.workdir().unwrap();
        std::fs::write(workdir.join(name), content).unwrap();

        let mut index = repo.index().unwrap();
        index.add_path(Path::new(name)).unwrap();
        index.write().unwrap();
        let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();

        let sig = Signature::now("Dockyard", "dockyard@example.com").unwrap();
        let parents = match repo.head() {
            Ok(head) => vec![head.peel_to_commit().unwrap()],
            Err(_) => vec![],
        };
        let parent_refs: Vec<_> = parents.iter().collect();

        repo.commit(Some("HEAD"), &sig, &sig, "update", &tree, &parent_refs)
            .unwrap()
    }

    #[test]
    fn test_revision_follows_head() {
        let tmp = TempDir::new().unwrap();
        let repo = Repository::init(tmp.path()).unwrap();

        let first = commit_file(&repo, "README", "one");
        let provider = GitRevisionProvider::new();
        assert_eq!(provider.revision(tmp.path()).unwrap(), first.to_string());

        let second = commit_file(&repo, "README", "two");
        assert_eq!(provider.revision(tmp.path()).unwrap(), second.to_string());
        assert_ne!(first, second);
    }

    #[test]
    fn test_vendored_directory_uses_enclosing_repository() {
        let tmp = TempDir::new().unwrap();
        let repo = Repository::init(tmp.path()).unwrap();
        let checkout = tmp.path().join("deps/libuv");
        std::fs::create_dir_all(&checkout).unwrap();

        let head = commit_file(&repo, "deps/libuv/uv.c", "int uv;");

        assert_eq!(
            GitRevisionProvider::new().revision(&checkout).unwrap(),
            head.to_string()
        );
    }

    #[test]
    fn test_not_a_repository() {
        let tmp = TempDir::new().unwrap();
        let err = GitRevisionProvider::new().revision(tmp.path()).unwrap_err();

        assert!(matches!(err, BuildError::Revision { .. }));
    }

    #[test]
    fn test_repository_without_commits() {
        let tmp = TempDir::new().unwrap();
        Repository::init(tmp.path()).unwrap();

        assert!(GitRevisionProvider::new().revision(tmp.path()).is_err());
    }
}
