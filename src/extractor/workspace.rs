use std::io;
use std::path::Path;
use tempfile::TempDir;

/// An isolated extraction directory inside the shared working directory.
///
/// Each archive task owns exactly one `Workspace`. The directory gets a
/// unique name, so concurrently extracting tasks never collide, and it is
/// removed recursively when the value drops, on success and on failure
/// alike. Anything that must outlive the task (parsed rows) has to be
/// copied out before the guard goes away.
#[derive(Debug)]
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    /// Create a fresh workspace as a uniquely named subdirectory of
    /// `work_dir`.
    pub fn create_in(work_dir: &Path) -> io::Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix("ziprows-")
            .tempdir_in(work_dir)?;
        Ok(Self { dir })
    }

    /// Absolute path of the workspace directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workspace_is_created_inside_parent() {
        let parent = tempfile::tempdir().unwrap();
        let workspace = Workspace::create_in(parent.path()).unwrap();

        assert!(workspace.path().is_dir());
        assert_eq!(workspace.path().parent(), Some(parent.path()));
    }

    #[test]
    fn test_workspaces_get_unique_names() {
        let parent = tempfile::tempdir().unwrap();
        let first = Workspace::create_in(parent.path()).unwrap();
        let second = Workspace::create_in(parent.path()).unwrap();

        assert_ne!(first.path(), second.path());
    }

    #[test]
    fn test_workspace_is_removed_on_drop() {
        let parent = tempfile::tempdir().unwrap();
        let workspace = Workspace::create_in(parent.path()).unwrap();
        let path = workspace.path().to_path_buf();

        std::fs::write(path.join("leftover.xml"), "<root/>").unwrap();
        assert!(path.exists());

        drop(workspace);
        assert!(!path.exists());
    }

    #[test]
    fn test_create_in_missing_parent_fails() {
        let parent = tempfile::tempdir().unwrap();
        let missing = parent.path().join("nope");

        assert!(Workspace::create_in(&missing).is_err());
    }
}
