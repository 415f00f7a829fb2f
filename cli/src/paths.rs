//! Path primitives: root resolution, link target computation, lexical
//! normalisation.
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Canonicalize `path`, returning `None` when it (or a link it passes
/// through) does not exist.
///
/// # Errors
///
/// Returns any error other than not-found, e.g. permission denied while
/// traversing a parent directory.
pub fn resolve(path: &Path) -> io::Result<Option<PathBuf>> {
    match dunce::canonicalize(path) {
        Ok(resolved) => Ok(Some(resolved)),
        Err(e) if matches!(e.kind(), io::ErrorKind::NotFound | io::ErrorKind::NotADirectory) => {
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Resolve `path` to an absolute directory, or `None` if it is missing or
/// not a directory.
///
/// # Errors
///
/// Returns any error other than not-found from [`resolve`].
pub fn resolve_dir(path: &Path) -> io::Result<Option<PathBuf>> {
    Ok(resolve(path)?.filter(|resolved| resolved.is_dir()))
}

/// The value to store in a link at `link` so that it points at `target`.
///
/// Both paths are expected to be absolute; the result is relative to the
/// link's parent directory.
///
/// Falls back to `target` itself when the two share no root (e.g. different
/// Windows drives).
#[must_use]
pub fn relative_target(target: &Path, link: &Path) -> PathBuf {
    let base = link.parent().unwrap_or_else(|| Path::new(""));
    if target.components().next() != base.components().next() {
        return target.to_path_buf();
    }
    match pathdiff::diff_paths(target, base) {
        Some(relative) if relative.as_os_str().is_empty() => {
            PathBuf::from(Component::CurDir.as_os_str())
        }
        Some(relative) => relative,
        None => target.to_path_buf(),
    }
}

/// Read the link at `link` and return the absolute path it names, without
/// following it any further.
///
/// # Errors
///
/// Returns an error if `link` is not a symbolic link or cannot be read.
pub fn read_link_absolute(link: &Path) -> io::Result<PathBuf> {
    let raw = fs::read_link(link)?;
    if raw.is_absolute() {
        return Ok(normalize(&raw));
    }
    let parent = link.parent().unwrap_or_else(|| Path::new(""));
    Ok(normalize(&parent.join(raw)))
}

/// Remove `.` and `..` components without touching the filesystem.
#[must_use]
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}

/// Absolute location for a path that may not exist yet: its parent is
/// resolved when possible, otherwise made absolute lexically.
///
/// Returns `None` when `path` has no file name (e.g. `..` or `/`).
///
/// # Errors
///
/// Returns any error other than not-found from resolving the parent.
pub fn absolute_location(path: &Path) -> io::Result<Option<PathBuf>> {
    let Some(name) = path.file_name() else {
        return Ok(None);
    };
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let parent = match resolve(parent)? {
        Some(resolved) => resolved,
        None => normalize(&std::path::absolute(parent)?),
    };
    Ok(Some(parent.join(name)))
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn relative_target_climbs_to_common_ancestor() {
        let target = Path::new("/farm/a/aaa");
        let link = Path::new("/farm/dest/aaa");
        assert_eq!(relative_target(target, link), PathBuf::from("../a/aaa"));
    }

    #[test]
    fn relative_target_for_nested_link() {
        let target = Path::new("/farm/a/aaa/x");
        let link = Path::new("/farm/dest/aaa/x");
        assert_eq!(relative_target(target, link), PathBuf::from("../../a/aaa/x"));
    }

    #[test]
    fn relative_target_to_link_parent_is_current_dir() {
        let target = Path::new("/farm/dest");
        let link = Path::new("/farm/dest/self");
        assert_eq!(relative_target(target, link), PathBuf::from("."));
    }

    #[test]
    fn relative_target_into_sibling_subtree() {
        let target = Path::new("/farm/dest/aaa/x");
        let link = Path::new("/farm/dest/bbb");
        assert_eq!(relative_target(target, link), PathBuf::from("aaa/x"));
    }

    #[cfg(windows)]
    #[test]
    fn relative_target_across_drives_stays_absolute() {
        let target = Path::new(r"D:\farm\a\aaa");
        let link = Path::new(r"C:\farm\dest\aaa");
        assert_eq!(relative_target(target, link), target);
    }

    #[test]
    fn normalize_drops_dot_components() {
        assert_eq!(
            normalize(Path::new("/farm/dest/aaa/../../a/./aaa")),
            PathBuf::from("/farm/a/aaa")
        );
    }

    #[test]
    fn normalize_keeps_leading_parent_of_relative_path() {
        assert_eq!(normalize(Path::new("../a")), PathBuf::from("../a"));
    }

    #[test]
    fn resolve_missing_path_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(resolve(&dir.path().join("missing")).unwrap(), None);
    }

    #[test]
    fn resolve_dir_rejects_files() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("file");
        fs::write(&file, "x").unwrap();
        assert_eq!(resolve_dir(&file).unwrap(), None);
        assert!(resolve_dir(dir.path()).unwrap().is_some());
    }

    #[cfg(unix)]
    #[test]
    fn read_link_absolute_joins_relative_target_with_parent() {
        let dir = tempfile::tempdir().unwrap();
        let root = dunce::canonicalize(dir.path()).unwrap();
        fs::create_dir(root.join("dest")).unwrap();
        std::os::unix::fs::symlink("../a/aaa", root.join("dest/aaa")).unwrap();
        assert_eq!(
            read_link_absolute(&root.join("dest/aaa")).unwrap(),
            root.join("a/aaa")
        );
    }

    #[cfg(unix)]
    #[test]
    fn resolve_dangling_link_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let link = dir.path().join("link");
        std::os::unix::fs::symlink("missing", &link).unwrap();
        assert_eq!(resolve(&link).unwrap(), None);
    }

    #[test]
    fn absolute_location_of_missing_file_uses_resolved_parent() {
        let dir = tempfile::tempdir().unwrap();
        let root = dunce::canonicalize(dir.path()).unwrap();
        assert_eq!(
            absolute_location(&dir.path().join("new")).unwrap(),
            Some(root.join("new"))
        );
    }

    #[test]
    fn absolute_location_without_file_name_is_none() {
        assert_eq!(absolute_location(Path::new("/")).unwrap(), None);
    }
}
