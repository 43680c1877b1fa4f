use crate::error::SecureFilesError;
use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

fn escape_error(name: &str, root: &Path) -> SecureFilesError {
    SecureFilesError::PathEscape {
        name: name.to_string(),
        root: root.to_path_buf(),
    }
}

/// Splits an untrusted relative name into normal segments, collapsing `.` and `..`.
///
/// Both `/` and `\` separate segments. Returns `None` when the name is absolute,
/// names a drive or other prefix, climbs above its starting point, or is empty
/// after collapsing.
fn normalize_segments(name: &str) -> Option<Vec<&str>> {
    if name.starts_with(['/', '\\']) {
        return None;
    }

    let mut segments: Vec<&str> = Vec::new();
    for segment in name.split(['/', '\\']) {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop()?;
            }
            _ => {
                // Whatever the platform would read as a root or drive prefix is rejected.
                let mut components = Path::new(segment).components();
                match (components.next(), components.next()) {
                    (Some(Component::Normal(_)), None) => segments.push(segment),
                    _ => return None,
                }
            }
        }
    }

    if segments.is_empty() {
        None
    } else {
        Some(segments)
    }
}

/// Lexically joins `name` onto `root`. The result always lies strictly below `root`.
///
/// This does not touch the filesystem; see [`resolve`] for the variant that
/// prepares the destination directories.
pub fn secure_join(root: &Path, name: &str) -> Result<PathBuf, SecureFilesError> {
    let segments = normalize_segments(name).ok_or_else(|| escape_error(name, root))?;

    let mut path = root.to_path_buf();
    path.extend(segments);
    Ok(path)
}

fn ensure_within(
    canonical_root: &Path,
    path: &Path,
    name: &str,
    root: &Path,
) -> Result<(), SecureFilesError> {
    let canonical = fs::canonicalize(path).map_err(|e| SecureFilesError::io(path, e))?;
    if canonical.starts_with(canonical_root) {
        Ok(())
    } else {
        Err(escape_error(name, root))
    }
}

/// Resolves `name` below `root` and creates the missing parent directories.
///
/// Directories are created one component at a time. A symlinked component is
/// only followed when its target stays inside `root`, and a destination that is
/// itself a symlink is refused.
pub fn resolve(root: &Path, name: &str) -> Result<PathBuf, SecureFilesError> {
    let segments = normalize_segments(name).ok_or_else(|| escape_error(name, root))?;
    let Some((file_name, directories)) = segments.split_last() else {
        return Err(escape_error(name, root));
    };

    fs::create_dir_all(root).map_err(|e| SecureFilesError::io(root, e))?;
    let canonical_root = fs::canonicalize(root).map_err(|e| SecureFilesError::io(root, e))?;

    let mut current = root.to_path_buf();
    for directory in directories {
        current.push(directory);
        match fs::symlink_metadata(&current) {
            Ok(meta) if meta.file_type().is_symlink() => {
                ensure_within(&canonical_root, &current, name, root)?;
            }
            Ok(_) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => match fs::create_dir(&current) {
                Ok(()) => tracing::trace!(path = %current.display(), "Created directory"),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {}
                Err(e) => return Err(SecureFilesError::io(&current, e)),
            },
            Err(e) => return Err(SecureFilesError::io(&current, e)),
        }
    }

    let destination = current.join(file_name);
    match fs::symlink_metadata(&destination) {
        Ok(meta) if meta.file_type().is_symlink() => Err(escape_error(name, root)),
        _ => Ok(destination),
    }
}
