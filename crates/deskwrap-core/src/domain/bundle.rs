//! Serving-root resolution for runners nested inside application bundles.
//!
//! On macOS a packaged application is a directory tree, and the runner
//! executable sits three levels below the directory the user sees:
//!
//! ```text
//! Applications/
//! ├── index.html            ← assets shipped next to the bundle
//! ├── style.css
//! └── Demo.app/
//!     └── Contents/
//!         ├── Info.plist
//!         └── MacOS/
//!             ├── Demo      ← the runner executable
//!             └── config.json
//! ```
//!
//! Local content is shipped *next to* the bundle, so the document root is the
//! directory containing `Demo.app`, not the runner's own directory.  On
//! platforms with a flat layout (the runner is a single `.exe`) the document
//! root is simply the runner's directory.
//!
//! The walk is described by data ([`BundleNesting`]) rather than hard-coded
//! string checks, so a new layout is a new constant, not a new branch.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Describes one way a runner can be nested inside a bundle directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BundleNesting {
    /// Human-readable name used in log messages.
    pub name: &'static str,
    /// Directory names from just below the bundle directory down to the
    /// directory holding the executable, outermost first.
    pub interior: &'static [&'static str],
}

/// `<Name>.app/Contents/MacOS/<runner>`
pub const MACOS_APP_BUNDLE: BundleNesting = BundleNesting {
    name: "macOS application bundle",
    interior: &["Contents", "MacOS"],
};

impl BundleNesting {
    /// The nesting layouts a runner built for the current OS can find itself in.
    pub fn for_current_platform() -> &'static [BundleNesting] {
        #[cfg(target_os = "macos")]
        {
            &[MACOS_APP_BUNDLE]
        }

        #[cfg(not(target_os = "macos"))]
        {
            &[]
        }
    }

    /// If `exe_dir` is the innermost directory of this layout, returns the
    /// bundle directory itself (e.g. `…/Demo.app`).
    pub fn bundle_dir<'a>(&self, exe_dir: &'a Path) -> Option<&'a Path> {
        let mut current = exe_dir;
        for expected in self.interior.iter().rev() {
            if current.file_name()? != OsStr::new(expected) {
                return None;
            }
            current = current.parent()?;
        }
        // There must be an actual bundle directory above the interior levels.
        current.file_name()?;
        Some(current)
    }
}

/// Computes the directory to serve local content from.
///
/// `executable` is the runner's own path; `nestings` are the layouts to try in
/// order.  The first layout that matches wins.  With no match, the result is
/// the executable's own directory.
///
/// This is a pure path computation: nothing is read from disk.
pub fn serving_root(executable: &Path, nestings: &[BundleNesting]) -> PathBuf {
    let exe_dir = non_empty(executable.parent());

    for nesting in nestings {
        if let Some(bundle) = nesting.bundle_dir(exe_dir) {
            tracing::debug!(
                "runner is inside a {}: {}",
                nesting.name,
                bundle.display()
            );
            return non_empty(bundle.parent()).to_path_buf();
        }
    }

    exe_dir.to_path_buf()
}

/// Maps a missing or empty parent to the current directory.
fn non_empty(path: Option<&Path>) -> &Path {
    match path {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_macos_bundle_resolves_to_directory_containing_app() {
        // Arrange
        let exe = Path::new("/Users/dev/Apps/Demo.app/Contents/MacOS/Demo");

        // Act
        let root = serving_root(exe, &[MACOS_APP_BUNDLE]);

        // Assert
        assert_eq!(root, PathBuf::from("/Users/dev/Apps"));
    }

    #[test]
    fn test_flat_layout_resolves_to_executable_directory() {
        let exe = Path::new("/opt/demo/Demo.exe");

        let root = serving_root(exe, &[MACOS_APP_BUNDLE]);

        assert_eq!(root, PathBuf::from("/opt/demo"));
    }

    #[test]
    fn test_no_nestings_means_executable_directory_even_inside_bundle() {
        // Non-macOS runners never walk up.
        let exe = Path::new("/x/Demo.app/Contents/MacOS/Demo");

        let root = serving_root(exe, &[]);

        assert_eq!(root, PathBuf::from("/x/Demo.app/Contents/MacOS"));
    }

    #[test]
    fn test_partial_interior_match_does_not_walk() {
        // Only `MacOS` matches; `Contents` is missing.
        let exe = Path::new("/x/Demo.app/Stuff/MacOS/Demo");

        let root = serving_root(exe, &[MACOS_APP_BUNDLE]);

        assert_eq!(root, PathBuf::from("/x/Demo.app/Stuff/MacOS"));
    }

    #[test]
    fn test_interior_without_bundle_directory_does_not_walk() {
        let exe = Path::new("Contents/MacOS/Demo");

        let root = serving_root(exe, &[MACOS_APP_BUNDLE]);

        assert_eq!(root, PathBuf::from("Contents/MacOS"));
    }

    #[test]
    fn test_relative_bundle_resolves_to_current_directory() {
        let exe = Path::new("Demo.app/Contents/MacOS/Demo");

        let root = serving_root(exe, &[MACOS_APP_BUNDLE]);

        assert_eq!(root, PathBuf::from("."));
    }

    #[test]
    fn test_bare_executable_name_resolves_to_current_directory() {
        assert_eq!(serving_root(Path::new("Demo"), &[]), PathBuf::from("."));
    }

    #[test]
    fn test_deeper_custom_nesting_is_supported_by_data_alone() {
        // Arrange: a hypothetical layout three levels deep.
        const DEEP: BundleNesting = BundleNesting {
            name: "deep test bundle",
            interior: &["a", "b", "c"],
        };
        let exe = Path::new("/srv/Site.bundle/a/b/c/runner");

        // Act
        let root = serving_root(exe, &[MACOS_APP_BUNDLE, DEEP]);

        // Assert
        assert_eq!(root, PathBuf::from("/srv"));
    }

    #[test]
    fn test_bundle_dir_returns_the_app_directory() {
        let dir = Path::new("/x/Demo.app/Contents/MacOS");
        assert_eq!(
            MACOS_APP_BUNDLE.bundle_dir(dir),
            Some(Path::new("/x/Demo.app"))
        );
    }

    #[cfg(target_os = "macos")]
    #[test]
    fn test_current_platform_includes_app_bundle_on_macos() {
        assert_eq!(BundleNesting::for_current_platform(), &[MACOS_APP_BUNDLE]);
    }

    #[cfg(not(target_os = "macos"))]
    #[test]
    fn test_current_platform_has_no_nesting_elsewhere() {
        assert!(BundleNesting::for_current_platform().is_empty());
    }
}
