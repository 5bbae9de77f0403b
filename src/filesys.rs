//! Project: winpath
//! Module: filesys
//!
//! An abstraction layer between [WinPath] and low-level filesystem
//! functions. Nothing here is cached: every call asks the filesystem again,
//! so two calls may disagree if the filesystem changed in between.

use crate::error::{Error, Result};
use crate::path::WinPath;
use std::fs::{self, Metadata, ReadDir};
use std::io;
use std::path::PathBuf;
use tracing::debug;

impl WinPath {
    /// Converts the path into one the host operating system understands.
    ///
    /// On Windows this is the raw string. Elsewhere every `\` becomes `/`.
    pub fn to_native(&self) -> PathBuf {
        #[cfg(windows)]
        {
            PathBuf::from(self.as_str())
        }
        #[cfg(not(windows))]
        {
            PathBuf::from(self.as_str().replace(crate::path::SEP, "/"))
        }
    }

    fn io_error(&self, e: io::Error) -> Error {
        match e.kind() {
            io::ErrorKind::NotFound => Error::NotFound(self.clone()),
            _ => Error::Io(self.clone(), Error::lowerize(e.to_string())),
        }
    }

    pub fn exists(&self) -> bool {
        self.to_native().exists()
    }

    /// Checks if the path is a regular file right now. Missing paths are not
    /// files.
    pub fn is_file(&self) -> bool {
        self.to_native().is_file()
    }

    /// Checks if the path is a directory right now. Missing paths are not
    /// directories.
    pub fn is_dir(&self) -> bool {
        self.to_native().is_dir()
    }

    /// Checks if the path itself is a symbolic link, without following it.
    pub fn is_symlink(&self) -> bool {
        self.to_native().is_symlink()
    }

    /// Checks if the path names an existing root, such as `C:\`.
    pub fn is_mount(&self) -> bool {
        match self.absolute() {
            Ok(p) => p.is_root() == true && p.exists() == true,
            Err(_) => false,
        }
    }

    pub fn stat(&self) -> Result<Metadata> {
        fs::metadata(self.to_native()).map_err(|e| self.io_error(e))
    }

    /// Returns the size of the entry in bytes.
    pub fn size(&self) -> Result<u64> {
        Ok(self.stat()?.len())
    }

    /// Anchors the path onto the current working directory.
    ///
    /// A drive-relative path (`C:a`) resolves against the current directory
    /// when it is on the same drive and against the drive's root otherwise.
    /// A rooted path without a drive (`\a`) takes the current directory's
    /// drive, if it has one.
    pub fn absolute(&self) -> Result<WinPath> {
        let (drive, rest) = self.split_drive();
        if drive.is_empty() == false && self.is_absolute() == true {
            return Ok(self.clone());
        }
        let cwd = std::env::current_dir().map_err(|e| self.io_error(e))?;
        let cwd = WinPath::new(&cwd.to_string_lossy());
        Ok(Self::anchor(&cwd, drive, rest, self))
    }

    fn anchor(cwd: &WinPath, drive: &str, rest: &str, path: &WinPath) -> WinPath {
        match (drive.is_empty(), path.is_absolute()) {
            (true, true) => WinPath::new(&format!("{}{}", cwd.drive(), path)),
            (true, false) => cwd.join(path),
            (false, _) if cwd.drive().eq_ignore_ascii_case(drive) == true => cwd.join(rest),
            (false, _) => WinPath::new(&format!("{}{}{}", drive, crate::path::SEP, rest)),
        }
    }

    /// Resolves the path on the filesystem, following every symbolic link.
    pub fn canonicalize(&self) -> Result<WinPath> {
        let real = dunce::canonicalize(self.to_native()).map_err(|e| self.io_error(e))?;
        Ok(WinPath::new(&real.to_string_lossy()))
    }

    /// Lists the direct children of this directory.
    ///
    /// Entries come back lazily in whatever order the filesystem produces
    /// them. The returned iterator is single pass: call `ls` again to see the
    /// directory as it is now.
    pub fn ls(&self) -> Result<ListDir> {
        if self.stat()?.is_dir() == false {
            return Err(Error::NotADirectory(self.clone()));
        }
        let entries = fs::read_dir(self.to_native()).map_err(|e| self.io_error(e))?;
        debug!("listing directory {}", self);
        Ok(ListDir {
            dir: self.clone(),
            entries,
        })
    }
}

/// Iterator over the children of a directory. See [WinPath::ls].
#[derive(Debug)]
pub struct ListDir {
    dir: WinPath,
    entries: ReadDir,
}

impl ListDir {
    pub fn dir(&self) -> &WinPath {
        &self.dir
    }
}

impl Iterator for ListDir {
    type Item = Result<WinPath>;

    fn next(&mut self) -> Option<Self::Item> {
        let entry = match self.entries.next()? {
            Ok(entry) => entry,
            Err(e) => return Some(Err(self.dir.io_error(e))),
        };
        let name = entry.file_name();
        let name = name.to_string_lossy();
        // a `\` in a host file name would be read back as a separator
        if name.contains(crate::path::SEP) == true {
            debug!("cannot represent entry {:?} of {}", name, self.dir);
            return Some(Err(Error::InvalidEntryName(
                self.dir.clone(),
                name.into_owned(),
            )));
        }
        Some(Ok(self.dir.join(&*name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use tempfile::TempDir;

    fn host(dir: &TempDir) -> WinPath {
        WinPath::new(&dir.path().to_string_lossy())
    }

    fn seven_zip() -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        for name in ["7z.exe", "7zFM.exe", "7zG.exe", "readme.txt"] {
            fs::write(dir.path().join(name), b"").unwrap();
        }
        fs::create_dir(dir.path().join("Lang")).unwrap();
        dir
    }

    #[test]
    fn ut_to_native_roundtrips_host_path() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(host(&dir).to_native(), dir.path().to_path_buf());
    }

    #[test]
    fn ut_ls_filter_by_ext() {
        let dir = seven_zip();
        let seven_zip_dir = host(&dir);
        let exes: BTreeSet<String> = seven_zip_dir
            .ls()
            .unwrap()
            .map(|p| p.unwrap())
            .filter(|p| p.ext() == ".exe")
            .inspect(|p| assert_eq!(p.is_file(), true))
            .map(|p| p.basename().to_string())
            .collect();
        let expected: BTreeSet<String> = ["7z.exe", "7zFM.exe", "7zG.exe"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(exes, expected);
    }

    #[test]
    fn ut_ls_entries_are_joined_onto_dir() {
        let dir = seven_zip();
        let seven_zip_dir = host(&dir);
        let listing = seven_zip_dir.ls().unwrap();
        assert_eq!(listing.dir(), &seven_zip_dir);
        let entries: Vec<WinPath> = listing.map(|p| p.unwrap()).collect();
        assert_eq!(entries.len(), 5);
        for entry in &entries {
            assert_eq!(entry.parent(), seven_zip_dir);
        }
        assert_eq!(
            entries.iter().filter(|p| p.is_dir() == true).count(),
            1
        );
    }

    #[test]
    fn ut_ls_requeries_filesystem() {
        let dir = tempfile::tempdir().unwrap();
        let p = host(&dir);
        assert_eq!(p.ls().unwrap().count(), 0);
        fs::write(dir.path().join("new.txt"), b"").unwrap();
        assert_eq!(p.ls().unwrap().count(), 1);
    }

    #[test]
    fn ut_ls_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = host(&dir).join("missing");
        assert_eq!(missing.ls().unwrap_err(), Error::NotFound(missing.clone()));
    }

    #[test]
    fn ut_ls_not_a_directory() {
        let dir = seven_zip();
        let exe = host(&dir).join("7z.exe");
        assert_eq!(exe.ls().unwrap_err(), Error::NotADirectory(exe.clone()));
    }

    #[test]
    fn ut_missing_path_is_neither_file_nor_dir() {
        let dir = tempfile::tempdir().unwrap();
        let missing = host(&dir).join("nothing\\here.txt");
        assert_eq!(missing.is_file(), false);
        assert_eq!(missing.is_dir(), false);
        assert_eq!(missing.exists(), false);
        assert_eq!(WinPath::new("").is_file(), false);
        assert_eq!(WinPath::new("").is_dir(), false);
    }

    #[test]
    fn ut_file_state_is_live() {
        let dir = tempfile::tempdir().unwrap();
        let p = host(&dir).join("later.txt");
        assert_eq!(p.is_file(), false);
        fs::write(p.to_native(), b"abc").unwrap();
        assert_eq!(p.is_file(), true);
        assert_eq!(p.is_dir(), false);
        assert_eq!(p.size().unwrap(), 3);
        fs::remove_file(p.to_native()).unwrap();
        assert_eq!(p.is_file(), false);
    }

    #[test]
    fn ut_stat_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = host(&dir).join("gone");
        assert_eq!(missing.size().unwrap_err(), Error::NotFound(missing.clone()));
    }

    #[test]
    fn ut_io_error_mapping() {
        let p = WinPath::new("C:\\Windows\\System32\\config");
        let denied = io::Error::new(io::ErrorKind::PermissionDenied, "Permission denied");
        assert_eq!(
            p.io_error(denied),
            Error::Io(p.clone(), String::from("permission denied"))
        );
        let missing = io::Error::new(io::ErrorKind::NotFound, "No such file or directory");
        assert_eq!(p.io_error(missing), Error::NotFound(p.clone()));
        let missing = io::Error::from(io::ErrorKind::NotFound);
        assert_eq!(p.io_error(missing), Error::NotFound(p.clone()));
    }

    #[test]
    #[cfg(unix)]
    fn ut_ls_rejects_backslash_names() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a\\b.exe"), b"").unwrap();
        fs::write(dir.path().join("7z.exe"), b"").unwrap();
        let p = host(&dir);
        let (ok, err): (Vec<_>, Vec<_>) = p.ls().unwrap().partition(|e| e.is_ok());
        let ok: Vec<WinPath> = ok.into_iter().map(|e| e.unwrap()).collect();
        assert_eq!(ok, vec![p.join("7z.exe")]);
        assert_eq!(ok[0].is_file(), true);
        let err: Vec<Error> = err.into_iter().map(|e| e.unwrap_err()).collect();
        assert_eq!(
            err,
            vec![Error::InvalidEntryName(p.clone(), String::from("a\\b.exe"))]
        );
    }

    #[test]
    fn ut_absolute_drive_relative() {
        let cwd = WinPath::new("D:\\work");
        let anchor = |s: &str| {
            let p = WinPath::new(s);
            let (drive, rest) = p.split_drive();
            WinPath::anchor(&cwd, drive, rest, &p)
        };
        assert_eq!(anchor("C:a").as_str(), "C:\\a");
        assert_eq!(anchor("C:").as_str(), "C:\\");
        assert_eq!(anchor("d:a\\b").as_str(), "D:\\work\\a\\b");
        assert_eq!(anchor("\\a").as_str(), "D:\\a");
        assert_eq!(anchor("a").as_str(), "D:\\work\\a");

        let rel = WinPath::new("C:a").absolute().unwrap();
        assert_eq!(rel.drive(), "C:");
        assert_eq!(rel.is_absolute(), true);
        assert_eq!(rel.basename(), "a");
    }

    #[test]
    #[cfg(not(windows))]
    fn ut_absolute_rooted_without_host_drive() {
        assert_eq!(WinPath::new("\\a").absolute().unwrap().as_str(), "\\a");
        assert_eq!(WinPath::new("C:a").absolute().unwrap().as_str(), "C:\\a");
        assert_eq!(WinPath::new("C:").is_mount(), false);
    }

    #[test]
    fn ut_absolute() {
        let abs = WinPath::new("C:\\a");
        assert_eq!(abs.absolute().unwrap(), abs);
        let rel = WinPath::new("a\\b").absolute().unwrap();
        assert_eq!(rel.is_absolute(), true);
        assert_eq!(rel.basename(), "b");
    }

    #[test]
    fn ut_canonicalize_resolves_dots_and_exists() {
        let dir = seven_zip();
        let lang = host(&dir).join("Lang");
        let real = lang.canonicalize().unwrap();
        assert_eq!(real.basename(), "Lang");
        assert_eq!(real.is_dir(), true);
        let missing = host(&dir).join("gone");
        assert_eq!(
            missing.canonicalize().unwrap_err(),
            Error::NotFound(missing.clone())
        );
    }

    #[test]
    #[cfg(unix)]
    fn ut_is_symlink() {
        let dir = seven_zip();
        let link = host(&dir).join("link.exe");
        std::os::unix::fs::symlink(dir.path().join("7z.exe"), link.to_native()).unwrap();
        assert_eq!(link.is_symlink(), true);
        assert_eq!(link.is_file(), true);
        assert_eq!(host(&dir).join("7z.exe").is_symlink(), false);
    }

    #[test]
    fn ut_is_mount() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(host(&dir).is_mount(), false);
        let root = host(&dir).ancestors().last().unwrap();
        assert_eq!(root.is_mount(), true);
    }
}
