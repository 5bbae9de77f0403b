use std::fs;
use winpath::{Error, WinPath};

#[test]
fn program_files_join_displays_backslashes() {
    let program_files = WinPath::new("C:\\Program Files");
    let seven_zip_dir = program_files.join("7-Zip");
    assert_eq!(seven_zip_dir.to_string(), "C:\\Program Files\\7-Zip");
    assert_eq!((&program_files / "7-Zip").to_string(), seven_zip_dir.to_string());
    assert_eq!(seven_zip_dir.parent(), program_files);
    assert_eq!(seven_zip_dir.basename(), "7-Zip");
}

#[test]
fn seven_zip_executables_are_listed() {
    let root = tempfile::tempdir().unwrap();
    let program_files = WinPath::new(&root.path().to_string_lossy()).join("Program Files");
    let seven_zip_dir = program_files.join("7-Zip");
    fs::create_dir_all(seven_zip_dir.to_native()).unwrap();
    for name in ["7z.exe", "7zFM.exe", "7zG.exe", "readme.txt"] {
        fs::write(seven_zip_dir.join(name).to_native(), b"MZ").unwrap();
    }

    let mut exes: Vec<WinPath> = seven_zip_dir
        .ls()
        .unwrap()
        .filter_map(Result::ok)
        .filter(|p| p.ext() == ".exe")
        .collect();
    exes.sort();

    let expected: Vec<WinPath> = ["7z.exe", "7zFM.exe", "7zG.exe"]
        .iter()
        .map(|name| &seven_zip_dir / *name)
        .collect();
    assert_eq!(exes, expected);
    assert!(exes.iter().all(|p| p.is_file() == true && p.is_dir() == false));
}

#[test]
fn listing_reports_missing_and_non_directories() {
    let root = tempfile::tempdir().unwrap();
    let base = WinPath::new(&root.path().to_string_lossy());
    let file = base.join("readme.txt");
    fs::write(file.to_native(), b"").unwrap();

    match base.join("7-Zip").ls() {
        Err(Error::NotFound(p)) => assert_eq!(p, base.join("7-Zip")),
        other => panic!("expected not found, got {:?}", other.map(|_| ())),
    }
    match file.ls() {
        Err(Error::NotADirectory(p)) => assert_eq!(p, file),
        other => panic!("expected not a directory, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn ascent_stops_at_drive_root() {
    let exe = WinPath::new("C:/Program Files/7-Zip/7z.exe");
    let root = exe.ancestors().last().unwrap();
    assert_eq!(root.to_string(), "C:\\");
    assert_eq!(root.parent(), root);
}
