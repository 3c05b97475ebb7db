use gitea_hash_core::manifest::{collect_records, strip_scan_root, write_manifest};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

fn sha_hex(s: &str) -> String {
    format!("{:x}", Sha256::digest(s.as_bytes()))
}

fn make_tree(root: &Path) {
    fs::create_dir_all(root.join("sub")).unwrap();
    fs::write(root.join("a.txt"), "test1").unwrap();
    fs::write(root.join("sub/b.txt"), "test2").unwrap();
}

#[test]
fn manifest_lists_relative_paths_and_digests() {
    let td = tempfile::tempdir().unwrap();
    let root = td.path().join("tmp");
    make_tree(&root);
    let out = td.path().join("HASHING_RESULTS.txt");
    let mut progress = Vec::new();

    let records = write_manifest(&root, &out, &mut progress).unwrap();
    assert_eq!(records.len(), 2);

    let text = fs::read_to_string(&out).unwrap();
    let expected = format!("a.txt: {}\nsub/b.txt: {}\n", sha_hex("test1"), sha_hex("test2"));
    assert_eq!(text, expected);
    assert_eq!(String::from_utf8(progress).unwrap(), expected);
}

#[test]
fn rerun_over_unchanged_tree_is_byte_identical() {
    let td = tempfile::tempdir().unwrap();
    let root = td.path().join("tmp");
    make_tree(&root);
    fs::write(root.join("sub/a.txt"), "x").unwrap();
    fs::create_dir_all(root.join("b_dir/inner")).unwrap();
    fs::write(root.join("b_dir/inner/z"), "z").unwrap();
    let out = td.path().join("m.txt");

    write_manifest(&root, &out, &mut std::io::sink()).unwrap();
    let first = fs::read(&out).unwrap();
    write_manifest(&root, &out, &mut std::io::sink()).unwrap();
    assert_eq!(first, fs::read(&out).unwrap());
}

#[test]
fn files_come_before_subdirectories_at_each_level() {
    let td = tempfile::tempdir().unwrap();
    let root = td.path();
    fs::create_dir_all(root.join("a_dir")).unwrap();
    fs::create_dir_all(root.join("m_dir/n")).unwrap();
    fs::write(root.join("z.txt"), "").unwrap();
    fs::write(root.join("b.txt"), "").unwrap();
    fs::write(root.join("a_dir/y"), "").unwrap();
    fs::write(root.join("m_dir/n/q"), "").unwrap();
    fs::write(root.join("m_dir/p"), "").unwrap();

    let order: Vec<String> = collect_records(root, None).unwrap().into_iter().map(|r| r.rel_path).collect();
    assert_eq!(order, vec!["b.txt", "z.txt", "a_dir/y", "m_dir/p", "m_dir/n/q"]);
}

#[test]
fn output_inside_root_is_not_listed() {
    let td = tempfile::tempdir().unwrap();
    let root = td.path().join("tree");
    make_tree(&root);
    let out = root.join("results.txt");

    write_manifest(&root, &out, &mut std::io::sink()).unwrap();
    let again = write_manifest(&root, &out, &mut std::io::sink()).unwrap();
    assert!(again.iter().all(|r| r.rel_path != "results.txt"));
    assert_eq!(again.len(), 2);
}

#[test]
fn empty_tree_gives_empty_manifest() {
    let td = tempfile::tempdir().unwrap();
    let root = td.path().join("tmp");
    fs::create_dir(&root).unwrap();
    let out = td.path().join("m.txt");
    assert!(write_manifest(&root, &out, &mut std::io::sink()).unwrap().is_empty());
    assert_eq!(fs::read_to_string(&out).unwrap(), "");
}

#[test]
fn scan_root_is_stripped_whatever_its_depth() {
    let root = Path::new("/x/y/tmp");
    assert_eq!(strip_scan_root(root, &root.join("sub").join("b.txt")).as_deref(), Some("sub/b.txt"));
    assert_eq!(strip_scan_root(Path::new("tmp"), Path::new("tmp/a.txt")).as_deref(), Some("a.txt"));
    assert_eq!(strip_scan_root(root, root), None);
    assert_eq!(strip_scan_root(root, Path::new("/elsewhere/a.txt")), None);
}
