use gitea_hash_core::manifest::write_manifest;
use gitea_hash_core::verify::{parse_manifest, verify};
use std::fs;

#[test]
fn untouched_tree_verifies_clean() {
    let td = tempfile::tempdir().unwrap();
    let root = td.path().join("tmp");
    fs::create_dir_all(root.join("sub")).unwrap();
    fs::write(root.join("a.txt"), "test1").unwrap();
    fs::write(root.join("sub/b.txt"), "test2").unwrap();
    let mf = td.path().join("m.txt");
    write_manifest(&root, &mf, &mut std::io::sink()).unwrap();

    let rep = verify(&mf, &root).unwrap();
    assert!(rep.is_clean(), "{rep:?}");
    assert_eq!(rep.ok, vec!["a.txt", "sub/b.txt"]);
}

#[test]
fn reports_mismatched_missing_and_extra() {
    let td = tempfile::tempdir().unwrap();
    let root = td.path().join("tmp");
    fs::create_dir_all(root.join("sub")).unwrap();
    fs::write(root.join("a.txt"), "test1").unwrap();
    fs::write(root.join("sub/b.txt"), "test2").unwrap();
    let mf = td.path().join("m.txt");
    write_manifest(&root, &mf, &mut std::io::sink()).unwrap();

    fs::write(root.join("a.txt"), "changed").unwrap();
    fs::remove_file(root.join("sub/b.txt")).unwrap();
    fs::write(root.join("new.txt"), "new").unwrap();

    let rep = verify(&mf, &root).unwrap();
    assert!(!rep.is_clean());
    assert_eq!(rep.mismatched, vec!["a.txt"]);
    assert_eq!(rep.missing, vec!["sub/b.txt"]);
    assert_eq!(rep.extra, vec!["new.txt"]);
}

#[test]
fn manifest_inside_tree_is_not_extra() {
    let td = tempfile::tempdir().unwrap();
    let root = td.path();
    fs::write(root.join("a.txt"), "test1").unwrap();
    let mf = root.join("HASHING_RESULTS.txt");
    write_manifest(root, &mf, &mut std::io::sink()).unwrap();
    assert!(verify(&mf, root).unwrap().is_clean());
}

#[test]
fn parses_paths_containing_separator() {
    let digest = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";
    let recs = parse_manifest(&format!("weird: name.txt: {digest}\n\n")).unwrap();
    assert_eq!(recs.len(), 1);
    assert_eq!(recs[0].rel_path, "weird: name.txt");
    assert_eq!(recs[0].checksum_hex, digest);
}

#[test]
fn rejects_malformed_lines() {
    assert!(parse_manifest("no separator here\n").is_err());
    assert!(parse_manifest("a.txt: not-a-digest\n").is_err());
    let upper = "E3B0C44298FC1C149AFBF4C8996FB92427AE41E4649B934CA495991B7852B855";
    assert!(parse_manifest(&format!("a.txt: {upper}\n")).is_err());
}
