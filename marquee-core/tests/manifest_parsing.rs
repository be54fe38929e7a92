use marquee_core::{Manifest, ManifestError};
use std::io::Write;

const PAGE: &str = r#"{
  "page": {
    "title": "Romantic Comedy",
    "total-content-items": "3",
    "page-num": "1",
    "content-items": {
      "content": [
        { "name": "The Birds", "poster-image": "poster1.jpg" },
        { "name": "Rear Window", "poster-image": "poster2.jpg" },
        { "name": "Family Pot", "poster-image": "poster3.jpg" }
      ]
    }
  }
}"#;

#[test]
fn entries_follow_document_order() {
    let m = Manifest::from_json(PAGE).unwrap();
    assert_eq!(m.title(), "Romantic Comedy");
    let entries = m.into_entries();
    let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, ["The Birds", "Rear Window", "Family Pot"]);
    assert_eq!(entries[2].poster_path, "poster3.jpg");
}

#[test]
fn reads_from_file() {
    let mut f = tempfile::NamedTempFile::new().unwrap();
    f.write_all(PAGE.as_bytes()).unwrap();
    let m = Manifest::from_reader(std::fs::File::open(f.path()).unwrap()).unwrap();
    assert_eq!(m.len(), 3);
}

#[test]
fn wrong_shape_is_a_parse_error() {
    let err = Manifest::from_json(r#"{"page":{"items":[]}}"#).unwrap_err();
    assert!(matches!(err, ManifestError::Parse(_)));
    let err = Manifest::from_slice(b"not json").unwrap_err();
    assert!(matches!(err, ManifestError::Parse(_)));
}
