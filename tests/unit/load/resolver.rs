use super::*;

#[tokio::test]
async fn file_uris_are_read_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("anim.json");
    std::fs::write(&path, b"{}").unwrap();

    let uri = url::Url::from_file_path(&path).unwrap();
    let bytes = FileUriResolver
        .open(&ContentUri::new(uri.as_str()))
        .await
        .unwrap();
    assert_eq!(bytes, b"{}");
}

#[tokio::test]
async fn missing_file_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let uri = url::Url::from_file_path(dir.path().join("nope.json")).unwrap();
    assert!(matches!(
        FileUriResolver.open(&ContentUri::new(uri.as_str())).await,
        Err(LottieError::NotFound(_))
    ));
}

#[tokio::test]
async fn other_schemes_are_unresolvable() {
    for raw in ["content://media/external/file/42", "no-scheme", "https://example.com/a.json"] {
        assert!(matches!(
            FileUriResolver.open(&ContentUri::new(raw)).await,
            Err(LottieError::UnresolvableUri(_))
        ));
    }
}
