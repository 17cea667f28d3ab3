//! Integration tests for hash crate

#[cfg(test)]
mod tests {
    use tempfile::tempdir;
    use tokio::fs;
    use vigil_hash::*;

    #[tokio::test]
    async fn test_file_and_memory_digests_agree() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("test.txt");

        let data = b"verify this content";
        fs::write(&file_path, data).await.unwrap();

        let from_file = Hash::hash_file(&file_path).await.unwrap();
        assert_eq!(from_file, Hash::from_data(data));

        let from_reader = Hash::hash_reader(&data[..]).await.unwrap();
        assert_eq!(from_reader, from_file);
    }

    #[tokio::test]
    async fn test_rewritten_file_changes_digest() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("app.bin");

        fs::write(&file_path, b"v1").await.unwrap();
        let before = Hash::hash_file(&file_path).await.unwrap();
        fs::write(&file_path, b"v2").await.unwrap();
        let after = Hash::hash_file(&file_path).await.unwrap();

        assert_ne!(before, after);
        assert_eq!(after.to_hex().len(), DIGEST_LEN * 2);
    }
}
