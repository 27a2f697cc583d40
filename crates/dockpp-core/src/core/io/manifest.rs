use serde::Serialize;
use std::path::Path;

/// Partition label every staged pair is assigned to; a single-pair run is always
/// an inference ("test") run.
pub const TEST_SPLIT: &str = "test";

#[derive(Debug, Serialize)]
struct ManifestRow<'a> {
    path: &'a str,
    split: &'a str,
}

/// Writes the one-row manifest (`path,split` header, then `{run_id},test`) that
/// tells the inference script which staged pair to load.
///
/// An identifier containing a delimiter or quote is CSV-quoted so it stays one field.
pub fn write_manifest(path: &Path, run_id: &str) -> Result<(), csv::Error> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_path(path)?;
    writer.serialize(ManifestRow {
        path: run_id,
        split: TEST_SPLIT,
    })?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn manifest_has_header_and_single_test_row() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("splits_test.csv");
        write_manifest(&path, "1abc").unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "path,split\n1abc,test\n");
        assert_eq!(content.lines().count(), 2);
    }

    #[test]
    fn manifest_overwrites_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("splits_test.csv");
        fs::write(&path, "stale\ncontent\nhere\n").unwrap();

        write_manifest(&path, "7xyz").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "path,split\n7xyz,test\n");
    }

    #[test]
    fn identifier_with_delimiter_is_quoted() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("splits_test.csv");
        write_manifest(&path, "a,b").unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "path,split\n\"a,b\",test\n"
        );
        let mut reader = csv::Reader::from_path(&path).unwrap();
        let record = reader.records().next().unwrap().unwrap();
        assert_eq!(&record[0], "a,b");
        assert_eq!(&record[1], "test");
    }

    #[test]
    fn manifest_fails_when_directory_is_missing() {
        let dir = tempdir().unwrap();
        let result = write_manifest(&dir.path().join("missing/splits_test.csv"), "1abc");
        assert!(result.is_err());
    }
}
