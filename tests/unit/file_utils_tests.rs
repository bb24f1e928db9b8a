/*!
 * Tests for input file loading
 */

use anyhow::Result;
use npc_translator::file_utils::{FileManager, FileType};
use npc_translator::FileLoadError;
use crate::common;

#[test]
fn test_loadInputs_withSeveralPaths_shouldKeepArgumentOrder() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let second = common::create_test_file(temp_dir.path(), "b.md", "# Second")?;
    let first = common::create_test_file(temp_dir.path(), "a.txt", "First")?;

    let inputs = FileManager::load_inputs(&[second, first]);

    assert_eq!(inputs.text, "\n\n[b.md]\n# Second\n\n[a.txt]\nFirst");
    assert_eq!(inputs.loaded.len(), 2);
    assert_eq!(inputs.loaded[0].chars, 8);
    assert!(inputs.failures.is_empty());
    Ok(())
}

#[test]
fn test_loadInputs_withDirectory_shouldWalkSortedAndSkipImages() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let nested = temp_dir.path().join("nested");
    std::fs::create_dir(&nested)?;
    common::create_test_file(&nested, "z.txt", "last")?;
    common::create_test_file(temp_dir.path(), "a.log", "first")?;
    common::create_test_file(temp_dir.path(), "photo.png", "not really a png")?;

    let inputs = FileManager::load_inputs(&[temp_dir.path().to_path_buf()]);

    assert_eq!(inputs.text, "\n\n[a.log]\nfirst\n\n[z.txt]\nlast");
    assert_eq!(inputs.failures.len(), 1);
    match &inputs.failures[0].error {
        FileLoadError::Unsupported(kind) => assert_eq!(kind, "image"),
        other => panic!("unexpected error: {other:?}"),
    }
    Ok(())
}

#[test]
fn test_loadTextFile_withInvalidUtf8_shouldReportIoError() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("broken.txt");
    std::fs::write(&path, [0xff, 0xfe, 0xfd])?;

    let result = FileManager::load_text_file(&path);
    assert!(matches!(result, Err(FileLoadError::Io(_))));
    Ok(())
}

#[test]
fn test_writeToFile_shouldCreateParentDirectories() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("out").join("deep").join("result.txt");

    FileManager::write_to_file(&path, "Ciao mondo")?;

    assert!(FileManager::file_exists(&path));
    assert_eq!(FileManager::read_to_string(&path)?, "Ciao mondo");
    Ok(())
}

#[test]
fn test_detectFileType_withoutExtension_shouldBeUnknown() {
    assert_eq!(FileManager::detect_file_type("README"), FileType::Unknown);
    assert_eq!(FileManager::detect_file_type("notes.markdown"), FileType::PlainText);
}
