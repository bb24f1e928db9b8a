/*!
 * Tests for text chunking
 */

use npc_translator::translation::split_into_chunks;
use npc_translator::TranslationError;

/// Joining chunk texts must give back the input, and offsets must line up
fn assert_partition(text: &str, max: usize) {
    let chunks = split_into_chunks(text, max).unwrap();

    let rebuilt: String = chunks.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(rebuilt, text);

    let mut offset = 0;
    for (i, chunk) in chunks.iter().enumerate() {
        assert_eq!(chunk.index, i);
        assert_eq!(chunk.offset, offset);
        assert!(chunk.char_len() <= max, "chunk {} has {} chars", i, chunk.char_len());
        assert!(chunk.char_len() > 0);
        offset += chunk.char_len();
    }
}

#[test]
fn test_splitIntoChunks_withEmptyText_shouldReturnNoChunks() {
    assert!(split_into_chunks("", 10).unwrap().is_empty());
}

#[test]
fn test_splitIntoChunks_shouldBreakAtLastWhitespaceInWindow() {
    let chunks = split_into_chunks("one two three four", 9).unwrap();
    let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, vec!["one two", " three", " four"]);
}

#[test]
fn test_splitIntoChunks_withoutWhitespace_shouldHardCut() {
    let chunks = split_into_chunks("abcdefghij", 4).unwrap();
    let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, vec!["abcd", "efgh", "ij"]);
}

#[test]
fn test_splitIntoChunks_shouldCountCharsNotBytes() {
    let text = "città perché però è già così";
    let chunks = split_into_chunks(text, 6).unwrap();
    assert!(chunks.iter().all(|c| c.char_len() <= 6));
    assert_partition(text, 6);
}

#[test]
fn test_splitIntoChunks_withZeroMax_shouldFail() {
    let result = split_into_chunks("text", 0);
    assert!(matches!(result, Err(TranslationError::InvalidChunkSize(0))));
}

#[test]
fn test_splitIntoChunks_shouldPartitionVariedInputs() {
    let inputs = [
        "a",
        "   leading and trailing   ",
        "line one\nline two\n\nline four",
        "tab\tseparated\twords and a verylongwordwithoutbreaks here",
        "日本語のテキスト と 空白",
    ];
    for text in inputs {
        for max in [1, 2, 3, 5, 8, 13, 1400] {
            assert_partition(text, max);
        }
    }
}
