use chrono::Duration;
use drill_core::model::{DailyHistory, DailySummary, TrainingStats, WordRecord};
use drill_core::time::fixed_now;
use storage::{DrillPaths, Storage};

fn word(term: &str, meanings: &[&str], mastery: f64) -> WordRecord {
    WordRecord::new(term, meanings.iter().map(|m| (*m).to_owned()), mastery).unwrap()
}

#[test]
fn missing_files_load_as_empty_state() {
    let dir = tempfile::tempdir().unwrap();
    let storage = Storage::files(DrillPaths::in_dir(dir.path()));

    assert!(storage.words.load_words().unwrap().is_empty());
    assert!(storage.stats.load_stats_header().unwrap().is_none());
    assert!(storage.stats.load_daily_log().unwrap().is_empty());
}

#[test]
fn word_list_save_load_save_is_identical() {
    let dir = tempfile::tempdir().unwrap();
    let paths = DrillPaths::in_dir(dir.path());
    let storage = Storage::files(paths.clone());

    let records = vec![
        word("apple", &["苹果"], 0.25),
        word("cat", &["猫", "猫咪"], 0.5),
        word("dog", &["狗"], 1.0),
    ];
    storage.words.save_words(&records).unwrap();

    let loaded = storage.words.load_words().unwrap();
    assert_eq!(loaded, records);

    // Second rewrite must produce the same bytes.
    let first_bytes = std::fs::read(&paths.word_list).unwrap();
    storage.words.save_words(&loaded).unwrap();
    let second_bytes = std::fs::read(&paths.word_list).unwrap();
    assert_eq!(first_bytes, second_bytes);
}

#[test]
fn word_list_merges_handwritten_duplicate_rows() {
    let dir = tempfile::tempdir().unwrap();
    let paths = DrillPaths::in_dir(dir.path());

    std::fs::write(
        &paths.word_list,
        "| term | meanings | mastery |\n\
         | :---: | :---: | :---: |\n\
         | cat | 猫 | 0.4000 |\n\
         | cat | 猫咪 | 0.9000 |\n",
    )
    .unwrap();

    let storage = Storage::files(paths);
    let loaded = storage.words.load_words().unwrap();

    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].meanings(), ["猫", "猫咪"]);
    assert_eq!(loaded[0].mastery(), 0.4);
}

#[test]
fn handwritten_separators_do_not_leak_empty_or_padded_meanings() {
    let dir = tempfile::tempdir().unwrap();
    let paths = DrillPaths::in_dir(dir.path());

    // Trailing separator and a space after one, on a repeated row.
    std::fs::write(
        &paths.word_list,
        "| term | meanings | mastery |\n\
         | :---: | :---: | :---: |\n\
         | cat | 猫 | 0.4000 |\n\
         | cat | 猫， 猫咪， | 0.9000 |\n",
    )
    .unwrap();

    let storage = Storage::files(paths.clone());
    let loaded = storage.words.load_words().unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].meanings(), ["猫", "猫咪"]);

    // Save-reload must reproduce the same records byte for byte.
    storage.words.save_words(&loaded).unwrap();
    let first_bytes = std::fs::read(&paths.word_list).unwrap();
    let reloaded = storage.words.load_words().unwrap();
    assert_eq!(reloaded, loaded);
    storage.words.save_words(&reloaded).unwrap();
    assert_eq!(std::fs::read(&paths.word_list).unwrap(), first_bytes);
}

#[test]
fn malformed_word_list_aborts_the_load() {
    let dir = tempfile::tempdir().unwrap();
    let paths = DrillPaths::in_dir(dir.path());

    std::fs::write(
        &paths.word_list,
        "| term | meanings | mastery |\n\
         | :---: | :---: | :---: |\n\
         | cat | 猫 | 0.4000 |\n\
         broken row\n",
    )
    .unwrap();

    let storage = Storage::files(paths);
    assert!(storage.words.load_words().is_err());
}

#[test]
fn stats_header_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let storage = Storage::files(DrillPaths::in_dir(dir.path()));

    let stats = TrainingStats {
        session_start: fixed_now(),
        last_update: fixed_now() + Duration::hours(1),
        total_tests: 100,
        total_words: 12,
        avg_mastery: 48.33,
    };
    storage.stats.save_stats_header(&stats).unwrap();

    let loaded = storage.stats.load_stats_header().unwrap().unwrap();
    assert_eq!(loaded, stats);
}

#[test]
fn daily_log_round_trips_and_overwrites() {
    let dir = tempfile::tempdir().unwrap();
    let storage = Storage::files(DrillPaths::in_dir(dir.path()));

    let mut history = DailyHistory::new();
    history.insert(
        "11-14".to_owned(),
        DailySummary {
            total_tests: 10,
            total_words: 3,
            avg_mastery: 30.0,
        },
    );
    storage.stats.save_daily_log(&history).unwrap();

    // Same-day write replaces that day's entry.
    history.insert(
        "11-14".to_owned(),
        DailySummary {
            total_tests: 11,
            total_words: 3,
            avg_mastery: 32.0,
        },
    );
    storage.stats.save_daily_log(&history).unwrap();

    let loaded = storage.stats.load_daily_log().unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded["11-14"].total_tests, 11);
}
