//! Drives the CLI command layer against temporary passage and state files.

use chrono::{Duration, TimeZone, Utc};
use clap::Parser;
use cloze_core::{PassageKind, PracticeMode};
use cloze_trainer_cli::config::Config;
use cloze_trainer_cli::state;
use cloze_trainer_cli::{execute, Cli};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::{Path, PathBuf};

const PASSAGE: &str = "The Beatitudes\n3 Blessed are the poor in spirit\n4 Blessed are those who mourn\n5 Blessed are the meek";

struct Fixture {
    _dir: tempfile::TempDir,
    passage: PathBuf,
    state: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let passage = dir.path().join("beatitudes.txt");
        std::fs::write(&passage, PASSAGE).unwrap();
        let state = dir.path().join("state.json");
        Self {
            _dir: dir,
            passage,
            state,
        }
    }

    fn run(&self, args: &[&str], minutes: i64) -> String {
        let mut argv = vec![
            "cloze".to_string(),
            path_arg(&self.passage),
            "--state".to_string(),
            path_arg(&self.state),
        ];
        argv.extend(args.iter().map(|a| a.to_string()));
        let cli = Cli::try_parse_from(argv).unwrap();
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap() + Duration::minutes(minutes);
        execute(cli, Config::default(), now, &mut StdRng::seed_from_u64(minutes as u64)).unwrap()
    }
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

#[test]
fn show_does_not_write_state() {
    let fx = Fixture::new();
    let out = fx.run(&["show"], 0);
    assert!(out.starts_with("The Beatitudes\n"));
    assert!(out.contains("words hidden (5%)"));
    assert!(!fx.state.exists());
}

#[test]
fn actions_persist_between_runs() {
    let fx = Fixture::new();
    fx.run(&["act", "harder"], 0);
    fx.run(&["act", "harder"], 0);

    let saved = state::load(&fx.state).unwrap().unwrap();
    assert_eq!(saved.record.deletion_percentage, 15);
    assert_eq!(saved.cursor.mode, PracticeMode::Percentage);
}

#[test]
fn segment_practice_reaches_review() {
    let fx = Fixture::new();
    fx.run(&["act", "toggle-segment-mode"], 0);
    fx.run(&["act", "complete-segment"], 0);
    fx.run(&["act", "complete-segment"], 0);
    fx.run(&["act", "complete-segment"], 0);

    let saved = state::load(&fx.state).unwrap().unwrap();
    assert_eq!(saved.record.verse_progress[&3].completions, 2);
    assert_eq!(saved.record.verse_progress[&4].completions, 1);

    let report = fx.run(&["due"], 3);
    assert!(report.contains("   3  completed  2x  due!"));
    assert!(report.contains("   4  completed  1x  learning"));

    let out = fx.run(&["act", "complete-segment"], 3);
    assert!(out.contains("Reviewing segment 3"));
    let out = fx.run(&["act", "complete-segment"], 3);
    assert!(out.contains("Rate review of segment 3"));
    fx.run(&["act", "submit-review-quality", "easy"], 3);

    let saved = state::load(&fx.state).unwrap().unwrap();
    assert_eq!(saved.record.verse_progress[&3].interval, 300_000);
    assert_eq!(saved.cursor.reviewing, None);
}

#[test]
fn poetry_kind_flag_overrides_config() {
    let fx = Fixture::new();
    let out = fx.run(&["--kind", "poetry", "act", "toggle-segment-mode"], 0);
    assert!(out.contains("Segment 1"));
    assert_eq!(Config::default().kind, PassageKind::Scripture);
}

#[test]
fn unknown_action_is_rejected() {
    let fx = Fixture::new();
    let passage = path_arg(&fx.passage);
    let cli = Cli::try_parse_from(["cloze", passage.as_str(), "act", "fly"]).unwrap();
    let err = execute(cli, Config::default(), Utc::now(), &mut StdRng::seed_from_u64(0)).unwrap_err();
    assert!(err.to_string().contains("unknown action: fly"));
}
