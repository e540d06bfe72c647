use std::{
    env, fs,
    path::{Path, PathBuf},
    process::{Command, Output},
};

fn norm_newlines(s: &str) -> String {
    s.replace("\r\n", "\n").replace('\r', "")
}

fn temp_dir(name: &str) -> PathBuf {
    let dir = env::temp_dir().join(format!("beat_patterns_cli_{name}_{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn repo_patterns() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("..").join("Patterns")
}

// HOME points at the temp dir so a user's own preferences never leak in.
fn run(home: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_beat_patterns_cli"))
        .env("HOME", home)
        .env("RUST_LOG", "warn")
        .args(args)
        .output()
        .unwrap()
}

#[test]
fn help_mentions_subcommands() {
    let exe = env!("CARGO_BIN_EXE_beat_patterns_cli");

    let output = Command::new(exe).arg("--help").output().unwrap();

    assert!(output.status.success());
    let stdout = norm_newlines(&String::from_utf8_lossy(&output.stdout));
    assert!(stdout.contains("generate"));
    assert!(stdout.contains("stats"));
    assert!(stdout.contains("init"));
}

#[test]
fn generate_all_writes_one_compact_chart_per_level() {
    let dir = temp_dir("generate_all");
    let out_dir = dir.join("charts");
    let patterns = repo_patterns();

    let output = run(
        &dir,
        &[
            "generate",
            "--bpm",
            "128",
            "--duration",
            "90",
            "--patterns",
            patterns.to_str().unwrap(),
            "--seed",
            "7",
            "-o",
            out_dir.to_str().unwrap(),
        ],
    );
    assert!(
        output.status.success(),
        "{}",
        String::from_utf8_lossy(&output.stderr)
    );

    for name in ["Easy", "Normal", "Hard", "Expert", "ExpertPlus"] {
        let path = out_dir.join(format!("{name}.dat"));
        let json = fs::read_to_string(&path).unwrap();
        assert!(!json.trim_end().contains('\n'), "{name}.dat is not one line");

        let v: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(v["_version"], "2.0.0");
        assert!(v["_events"].as_array().unwrap().is_empty());
        let notes = v["_notes"].as_array().unwrap();
        assert!(!notes.is_empty(), "{name} has no notes");
        let first = &notes[0];
        for key in ["_time", "_lineIndex", "_lineLayer", "_type", "_cutDirection"] {
            assert!(first.get(key).is_some(), "missing {key}");
        }
    }
    assert!(!out_dir.join("All.dat").exists());
}

#[test]
fn generate_with_seed_is_reproducible() {
    let dir = temp_dir("generate_seed");
    let patterns = repo_patterns();
    let mut charts = Vec::new();

    for run_name in ["a", "b"] {
        let out_dir = dir.join(run_name);
        let output = run(
            &dir,
            &[
                "generate",
                "--bpm",
                "100",
                "--duration",
                "60",
                "--difficulty",
                "hard",
                "--patterns",
                patterns.to_str().unwrap(),
                "--seed",
                "1234",
                "--snap",
                "2",
                "-o",
                out_dir.to_str().unwrap(),
            ],
        );
        assert!(output.status.success());
        charts.push(fs::read_to_string(out_dir.join("Hard.dat")).unwrap());
        assert!(!out_dir.join("Easy.dat").exists());
    }

    assert_eq!(charts[0], charts[1]);
}

#[test]
fn generate_missing_patterns_is_e1003() {
    let dir = temp_dir("missing_patterns");
    let missing = dir.join("NoPatternsHere");

    let output = run(
        &dir,
        &[
            "generate",
            "--bpm",
            "120",
            "--duration",
            "30",
            "--patterns",
            missing.to_str().unwrap(),
        ],
    );

    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(1));

    let stderr = norm_newlines(&String::from_utf8_lossy(&output.stderr));
    assert!(stderr.contains("Error: failed to load patterns: "));
    assert!(stderr.contains("Caused by:"));
    assert!(stderr.contains("E1003: pattern library not found"));
}

#[test]
fn generate_failure_writes_no_charts() {
    let dir = temp_dir("generate_failure");
    let out_dir = dir.join("charts");
    let patterns = repo_patterns();

    let output = run(
        &dir,
        &[
            "generate",
            "--bpm",
            "120",
            "--duration",
            "30",
            "--patterns",
            patterns.to_str().unwrap(),
            "--min-delay",
            "5",
            "--max-delay",
            "1",
            "-o",
            out_dir.to_str().unwrap(),
        ],
    );

    assert_eq!(output.status.code(), Some(1));
    let stderr = norm_newlines(&String::from_utf8_lossy(&output.stderr));
    assert!(stderr.contains("Error: generation failed for Easy"));
    assert!(stderr.contains("E2003"));
    assert!(!out_dir.exists());
}

#[test]
fn unknown_difficulty_is_rejected() {
    let dir = temp_dir("bad_difficulty");
    let output = run(
        &dir,
        &["generate", "--bpm", "120", "--duration", "30", "--difficulty", "Impossible"],
    );

    assert!(!output.status.success());
    let stderr = norm_newlines(&String::from_utf8_lossy(&output.stderr));
    assert!(stderr.contains("Impossible"));
}

#[test]
fn stats_reports_gaps_and_cuts() {
    let dir = temp_dir("stats");
    let chart = dir.join("Hard.dat");
    fs::write(
        &chart,
        r#"{"_version":"2.0.0","_events":[],"_notes":[
            {"_time":0,"_lineIndex":1,"_lineLayer":0,"_type":0,"_cutDirection":1},
            {"_time":4,"_lineIndex":2,"_lineLayer":0,"_type":1,"_cutDirection":2},
            {"_time":20,"_lineIndex":2,"_lineLayer":1,"_type":1,"_cutDirection":5}
        ]}"#,
    )
    .unwrap();

    let output = run(
        &dir,
        &["stats", chart.to_str().unwrap(), "--bpm", "120", "--duration", "40"],
    );

    assert!(output.status.success());
    let stdout = norm_newlines(&String::from_utf8_lossy(&output.stdout));
    assert!(stdout.contains("Notes:            3\n"));
    assert!(stdout.contains("Largest gap:      32.00\n"));
    assert!(stdout.contains("Large gaps:       2\n"));
    assert!(stdout.contains("Red cuts:         1\n"));
    assert!(stdout.contains("Blue cuts:        2\n"));
    assert!(stdout.contains("Up/down cuts:     1\n"));
    assert!(stdout.contains("Left/right cuts:  1\n"));
    assert!(stdout.contains("Diagonal cuts:    1\n"));
}

#[test]
fn stats_missing_chart_is_reported() {
    let dir = temp_dir("stats_missing");
    let missing = dir.join("Nope.dat");

    let output = run(
        &dir,
        &["stats", missing.to_str().unwrap(), "--bpm", "120", "--duration", "40"],
    );

    assert_eq!(output.status.code(), Some(1));
    let stderr = norm_newlines(&String::from_utf8_lossy(&output.stderr));
    assert!(stderr.contains("Error: failed to read chart:"));
    assert!(stderr.contains("Nope.dat"));
}

#[test]
fn init_writes_preferences_once() {
    let dir = temp_dir("init");
    let config = dir.join("prefs.json");

    let first = run(&dir, &["init", "--config", config.to_str().unwrap()]);
    assert!(first.status.success());

    let v: serde_json::Value = serde_json::from_str(&fs::read_to_string(&config).unwrap()).unwrap();
    let defaults = v["difficultyDefaults"].as_array().unwrap();
    assert_eq!(defaults.len(), 1);
    assert_eq!(defaults[0]["difficulty"], "All");
    assert_eq!(defaults[0]["minimumInitialWhitespace"], 4.0);

    let again = run(&dir, &["init", "--config", config.to_str().unwrap()]);
    assert_eq!(again.status.code(), Some(1));
    let stderr = norm_newlines(&String::from_utf8_lossy(&again.stderr));
    assert!(stderr.contains("already exists"));

    let forced = run(&dir, &["init", "--config", config.to_str().unwrap(), "--force"]);
    assert!(forced.status.success());
}

#[test]
fn init_defaults_to_home_config() {
    let dir = temp_dir("init_home");

    let output = run(&dir, &["init"]);

    assert!(output.status.success());
    assert!(dir.join(".BeatPatternsConfig").is_file());
}

#[test]
fn generate_uses_preferences_patterns_path() {
    let dir = temp_dir("prefs_patterns");
    let out_dir = dir.join("charts");
    let patterns = repo_patterns();
    fs::write(
        dir.join(".BeatPatternsConfig"),
        format!(
            r#"{{ "patternsPath": {}, "difficultyDefaults": [
                {{ "difficulty": "All", "minimumInitialWhitespace": 2.0,
                   "minimumDelayBetweenPatterns": 0.5, "maximumDelayBetweenPatterns": 1.0 }}
            ] }}"#,
            serde_json::to_string(patterns.to_str().unwrap()).unwrap()
        ),
    )
    .unwrap();

    let output = run(
        &dir,
        &[
            "generate",
            "--bpm",
            "120",
            "--duration",
            "20",
            "--difficulty",
            "Normal",
            "--seed",
            "3",
            "-o",
            out_dir.to_str().unwrap(),
        ],
    );
    assert!(
        output.status.success(),
        "{}",
        String::from_utf8_lossy(&output.stderr)
    );

    let v: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out_dir.join("Normal.dat")).unwrap()).unwrap();
    // 2 s of silence at 120 bpm
    assert_eq!(v["_notes"][0]["_time"], 4.0);
}
