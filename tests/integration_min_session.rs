// Minimal integration test that drives the compiled binary through a PTY.
// This exercises the real event loop and crossterm input handling across
// the main boundaries without relying on internal modules.
//
// Notes:
// - Requires a TTY; uses expectrl which allocates a pseudo terminal.
// - Marked Unix-only and ignored by default to avoid CI/platform issues.
// - Run manually via: `cargo test --test integration_min_session -- --ignored`.

#![cfg(unix)]

use std::time::Duration;

use expectrl::{spawn, Eof};

#[test]
#[ignore]
fn one_trial_test_completes_and_exits() -> Result<(), Box<dyn std::error::Error>> {
    let bin = assert_cmd::cargo::cargo_bin("catswitch");
    let cmd = format!(
        "{} --seed 7 --trials 1 --delay-ms 0 --no-practice",
        bin.display()
    );

    let mut p = spawn(cmd)?;

    // Give the app a moment to initialize the terminal/alternate screen
    std::thread::sleep(Duration::from_millis(200));

    // welcome -> what it measures -> how it works -> ready screen -> test
    for _ in 0..4 {
        p.send("\r")?;
        std::thread::sleep(Duration::from_millis(50));
    }

    // answer the single trial; either answer finishes the test
    p.send("y")?;
    std::thread::sleep(Duration::from_millis(300));

    // quit from the results screen
    p.send("q")?;

    p.expect(Eof)?;
    Ok(())
}
