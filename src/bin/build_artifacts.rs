use anyhow::{Context, Result};

use kleague_ignobel::config::Settings;
use kleague_ignobel::{logging, pipeline};

fn main() -> Result<()> {
    logging::init_stderr()?;
    let settings = Settings::load();

    let report = pipeline::run(&settings).with_context(|| {
        format!(
            "build from {} and {} failed",
            settings.raw_events.display(),
            settings.match_info.display()
        )
    })?;

    println!("Artifacts: {}", settings.artifacts_dir.display());
    if report.skipped {
        println!("Inputs unchanged, snapshots kept (set IGNOBEL_FORCE_REBUILD=1 to rebuild)");
        return Ok(());
    }

    println!("Build complete");
    println!(
        "Events loaded: {} ({} malformed rows skipped)",
        report.loaded_events, report.skipped_event_rows
    );
    println!(
        "Events kept: {} (dropped {} bad coordinates, {} bad time)",
        report.preprocess.kept, report.preprocess.dropped_coordinates, report.preprocess.dropped_time
    );
    println!(
        "Matches loaded: {} ({} malformed rows skipped)",
        report.loaded_matches, report.skipped_match_rows
    );
    println!("Players: {}", report.players);
    println!(
        "Teams: {} ({} excluded without games)",
        report.teams, report.excluded_teams
    );
    println!(
        "Award scores: {} ({} on leaderboard)",
        report.award_scores, report.leaderboard
    );
    for line in report.headlines.iter().take(8) {
        println!("{line}");
    }
    for (name, rows) in &report.artifacts {
        println!(" - {name}: {rows} rows");
    }
    if let Some(path) = &report.xlsx {
        println!("Workbook: {}", path.display());
    }

    Ok(())
}
