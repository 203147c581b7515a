use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::awards::{self, AWARDS};
use crate::scoring::AwardScore;
use crate::text;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportReport {
    pub awards: usize,
    pub leaderboard_rows: usize,
}

/// Writes the award catalog and the leaderboard to a workbook.
pub fn export_leaderboard(path: &Path, leaderboard: &[AwardScore]) -> Result<ExportReport> {
    let mut award_rows = vec![vec![
        "Award".to_string(),
        "Title".to_string(),
        "Level".to_string(),
        "Category".to_string(),
        "Metric".to_string(),
        "Direction".to_string(),
        "Min attempts".to_string(),
        "Formula".to_string(),
    ]];
    award_rows.extend(AWARDS.iter().map(|a| {
        vec![
            a.id.to_string(),
            format!("{} {}", a.icon, a.title),
            a.level.label().to_string(),
            a.category.to_string(),
            a.metric.name().to_string(),
            a.direction.label().to_string(),
            a.min_attempts.to_string(),
            a.formula.to_string(),
        ]
    }));

    let mut board_rows = vec![vec![
        "Award".to_string(),
        "Rank".to_string(),
        "Name".to_string(),
        "Team".to_string(),
        "Score".to_string(),
        "Percentile".to_string(),
        "Sample".to_string(),
    ]];
    board_rows.extend(leaderboard.iter().map(|s| {
        let score = awards::find(s.award_id)
            .map(|a| text::format_score(a, s.score))
            .unwrap_or_else(|| format!("{:.3}", s.score));
        vec![
            s.award_id.to_string(),
            s.rank.to_string(),
            s.entity_name.clone(),
            s.team_name.clone(),
            score,
            format!("{:.1}", s.percentile),
            opt_to_string(s.sample_size),
        ]
    }));

    let mut workbook = Workbook::new();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Leaderboard")?;
        write_rows(sheet, &board_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Awards")?;
        write_rows(sheet, &award_rows)?;
    }

    workbook
        .save(path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;

    Ok(ExportReport {
        awards: award_rows.len().saturating_sub(1),
        leaderboard_rows: board_rows.len().saturating_sub(1),
    })
}

fn opt_to_string<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<String>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            worksheet
                .write_string(row_idx as u32, col_idx as u16, value)
                .with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}
