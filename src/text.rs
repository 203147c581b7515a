use crate::awards::{self, Award};
use crate::scoring::AwardScore;

pub fn rank_label(rank: u32) -> String {
    match rank {
        1 => "🥇 1st".to_string(),
        2 => "🥈 2nd".to_string(),
        3 => "🥉 3rd".to_string(),
        n => format!("#{n}"),
    }
}

/// Fixed-precision score for tables: rates to three places, per-game counts to one.
pub fn format_score(award: &Award, score: f64) -> String {
    if award.metric.per_game() {
        format!("{score:.1}")
    } else {
        format!("{score:.3}")
    }
}

/// Headline for one award entry, e.g. `⚔️ Tackled, But... 🥇 1st`.
pub fn headline(score: &AwardScore) -> String {
    match awards::find(score.award_id) {
        Some(award) => format!("{} {} {}", award.icon, award.title, rank_label(score.rank)),
        None => format!("🏆 {} {}", score.award_id, rank_label(score.rank)),
    }
}

/// Multi-line blurb shown next to an award entry.
pub fn blurb(score: &AwardScore) -> String {
    let Some(award) = awards::find(score.award_id) else {
        return format!("{} ({}) wins {}!", score.entity_name, score.team_name, score.award_id);
    };

    let who = if score.entity_name == score.team_name {
        score.entity_name.clone()
    } else {
        format!("{} ({})", score.entity_name, score.team_name)
    };
    let mut out = format!(
        "{who} scores {} in {}, percentile {:.1}.\n{}\nFormula: {}",
        format_score(award, score.score),
        award.title,
        score.percentile,
        award.description,
        award.formula,
    );
    if let Some(n) = score.sample_size {
        out.push_str(&format!("\nSample: {n} (minimum {})", award.min_attempts));
    }
    out
}
