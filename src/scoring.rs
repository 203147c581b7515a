use tracing::debug;

use crate::awards::Award;
use crate::metrics::{Level, MetricSource};

/// One entity's standing in one award.
#[derive(Debug, Clone, PartialEq)]
pub struct AwardScore {
    pub award_id: &'static str,
    pub level: Level,
    pub entity_id: u32,
    pub entity_name: String,
    /// Equals `entity_id` for team awards.
    pub team_id: u32,
    pub team_name: String,
    pub score: f64,
    /// Competition rank: tied scores share the best position.
    pub rank: u32,
    /// 100 for the award leader.
    pub percentile: f64,
    pub sample_size: Option<u32>,
}

/// Ranks `entities` for one award.
///
/// Entities below the attempt threshold or without a value are not ranked.
/// Ties keep input order.
pub fn score_award<S: MetricSource>(award: &Award, entities: &[S]) -> Vec<AwardScore> {
    let mut candidates: Vec<(&S, f64)> = entities
        .iter()
        .filter(|e| {
            e.sample_size(award.metric)
                .is_none_or(|n| n >= award.min_attempts)
        })
        .filter_map(|e| {
            let v = e.metric(award.metric)?;
            v.is_finite().then_some((e, v))
        })
        .collect();

    // sort_by is stable, so equal scores stay in input order
    let dir = award.direction;
    candidates.sort_by(|a, b| dir.orient(b.1).total_cmp(&dir.orient(a.1)));

    let n = candidates.len();
    let mut out = Vec::with_capacity(n);
    let mut start = 0;
    while start < n {
        let score = candidates[start].1;
        let end = start
            + candidates[start..]
                .iter()
                .take_while(|(_, v)| *v == score)
                .count();
        // Average ascending position of the tie group, as a share of n.
        let avg_ascending = ((n - end + 1) + (n - start)) as f64 / 2.0;
        let percentile = avg_ascending / n as f64 * 100.0;

        for (entity, v) in &candidates[start..end] {
            out.push(AwardScore {
                award_id: award.id,
                level: award.level,
                entity_id: entity.entity_id(),
                entity_name: entity.entity_name().to_string(),
                team_id: entity.team_id(),
                team_name: entity.team_name().to_string(),
                score: *v,
                rank: start as u32 + 1,
                percentile,
                sample_size: entity.sample_size(award.metric),
            });
        }
        start = end;
    }

    debug!("award {}: {} of {} ranked", award.id, n, entities.len());
    out
}

/// Scores every award of one level, in catalog order.
pub fn score_awards<'a, S: MetricSource>(
    awards: impl IntoIterator<Item = &'a Award>,
    entities: &[S],
) -> Vec<AwardScore> {
    awards
        .into_iter()
        .flat_map(|award| score_award(award, entities))
        .collect()
}

/// Entries with `rank <= top_n`, ordered by award id, then rank.
pub fn leaderboard(scores: &[AwardScore], top_n: u32) -> Vec<AwardScore> {
    let mut out: Vec<AwardScore> = scores.iter().filter(|s| s.rank <= top_n).cloned().collect();
    out.sort_by(|a, b| a.award_id.cmp(b.award_id).then(a.rank.cmp(&b.rank)));
    out
}

/// Winners (rank 1) of one award.
pub fn winners<'a>(scores: &'a [AwardScore], award_id: &'a str) -> impl Iterator<Item = &'a AwardScore> {
    scores
        .iter()
        .filter(move |s| s.award_id == award_id && s.rank == 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::awards::Direction;
    use crate::metrics::Metric;

    struct Fake {
        id: u32,
        value: Option<f64>,
        attempts: u32,
    }

    impl MetricSource for Fake {
        fn entity_id(&self) -> u32 {
            self.id
        }
        fn entity_name(&self) -> &str {
            "p"
        }
        fn team_id(&self) -> u32 {
            1
        }
        fn team_name(&self) -> &str {
            "t"
        }
        fn metric(&self, _: Metric) -> Option<f64> {
            self.value
        }
        fn sample_size(&self, _: Metric) -> Option<u32> {
            Some(self.attempts)
        }
    }

    fn fake(id: u32, value: Option<f64>, attempts: u32) -> Fake {
        Fake { id, value, attempts }
    }

    fn award(direction: Direction, min_attempts: u32) -> Award {
        Award {
            id: "test",
            title: "Test",
            category: "test",
            level: Level::Player,
            metric: Metric::TackleFailRate,
            direction,
            icon: "",
            description: "",
            formula: "",
            min_attempts,
        }
    }

    #[test]
    fn ties_share_the_minimum_rank_and_keep_input_order() {
        let entities = vec![
            fake(1, Some(0.2), 10),
            fake(2, Some(0.5), 10),
            fake(3, Some(0.5), 10),
            fake(4, Some(0.1), 10),
        ];
        let scores = score_award(&award(Direction::High, 5), &entities);
        let ranks: Vec<(u32, u32)> = scores.iter().map(|s| (s.entity_id, s.rank)).collect();
        assert_eq!(ranks, vec![(2, 1), (3, 1), (1, 3), (4, 4)]);
        assert_eq!(scores[0].percentile, 87.5);
        assert_eq!(scores[2].percentile, 50.0);
        assert_eq!(scores[3].percentile, 25.0);
    }

    #[test]
    fn low_direction_puts_the_smallest_first() {
        let entities = vec![fake(1, Some(3.0), 1), fake(2, Some(1.0), 1), fake(3, Some(2.0), 1)];
        let scores = score_award(&award(Direction::Low, 0), &entities);
        assert_eq!(scores[0].entity_id, 2);
        assert_eq!(scores[0].percentile, 100.0);
        assert_eq!(scores[2].entity_id, 1);
        assert_eq!(scores[2].rank, 3);
    }

    #[test]
    fn threshold_and_absent_values_are_never_ranked() {
        let entities = vec![
            fake(1, Some(0.9), 4),
            fake(2, None, 50),
            fake(3, Some(f64::NAN), 50),
            fake(4, Some(0.3), 5),
        ];
        let scores = score_award(&award(Direction::High, 5), &entities);
        assert_eq!(scores.len(), 1);
        assert_eq!(scores[0].entity_id, 4);
        assert_eq!(scores[0].rank, 1);
        assert_eq!(scores[0].percentile, 100.0);
    }

    #[test]
    fn leaderboard_cuts_by_rank_and_orders_by_award() {
        let entities: Vec<Fake> = (1..=5).map(|i| fake(i, Some(i as f64), 10)).collect();
        let mut scores = score_award(&award(Direction::High, 0), &entities);
        let mut other = scores.clone();
        for s in &mut other {
            s.award_id = "aaa";
        }
        scores.extend(other);
        let board = leaderboard(&scores, 2);
        let keys: Vec<(&str, u32)> = board.iter().map(|s| (s.award_id, s.rank)).collect();
        assert_eq!(keys, vec![("aaa", 1), ("aaa", 2), ("test", 1), ("test", 2)]);
        assert_eq!(winners(&scores, "test").count(), 1);
    }
}
