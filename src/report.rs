//! top N ranking of the final totals

use std::collections::BTreeMap;
use std::fmt;

/// One line of the congestion report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankingEntry {
    pub light_id: String,
    pub total: u128,
}

impl RankingEntry {
    pub fn new(light_id: &str, total: u128) -> Self {
        RankingEntry {
            light_id: light_id.to_owned(),
            total,
        }
    }
}

impl fmt::Display for RankingEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} cars", self.light_id, self.total)
    }
}

/// Sort the totals by count descending and keep the first `n`.
///
/// The input iterates in key order and the sort is stable, so lights with
/// equal totals stay in ascending key order. An empty table gives an
/// empty report.
pub fn rank(totals: &BTreeMap<String, u128>, n: usize) -> Vec<RankingEntry> {
    let mut entries: Vec<RankingEntry> = totals
        .iter()
        .map(|(light_id, &total)| RankingEntry::new(light_id, total))
        .collect();
    entries.sort_by(|a, b| b.total.cmp(&a.total));
    entries.truncate(n);
    entries
}
