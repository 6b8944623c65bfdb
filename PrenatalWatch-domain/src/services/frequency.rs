use indexmap::IndexMap;

use crate::config::DEFAULT_TOP_SYMPTOMS;
use crate::entities::{Report, SymptomCount};

/// Rank symptoms by how many reports mention them.
///
/// Every report counts, not only the latest. Symptoms are compared exactly
/// (case-sensitive). Equal counts keep first-seen order. The result holds at
/// most `top_k` entries (default 5).
pub fn symptom_frequencies(reports: &[Report], top_k: Option<usize>) -> Vec<SymptomCount> {
    let mut counts: IndexMap<&str, usize> = IndexMap::new();
    for report in reports {
        for symptom in &report.symptoms {
            *counts.entry(symptom.as_str()).or_insert(0) += 1;
        }
    }

    let mut ranked: Vec<SymptomCount> = counts
        .into_iter()
        .map(|(symptom, count)| SymptomCount {
            symptom: symptom.to_string(),
            count,
        })
        .collect();

    // sort_by is stable, so insertion order breaks ties
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked.truncate(top_k.unwrap_or(DEFAULT_TOP_SYMPTOMS));
    ranked
}
