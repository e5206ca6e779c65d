use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One ranked class from a classification pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub label: String,
    /// Softmax probability in `[0, 1]`.
    pub confidence: f64,
    /// Free-form facts about the class (latin name, family, ...), when the
    /// checkpoint carries them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_info: Option<BTreeMap<String, String>>,
}

/// Predictions sorted by descending confidence.
pub type Ranking = Vec<Prediction>;

/// Indices of the `k` largest probabilities, highest first.
///
/// Ties keep the lower index first. `k` is clamped to `probs.len()`.
pub fn top_k(probs: &[f64], k: usize) -> Vec<(usize, f64)> {
    let mut order: Vec<usize> = (0..probs.len()).collect();
    order.sort_by(|&a, &b| probs[b].total_cmp(&probs[a]));
    order.into_iter().take(k).map(|i| (i, probs[i])).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_highest_first() {
        let ranked = top_k(&[0.1, 0.6, 0.3], 2);
        assert_eq!(ranked, vec![(1, 0.6), (2, 0.3)]);
    }

    #[test]
    fn ties_prefer_lower_index() {
        let ranked = top_k(&[0.25, 0.25, 0.5], 3);
        assert_eq!(ranked.iter().map(|(i, _)| *i).collect::<Vec<_>>(), vec![2, 0, 1]);
    }

    #[test]
    fn k_is_clamped() {
        assert_eq!(top_k(&[0.4, 0.6], 10).len(), 2);
        assert!(top_k(&[0.4, 0.6], 0).is_empty());
    }

    #[test]
    fn additional_info_is_omitted_when_absent() {
        let p = Prediction { label: "rose".into(), confidence: 0.9, additional_info: None };
        let json = serde_json::to_value(&p).unwrap();
        assert!(json.get("additional_info").is_none());
    }
}
