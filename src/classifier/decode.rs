use crate::utils::error::ServiceError;
use crate::{Category, Prediction, Result};

/// Numerically stable softmax over raw scores.
pub fn softmax(scores: &[f32]) -> Vec<f32> {
    let max = scores.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = scores.iter().map(|s| (s - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.iter().map(|e| e / sum).collect()
}

/// Turn the raw score vector into a (category, confidence %) pair.
///
/// The winner is found with a strictly-greater scan, so when two categories
/// tie on probability the first one in `Category::ALL` order wins.
pub fn decode(scores: &[f32]) -> Result<Prediction> {
    if scores.len() != Category::ALL.len() {
        return Err(ServiceError::Inference(format!(
            "Expected {} category scores, got {}",
            Category::ALL.len(),
            scores.len()
        )));
    }

    let probabilities = softmax(scores);

    let mut best_index = 0;
    let mut best_prob = probabilities[0];
    for (i, &prob) in probabilities.iter().enumerate().skip(1) {
        if prob > best_prob {
            best_prob = prob;
            best_index = i;
        }
    }

    let category = Category::from_index(best_index).ok_or_else(|| {
        ServiceError::Inference(format!("Score index {} out of category range", best_index))
    })?;

    Ok(Prediction {
        category,
        confidence: best_prob * 100.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn softmax_sums_to_one() {
        let probs = softmax(&[1.0, 2.0, 3.0, 4.0]);
        let sum: f32 = probs.iter().sum();
        assert!((sum - 1.0).abs() < 1e-6);
        assert!(probs.iter().all(|p| (0.0..=1.0).contains(p)));
    }

    #[test]
    fn softmax_is_shift_invariant() {
        let a = softmax(&[1.0, 2.0, 3.0, 4.0]);
        let b = softmax(&[1001.0, 1002.0, 1003.0, 1004.0]);
        for (x, y) in a.iter().zip(b.iter()) {
            assert!((x - y).abs() < 1e-6);
        }
    }

    #[test]
    fn decode_picks_maximum() {
        let prediction = decode(&[0.1, 0.2, 5.0, 0.3]).unwrap();
        assert_eq!(prediction.category, Category::Organic);
        assert!(prediction.confidence > 90.0);
        assert!(prediction.confidence <= 100.0);
    }

    #[test]
    fn decode_ties_break_to_first_category() {
        let prediction = decode(&[2.0, 2.0, 2.0, 2.0]).unwrap();
        assert_eq!(prediction.category, Category::Glass);
        assert!((prediction.confidence - 25.0).abs() < 1e-3);
    }

    #[test]
    fn decode_rejects_wrong_length() {
        assert!(decode(&[0.1, 0.2]).is_err());
        assert!(decode(&[0.1; 5]).is_err());
    }

    #[test]
    fn confidence_always_in_percentage_range() {
        for scores in [
            vec![-10.0, 0.0, 10.0, 20.0],
            vec![0.0, 0.0, 0.0, 0.0],
            vec![100.0, -100.0, 50.0, -50.0],
        ] {
            let prediction = decode(&scores).unwrap();
            assert!(prediction.confidence >= 0.0);
            assert!(prediction.confidence <= 100.0);
        }
    }
}
