use super::helper_functions::validate_minimum_split_size;
use super::impurity_calculator::ImpurityCalculator;
use super::impurity_metric::ImpurityMetric;
use super::interval::Interval;
use crate::ModelError;
use serde::{Deserialize, Serialize};

/// Relative tolerance used when comparing thresholds derived from floating averages.
const THRESHOLD_TOLERANCE: f64 = 1e-5;

fn approximately_equal(a: f64, b: f64) -> bool {
    if a == b {
        return true;
    }
    (a - b).abs() <= THRESHOLD_TOLERANCE * a.abs().max(b.abs())
}

/// Decision boundary of one candidate split: `x[feature_index] <= threshold` goes left.
///
/// Equality compares thresholds with a relative tolerance of `1e-5`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FeatureSplit {
    pub threshold: f64,
    pub feature_index: usize,
}

impl FeatureSplit {
    pub fn new(threshold: f64, feature_index: usize) -> Self {
        FeatureSplit {
            threshold,
            feature_index,
        }
    }
}

impl PartialEq for FeatureSplit {
    fn eq(&self, other: &Self) -> bool {
        self.feature_index == other.feature_index
            && approximately_equal(self.threshold, other.threshold)
    }
}

/// An interval together with the impurity of the targets it covers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntervalImpurity {
    pub interval: Interval,
    pub impurity: f64,
}

impl IntervalImpurity {
    pub fn new(interval: Interval, impurity: f64) -> Self {
        IntervalImpurity { interval, impurity }
    }
}

/// Running best split of a node, threaded through the per-feature searches.
///
/// # Fields
///
/// - `new_best_split_found` - Whether the search that produced this value improved on its input
/// - `split_index` - Position where the right child starts, `None` until a split is found
/// - `information_gain` - Impurity reduction of the split
/// - `best_split` - Feature and threshold of the split
/// - `left_interval_impurity` / `right_interval_impurity` - Child intervals and their impurities
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FindSplitResult {
    pub new_best_split_found: bool,
    pub split_index: Option<usize>,
    pub information_gain: f64,
    pub best_split: FeatureSplit,
    pub left_interval_impurity: IntervalImpurity,
    pub right_interval_impurity: IntervalImpurity,
}

impl FindSplitResult {
    /// Starting point of a node search: no split and zero gain, so only positive gains replace it.
    pub fn initial() -> Self {
        FindSplitResult {
            new_best_split_found: false,
            split_index: None,
            information_gain: 0.0,
            best_split: FeatureSplit::new(0.0, 0),
            left_interval_impurity: IntervalImpurity::new(Interval::new(0, 0), 0.0),
            right_interval_impurity: IntervalImpurity::new(Interval::new(0, 0), 0.0),
        }
    }
}

/// Best split of one feature found with an incremental impurity calculator.
///
/// Equality compares thresholds and impurities with a relative tolerance of `1e-5`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SplitResult {
    pub split_index: Option<usize>,
    pub threshold: f64,
    pub impurity_improvement: f64,
    pub impurity_left: f64,
    pub impurity_right: f64,
}

impl SplitResult {
    pub fn initial() -> Self {
        SplitResult {
            split_index: None,
            threshold: 0.0,
            impurity_improvement: 0.0,
            impurity_left: 0.0,
            impurity_right: 0.0,
        }
    }
}

impl PartialEq for SplitResult {
    fn eq(&self, other: &Self) -> bool {
        self.split_index == other.split_index
            && approximately_equal(self.threshold, other.threshold)
            && approximately_equal(self.impurity_improvement, other.impurity_improvement)
            && approximately_equal(self.impurity_left, other.impurity_left)
            && approximately_equal(self.impurity_right, other.impurity_right)
    }
}

/// Strategy for finding the best split of one feature.
///
/// Both entry points assume that `feature` and `targets` (and `weights`, when given)
/// are co-sorted ascending by feature value over at least `parent_interval`. Sorting
/// is the caller's job. A split at position `j` sends `[from, j)` left and `[j, to)`
/// right, with the threshold at the midpoint of `feature[j - 1]` and `feature[j]`.
/// Positions inside a run of equal feature values are never split.
pub trait SplitSearcher: Send + Sync {
    /// Searches one feature using full impurity evaluations of each candidate's children.
    ///
    /// # Parameters
    ///
    /// - `current_best` - Best split found so far for this node
    /// - `feature_index` - Column the sorted feature values come from
    /// - `feature` - Feature values in sorted working order
    /// - `targets` - Targets co-sorted with `feature`
    /// - `metric` - Impurity metric used for the children
    /// - `parent_interval` - Positions covered by the node
    /// - `parent_impurity` - Impurity of the whole node
    ///
    /// # Returns
    ///
    /// - `FindSplitResult` - `current_best` unchanged, or a split with strictly greater information gain
    #[allow(clippy::too_many_arguments)]
    fn find_best_split(
        &self,
        current_best: FindSplitResult,
        feature_index: usize,
        feature: &[f64],
        targets: &[f64],
        metric: &dyn ImpurityMetric,
        parent_interval: Interval,
        parent_impurity: f64,
    ) -> FindSplitResult;

    /// Searches one feature by sliding the boundary of an incremental impurity calculator.
    ///
    /// The calculator is rebound to `parent_interval` before the scan starts.
    ///
    /// # Returns
    ///
    /// - `Ok(SplitResult)` - The best split of this feature, `split_index` is `None` when no valid split exists
    /// - `Err(ModelError)` - If the calculator rejects the targets
    fn find_best_split_incremental<C: ImpurityCalculator>(
        &self,
        calculator: &mut C,
        feature: &[f64],
        targets: &[f64],
        weights: &[f64],
        parent_interval: Interval,
        parent_impurity: f64,
    ) -> Result<SplitResult, ModelError>;

    fn minimum_split_size(&self) -> usize;
}

/// Exhaustive scan over every boundary of the parent interval.
///
/// A boundary is a candidate when the feature value changes and both children hold at
/// least `minimum_split_size` samples. With the target-change heuristic enabled the
/// adjacent targets must differ as well, which skips boundaries inside runs of equal
/// targets (Fayyad and Irani, 1992) at the price of exhaustiveness.
///
/// # Examples
/// ```rust
/// use rustytrees::machine_learning::*;
///
/// let feature = [1.0, 2.0, 3.0, 4.0];
/// let targets = [0.0, 0.0, 1.0, 1.0];
/// let interval = Interval::with_length(4);
/// let metric = GiniImpurityMetric;
/// let parent = metric.impurity(&targets, interval);
///
/// let searcher = LinearSplitSearcher::new(1).unwrap();
/// let result = searcher.find_best_split(
///     FindSplitResult::initial(), 0, &feature, &targets, &metric, interval, parent,
/// );
/// assert_eq!(result.split_index, Some(2));
/// assert_eq!(result.best_split, FeatureSplit::new(2.5, 0));
/// assert!((result.information_gain - 0.5).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinearSplitSearcher {
    minimum_split_size: usize,
    require_target_change: bool,
}

impl LinearSplitSearcher {
    /// Creates an exhaustive searcher that only requires the feature value to change.
    ///
    /// # Parameters
    ///
    /// - `minimum_split_size` - Smallest number of samples allowed in either child
    ///
    /// # Returns
    ///
    /// - `Ok(LinearSplitSearcher)` - The configured searcher
    /// - `Err(ModelError::ConfigurationError)` - If `minimum_split_size` is 0
    pub fn new(minimum_split_size: usize) -> Result<Self, ModelError> {
        validate_minimum_split_size(minimum_split_size)?;
        Ok(LinearSplitSearcher {
            minimum_split_size,
            require_target_change: false,
        })
    }

    /// Creates a searcher that also skips boundaries where the adjacent targets are equal.
    pub fn with_target_change_heuristic(minimum_split_size: usize) -> Result<Self, ModelError> {
        validate_minimum_split_size(minimum_split_size)?;
        Ok(LinearSplitSearcher {
            minimum_split_size,
            require_target_change: true,
        })
    }

    get_field!(get_minimum_split_size, minimum_split_size, usize);
    get_field!(get_require_target_change, require_target_change, bool);

    #[inline]
    fn is_candidate(&self, prev_value: f64, value: f64, prev_target: f64, target: f64) -> bool {
        prev_value != value && (!self.require_target_change || prev_target != target)
    }

    #[inline]
    fn satisfies_size(&self, parent_interval: Interval, position: usize) -> bool {
        let left_size = position - parent_interval.from_inclusive();
        let right_size = parent_interval.to_exclusive() - position;
        left_size.min(right_size) >= self.minimum_split_size
    }
}

impl SplitSearcher for LinearSplitSearcher {
    fn find_best_split(
        &self,
        current_best: FindSplitResult,
        feature_index: usize,
        feature: &[f64],
        targets: &[f64],
        metric: &dyn ImpurityMetric,
        parent_interval: Interval,
        parent_impurity: f64,
    ) -> FindSplitResult {
        let mut best = FindSplitResult {
            new_best_split_found: false,
            ..current_best
        };
        if parent_interval.len() < 2 {
            return best;
        }

        let from = parent_interval.from_inclusive();
        let length_inv = 1.0 / parent_interval.len() as f64;
        let mut prev_value = feature[from];
        let mut prev_target = targets[from];

        for position in from + 1..parent_interval.to_exclusive() {
            let value = feature[position];
            let target = targets[position];

            if self.is_candidate(prev_value, value, prev_target, target)
                && self.satisfies_size(parent_interval, position)
            {
                let (left_interval, right_interval) = parent_interval.split_at(position);
                let left_impurity = metric.impurity(targets, left_interval);
                let right_impurity = metric.impurity(targets, right_interval);

                let left_size = left_interval.len() as f64;
                let right_size = right_interval.len() as f64;
                let information_gain = parent_impurity
                    - ((left_size * length_inv) * left_impurity
                        + (right_size * length_inv) * right_impurity);

                if information_gain > best.information_gain {
                    best = FindSplitResult {
                        new_best_split_found: true,
                        split_index: Some(position),
                        information_gain,
                        best_split: FeatureSplit::new((value + prev_value) * 0.5, feature_index),
                        left_interval_impurity: IntervalImpurity::new(left_interval, left_impurity),
                        right_interval_impurity: IntervalImpurity::new(
                            right_interval,
                            right_impurity,
                        ),
                    };
                }
            }

            prev_value = value;
            prev_target = target;
        }

        best
    }

    fn find_best_split_incremental<C: ImpurityCalculator>(
        &self,
        calculator: &mut C,
        feature: &[f64],
        targets: &[f64],
        weights: &[f64],
        parent_interval: Interval,
        parent_impurity: f64,
    ) -> Result<SplitResult, ModelError> {
        calculator.update_interval(targets, weights, parent_interval)?;

        let mut best = SplitResult::initial();
        if parent_interval.len() < 2 {
            return Ok(best);
        }

        let from = parent_interval.from_inclusive();
        let mut prev_value = feature[from];
        let mut prev_target = targets[from];

        for position in from + 1..parent_interval.to_exclusive() {
            let value = feature[position];
            let target = targets[position];

            if self.is_candidate(prev_value, value, prev_target, target)
                && self.satisfies_size(parent_interval, position)
            {
                calculator.update_index(targets, weights, position)?;
                let improvement = calculator.impurity_improvement(parent_impurity);

                if improvement > best.impurity_improvement {
                    let (impurity_left, impurity_right) = calculator.child_impurities();
                    best = SplitResult {
                        split_index: Some(position),
                        threshold: (value + prev_value) * 0.5,
                        impurity_improvement: improvement,
                        impurity_left,
                        impurity_right,
                    };
                }
            }

            prev_value = value;
            prev_target = target;
        }

        Ok(best)
    }

    fn minimum_split_size(&self) -> usize {
        self.minimum_split_size
    }
}

/// Bisecting heuristic over the candidate boundaries of the parent interval.
///
/// Candidates are boundaries where both the feature value and the target change and
/// both children hold at least `minimum_split_size` samples. The search probes the
/// midpoints of the lower and upper halves of the candidate list, moves into the half
/// whose probe improves most on the best gain so far and stops when neither probe
/// improves. It evaluates O(log n) candidates and is not guaranteed to find the split
/// an exhaustive scan would find, so results can differ from `LinearSplitSearcher`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinarySplitSearcher {
    minimum_split_size: usize,
}

/// One evaluated candidate boundary.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    position: usize,
    threshold: f64,
}

/// Gain and child impurities of a candidate.
type CandidateScore = (f64, f64, f64);

impl BinarySplitSearcher {
    /// Creates a bisecting searcher.
    ///
    /// # Parameters
    ///
    /// - `minimum_split_size` - Smallest number of samples allowed in either child
    ///
    /// # Returns
    ///
    /// - `Ok(BinarySplitSearcher)` - The configured searcher
    /// - `Err(ModelError::ConfigurationError)` - If `minimum_split_size` is 0
    pub fn new(minimum_split_size: usize) -> Result<Self, ModelError> {
        validate_minimum_split_size(minimum_split_size)?;
        Ok(BinarySplitSearcher { minimum_split_size })
    }

    get_field!(get_minimum_split_size, minimum_split_size, usize);

    fn candidates(&self, feature: &[f64], targets: &[f64], parent_interval: Interval) -> Vec<Candidate> {
        let from = parent_interval.from_inclusive();
        let to = parent_interval.to_exclusive();
        if parent_interval.len() < 2 {
            return Vec::new();
        }

        (from + 1..to)
            .filter(|&position| {
                targets[position - 1] != targets[position]
                    && feature[position - 1] != feature[position]
                    && (position - from).min(to - position) >= self.minimum_split_size
            })
            .map(|position| Candidate {
                position,
                threshold: (feature[position - 1] + feature[position]) * 0.5,
            })
            .collect()
    }

    /// Bisects the candidate list, keeping the best probe that beats `baseline`.
    ///
    /// Probe positions are computed with signed arithmetic so the lower probe of the
    /// first half rounds toward zero instead of underflowing.
    fn bisect<F>(
        candidates: &[Candidate],
        baseline: f64,
        mut score: F,
    ) -> Result<Option<(Candidate, CandidateScore)>, ModelError>
    where
        F: FnMut(usize) -> Result<CandidateScore, ModelError>,
    {
        if candidates.is_empty() {
            return Ok(None);
        }

        let mut best: Option<(Candidate, CandidateScore)> = None;
        let mut best_gain = baseline;

        let mut start: isize = 0;
        let mut end: isize = candidates.len() as isize - 1;
        let mut middle: isize = start + (end - start) / 2;

        while end - start >= 1 {
            let left_candidate = candidates[((start + middle - 1) / 2) as usize];
            let left_score = score(left_candidate.position)?;

            let right_candidate = candidates[((end + 1 + middle) / 2) as usize];
            let right_score = score(right_candidate.position)?;

            if left_score.0 - best_gain <= 0.0 && right_score.0 - best_gain <= 0.0 {
                break;
            }

            if left_score.0 >= right_score.0 {
                end = middle - 1;
                best_gain = left_score.0;
                best = Some((left_candidate, left_score));
            } else {
                start = middle + 1;
                best_gain = right_score.0;
                best = Some((right_candidate, right_score));
            }
            middle = start + (end - start) / 2;
        }

        Ok(best)
    }
}

impl SplitSearcher for BinarySplitSearcher {
    fn find_best_split(
        &self,
        current_best: FindSplitResult,
        feature_index: usize,
        feature: &[f64],
        targets: &[f64],
        metric: &dyn ImpurityMetric,
        parent_interval: Interval,
        parent_impurity: f64,
    ) -> FindSplitResult {
        let unchanged = FindSplitResult {
            new_best_split_found: false,
            ..current_best
        };
        let candidates = self.candidates(feature, targets, parent_interval);
        let length_inv = 1.0 / parent_interval.len().max(1) as f64;

        let evaluation = Self::bisect(&candidates, current_best.information_gain, |position| {
            let (left_interval, right_interval) = parent_interval.split_at(position);
            let left_impurity = metric.impurity(targets, left_interval);
            let right_impurity = metric.impurity(targets, right_interval);
            let gain = parent_impurity
                - ((left_interval.len() as f64 * length_inv) * left_impurity
                    + (right_interval.len() as f64 * length_inv) * right_impurity);
            Ok((gain, left_impurity, right_impurity))
        });

        match evaluation {
            Ok(Some((candidate, (gain, left_impurity, right_impurity))))
                if gain > current_best.information_gain =>
            {
                let (left_interval, right_interval) = parent_interval.split_at(candidate.position);
                FindSplitResult {
                    new_best_split_found: true,
                    split_index: Some(candidate.position),
                    information_gain: gain,
                    best_split: FeatureSplit::new(candidate.threshold, feature_index),
                    left_interval_impurity: IntervalImpurity::new(left_interval, left_impurity),
                    right_interval_impurity: IntervalImpurity::new(right_interval, right_impurity),
                }
            }
            _ => unchanged,
        }
    }

    fn find_best_split_incremental<C: ImpurityCalculator>(
        &self,
        calculator: &mut C,
        feature: &[f64],
        targets: &[f64],
        weights: &[f64],
        parent_interval: Interval,
        parent_impurity: f64,
    ) -> Result<SplitResult, ModelError> {
        calculator.update_interval(targets, weights, parent_interval)?;
        let candidates = self.candidates(feature, targets, parent_interval);

        let best = Self::bisect(&candidates, 0.0, |position| {
            calculator.reset();
            calculator.update_index(targets, weights, position)?;
            let (left, right) = calculator.child_impurities();
            Ok((calculator.impurity_improvement(parent_impurity), left, right))
        })?;

        Ok(match best {
            Some((candidate, (impurity_improvement, impurity_left, impurity_right))) => {
                SplitResult {
                    split_index: Some(candidate.position),
                    threshold: candidate.threshold,
                    impurity_improvement,
                    impurity_left,
                    impurity_right,
                }
            }
            None => SplitResult::initial(),
        })
    }

    fn minimum_split_size(&self) -> usize {
        self.minimum_split_size
    }
}
