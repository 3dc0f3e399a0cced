use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Half-open range `[from_inclusive, to_exclusive)` over a working index array.
///
/// Intervals are the unit of work for impurity evaluation and split search: every
/// node of a tree under construction owns one interval of the learner's index array,
/// and a split divides it into two adjacent intervals.
///
/// # Examples
/// ```rust
/// use rustytrees::machine_learning::interval::Interval;
///
/// let interval = Interval::new(2, 6);
/// assert_eq!(interval.len(), 4);
///
/// let (left, right) = interval.split_at(3);
/// assert_eq!(left, Interval::new(2, 3));
/// assert_eq!(right, Interval::new(3, 6));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Interval {
    from_inclusive: usize,
    to_exclusive: usize,
}

impl Interval {
    /// Creates a new interval.
    ///
    /// # Parameters
    ///
    /// - `from_inclusive` - First position covered by the interval
    /// - `to_exclusive` - One past the last position covered by the interval
    ///
    /// # Panics
    ///
    /// Panics if `from_inclusive > to_exclusive`.
    pub fn new(from_inclusive: usize, to_exclusive: usize) -> Self {
        assert!(
            from_inclusive <= to_exclusive,
            "Interval start {} is greater than its end {}",
            from_inclusive,
            to_exclusive
        );
        Interval {
            from_inclusive,
            to_exclusive,
        }
    }

    /// Creates the interval `[0, length)`.
    pub fn with_length(length: usize) -> Self {
        Interval::new(0, length)
    }

    get_field!(from_inclusive, from_inclusive, usize);
    get_field!(to_exclusive, to_exclusive, usize);

    /// Number of positions covered by the interval.
    pub fn len(&self) -> usize {
        self.to_exclusive - self.from_inclusive
    }

    pub fn is_empty(&self) -> bool {
        self.from_inclusive == self.to_exclusive
    }

    /// The interval as a standard range, suitable for slicing and iteration.
    pub fn range(&self) -> Range<usize> {
        self.from_inclusive..self.to_exclusive
    }

    /// Returns the part of `values` covered by the interval.
    ///
    /// # Panics
    ///
    /// Panics if the interval reaches past the end of `values`.
    pub fn slice<'a, T>(&self, values: &'a [T]) -> &'a [T] {
        &values[self.range()]
    }

    /// Splits the interval into `[from, index)` and `[index, to)`.
    ///
    /// # Parameters
    ///
    /// - `index` - Position where the right interval starts
    ///
    /// # Returns
    ///
    /// - `(Interval, Interval)` - The left and right sub-intervals
    ///
    /// # Panics
    ///
    /// Panics if `index` lies outside `[from, to]`.
    pub fn split_at(&self, index: usize) -> (Interval, Interval) {
        assert!(
            self.from_inclusive <= index && index <= self.to_exclusive,
            "Split index {} lies outside interval [{}, {})",
            index,
            self.from_inclusive,
            self.to_exclusive
        );
        (
            Interval::new(self.from_inclusive, index),
            Interval::new(index, self.to_exclusive),
        )
    }
}
