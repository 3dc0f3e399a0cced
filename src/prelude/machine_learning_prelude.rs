pub use crate::machine_learning::{BinaryTree, Node, NodeType};
pub use crate::machine_learning::{CartLearner, DecisionTreeLearner};
pub use crate::machine_learning::{
    BinarySplitSearcher,
    FeatureSplit,
    FindSplitResult,
    LinearSplitSearcher,
    SplitResult,
    SplitSearcher,
};
pub use crate::machine_learning::{
    EntropyImpurityMetric,
    GiniImpurityMetric,
    ImpurityMetric,
    VarianceImpurityMetric,
};
pub use crate::machine_learning::{
    GiniClassificationImpurityCalculator,
    ImpurityCalculator,
    RegressionImpurityCalculator,
};
pub use crate::machine_learning::{GbmDecisionTreeLearner, GbmNode, GbmTree};
pub use crate::machine_learning::{AbsoluteLoss, BinomialLoss, GradientBoostLoss, SquaredLoss};
pub use crate::machine_learning::{
    ClassificationGradientBoostLearner,
    ClassificationGradientBoostModel,
    GradientBoostParams,
    RegressionGradientBoostLearner,
    RegressionGradientBoostModel,
};
pub use crate::machine_learning::{Interval, create_ordered_elements, distinct_targets};
