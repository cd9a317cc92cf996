//! Evaluation policy.

/// How an expression tree is being evaluated.
///
/// `ConstFold` is used when the builder folds constant subtrees: no events
/// are queued, recursion is tightly bounded and calls are counted against a
/// budget.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum EvalMode {
    #[default]
    Interpret,
    ConstFold {
        /// Maximum number of calls before aborting.
        budget: u32,
    },
}

impl EvalMode {
    /// Default call budget for constant folding.
    pub const FOLD_BUDGET: u32 = 1_000;

    pub fn const_fold() -> Self {
        EvalMode::ConstFold {
            budget: Self::FOLD_BUDGET,
        }
    }

    /// Whether events may be queued and timers scheduled.
    #[inline]
    pub fn allows_events(&self) -> bool {
        matches!(self, Self::Interpret)
    }

    /// Maximum nested call depth, `None` for unbounded.
    #[inline]
    pub fn max_call_depth(&self) -> Option<usize> {
        match self {
            Self::Interpret => None,
            Self::ConstFold { .. } => Some(64),
        }
    }

    #[inline]
    pub fn call_budget(&self) -> Option<u32> {
        match self {
            Self::Interpret => None,
            Self::ConstFold { budget } => Some(*budget),
        }
    }
}
