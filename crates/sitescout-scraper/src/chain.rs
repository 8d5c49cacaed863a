//! Ordered fallback chains.

/// One candidate-producing stage over an input that owns its data.
pub(crate) type Stage<T> = fn(&T) -> Option<String>;

/// One stage over an input that borrows from a parsed page.
pub(crate) type BorrowedStage<'s, T> = &'s dyn Fn(&T) -> Option<String>;

/// Runs `stages` in order and returns the first non-empty candidate.
pub(crate) fn first_candidate<T, F>(stages: &[F], input: &T) -> Option<String>
where
    F: Fn(&T) -> Option<String>,
{
    stages
        .iter()
        .find_map(|stage| stage(input).filter(|value| !value.is_empty()))
}
