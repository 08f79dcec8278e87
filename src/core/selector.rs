use crate::domain::model::Fix;

/// Picks the most accurate cached fix that is still inside the freshness window.
#[derive(Debug, Clone, Copy)]
pub struct CachedFixSelector {
    max_age_millis: u64,
}

impl CachedFixSelector {
    pub fn new(max_age_millis: u64) -> Self {
        Self { max_age_millis }
    }

    pub fn max_age_millis(&self) -> u64 {
        self.max_age_millis
    }

    pub fn select<I>(&self, candidates: I, now_millis: i64) -> Option<Fix>
    where
        I: IntoIterator<Item = Option<Fix>>,
    {
        candidates
            .into_iter()
            .flatten()
            .filter(|fix| fix.is_fresh(now_millis, self.max_age_millis))
            .min_by(|a, b| a.accuracy.total_cmp(&b.accuracy))
    }
}
