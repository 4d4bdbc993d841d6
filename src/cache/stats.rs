use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Contadores vivos de la caché
#[derive(Debug, Default)]
pub(crate) struct Counters {
    hits: AtomicU64,
    fetches: AtomicU64,
    errors: AtomicU64,
}

impl Counters {
    pub(crate) fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_fetch(&self) {
        self.fetches.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> CacheStats {
        CacheStats {
            cache_hits: self.hits.load(Ordering::Relaxed),
            fetch_count: self.fetches.load(Ordering::Relaxed),
            error_count: self.errors.load(Ordering::Relaxed),
        }
    }
}

/// Copia puntual de las estadísticas de [`QueryCache`](super::QueryCache).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub cache_hits: u64,
    pub fetch_count: u64,
    pub error_count: u64,
}

impl CacheStats {
    /// Lookups completados
    pub fn total(&self) -> u64 {
        self.cache_hits + self.fetch_count + self.error_count
    }

    /// Fraction of completed lookups served from the store.
    pub fn hit_ratio(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            self.cache_hits as f64 / total as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_reflects_records() {
        let counters = Counters::default();
        counters.record_hit();
        counters.record_hit();
        counters.record_fetch();
        counters.record_error();

        let stats = counters.snapshot();
        assert_eq!(
            stats,
            CacheStats {
                cache_hits: 2,
                fetch_count: 1,
                error_count: 1
            }
        );
        assert_eq!(stats.total(), 4);
        assert!((stats.hit_ratio() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_hit_ratio_is_zero() {
        assert_eq!(CacheStats::default().hit_ratio(), 0.0);
    }
}
