//! Log fingerprinting.

use strider_core::Fnv1a;

use crate::record::LogRecord;

/// FNV-1a hash over step count, column keys, and sample bit patterns.
///
/// Two logs hash equal iff (barring collisions) they have the same keys in
/// the same order and bit-identical samples. Constants are not hashed.
pub fn log_hash(record: &LogRecord) -> u64 {
    let mut h = Fnv1a::new();
    h.write_u64(record.steps);
    h.write_u64(record.columns.len() as u64);
    for (key, values) in &record.columns {
        h.write_str(key);
        h.write_u64(values.len() as u64);
        for &v in values {
            h.write_f64(v);
        }
    }
    h.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(values: Vec<f64>) -> LogRecord {
        let mut r = LogRecord {
            steps: values.len() as u64,
            ..LogRecord::default()
        };
        r.columns.insert("Global.stepper.Time".into(), values);
        r
    }

    #[test]
    fn equal_logs_hash_equal() {
        assert_eq!(log_hash(&record(vec![1.0, 2.0])), log_hash(&record(vec![1.0, 2.0])));
    }

    #[test]
    fn sample_bits_matter() {
        assert_ne!(log_hash(&record(vec![0.0])), log_hash(&record(vec![-0.0])));
    }

    #[test]
    fn constants_ignored() {
        let a = record(vec![1.0]);
        let mut b = a.clone();
        b.constants.insert("robot".into(), "biped".into());
        assert_eq!(log_hash(&a), log_hash(&b));
    }
}
