//! Payload size and depth guard.
//!
//! Every value crossing the boundary is checked against [`PayloadLimits`]
//! before it is handed to the handler, sent back as a reply, or bound into an
//! evaluated script. Depth is checked first since it needs no serialization;
//! size is the length of the compact JSON encoding and measuring it stops as
//! soon as the limit is exceeded.

use std::io;

use core_runtime::config::PayloadLimits;
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PayloadError {
    #[error("payload exceeds the {limit} byte limit")]
    TooLarge { limit: usize },

    #[error("payload nesting exceeds the depth limit of {limit}")]
    TooDeep { limit: usize },

    #[error("payload could not be serialized: {0}")]
    Unserializable(String),
}

/// Measurements of an accepted payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayloadStats {
    pub bytes: usize,
    pub depth: usize,
}

/// Check `value` against `limits`, returning its measurements.
pub fn inspect(value: &Value, limits: &PayloadLimits) -> Result<PayloadStats, PayloadError> {
    let depth = depth_within(value, limits.max_depth)?;
    let bytes = encoded_len_within(value, limits.max_bytes)?;
    Ok(PayloadStats { bytes, depth })
}

fn depth_within(value: &Value, limit: usize) -> Result<usize, PayloadError> {
    let mut deepest = 0;
    let mut stack = vec![(value, 0usize)];

    while let Some((value, depth)) = stack.pop() {
        let children: Box<dyn Iterator<Item = &Value>> = match value {
            Value::Array(items) => Box::new(items.iter()),
            Value::Object(map) => Box::new(map.values()),
            _ => continue,
        };

        let depth = depth + 1;
        if depth > limit {
            return Err(PayloadError::TooDeep { limit });
        }
        deepest = deepest.max(depth);
        stack.extend(children.map(|child| (child, depth)));
    }

    Ok(deepest)
}

fn encoded_len_within(value: &Value, limit: usize) -> Result<usize, PayloadError> {
    let mut counter = BoundedCounter { written: 0, limit };

    match serde_json::to_writer(&mut counter, value) {
        Ok(()) => Ok(counter.written),
        Err(_) if counter.written > limit => Err(PayloadError::TooLarge { limit }),
        Err(err) => Err(PayloadError::Unserializable(err.to_string())),
    }
}

/// Writer that only counts, failing once `limit` is passed.
struct BoundedCounter {
    written: usize,
    limit: usize,
}

impl io::Write for BoundedCounter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.written += buf.len();
        if self.written > self.limit {
            return Err(io::Error::new(io::ErrorKind::Other, "payload limit exceeded"));
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn nested(depth: usize) -> Value {
        (0..depth).fold(json!(1), |inner, _| json!([inner]))
    }

    #[test]
    fn test_scalars_have_depth_zero() {
        let stats = inspect(&json!("ping"), &PayloadLimits::default()).unwrap();
        assert_eq!(stats.depth, 0);
        assert_eq!(stats.bytes, "\"ping\"".len());
    }

    #[test]
    fn test_reports_encoded_size_and_depth() {
        let value = json!({"type": "ping", "items": [1, 2]});
        let stats = inspect(&value, &PayloadLimits::default()).unwrap();

        assert_eq!(stats.bytes, serde_json::to_vec(&value).unwrap().len());
        assert_eq!(stats.depth, 2);
    }

    #[test]
    fn test_depth_limit_is_inclusive() {
        let limits = PayloadLimits::new(1024, 3);

        assert!(inspect(&nested(3), &limits).is_ok());
        assert_eq!(
            inspect(&nested(4), &limits),
            Err(PayloadError::TooDeep { limit: 3 })
        );
    }

    #[test]
    fn test_size_limit_is_inclusive() {
        let value = json!("abcd");
        let exact = serde_json::to_vec(&value).unwrap().len();

        assert!(inspect(&value, &PayloadLimits::new(exact, 4)).is_ok());
        assert_eq!(
            inspect(&value, &PayloadLimits::new(exact - 1, 4)),
            Err(PayloadError::TooLarge { limit: exact - 1 })
        );
    }

    #[test]
    fn test_large_payload_rejected() {
        let value = json!({"blob": "x".repeat(4096)});
        let result = inspect(&value, &PayloadLimits::new(1024, 8));
        assert_eq!(result, Err(PayloadError::TooLarge { limit: 1024 }));
    }
}
