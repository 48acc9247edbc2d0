//! Base label construction.
//!
//! The base label set is built once at generator construction: `label_count`
//! generated key/value pairs followed by the operator-supplied constant
//! labels, in that order. It never changes afterwards; the per-series
//! `series_id` and `cycle_id` labels are appended at sampling time.

use crate::core::{GeneratorConfig, Result, TelebenchError};
use opentelemetry::KeyValue;

/// Build the immutable base label set for a validated configuration.
///
/// Fails with a configuration error naming the offending string if any
/// constant label does not split on its first `=` into two non-empty parts.
pub fn base_labels(config: &GeneratorConfig) -> Result<Vec<KeyValue>> {
    let mut labels = Vec::with_capacity(config.label_count + config.const_labels.len());

    let key_pad = "k".repeat(config.label_name_length);
    let val_pad = "v".repeat(config.label_name_length);
    for idx in 0..config.label_count {
        labels.push(KeyValue::new(
            format!("label_key_{}_{}", key_pad, idx),
            format!("label_val_{}_{}", val_pad, idx),
        ));
    }

    for raw in &config.const_labels {
        labels.push(parse_const_label(raw)?);
    }

    Ok(labels)
}

/// Parse one `name=value` constant label, splitting on the first `=`.
fn parse_const_label(raw: &str) -> Result<KeyValue> {
    match raw.split_once('=') {
        Some((name, value)) if !name.is_empty() && !value.is_empty() => {
            Ok(KeyValue::new(name.to_string(), value.to_string()))
        }
        _ => Err(TelebenchError::config(format!(
            "constant label must have format labelName=labelValue but got {:?}",
            raw
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ConfigBuilder;
    use std::collections::HashSet;

    fn config_with(labels: &[&str]) -> GeneratorConfig {
        ConfigBuilder::new()
            .label_count(1)
            .label_name_length(1)
            .const_labels(labels.iter().map(|s| (*s).to_string()).collect())
            .build()
            .unwrap()
    }

    #[test]
    fn test_generated_plus_const_labels() {
        let labels = base_labels(&config_with(&["env=test"])).unwrap();
        assert_eq!(labels.len(), 2);
        assert_eq!(labels[0].key.as_str(), "label_key_k_0");
        assert_eq!(labels[0].value.to_string(), "label_val_v_0");
        assert_eq!(labels[1].key.as_str(), "env");
        assert_eq!(labels[1].value.to_string(), "test");
    }

    #[test]
    fn test_generated_keys_unique() {
        let config = ConfigBuilder::new().label_count(50).build().unwrap();
        let labels = base_labels(&config).unwrap();
        assert_eq!(labels.len(), 50);
        let keys: HashSet<_> = labels.iter().map(|kv| kv.key.as_str()).collect();
        assert_eq!(keys.len(), 50);
    }

    #[test]
    fn test_padding_length() {
        let config = ConfigBuilder::new()
            .label_count(1)
            .label_name_length(4)
            .build()
            .unwrap();
        let labels = base_labels(&config).unwrap();
        assert_eq!(labels[0].key.as_str(), "label_key_kkkk_0");
    }

    #[test]
    fn test_malformed_const_label_rejected() {
        for raw in ["badformat", "=value", "name=", "="] {
            let err = base_labels(&config_with(&[raw])).unwrap_err();
            assert!(err.to_string().contains(raw), "expected {:?} in {}", raw, err);
        }
    }

    #[test]
    fn test_value_may_contain_equals() {
        // Split happens on the first `=` only.
        let labels = base_labels(&config_with(&["query=a=b"])).unwrap();
        assert_eq!(labels[1].key.as_str(), "query");
        assert_eq!(labels[1].value.to_string(), "a=b");
    }
}
