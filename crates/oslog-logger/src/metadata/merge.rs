use super::Metadata;

/// Layers the three metadata sources of one record.
///
/// Returns `None` when neither `provided` nor `explicit` holds an entry. The
/// caller then reuses the flattening it cached for `persistent`. Otherwise the
/// result starts from `persistent`, overlaid by `provided`, overlaid by
/// `explicit`: on a key collision the explicit value wins over the provided
/// one, which wins over the persistent one.
///
/// ```
/// use oslog_logger::{Metadata, MetadataValue, merge};
///
/// let mut persistent = Metadata::new();
/// persistent.insert("request".into(), "a".into());
///
/// assert!(merge(&persistent, None, Some(&Metadata::new())).is_none());
///
/// let mut explicit = Metadata::new();
/// explicit.insert("request".into(), "b".into());
/// let merged = merge(&persistent, None, Some(&explicit)).expect("overlay present");
/// assert_eq!(merged["request"], MetadataValue::from("b"));
/// ```
pub fn merge(
    persistent: &Metadata,
    provided: Option<&Metadata>,
    explicit: Option<&Metadata>,
) -> Option<Metadata> {
    let provided = provided.filter(|layer| !layer.is_empty());
    let explicit = explicit.filter(|layer| !layer.is_empty());
    if provided.is_none() && explicit.is_none() {
        return None;
    }

    let mut merged = persistent.clone();
    for layer in [provided, explicit].into_iter().flatten() {
        merged.extend(layer.iter().map(|(key, value)| (key.clone(), value.clone())));
    }
    Some(merged)
}
