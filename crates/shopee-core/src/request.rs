//! Inbound product lookup parameters.

use crate::CoreError;

/// A validated `storeId`/`dealId` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeRequest {
    pub store_id: String,
    pub deal_id: String,
}

impl ScrapeRequest {
    /// Validates raw query pairs.
    ///
    /// Each parameter must appear exactly once with a non-empty value. A
    /// repeated key is the query-string form of an array, so it is rejected
    /// along with missing and empty values.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidParameters`] when either parameter fails
    /// those checks.
    pub fn from_query_pairs<K, V>(pairs: &[(K, V)]) -> Result<Self, CoreError>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let store_id = single_value(pairs, "storeId").ok_or(CoreError::InvalidParameters)?;
        let deal_id = single_value(pairs, "dealId").ok_or(CoreError::InvalidParameters)?;
        Ok(Self { store_id, deal_id })
    }
}

fn single_value<K, V>(pairs: &[(K, V)], key: &str) -> Option<String>
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut values = pairs
        .iter()
        .filter(|(k, _)| k.as_ref() == key)
        .map(|(_, v)| v.as_ref());
    let first = values.next()?;
    if values.next().is_some() || first.is_empty() {
        return None;
    }
    Some(first.to_owned())
}
