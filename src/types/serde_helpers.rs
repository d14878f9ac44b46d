use serde::{Deserialize, Deserializer};

/// GraphQL list fields come back as explicit `null` when empty; decode
/// either spelling into the container's default.
pub(crate) fn null_to_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    let value = Option::<T>::deserialize(deserializer)?;
    Ok(value.unwrap_or_default())
}
