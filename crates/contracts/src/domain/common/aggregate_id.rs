use serde::{de::DeserializeOwned, Serialize};
use std::hash::Hash;

/// Трейт для типов идентификаторов агрегатов
pub trait AggregateId:
    Clone + PartialEq + Eq + Hash + Serialize + DeserializeOwned + std::fmt::Debug
{
    /// Преобразовать ID в строку
    fn as_string(&self) -> String;

    /// Создать ID из строки
    fn from_string(s: &str) -> Result<Self, String>;
}

/// Разбор идентификатора вида `<prefix>-<tail>`.
///
/// Хвост не может быть пустым и не может содержать пробельных символов.
pub fn parse_prefixed(s: &str, prefix: &str) -> Result<String, String> {
    let tail = s
        .strip_prefix(prefix)
        .and_then(|rest| rest.strip_prefix('-'))
        .ok_or_else(|| format!("Invalid id '{}': expected '{}-' prefix", s, prefix))?;
    if tail.is_empty() || tail.chars().any(char::is_whitespace) {
        return Err(format!("Invalid id '{}'", s));
    }
    Ok(s.to_string())
}
