//! The identifier of an inference workload, e.g. `ResNet50`. Used as
//! row and column key in all tables and as a component of result
//! file names, hence restricted to what is safe there.

use std::{fmt::Display, str::FromStr};

use serde::de::Visitor;

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, serde::Serialize, Hash)]
pub struct ModelName(String);

impl ModelName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ModelName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Display for ModelName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

const ERR_MSG: &str = "a model name: non-empty, at most 100 bytes, consisting of \
     ASCII letters, digits, '-' and '.', and not starting with '.'";

impl FromStr for ModelName {
    type Err = &'static str;

    fn from_str(v: &str) -> Result<Self, Self::Err> {
        // '_' is excluded since it separates the parts of result file
        // names, ',' and '/' since the name ends up in CSV files and
        // paths.
        if v.is_empty()
            || v.len() > 100
            || v.starts_with('.')
            || !v
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.')
        {
            return Err(ERR_MSG);
        }
        Ok(ModelName(v.to_owned()))
    }
}

struct ModelNameVisitor;
impl<'de> Visitor<'de> for ModelNameVisitor {
    type Value = ModelName;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str(ERR_MSG)
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        v.parse().map_err(E::custom)
    }
}

impl<'de> serde::Deserialize<'de> for ModelName {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_str(ModelNameVisitor)
    }
}
