use serde::{Deserialize, Deserializer, Serialize};

/// Administrative codes arrive as numbers from some endpoints and as
/// strings from others.
fn code<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Code {
        Text(String),
        Number(u64),
    }

    Ok(match Code::deserialize(deserializer)? {
        Code::Text(text) => text,
        Code::Number(number) => number.to_string(),
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Province {
    #[serde(deserialize_with = "code")]
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct District {
    #[serde(deserialize_with = "code")]
    pub code: String,
    pub name: String,
    #[serde(default, deserialize_with = "optional_code")]
    pub province_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ward {
    #[serde(deserialize_with = "code")]
    pub code: String,
    pub name: String,
    #[serde(default, deserialize_with = "optional_code")]
    pub district_code: Option<String>,
}

fn optional_code<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    #[derive(Deserialize)]
    struct Wrapped(#[serde(deserialize_with = "code")] String);

    Ok(Option::<Wrapped>::deserialize(deserializer)?.map(|Wrapped(code)| code))
}
