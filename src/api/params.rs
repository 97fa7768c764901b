use std::fmt;

/// A single query value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Str(value) => write!(f, "{}", value),
            Scalar::Int(value) => write!(f, "{}", value),
            Scalar::Float(value) => write!(f, "{}", value),
            Scalar::Bool(value) => write!(f, "{}", value),
        }
    }
}

/// Value slot of [`RequestParams`]. `Absent` covers both "not set" and
/// "explicitly null"; it never reaches the query string.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Absent,
    One(Scalar),
    Many(Vec<Scalar>),
}

macro_rules! impl_scalar_from {
    ($($ty:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$ty> for Scalar {
                fn from(value: $ty) -> Self {
                    Scalar::$variant(value.into())
                }
            }

            impl From<$ty> for ParamValue {
                fn from(value: $ty) -> Self {
                    ParamValue::One(Scalar::from(value))
                }
            }
        )+
    };
}

impl_scalar_from!(
    String => Str,
    &str => Str,
    i32 => Int,
    i64 => Int,
    u8 => Int,
    u32 => Int,
    f64 => Float,
    bool => Bool,
);

/// Query parameters for GET/DELETE calls, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestParams {
    entries: Vec<(String, ParamValue)>,
}

impl RequestParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.push(key, value.into());
        self
    }

    pub fn insert_opt<T: Into<Scalar>>(mut self, key: impl Into<String>, value: Option<T>) -> Self {
        let value = value.map_or(ParamValue::Absent, |v| ParamValue::One(v.into()));
        self.push(key, value);
        self
    }

    pub fn insert_many<T: Into<Scalar>>(
        mut self,
        key: impl Into<String>,
        values: impl IntoIterator<Item = T>,
    ) -> Self {
        let values = values.into_iter().map(Into::into).collect();
        self.push(key, ParamValue::Many(values));
        self
    }

    /// Adds a text filter only when it carries something besides whitespace.
    pub fn insert_text(self, key: impl Into<String>, value: Option<&str>) -> Self {
        let value = value.map(str::trim).filter(|text| !text.is_empty());
        self.insert_opt(key, value)
    }

    pub fn push(&mut self, key: impl Into<String>, value: ParamValue) {
        self.entries.push((key.into(), value));
    }

    pub fn is_empty(&self) -> bool {
        self.pairs().is_empty()
    }

    /// Flattened `(key, value)` pairs: absent values are skipped and lists
    /// expand to one pair per element.
    pub fn pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        for (key, value) in &self.entries {
            match value {
                ParamValue::Absent => {}
                ParamValue::One(scalar) => pairs.push((key.clone(), scalar.to_string())),
                ParamValue::Many(values) => {
                    pairs.extend(values.iter().map(|scalar| (key.clone(), scalar.to_string())))
                }
            }
        }
        pairs
    }

    pub fn to_query_string(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs())
            .finish()
    }
}

/// Structured filters that know how to flatten themselves into query
/// parameters.
pub trait ToParams {
    fn to_params(&self) -> RequestParams;
}

impl ToParams for RequestParams {
    fn to_params(&self) -> RequestParams {
        self.clone()
    }
}

/// Page/limit pair shared by every paginated listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Paging {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl Paging {
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: Some(page),
            limit: Some(limit),
        }
    }

    pub fn apply(&self, params: RequestParams) -> RequestParams {
        params.insert_opt("page", self.page).insert_opt("limit", self.limit)
    }
}

impl ToParams for Paging {
    fn to_params(&self) -> RequestParams {
        self.apply(RequestParams::new())
    }
}
