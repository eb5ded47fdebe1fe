use std::fmt;

use serde::de::{Deserializer, IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Serialize};

/// Inbound body. Only a JSON object is accepted; other keys are ignored.
#[derive(Debug)]
pub struct EstimationRequest {
    pub image_url: Option<String>,
}

impl<'de> Deserialize<'de> for EstimationRequest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RequestVisitor;

        impl<'de> Visitor<'de> for RequestVisitor {
            type Value = EstimationRequest;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a JSON object")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut image_url = None;
                while let Some(key) = map.next_key::<String>()? {
                    if key == "image_url" {
                        image_url = map.next_value::<Option<String>>()?;
                    } else {
                        map.next_value::<IgnoredAny>()?;
                    }
                }
                Ok(EstimationRequest { image_url })
            }
        }

        deserializer.deserialize_map(RequestVisitor)
    }
}

/// Response body for both routes. The two shapes never mix.
#[derive(Debug, Serialize, PartialEq)]
#[serde(untagged)]
pub enum EstimationResponse {
    Success { success: bool, estimation: String },
    Failure { success: bool, error: String },
}

impl EstimationResponse {
    pub fn success(estimation: String) -> Self {
        Self::Success {
            success: true,
            estimation,
        }
    }

    pub fn failure(error: String) -> Self {
        Self::Failure {
            success: false,
            error,
        }
    }
}
