//! Model size tier value object

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Named size tiers for the vision-language model (Value Object)
///
/// A tier resolves to a specific pretrained model identifier at service
/// startup; the per-request path never sees this resolution. Parsing is
/// deliberately forgiving (`1B` and `2B` both land on the 2.2B model,
/// unknown strings fall back to the smallest tier) so that a sloppy
/// `MODEL_SIZE` environment value still boots a working service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelSize {
    Small256M,
    Medium500M,
    Large2_2B,
}

impl ModelSize {
    /// Get the tier name as written in configuration
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelSize::Small256M => "256M",
            ModelSize::Medium500M => "500M",
            ModelSize::Large2_2B => "2.2B",
        }
    }

    /// Resolve the tier to a pretrained model identifier
    pub fn model_id(&self) -> &'static str {
        match self {
            ModelSize::Small256M => "HuggingFaceTB/SmolVLM2-256M-Video-Instruct",
            ModelSize::Medium500M => "HuggingFaceTB/SmolVLM2-500M-Video-Instruct",
            ModelSize::Large2_2B => "HuggingFaceTB/SmolVLM2-2.2B-Instruct",
        }
    }

    fn all() -> [ModelSize; 3] {
        [
            ModelSize::Small256M,
            ModelSize::Medium500M,
            ModelSize::Large2_2B,
        ]
    }
}

impl Default for ModelSize {
    /// Returns the smallest tier (256M)
    fn default() -> Self {
        ModelSize::Small256M
    }
}

impl std::fmt::Display for ModelSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ModelSize {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let key = s.trim().to_uppercase();
        Ok(match key.as_str() {
            "256M" => ModelSize::Small256M,
            "500M" => ModelSize::Medium500M,
            // The 2.2B checkpoint is the only large one published
            "2.2B" | "1B" | "2B" => ModelSize::Large2_2B,
            _ => ModelSize::all()
                .into_iter()
                .find(|tier| key.contains(tier.as_str()) || tier.as_str().contains(&key))
                .unwrap_or_default(),
        })
    }
}

impl Serialize for ModelSize {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ModelSize {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        // Parsing is infallible; unknown tiers fall back to the default
        Ok(s.parse().unwrap_or_default())
    }
}
