use serde::{Deserialize, Serialize};

/// Recorded sections of a session, in presentation order
#[derive(Copy, Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Section {
    #[serde(rename = "train_1")]
    Train1,
    #[serde(rename = "train_2")]
    Train2,
    #[serde(rename = "pre")]
    Pre,
    #[serde(rename = "post")]
    Post,
}

impl Default for Section {
    fn default() -> Self {
        Section::Train1
    }
}

impl Section {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Train1 => "train_1",
            Self::Train2 => "train_2",
            Self::Pre => "pre",
            Self::Post => "post",
        }
    }

    pub fn next(&self) -> Option<Self> {
        use Section::*;
        Some(match self {
            Train1 => Train2,
            Train2 => Pre,
            Pre => Post,
            Post => return None,
        })
    }
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
