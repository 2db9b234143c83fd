use serde::{Deserialize, Serialize};
use tgkit_core::ApiObject;

/// One size of a photo or a thumbnail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotoSize {
    pub file_id: String,
    pub file_unique_id: String,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub file_size: Option<u64>,
}

impl ApiObject for PhotoSize {
    const TYPE_NAME: &'static str = "PhotoSize";
    type Id = String;

    fn identity(&self) -> Option<String> {
        Some(self.file_unique_id.clone())
    }
}
