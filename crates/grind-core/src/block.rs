//! The content-block union: the four shapes an article body is built from.
//!
//! [`ContentBlock`] is a closed enum tagged on `type` when serialized, so the
//! JSON shape matches what front ends send (`{"type": "image", "src": ...}`).
//! [`BlockType`] is the bare tag, used when a caller asks for a new block or
//! when a storage row carries the tag as text.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::id::BlockId;

/// Discriminant of a [`ContentBlock`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockType {
    Text,
    Image,
    Audio,
    Sponsorship,
}

impl BlockType {
    /// Every block type, in toolbar order.
    pub const ALL: [BlockType; 4] = [
        BlockType::Text,
        BlockType::Image,
        BlockType::Audio,
        BlockType::Sponsorship,
    ];

    /// The wire/storage tag for this type.
    pub fn as_str(self) -> &'static str {
        match self {
            BlockType::Text => "text",
            BlockType::Image => "image",
            BlockType::Audio => "audio",
            BlockType::Sponsorship => "sponsorship",
        }
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlockType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(BlockType::Text),
            "image" => Ok(BlockType::Image),
            "audio" => Ok(BlockType::Audio),
            "sponsorship" => Ok(BlockType::Sponsorship),
            other => Err(CoreError::UnknownBlockType {
                tag: other.to_string(),
            }),
        }
    }
}

/// One unit of article content.
///
/// `src` and `logo_src` hold either a URL or an embedded data URL. Every
/// string field may be empty (a placeholder block the editor has not filled
/// in yet); missing fields deserialize as empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentBlock {
    Text {
        id: BlockId,
        /// Rich-text HTML.
        #[serde(default)]
        content: String,
    },
    Image {
        id: BlockId,
        #[serde(default)]
        src: String,
        #[serde(default)]
        caption: String,
    },
    Audio {
        id: BlockId,
        #[serde(default)]
        src: String,
        #[serde(default)]
        title: String,
    },
    Sponsorship {
        id: BlockId,
        #[serde(default)]
        company: String,
        #[serde(default, rename = "logoSrc")]
        logo_src: String,
        #[serde(default)]
        link: String,
    },
}

/// Builds an empty block of the given type.
pub fn create_block(block_type: BlockType, id: BlockId) -> ContentBlock {
    match block_type {
        BlockType::Text => ContentBlock::Text {
            id,
            content: String::new(),
        },
        BlockType::Image => ContentBlock::Image {
            id,
            src: String::new(),
            caption: String::new(),
        },
        BlockType::Audio => ContentBlock::Audio {
            id,
            src: String::new(),
            title: String::new(),
        },
        BlockType::Sponsorship => ContentBlock::Sponsorship {
            id,
            company: String::new(),
            logo_src: String::new(),
            link: String::new(),
        },
    }
}

impl ContentBlock {
    pub fn id(&self) -> &BlockId {
        match self {
            ContentBlock::Text { id, .. }
            | ContentBlock::Image { id, .. }
            | ContentBlock::Audio { id, .. }
            | ContentBlock::Sponsorship { id, .. } => id,
        }
    }

    pub fn block_type(&self) -> BlockType {
        match self {
            ContentBlock::Text { .. } => BlockType::Text,
            ContentBlock::Image { .. } => BlockType::Image,
            ContentBlock::Audio { .. } => BlockType::Audio,
            ContentBlock::Sponsorship { .. } => BlockType::Sponsorship,
        }
    }

    /// Merges the patch fields that belong to this block's variant.
    ///
    /// Fields of other variants are ignored. Returns `true` if at least one
    /// field was written.
    pub fn apply_patch(&mut self, patch: &BlockPatch) -> bool {
        let mut changed = false;
        let mut set = |slot: &mut String, value: &Option<String>| {
            if let Some(v) = value {
                slot.clone_from(v);
                changed = true;
            }
        };
        match self {
            ContentBlock::Text { content, .. } => set(content, &patch.content),
            ContentBlock::Image { src, caption, .. } => {
                set(src, &patch.src);
                set(caption, &patch.caption);
            }
            ContentBlock::Audio { src, title, .. } => {
                set(src, &patch.src);
                set(title, &patch.title);
            }
            ContentBlock::Sponsorship {
                company,
                logo_src,
                link,
                ..
            } => {
                set(company, &patch.company);
                set(logo_src, &patch.logo_src);
                set(link, &patch.link);
            }
        }
        changed
    }
}

/// A partial update for one block. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_src: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl BlockPatch {
    /// A patch that only replaces a text block's HTML.
    pub fn content(html: impl Into<String>) -> Self {
        BlockPatch {
            content: Some(html.into()),
            ..Default::default()
        }
    }
}
