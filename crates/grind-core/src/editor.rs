//! Editor session: the mutable working copy of one article.
//!
//! An [`EditorSession`] is the only place an article changes. Callers either
//! invoke the methods directly or send [`EditCommand`]s through
//! [`EditorSession::apply`]; both paths share the same semantics. Lookups by
//! block id that miss are no-ops and report `false` rather than failing, so a
//! stale command from a front end never corrupts the working copy.

use serde::{Deserialize, Serialize};

use crate::article::{Article, ArticleField};
use crate::block::{create_block, BlockPatch, BlockType};
use crate::id::BlockId;

/// One editing operation, as sent over the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum EditCommand {
    /// Set a scalar article field.
    SetField { field: ArticleField, value: String },
    /// Append a new empty block.
    AddBlock { block_type: BlockType },
    /// Merge fields into an existing block.
    UpdateBlock { id: BlockId, patch: BlockPatch },
    /// Remove a block.
    RemoveBlock { id: BlockId },
    /// Move `draggedId` to the position `targetId` currently holds.
    MoveBlock { dragged_id: BlockId, target_id: BlockId },
}

/// What applying an [`EditCommand`] did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum EditOutcome {
    /// The working copy changed.
    Applied,
    /// A block was appended with this id.
    BlockAdded { id: BlockId },
    /// The command referenced a missing block (or moved a block onto itself).
    Unchanged,
}

/// Mutable working copy of one article.
#[derive(Debug, Clone)]
pub struct EditorSession {
    article: Article,
    is_new: bool,
}

impl EditorSession {
    /// Opens a session on an article hydrated from storage.
    pub fn new(article: Article) -> Self {
        EditorSession {
            article,
            is_new: false,
        }
    }

    /// Opens a session on a blank draft that has never been saved.
    pub fn draft(article: Article) -> Self {
        EditorSession {
            article,
            is_new: true,
        }
    }

    /// `true` if the session started from a blank draft.
    pub fn is_new(&self) -> bool {
        self.is_new
    }

    pub fn article(&self) -> &Article {
        &self.article
    }

    pub fn set_field(&mut self, field: ArticleField, value: impl Into<String>) {
        let value = value.into();
        let slot = match field {
            ArticleField::Title => &mut self.article.title,
            ArticleField::Subtitle => &mut self.article.subtitle,
            ArticleField::Author => &mut self.article.author,
            ArticleField::PublishDate => &mut self.article.publish_date,
            ArticleField::HeroImage => &mut self.article.hero_image,
        };
        *slot = value;
    }

    /// Appends an empty block of `block_type` under a fresh random id.
    pub fn add_block(&mut self, block_type: BlockType) -> BlockId {
        let mut id = BlockId::generate();
        while self.article.position_of(&id).is_some() {
            id = BlockId::generate();
        }
        self.article.content.push(create_block(block_type, id.clone()));
        id
    }

    /// Merges `patch` into the block with `id`. Returns `false` if absent.
    pub fn update_block(&mut self, id: &BlockId, patch: &BlockPatch) -> bool {
        match self.article.content.iter_mut().find(|b| b.id() == id) {
            Some(block) => {
                block.apply_patch(patch);
                true
            }
            None => false,
        }
    }

    /// Removes the block with `id`. Returns `false` if absent.
    pub fn remove_block(&mut self, id: &BlockId) -> bool {
        match self.article.position_of(id) {
            Some(index) => {
                self.article.content.remove(index);
                true
            }
            None => false,
        }
    }

    /// Moves `dragged` to the index `target` currently occupies, shifting the
    /// blocks in between by one.
    pub fn move_block(&mut self, dragged: &BlockId, target: &BlockId) -> bool {
        if dragged == target {
            return false;
        }
        let (Some(from), Some(to)) = (
            self.article.position_of(dragged),
            self.article.position_of(target),
        ) else {
            return false;
        };
        let block = self.article.content.remove(from);
        self.article.content.insert(to, block);
        true
    }

    /// Applies one wire command.
    pub fn apply(&mut self, command: EditCommand) -> EditOutcome {
        let changed = match command {
            EditCommand::SetField { field, value } => {
                self.set_field(field, value);
                true
            }
            EditCommand::AddBlock { block_type } => {
                let id = self.add_block(block_type);
                return EditOutcome::BlockAdded { id };
            }
            EditCommand::UpdateBlock { id, patch } => self.update_block(&id, &patch),
            EditCommand::RemoveBlock { id } => self.remove_block(&id),
            EditCommand::MoveBlock {
                dragged_id,
                target_id,
            } => self.move_block(&dragged_id, &target_id),
        };
        if changed {
            EditOutcome::Applied
        } else {
            EditOutcome::Unchanged
        }
    }

    /// Snapshot of the working copy, ready for the persistence gateway.
    pub fn finalize(&self) -> Article {
        self.article.clone()
    }
}
