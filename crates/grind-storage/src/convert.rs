//! Conversions between the typed content model and flat storage rows.
//!
//! [`serialize_blocks`] flattens a block sequence into [`BlockRow`]s whose
//! `block_order` is the sequence index. [`deserialize_blocks`] sorts rows by
//! that order and rebuilds typed blocks, dropping rows whose tag is unknown
//! so one bad row never hides a whole article.

use std::collections::HashMap;

use grind_core::{Article, ArticleId, BlockId, BlockType, ContentBlock};

use crate::types::{ArticleRow, BlockRow};

/// Flattens `blocks` into rows owned by `article_id`.
///
/// Only the columns of each block's variant are populated; every other
/// variant column is `None`.
pub fn serialize_blocks(article_id: &ArticleId, blocks: &[ContentBlock]) -> Vec<BlockRow> {
    blocks
        .iter()
        .enumerate()
        .map(|(index, block)| block_to_row(article_id, index as i64, block))
        .collect()
}

fn block_to_row(article_id: &ArticleId, order: i64, block: &ContentBlock) -> BlockRow {
    let mut row = BlockRow {
        article_id: article_id.clone(),
        id: block.id().0.clone(),
        block_type: block.block_type().as_str().to_string(),
        content: None,
        src: None,
        caption: None,
        title: None,
        company: None,
        logo_src: None,
        link: None,
        block_order: order,
    };
    match block {
        ContentBlock::Text { content, .. } => {
            row.content = Some(content.clone());
        }
        ContentBlock::Image { src, caption, .. } => {
            row.src = Some(src.clone());
            row.caption = Some(caption.clone());
        }
        ContentBlock::Audio { src, title, .. } => {
            row.src = Some(src.clone());
            row.title = Some(title.clone());
        }
        ContentBlock::Sponsorship {
            company,
            logo_src,
            link,
            ..
        } => {
            row.company = Some(company.clone());
            row.logo_src = Some(logo_src.clone());
            row.link = Some(link.clone());
        }
    }
    row
}

/// Rebuilds one block from its row. Returns `None` for an unknown tag.
pub fn row_to_block(row: BlockRow) -> Option<ContentBlock> {
    let block_type = match row.block_type.parse::<BlockType>() {
        Ok(ty) => ty,
        Err(err) => {
            tracing::warn!(
                article_id = %row.article_id,
                block_id = %row.id,
                "skipping content block: {}",
                err
            );
            return None;
        }
    };
    let id = BlockId(row.id);
    let block = match block_type {
        BlockType::Text => ContentBlock::Text {
            id,
            content: row.content.unwrap_or_default(),
        },
        BlockType::Image => ContentBlock::Image {
            id,
            src: row.src.unwrap_or_default(),
            caption: row.caption.unwrap_or_default(),
        },
        BlockType::Audio => ContentBlock::Audio {
            id,
            src: row.src.unwrap_or_default(),
            title: row.title.unwrap_or_default(),
        },
        BlockType::Sponsorship => ContentBlock::Sponsorship {
            id,
            company: row.company.unwrap_or_default(),
            logo_src: row.logo_src.unwrap_or_default(),
            link: row.link.unwrap_or_default(),
        },
    };
    Some(block)
}

/// Rebuilds a block sequence from one article's rows, in `block_order`.
pub fn deserialize_blocks(mut rows: Vec<BlockRow>) -> Vec<ContentBlock> {
    rows.sort_by_key(|row| row.block_order);
    rows.into_iter().filter_map(row_to_block).collect()
}

/// Scalar row for `article`, stamped with `created_at`.
pub fn article_to_row(article: &Article, created_at: impl Into<String>) -> ArticleRow {
    ArticleRow {
        id: article.id.clone(),
        title: article.title.clone(),
        subtitle: article.subtitle.clone(),
        author: article.author.clone(),
        publish_date: article.publish_date.clone(),
        hero_image: article.hero_image.clone(),
        created_at: created_at.into(),
    }
}

pub fn row_to_article(row: ArticleRow, content: Vec<ContentBlock>) -> Article {
    Article {
        id: row.id,
        title: row.title,
        subtitle: row.subtitle,
        author: row.author,
        publish_date: row.publish_date,
        hero_image: row.hero_image,
        content,
    }
}

/// Groups block rows by parent and rebuilds full articles.
///
/// Output order follows `article_rows`. Block rows whose parent is not in
/// `article_rows` are ignored.
pub fn assemble_articles(article_rows: Vec<ArticleRow>, block_rows: Vec<BlockRow>) -> Vec<Article> {
    let mut by_parent: HashMap<ArticleId, Vec<BlockRow>> = HashMap::new();
    for row in block_rows {
        by_parent.entry(row.article_id.clone()).or_default().push(row);
    }
    article_rows
        .into_iter()
        .map(|row| {
            let blocks = by_parent.remove(&row.id).unwrap_or_default();
            row_to_article(row, deserialize_blocks(blocks))
        })
        .collect()
}
