//! Sample articles for a fresh database.

use grind_core::{Article, ArticleId, BlockId, ContentBlock};
use grind_storage::{ContentStore, StorageError};

fn text(id: &str, content: &str) -> ContentBlock {
    ContentBlock::Text {
        id: BlockId::from(id),
        content: content.to_string(),
    }
}

/// The two launch articles.
pub fn sample_articles() -> Vec<Article> {
    let style = Article {
        id: ArticleId::from("the-art-of-timeless-style"),
        title: "The Art of Timeless Style".to_string(),
        subtitle: "Cultivating a wardrobe that transcends trends and seasons.".to_string(),
        author: "A. Vanderbilt".to_string(),
        publish_date: "October 12, 2023".to_string(),
        hero_image: "https://picsum.photos/1200/800?grayscale&random=1".to_string(),
        content: vec![
            text(
                "1",
                "<p>In a world saturated with fleeting trends and fast fashion, the pursuit of timeless style has become a quiet rebellion. It is not about being noticed, but about being remembered. It is the art of curating a life, and a wardrobe, that speaks of quality, heritage, and an unwavering sense of self. This philosophy, often associated with the 'old money' aesthetic, is less about wealth and more about wisdom: the wisdom to invest in pieces that endure, both in craftsmanship and in character.</p>",
            ),
            ContentBlock::Image {
                id: BlockId::from("2"),
                src: "https://picsum.photos/1000/700?grayscale&random=2".to_string(),
                caption: "A well-tailored coat is the cornerstone of any timeless wardrobe."
                    .to_string(),
            },
            text(
                "3",
                "<h2>The Pillars of Enduring Elegance</h2><p>The foundation of this aesthetic rests on several key pillars. First, a neutral color palette: think beiges, creams, navies, and charcoals. These hues are versatile, sophisticated, and create a cohesive look with minimal effort. Second, natural fabrics are paramount. Wool, cashmere, linen, and silk not only feel luxurious but also age gracefully, developing a unique patina over time. Finally, the focus is on silhouette and fit rather than embellishment. A perfectly tailored blazer or a simple, well-draped dress makes a more powerful statement than any logo-emblazoned accessory.</p>",
            ),
            ContentBlock::Sponsorship {
                id: BlockId::from("4"),
                company: "Heirloom Watches Co.".to_string(),
                logo_src: "https://picsum.photos/200/200?grayscale&random=10".to_string(),
                link: "#".to_string(),
            },
        ],
    };

    let library = Article {
        id: ArticleId::from("on-literature-and-legacy"),
        title: "On Literature and Legacy".to_string(),
        subtitle: "The enduring power of a well-stocked library.".to_string(),
        author: "E. Hemingway".to_string(),
        publish_date: "September 28, 2023".to_string(),
        hero_image: "https://picsum.photos/1200/800?grayscale&random=3".to_string(),
        content: vec![text(
            "1",
            "<p>A home's character is often best judged not by its architecture, but by the contents of its library. A collection of books is a map of the soul, a legacy of curiosity passed down through generations. In the quiet solitude of a reading nook, surrounded by the wisdom of ages, one finds a connection to the past and a beacon for the future. The scent of old paper and leather is the perfume of heritage itself.</p>",
        )],
    };

    // Inserted oldest first so the listing shows the style piece on top.
    vec![library, style]
}

/// Inserts the sample articles that are not stored yet. Returns the ids
/// that were inserted.
pub fn seed(store: &mut dyn ContentStore) -> Result<Vec<ArticleId>, StorageError> {
    let mut inserted = Vec::new();
    for article in sample_articles() {
        if store.article_exists(&article.id)? {
            tracing::debug!(article_id = %article.id, "sample article already present");
            continue;
        }
        store.insert_article(&article)?;
        inserted.push(article.id);
    }
    Ok(inserted)
}
