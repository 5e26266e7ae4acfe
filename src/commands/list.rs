//! List site content

use anyhow::Result;

use crate::Site;

/// List posts (newest first, optionally filtered) or categories with counts
pub fn run(site: &Site, content_type: &str, category: Option<&str>) -> Result<()> {
    let store = site.load_store()?;
    let all_label = &site.config.all_label;

    match content_type {
        "post" | "posts" => {
            let active = category.unwrap_or(all_label.as_str());
            let posts = store.select(active, all_label);
            println!("Posts ({}):", posts.len());
            for post in posts {
                println!(
                    "  #{} {} - {} [{}]",
                    post.id,
                    post.date.as_deref().unwrap_or("-"),
                    post.title,
                    post.category
                );
            }
        }
        "category" | "categories" => {
            let categories = store.categories(all_label);
            println!("Categories ({}):", categories.len().saturating_sub(1));
            for (i, cat) in categories.iter().enumerate() {
                let count = if i == 0 {
                    store.len()
                } else {
                    store.posts().iter().filter(|p| &p.category == cat).count()
                };
                println!("  {} ({})", cat, count);
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: post, category",
                content_type
            );
        }
    }

    Ok(())
}
