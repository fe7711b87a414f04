//! `frpbar search` / `frpbar tags` — Docker Hub queries

use crate::cli::{SearchArgs, TagsArgs};
use crate::registry::RegistryClient;

pub async fn search(args: SearchArgs) -> anyhow::Result<()> {
    let client = RegistryClient::new()?;
    let results = client.search(&args.query).await?;

    if results.is_empty() {
        println!("No images found for '{}'", args.query);
        return Ok(());
    }

    println!(
        "{:<40} {:>7} {:>13}  {}",
        "IMAGE", "STARS", "PULLS", "DESCRIPTION"
    );
    for image in &results {
        let name = if image.is_official {
            format!("{} *", image.name)
        } else {
            image.name.clone()
        };
        println!(
            "{:<40} {:>7} {:>13}  {}",
            name, image.star_count, image.pull_count, image.description
        );
    }
    println!("\n* official image");
    Ok(())
}

pub async fn tags(args: TagsArgs) -> anyhow::Result<()> {
    let client = RegistryClient::new()?;
    let results = client.tags(&args.image, args.page_size).await?;

    if results.is_empty() {
        println!("No tags found for '{}'", args.image);
        return Ok(());
    }

    println!("{:<30} {:>10}  {}", "TAG", "SIZE", "LAST UPDATED");
    for tag in &results {
        println!(
            "{:<30} {:>10}  {}",
            tag.name,
            tag.formatted_size(),
            tag.formatted_last_updated()
        );
    }
    Ok(())
}
