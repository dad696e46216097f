use anyhow::Result;

use super::open_workspace;

pub async fn run(word: &str, limit: usize) -> Result<()> {
    let workspace = open_workspace(true).await?;

    let mut candidates = workspace.complete(word);
    candidates.sort_by(|a, b| {
        a.name
            .cmp(&b.name)
            .then_with(|| a.origin_path.cmp(&b.origin_path))
    });

    if candidates.is_empty() {
        println!("No symbols match '{}'", word);
        return Ok(());
    }

    for record in candidates.iter().take(limit) {
        println!("{:<32} {}", record.name, record.origin_path);
    }
    if candidates.len() > limit {
        println!("... and {} more", candidates.len() - limit);
    }

    Ok(())
}
