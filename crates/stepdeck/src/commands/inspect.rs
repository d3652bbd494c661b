use std::path::Path;

use anyhow::Result;
use colored::Colorize;

use stepdeck::controller::{FRAGMENT_ORDER_ATTR, PresentationController};
use stepdeck::document::Document;

pub fn run(file: &Path) -> Result<()> {
    let document = Document::load(file)?;
    let Some(controller) = PresentationController::attach(&document) else {
        anyhow::bail!(
            "No slides found in {} (expected a #deck element containing .slide elements)",
            file.display()
        );
    };

    println!(
        "{} {} slides",
        file.display().to_string().bold(),
        controller.slide_count()
    );
    for index in 0..controller.slide_count() {
        let Some(node) = controller.slide_node(index) else {
            continue;
        };
        let orders: Vec<&str> = controller
            .fragments_of(index)
            .iter()
            .filter_map(|&fragment| document.attr(fragment, FRAGMENT_ORDER_ATTR))
            .collect();
        let fragments = if orders.is_empty() {
            "-".dimmed().to_string()
        } else {
            orders.join(", ")
        };
        let mut title = document.text_content(node);
        if title.chars().count() > 48 {
            title = title.chars().take(47).collect::<String>() + "\u{2026}";
        }
        println!(
            "  {:>3}  {:<6} {:<16} {}",
            index.to_string().cyan(),
            format!("#/{index}"),
            fragments,
            title
        );
    }
    Ok(())
}
