//! Read-only inspection of a single PDF: what the extractor sees and what
//! it would pick. Useful when diagnosing an extraction miss.

use retitle_core::title::{select_title, TitleConfig};

use crate::prelude::{println, *};

#[derive(Debug, clap::Args)]
pub struct Options {
    /// Path to the PDF file
    pub path: std::path::PathBuf,

    /// Minimum character count for an extracted title
    #[arg(long, default_value_t = 15)]
    pub min_title_length: usize,

    /// Maximum character count of the cleaned title
    #[arg(long, default_value_t = 120)]
    pub max_filename_length: usize,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, serde::Serialize)]
struct InspectOutput {
    title: Option<String>,
    metadata: pdf::DocumentMetadata,
}

pub fn run(options: Options, global: crate::Global) -> Result<()> {
    let bytes = std::fs::read(&options.path)
        .wrap_err_with(|| format!("cannot read {}", options.path.display()))?;
    let doc = pdf::ParsedDocument::from_bytes(&bytes).map_err(|e| eyre!(e))?;

    let metadata = doc.metadata();
    let lines = match doc.page_lines(0) {
        Ok(lines) => lines,
        Err(e) => {
            log::warn!(
                "cannot extract first page of {}: {}",
                options.path.display(),
                e
            );
            Vec::new()
        }
    };

    if global.verbose && !options.json {
        println!("First-page lines:");
        for line in &lines {
            println!("  {}", line);
        }
        println!();
    }

    let cfg = TitleConfig {
        min_title_length: options.min_title_length,
        max_filename_length: options.max_filename_length,
    };
    let title = select_title(metadata.title.as_deref(), &lines, &cfg);
    let output = InspectOutput { title, metadata };

    if options.json {
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!(
        "Extracted title: {}",
        output.title.as_deref().unwrap_or("(none)")
    );
    println!(
        "Metadata title:  {}",
        output.metadata.title.as_deref().unwrap_or("(none)")
    );
    println!(
        "Author:          {}",
        output.metadata.author.as_deref().unwrap_or("(none)")
    );
    println!("Pages:           {}", output.metadata.page_count);

    Ok(())
}
