//! Demo: redraft one clause of a document from the command line.
//!
//! Loads a text file into an in-memory document, opens a redraft session for
//! the clause given with `--find`, "generates" a candidate (the text given
//! with `--replace-with` stands in for the AI service), accepts it, and prints
//! the resulting document. The clause may be arbitrarily long; texts over the
//! 255-character search limit exercise the chunked first-chunk anchoring path.
//!
//! ```bash
//! cargo run -p redraft-demo -- contract.txt \
//!     --find "Party shall pay within 30 days." \
//!     --replace-with "Party shall pay within 15 business days."
//! ```
//!
//! Set `RUST_LOG=redraft_core=debug` to watch locate/replace decisions.

use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::Parser;
use redraft_core::{GenerateError, GenerationContext, RedraftRegistry, TextGenerator};
use redraft_memdoc::MemDocument;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(about = "Redraft one clause of a document", version)]
struct Args {
    /// Document file to redraft.
    doc: PathBuf,

    /// The clause text to locate (its current wording in the document).
    #[arg(long)]
    find: String,

    /// The replacement wording (stands in for the generation service).
    #[arg(long)]
    replace_with: String,

    /// Free-form guidance recorded with the session.
    #[arg(long, default_value = "")]
    instructions: String,

    /// Write the result back to the file instead of printing it.
    #[arg(long)]
    write: bool,
}

/// Generator that answers every request with a fixed text.
struct CannedGenerator {
    reply: String,
}

impl TextGenerator for CannedGenerator {
    fn generate(&mut self, context: &GenerationContext) -> Result<String, GenerateError> {
        info!(
            current_chars = context.current_text.chars().count(),
            instructions = %context.instructions,
            "generation request"
        );
        if self.reply.trim().is_empty() {
            return Err(GenerateError::EmptyCandidate);
        }
        Ok(self.reply.clone())
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let source = fs::read_to_string(&args.doc)?;
    let mut doc = MemDocument::new(source);
    let mut registry = RedraftRegistry::new();
    let mut generator = CannedGenerator {
        reply: args.replace_with,
    };

    let session = registry.get_or_create("demo-clause", &args.find);
    session.generate_with(&mut generator, args.instructions.as_str())?;
    info!(candidate = ?session.candidate_text(), "reviewing candidate");

    registry.accept("demo-clause", &mut doc)?;
    info!(
        selection = ?doc.selection(),
        revision = doc.revision(),
        "redraft applied"
    );

    if args.write {
        fs::write(&args.doc, doc.text())?;
        eprintln!("updated {}", args.doc.display());
    } else {
        print!("{}", doc.text());
    }
    Ok(())
}
