//! docstruct CLI - document structure recovery tool

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use docstruct::convert::{ConvertOptions, ConvertResult, ConverterRegistry, OutputFormat};
use docstruct::detect::detect_format_from_path;
use docstruct::latex::LatexOptions;
use docstruct::pdf::{PageSelection, ReconstructOptions};
use docstruct::render::DocumentStats;
use docstruct::speech::{speech_chunks, ChunkOptions};

#[derive(Parser)]
#[command(name = "docstruct")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Recover titles, headings, paragraphs and tables from PDFs and LaTeX", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconstruct the prose of a PDF
    Pdf {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Page range, 0-based and end-exclusive (e.g. "all", "3", "2-5")
        #[arg(long)]
        pages: Option<String>,

        /// Output the element stream as JSON
        #[arg(long)]
        json: bool,

        /// Keep text inside detected tables
        #[arg(long)]
        keep_tables: bool,

        /// Process pages on a single thread
        #[arg(long)]
        sequential: bool,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Parse a LaTeX project into structured elements
    #[command(alias = "tex")]
    Latex {
        /// Project directory
        #[arg(value_name = "DIR")]
        root: PathBuf,

        /// Entry file inside the project
        #[arg(long = "main", default_value = "main.tex", env = "DOCSTRUCT_MAIN")]
        main_file: String,

        /// Output the element stream as JSON
        #[arg(long, conflicts_with = "markdown")]
        json: bool,

        /// Output Markdown
        #[arg(long)]
        markdown: bool,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Print speech-ready chunks, one per line
    Chunks {
        /// Input PDF or LaTeX entry file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Maximum characters per chunk
        #[arg(long, default_value = "500")]
        max_chars: usize,

        /// Output chunks as a JSON array
        #[arg(long)]
        json: bool,
    },

    /// Show detected format and element statistics
    Info {
        /// Input PDF or LaTeX entry file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Pdf {
            input,
            pages,
            json,
            keep_tables,
            sequential,
            output,
        } => cmd_pdf(
            &input,
            pages.as_deref(),
            json,
            keep_tables,
            sequential,
            output.as_deref(),
        ),
        Commands::Latex {
            root,
            main_file,
            json,
            markdown,
            output,
        } => cmd_latex(&root, &main_file, json, markdown, output.as_deref()),
        Commands::Chunks {
            input,
            max_chars,
            json,
        } => cmd_chunks(&input, max_chars, json),
        Commands::Info { input } => cmd_info(&input),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(message.to_string());
    pb
}

fn write_output(content: &str, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = output {
        fs::write(path, content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}

fn cmd_pdf(
    input: &Path,
    pages: Option<&str>,
    json: bool,
    keep_tables: bool,
    sequential: bool,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let page_selection = if let Some(p) = pages {
        PageSelection::parse(p).map_err(|e| format!("Invalid page range: {}", e))?
    } else {
        PageSelection::All
    };

    let reconstruct = ReconstructOptions::new()
        .with_pages(page_selection)
        .with_table_detection(!keep_tables)
        .with_parallel(!sequential);
    let format = if json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };
    let options = ConvertOptions::new()
        .with_reconstruct_options(reconstruct)
        .with_format(format);

    let pb = spinner("Reconstructing PDF...");
    let result = ConverterRegistry::with_defaults()
        .get_by_name("pdf")
        .ok_or("PDF converter not registered")?
        .convert(input, &options);
    pb.finish_and_clear();

    write_output(&result?.content, output)
}

fn cmd_latex(
    root: &Path,
    main_file: &str,
    json: bool,
    markdown: bool,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let format = if json {
        OutputFormat::Json
    } else if markdown {
        OutputFormat::Markdown
    } else {
        OutputFormat::Text
    };
    let options = ConvertOptions::new()
        .with_latex_options(LatexOptions::new().with_main_file(main_file))
        .with_format(format);

    let entry = root.join(main_file);
    let result: ConvertResult = ConverterRegistry::with_defaults()
        .get_by_name("tex")
        .ok_or("LaTeX converter not registered")?
        .convert(&entry, &options)?;

    write_output(&result.content, output)
}

fn cmd_chunks(input: &Path, max_chars: usize, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let pb = spinner("Recovering structure...");
    let document = ConverterRegistry::with_defaults().load(input, &ConvertOptions::default());
    pb.finish_and_clear();

    let chunks = speech_chunks(&document?, &ChunkOptions::new().with_max_chars(max_chars))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&chunks)?);
    } else {
        for chunk in &chunks {
            println!("{}", chunk);
        }
    }
    log::info!("{} chunks", chunks.len());

    Ok(())
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let format = detect_format_from_path(input)?;
    let document = ConverterRegistry::with_defaults().load(input, &ConvertOptions::default())?;
    let stats = DocumentStats::from_document(&document);

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Format".bold(), format);
    println!("{}: {}", "Elements".bold(), document.len());
    if let Some(title) = document
        .iter()
        .find(|e| e.kind() == docstruct::ElementKind::Title)
    {
        println!("{}: {}", "Title".bold(), title.text());
    }

    println!();
    println!("{}", "Content Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "Headlines".bold(), stats.headline_count);
    println!("{}: {}", "Paragraphs".bold(), stats.paragraph_count);
    println!("{}: {}", "Tables".bold(), stats.table_count);
    println!("{}: {}", "Captions".bold(), stats.caption_count);
    println!(
        "{}: {}",
        "Abstract".bold(),
        if stats.has_abstract { "Yes" } else { "No" }
    );
    println!("{}: {}", "Words".bold(), stats.word_count);
    println!("{}: {}", "Characters".bold(), stats.char_count);

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "docstruct".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Document structure recovery tool");
    println!();
    println!("Repository: {}", "https://github.com/iyulab/docstruct".dimmed());
    println!("License: MIT");
}
