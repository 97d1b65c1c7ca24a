//! CLI for md2docx - Markdown to DOCX converter

use clap::Parser;
use md2docx::{ConvertOptions, DocumentStyle, Language, MarkdownToDocx, StyleTemplate};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input Markdown file path
    input: PathBuf,

    /// Output DOCX file path (defaults to the input path with a .docx extension)
    output: Option<PathBuf>,

    /// Style preset: standard, academic, note or custom
    #[arg(long, default_value = "standard")]
    template: StyleTemplate,

    /// JSON file with a custom document style (implies --template custom)
    #[arg(long)]
    style: Option<PathBuf>,

    /// Language of generated captions: en or zh
    #[arg(long, default_value = "en")]
    lang: Language,

    /// Images wider than this many pixels are scaled down
    #[arg(long, default_value_t = md2docx::DEFAULT_MAX_IMAGE_WIDTH)]
    max_image_width: u32,

    /// Timeout in seconds for each remote image request
    #[arg(long)]
    image_timeout: Option<u64>,

    /// Log conversion details
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| args.input.with_extension("docx"));

    if let Err(e) = run(&args, &output).await {
        eprintln!("Error converting Markdown: {}", e);
        std::process::exit(1);
    }
    println!("Successfully converted to {:?}", output);
}

async fn run(args: &Args, output: &Path) -> md2docx::Result<()> {
    let (template, custom_style) = match &args.style {
        Some(path) => (
            StyleTemplate::Custom,
            Some(DocumentStyle::from_json_file(path)?),
        ),
        None => (args.template, None),
    };

    let options = ConvertOptions {
        template,
        custom_style,
        language: args.lang,
        max_image_width: args.max_image_width,
        base_dir: args.input.parent().map(PathBuf::from),
        image_timeout: args.image_timeout.map(Duration::from_secs),
    };

    let converter = MarkdownToDocx::new(options)?;
    converter.convert_file(&args.input, output).await
}
