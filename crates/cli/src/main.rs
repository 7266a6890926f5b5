mod echo;

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Instant;

use anyhow::{Context, bail};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use owo_colors::OwoColorize;
use restyler_core::{
    Classifier, ContentType, Document, FetchConfig, Restyler, RestylerConfig, StyleProfile, apply_styles,
    fetch_file, fetch_stdin, fetch_url,
};

use crate::echo::{
    format_size, print_banner, print_detail, print_error, print_info, print_profile_summary, print_step,
    print_success, print_timing, print_warning,
};

pub(crate) const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Output format for transformed content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Html,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "html" => Ok(Self::Html),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid format: {}. Valid options: html, json", s)),
        }
    }
}

/// Restyle Markdown, plain text, or HTML to match a source page
#[derive(Parser, Debug)]
#[command(name = "restyler")]
#[command(version)]
#[command(about = "Restyle content to match the styling of a source HTML page", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// HTTP timeout in seconds
    #[arg(long, global = true, default_value = "10", value_name = "SECS")]
    timeout: u64,

    /// Custom User-Agent for HTTP requests
    #[arg(long, global = true, value_name = "UA")]
    user_agent: Option<String>,

    /// Print progress and details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Restyle target content to match a source page
    Transform {
        /// Source page: URL, HTML file, or "-" for stdin
        #[arg(short, long, value_name = "INPUT")]
        source: String,

        /// Target content: URL, file, or "-" for stdin
        #[arg(short, long, value_name = "INPUT")]
        target: String,

        /// Output format (html, json)
        #[arg(short, long, default_value = "html", value_name = "FORMAT")]
        format: OutputFormat,

        /// Output file (default: stdout)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Share of lines that must look like Markdown
        #[arg(long, value_name = "RATIO")]
        threshold: Option<f64>,
    },

    /// Detect whether content is Markdown, plain text, or empty
    Classify {
        /// URL, file, or "-" for stdin
        #[arg(value_name = "INPUT")]
        input: String,
    },

    /// Rewrite plain text as Markdown
    Normalize {
        /// URL, file, or "-" for stdin
        #[arg(value_name = "INPUT")]
        input: String,

        /// Output file (default: stdout)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Render Markdown to HTML
    Render {
        /// URL, file, or "-" for stdin
        #[arg(value_name = "INPUT")]
        input: String,

        /// Output file (default: stdout)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Print the style profile of an HTML page as JSON
    Styles {
        /// URL, HTML file, or "-" for stdin
        #[arg(value_name = "INPUT")]
        input: String,
    },

    /// Generate a shell completion script
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl Args {
    fn fetch_config(&self) -> FetchConfig {
        let defaults = FetchConfig::default();
        FetchConfig { timeout: self.timeout, user_agent: self.user_agent.clone().unwrap_or(defaults.user_agent) }
    }
}

/// Read an input argument from stdin, a URL, or a file
async fn read_input(input: &str, config: &FetchConfig, verbose: bool) -> anyhow::Result<String> {
    let content = if input == "-" {
        if verbose {
            print_info("Reading from stdin");
        }
        fetch_stdin().context("Failed to read from stdin")?
    } else if input.starts_with("http://") || input.starts_with("https://") {
        if verbose {
            print_info(&format!("Fetching {}", input.bright_white().underline()));
        }
        fetch_url(input, config).await.context("Failed to fetch URL")?
    } else {
        if verbose {
            print_info(&format!("Reading file {}", input.bright_white()));
        }
        fetch_file(input).with_context(|| format!("Failed to read file: {}", input))?
    };

    if verbose {
        print_detail("Size", &format_size(content.len()));
    }

    Ok(content)
}

fn write_output(output: Option<&Path>, content: &str, verbose: bool) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            fs::write(path, content).with_context(|| format!("Failed to write to file: {}", path.display()))?;
            if verbose {
                print_success(&format!("Output written to {}", path.display().bright_white()));
            }
        }
        None => print!("{}", content),
    }
    Ok(())
}

async fn run_transform(
    args: &Args, source: &str, target: &str, format: OutputFormat, output: Option<&Path>, threshold: Option<f64>,
) -> anyhow::Result<()> {
    if source == "-" && target == "-" {
        bail!("Only one of --source and --target can read from stdin");
    }

    let fetch_config = args.fetch_config();
    let started = Instant::now();

    if args.verbose {
        print_step(1, 4, "Reading source page");
    }
    let source_html = read_input(source, &fetch_config, args.verbose).await?;

    if args.verbose {
        print_step(2, 4, "Reading target content");
    }
    let target_content = read_input(target, &fetch_config, args.verbose).await?;

    let mut builder = RestylerConfig::builder();
    if let Some(threshold) = threshold {
        builder = builder.markdown_threshold(threshold);
    }
    let restyler = Restyler::with_config(builder.build());

    if args.verbose {
        print_step(3, 4, "Transforming");
        print_detail("Markdown threshold", &restyler.config().markdown_threshold.to_string());
        print_profile_summary(&StyleProfile::from_document(&Document::parse(&source_html)));
    }

    let result = match restyler.transform(&source_html, &target_content) {
        Ok(result) => result,
        Err(e) if e.is_validation() => bail!(e),
        Err(e) => return Err(e).context("Transformation error"),
    };

    if args.verbose {
        print_detail("Content type", result.content_type.as_str());
        print_detail("Strategy", &result.processing_strategy);
        print_timing("Transform", started.elapsed());
        eprintln!();
        print_step(4, 4, "Writing output");
    }

    let rendered = match format {
        OutputFormat::Html => result.transformed_html,
        OutputFormat::Json => serde_json::to_string_pretty(&result).context("Failed to serialize result")?,
    };

    write_output(output, &rendered, args.verbose)
}

async fn run_classify(args: &Args, input: &str) -> anyhow::Result<()> {
    let content = read_input(input, &args.fetch_config(), args.verbose).await?;
    let classifier = Classifier::default();
    let report = classifier.score(&content);

    if args.verbose {
        print_detail("Signal lines", &report.score.to_string());
        print_detail("Non-empty lines", &report.non_empty_lines.to_string());
        print_detail("Ratio", &format!("{:.2}", report.ratio()));

        let mut hits: BTreeMap<&str, usize> = BTreeMap::new();
        for line in content.lines() {
            for name in classifier.matching_signals(line) {
                *hits.entry(name).or_default() += 1;
            }
        }
        for (name, count) in hits {
            print_detail(&format!("Signal {}", name), &count.to_string());
        }
    }

    println!("{}", report.content_type);
    Ok(())
}

async fn run_normalize(args: &Args, input: &str, output: Option<&Path>) -> anyhow::Result<()> {
    let content = read_input(input, &args.fetch_config(), args.verbose).await?;
    let restyler = Restyler::new();

    if args.verbose && restyler.classify(&content) == ContentType::Markdown {
        print_warning("Input already looks like Markdown");
    }

    write_output(output, &restyler.normalize(&content), args.verbose)
}

async fn run_render(args: &Args, input: &str, output: Option<&Path>) -> anyhow::Result<()> {
    let content = read_input(input, &args.fetch_config(), args.verbose).await?;
    write_output(output, &Restyler::new().render(&content), args.verbose)
}

async fn run_styles(args: &Args, input: &str) -> anyhow::Result<()> {
    let html = read_input(input, &args.fetch_config(), args.verbose).await?;
    let profile = StyleProfile::from_document(&Document::parse(&html));

    if args.verbose {
        print_profile_summary(&profile);
        let sample = apply_styles(Document::parse("<p>sample</p>"), &profile);
        print_detail("Sample", &sample.to_html());
    }

    println!("{}", serde_json::to_string_pretty(&profile).context("Failed to serialize style profile")?);
    Ok(())
}

async fn run(args: Args) -> anyhow::Result<()> {
    if args.verbose {
        print_banner();
    }

    match &args.command {
        Command::Transform { source, target, format, output, threshold } => {
            run_transform(&args, source, target, *format, output.as_deref(), *threshold).await
        }
        Command::Classify { input } => run_classify(&args, input).await,
        Command::Normalize { input, output } => run_normalize(&args, input, output.as_deref()).await,
        Command::Render { input, output } => run_render(&args, input, output.as_deref()).await,
        Command::Styles { input } => run_styles(&args, input).await,
        Command::Completions { shell } => {
            clap_complete::generate(*shell, &mut Args::command(), "restyler", &mut io::stdout());
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(err) = run(args).await {
        print_error(&format!("{:#}", err));
        std::process::exit(1);
    }
}
