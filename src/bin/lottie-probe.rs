use std::{io::Write as _, path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "lottie-probe", version)]
/// Load a Lottie composition and print a JSON summary of it.
struct Cli {
    #[command(subcommand)]
    source: Source,

    #[command(flatten)]
    opts: CommonArgs,
}

#[derive(Subcommand, Debug)]
enum Source {
    /// Fetch the composition over HTTP(S).
    Url {
        /// Composition URL.
        url: String,
    },
    /// Read the composition from a filesystem path.
    File {
        /// Path to the JSON document.
        path: PathBuf,
    },
    /// Read the composition from an asset tree.
    Asset {
        /// Path relative to `--root`.
        path: String,
        /// Asset root directory.
        #[arg(long, default_value = "assets")]
        root: PathBuf,
    },
    /// Parse composition JSON given inline.
    Json {
        /// Full document text.
        text: String,
    },
    /// Open the composition through the content resolver (`file://` URIs).
    Uri {
        /// Content URI.
        uri: String,
    },
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// Folder (under the asset root) holding image assets.
    #[arg(long, global = true)]
    images: Option<String>,

    /// Extra HTTP header as `name:value`; repeatable.
    #[arg(long = "header", global = true, value_parser = parse_header)]
    headers: Vec<(String, String)>,

    /// Retry attempts for transient network errors.
    #[arg(long, global = true, default_value_t = 3)]
    retries: u8,

    /// Pretty-print the JSON summary.
    #[arg(long, global = true)]
    pretty: bool,

    /// Log loader activity to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,
}

fn parse_header(s: &str) -> Result<(String, String), String> {
    let (name, value) = s
        .split_once(':')
        .ok_or_else(|| format!("header '{s}' must look like name:value"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("header '{s}' has an empty name"));
    }
    Ok((name.to_string(), value.trim().to_string()))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.opts.verbose);

    let mut config = lottie_loader::LoaderConfig {
        image_assets_folder: cli.opts.images.clone(),
        fetch: lottie_loader::FetchConfig {
            max_retries: cli.opts.retries,
            headers: cli.opts.headers.clone(),
            ..lottie_loader::FetchConfig::default()
        },
        cache_capacity: 0,
        ..lottie_loader::LoaderConfig::default()
    };

    let spec = match cli.source {
        Source::Url { url } => lottie_loader::CompositionSpec::url(url),
        Source::File { path } => {
            if let Some(parent) = path.parent() {
                config.asset_root = parent.to_path_buf();
            }
            lottie_loader::CompositionSpec::file(path.to_string_lossy())
        }
        Source::Asset { path, root } => {
            config.asset_root = root;
            lottie_loader::CompositionSpec::asset(path)
        }
        Source::Json { text } => lottie_loader::CompositionSpec::json(text),
        Source::Uri { uri } => lottie_loader::CompositionSpec::content_uri(uri),
    };

    let comp: Arc<lottie_loader::Composition> = lottie_loader::load_composition(&spec, &config)
        .await
        .with_context(|| format!("load {spec}"))?;

    let summary = comp.summary();
    let json = if cli.opts.pretty {
        serde_json::to_string_pretty(&summary)
    } else {
        serde_json::to_string(&summary)
    }
    .context("serialize composition summary")?;

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{json}").context("write summary")?;
    Ok(())
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}
