use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use digidocs_config::{Config, SettingsUpdate};
use digidocs_engine::generate::{
    ChatRequest, GenerationInput, GenerationRequest, LengthInput, build_prompt,
    clamp_target_length,
};
use digidocs_engine::markup::{OffsetMode, enforce_length};
use digidocs_engine::render::{DocumentRenderer, RichDocument};
use digidocs_engine::settings::{
    OPENROUTER_BASE, OPENROUTER_KEY, OPENROUTER_MODEL, TEMPLATE_ID, TEXT_RU_KEY,
};

#[derive(Parser)]
#[command(name = "digidocs", version, about = "Markdown articles to rich-text documents")]
struct Cli {
    /// Settings file to use instead of ~/.config/digidocs/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a Markdown file to an HTML document
    Render(RenderArgs),

    /// Print the completion prompt for a brief
    Prompt(PromptArgs),

    /// Show or change stored settings
    #[command(subcommand)]
    Settings(SettingsCommand),
}

#[derive(clap::Args)]
struct RenderArgs {
    /// Markdown file to render
    input: PathBuf,

    /// Document title (defaults to the first `# ` heading)
    #[arg(short, long)]
    title: Option<String>,

    /// Truncate the text to about this many characters first
    #[arg(long)]
    target: Option<i64>,

    /// Output file (defaults to the configured output directory or next to the input)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Remap style offsets onto the final text instead of the legacy positions
    #[arg(long)]
    corrected_offsets: bool,

    /// HTML page template with {{title}} and {{body}} slots (defaults to the TEMPLATE_ID setting)
    #[arg(long)]
    template: Option<PathBuf>,
}

#[derive(clap::Args)]
struct PromptArgs {
    /// The brief for the article
    brief: String,

    #[arg(long)]
    model: Option<String>,

    /// лонгрид, карточка, новость, страница интернет-магазина or статья
    #[arg(long)]
    format: Option<String>,

    #[arg(long)]
    tone: Option<String>,

    /// Minimum length in characters
    #[arg(long)]
    length: Option<String>,

    /// Leave subheadings to the model
    #[arg(long)]
    no_subheadings: bool,

    /// Print the chat request body as JSON instead of the bare prompt
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum SettingsCommand {
    /// Print settings with credentials masked
    Show,

    /// Store one setting
    Set {
        /// OPENROUTER_BASE, OPENROUTER_MODEL, TEMPLATE_ID, OPENROUTER_KEY or TEXT_RU_KEY
        key: String,
        value: String,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let cli = Cli::parse();
    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
    log::debug!("Config path: {}", config_path.display());
    let config = Config::load_from_path(&config_path)
        .with_context(|| format!("loading settings from {}", config_path.display()))?
        .unwrap_or_default();

    match cli.command {
        Command::Render(args) => render(&args, &config),
        Command::Prompt(args) => prompt(args, &config),
        Command::Settings(SettingsCommand::Show) => print_json(&config.masked()),
        Command::Settings(SettingsCommand::Set { key, value }) => {
            set_setting(config, &config_path, &key, value)
        }
    }
}

fn render(args: &RenderArgs, config: &Config) -> Result<()> {
    let markdown = std::fs::read_to_string(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    let markdown = match args.target {
        Some(target) => enforce_length(&markdown, clamp_target_length(target)),
        None => markdown,
    };

    let mode = if args.corrected_offsets {
        OffsetMode::Corrected
    } else {
        OffsetMode::Compatible
    };
    let mut doc = match template_path(args.template.as_deref(), config.template_id.as_deref()) {
        Some(path) => {
            let template = std::fs::read_to_string(&path)
                .with_context(|| format!("reading template {}", path.display()))?;
            RichDocument::from_template(template)
        }
        None => RichDocument::new(),
    };
    let rendered = DocumentRenderer::new(mode)
        .render(&markdown, args.title.as_deref(), &mut doc)
        .context("rendering document")?;

    let out = match &args.out {
        Some(out) => out.clone(),
        None => default_output(&args.input, config.output_dir.as_deref()),
    };
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    std::fs::write(&out, doc.to_html()).with_context(|| format!("writing {}", out.display()))?;

    log::info!(
        "Rendered {:?} ({} blocks, {} skipped spans)",
        rendered.document.name,
        doc.blocks().len(),
        rendered.skipped_spans
    );
    println!("{}", out.display());
    Ok(())
}

/// `<dir>/<stem>.html`, with `dir` defaulting to the input's directory.
fn default_output(input: &Path, output_dir: Option<&Path>) -> PathBuf {
    let file_name = input.with_extension("html");
    match (output_dir, file_name.file_name()) {
        (Some(dir), Some(name)) => dir.join(name),
        _ => file_name,
    }
}

/// The template given on the command line, else the configured one.
fn template_path(arg: Option<&Path>, configured: Option<&str>) -> Option<PathBuf> {
    match arg {
        Some(path) => Some(path.to_path_buf()),
        None => configured
            .filter(|id| !id.is_empty())
            .and_then(|id| Config::expand_path(Path::new(id))),
    }
}

fn prompt(args: PromptArgs, config: &Config) -> Result<()> {
    let input = GenerationInput {
        prompt: Some(args.brief),
        model: args.model,
        format: args.format,
        tone: args.tone,
        length: args.length.map(LengthInput::Text),
        use_subheadings: Some(!args.no_subheadings),
        title: None,
    };
    let request = GenerationRequest::from_input(Some(&input), config)?;
    let prompt = build_prompt(&request);

    if args.json {
        print_json(&ChatRequest::new(request.model(), &prompt))
    } else {
        println!("{prompt}");
        Ok(())
    }
}

fn set_setting(mut config: Config, config_path: &Path, key: &str, value: String) -> Result<()> {
    let mut update = SettingsUpdate::default();
    let slot = match key {
        OPENROUTER_BASE => &mut update.openrouter_base,
        OPENROUTER_MODEL => &mut update.openrouter_model,
        TEMPLATE_ID => &mut update.template_id,
        OPENROUTER_KEY => &mut update.openrouter_key,
        TEXT_RU_KEY => &mut update.text_ru_key,
        _ => bail!("unknown setting {key}"),
    };
    *slot = Some(value);

    let masked = config.apply_update(update);
    config.save_to_path(config_path)?;
    print_json(&masked)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
