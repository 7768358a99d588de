use std::path::{Path, PathBuf};

use miette::{IntoDiagnostic, Result};
use quill_articles::{
    ArticleApi, ArticleDraft, CreateArticleRequest, FieldErrors, HttpArticleApi, SelectedFile,
    check_attachment, validate_draft,
};
use quill_common::AppConfig;
use quill_common::telemetry::{self, TelemetryConfig};
use tracing::debug;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(version, about = "Quill - validate and publish articles", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to a TOML config file (defaults to $QUILL_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Article API base URL, overriding the config file
    #[arg(long, global = true)]
    api: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a draft file against the article rules
    Validate {
        /// Draft file (.toml or .json)
        draft: PathBuf,
    },
    /// Validate a draft and send it to the article API
    Submit {
        /// Draft file (.toml or .json)
        draft: PathBuf,

        /// Image to attach
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// List the categories the API accepts
    Categories,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_miette();
    let _ = dotenvy::dotenv();
    telemetry::init(TelemetryConfig::from_env("quill"));

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref(), cli.api)?;
    debug!(api = %config.api.base_url, "configuration loaded");

    match cli.command {
        Commands::Validate { draft } => validate(&config, &draft),
        Commands::Submit { draft, image } => submit(&config, &draft, image.as_deref()).await,
        Commands::Categories => categories(&config).await,
    }
}

fn load_config(path: Option<&Path>, api: Option<String>) -> Result<AppConfig> {
    let mut config = match path {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::from_env()?,
    };
    if let Some(url) = api {
        config.api.base_url = url;
        config.validate()?;
    }
    Ok(config)
}

fn check_draft(config: &AppConfig, path: &Path) -> Result<ArticleDraft> {
    let draft = ArticleDraft::load(path)?;
    let errors = validate_draft(&draft, config.form.validation_policy);
    if !errors.is_empty() {
        print_errors(&errors);
        return Err(miette::miette!(
            "{} failed validation ({} field(s))",
            path.display(),
            errors.len()
        ));
    }
    Ok(draft)
}

fn print_errors(errors: &FieldErrors) {
    for (field, message) in errors.iter() {
        eprintln!("  {field}: {message}");
    }
}

fn validate(config: &AppConfig, path: &Path) -> Result<()> {
    check_draft(config, path)?;
    println!("✓ {} is valid", path.display());
    Ok(())
}

async fn submit(config: &AppConfig, path: &Path, image: Option<&Path>) -> Result<()> {
    let mut draft = check_draft(config, path)?;

    if let Some(image) = image {
        let data = std::fs::read(image).into_diagnostic()?;
        let name = image
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let file = SelectedFile::new(name, data).with_type_from_name();
        let attachment = check_attachment(file, config.form.max_image_bytes)?;
        println!(
            "Attaching {} ({}, {} bytes)",
            attachment.name,
            attachment.mime_type,
            attachment.len()
        );
        draft.image = Some(attachment);
    }

    let api = HttpArticleApi::new(&config.api)?;
    let request = CreateArticleRequest::from_draft(&draft);
    match api.create_article(request).await? {
        Some(created) => {
            println!("✓ Created article {}", created.id);
            Ok(())
        }
        None => Err(miette::miette!(
            "The server refused the article; check the draft and try again"
        )),
    }
}

async fn categories(config: &AppConfig) -> Result<()> {
    let api = HttpArticleApi::new(&config.api)?;
    let categories = api.fetch_categories().await?;
    if categories.is_empty() {
        println!("No categories");
    }
    for category in categories {
        println!("{}\t{}", category.id, category.name);
    }
    Ok(())
}

fn init_miette() {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .with_cause_chain()
                .color(true)
                .context_lines(5)
                .tab_width(2)
                .break_words(true)
                .build(),
        )
    }))
    .expect("couldn't set the miette hook");
    miette::set_panic_hook();
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_submit_arguments() {
        let cli = Cli::parse_from([
            "quill",
            "submit",
            "draft.toml",
            "--image",
            "cover.png",
            "--api",
            "https://admin.example.org/api",
        ]);
        assert_eq!(cli.api.as_deref(), Some("https://admin.example.org/api"));
        match cli.command {
            Commands::Submit { draft, image } => {
                assert_eq!(draft, PathBuf::from("draft.toml"));
                assert_eq!(image, Some(PathBuf::from("cover.png")));
            }
            _ => panic!("expected submit"),
        }
    }
}
