//! Promptbench CLI - Evaluate LLM outputs across prompts and models
//!
//! Terminal front end for a promptbench backend: manage models, prompts,
//! inputs and input sets, run single or batch processing, inspect history,
//! and record quality evaluations.

mod api;
mod config;
mod render;

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use dialoguer::{Confirm, Input};

use promptbench::domain::{LlmModel, Prompt, Quality, SortKey};
use promptbench::matrix::{filter_options, HistoryMatrix};
use promptbench::presentation::{
    sort_bundles_newest_first, BundleView, EvaluationSlot, InputView, ResultBundle,
};
use promptbench::report::{apply_filter, export_csv, export_filename, rows_from_bundles, sort_rows};
use promptbench::selection::{InputMode, SelectionKind, SelectionState};
use promptbench::timeline::build_timeline;

use api::{ApiClient, UpdateInputRequest, UpdateInputSetRequest, UpdatePromptRequest};
use config::Config;

#[derive(Parser)]
#[command(name = "promptbench")]
#[command(about = "Evaluate LLM outputs across prompts, models and input sets", long_about = None)]
#[command(version)]
struct Cli {
    /// Backend base URL (overrides the configured one)
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage models
    Model {
        #[command(subcommand)]
        action: ModelAction,
    },

    /// Manage prompts and their versions
    Prompt {
        #[command(subcommand)]
        action: PromptAction,
    },

    /// Manage input sets
    Set {
        #[command(subcommand)]
        action: SetAction,
    },

    /// Manage inputs
    Input {
        #[command(subcommand)]
        action: InputAction,
    },

    /// Process one text with the selected models and prompts
    Run {
        /// Text to process (or use -f for file, or omit for a prompt)
        text: Option<String>,
        /// Read the text from a file
        #[arg(short, long)]
        file: Option<String>,
        /// Model ids to run (comma-separated or repeated)
        #[arg(short, long, value_delimiter = ',')]
        model: Vec<i64>,
        /// Prompt ids to run (comma-separated or repeated)
        #[arg(short, long, value_delimiter = ',')]
        prompt: Vec<i64>,
    },

    /// Run an input set through the selected models and prompts
    Batch {
        /// Input set id (defaults to the configured set, else the newest)
        #[arg(short, long)]
        set: Option<i64>,
        /// Model ids to run
        #[arg(short, long, value_delimiter = ',')]
        model: Vec<i64>,
        /// Prompt ids to run
        #[arg(short, long, value_delimiter = ',')]
        prompt: Vec<i64>,
        /// Only run these inputs instead of the whole set
        #[arg(short, long, value_delimiter = ',')]
        input: Vec<i64>,
        /// Sort the grid: input, model, prompt or time
        #[arg(long)]
        sort: Option<SortKey>,
        /// Sort descending instead of ascending
        #[arg(long)]
        desc: bool,
        /// Hide rows whose input name/text does not contain this text
        #[arg(long)]
        filter: Option<String>,
        /// Write the grid as CSV (default file name when no path given)
        #[arg(long, num_args = 0..=1)]
        export: Option<Option<PathBuf>>,
    },

    /// Compare prompts side by side over chosen inputs
    Compare {
        /// Input set id providing the inputs
        #[arg(short, long)]
        set: Option<i64>,
        /// Specific input ids (defaults to every input in the set)
        #[arg(short, long, value_delimiter = ',')]
        input: Vec<i64>,
        /// Model ids to run
        #[arg(short, long, value_delimiter = ',')]
        model: Vec<i64>,
        /// Prompt ids to run
        #[arg(short, long, value_delimiter = ',')]
        prompt: Vec<i64>,
    },

    /// Show historical results for one input
    History {
        /// Input id
        input_id: i64,
        /// Day-grouped timeline instead of the model x prompt matrix
        #[arg(long)]
        timeline: bool,
        /// List every recorded run per cell, not just the latest
        #[arg(long)]
        expand: bool,
        /// Only show this model
        #[arg(long)]
        model: Option<i64>,
        /// Only show this prompt
        #[arg(long)]
        prompt: Option<i64>,
    },

    /// Record a quality evaluation for an output
    Evaluate {
        /// Output id
        output_id: i64,
        /// Quality rating: bad, ok or good
        quality: Quality,
        /// Evaluation notes
        #[arg(short, long)]
        notes: Option<String>,
    },

    /// List stored evaluations
    Evaluations,

    /// Show or change configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
enum ModelAction {
    /// List all models
    List,
    /// Register a model
    Add {
        name: String,
        #[arg(short, long, default_value = "")]
        description: String,
    },
}

#[derive(Subcommand)]
enum PromptAction {
    /// List all prompts
    List,
    /// Show a prompt with its versions
    Show { prompt_id: i64 },
    /// Create a prompt
    Add {
        name: String,
        /// Template text containing an {{input}} placeholder
        #[arg(short, long)]
        template: String,
        #[arg(short, long, default_value = "")]
        description: String,
    },
    /// Update a prompt (creates a new version server-side on template change)
    Edit {
        prompt_id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(short, long)]
        template: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Delete a prompt
    Delete {
        prompt_id: i64,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// List versions of a prompt
    Versions { prompt_id: i64 },
    /// Create a new version of a prompt
    NewVersion {
        prompt_id: i64,
        /// Template text (or use -f for file)
        #[arg(short, long)]
        template: Option<String>,
        /// Read the template from a file
        #[arg(short, long)]
        file: Option<String>,
        /// Optional system prompt
        #[arg(long)]
        system_prompt: Option<String>,
    },
    /// Show one prompt version
    ShowVersion { version_id: i64 },
    /// Create the stock starter prompts when none exist yet
    InitDefaults,
}

#[derive(Subcommand)]
enum SetAction {
    /// List all input sets, newest first
    List,
    /// Show an input set with its inputs
    Show { input_set_id: i64 },
    /// Create an input set
    Create {
        name: String,
        #[arg(short, long, default_value = "")]
        description: String,
    },
    /// Update an input set
    Update {
        input_set_id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Delete an input set and its inputs
    Delete {
        input_set_id: i64,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Add an input to a set
    AddInput {
        input_set_id: i64,
        /// Input text (or use -f for file)
        text: Option<String>,
        /// Read the text from a file
        #[arg(short, long)]
        file: Option<String>,
        #[arg(short, long, default_value = "")]
        name: String,
    },
}

#[derive(Subcommand)]
enum InputAction {
    /// List all inputs
    List,
    /// Show one input
    Show { input_id: i64 },
    /// Create a standalone input
    Create {
        text: Option<String>,
        #[arg(short, long)]
        file: Option<String>,
        #[arg(short, long, default_value = "")]
        name: String,
    },
    /// Update an input
    Update {
        input_id: i64,
        #[arg(short, long)]
        text: Option<String>,
        #[arg(long)]
        name: Option<String>,
    },
    /// Delete an input
    Delete {
        input_id: i64,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Set the backend base URL
    SetUrl { url: String },
    /// Set the default input set for batch runs
    SetDefaultSet { input_set_id: i64 },
}

/// The three starter prompts offered on an empty backend
const DEFAULT_PROMPTS: [(&str, &str, &str); 3] = [
    (
        "Basic Summary",
        "Summarize the following text in 1-2 sentences: {{input}}",
        "Simple summarization",
    ),
    (
        "Bullet Points",
        "Extract the key points from this text as a bulleted list: {{input}}",
        "Extract key points as bullet points",
    ),
    (
        "Professional Email",
        "Reformat the following voice memo into a professional email: {{input}}",
        "Convert to formal email format",
    ),
];

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = Config::load()?;
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }
    let client = ApiClient::new(&config.base_url);

    match cli.command {
        Commands::Model { action } => cmd_model(&client, action).await,
        Commands::Prompt { action } => cmd_prompt(&client, action).await,
        Commands::Set { action } => cmd_set(&client, action).await,
        Commands::Input { action } => cmd_input(&client, action).await,
        Commands::Run {
            text,
            file,
            model,
            prompt,
        } => cmd_run(&client, text, file, model, prompt).await,
        Commands::Batch {
            set,
            model,
            prompt,
            input,
            sort,
            desc,
            filter,
            export,
        } => cmd_batch(&client, &config, set, model, prompt, input, sort, desc, filter, export).await,
        Commands::Compare {
            set,
            input,
            model,
            prompt,
        } => cmd_compare(&client, &config, set, input, model, prompt).await,
        Commands::History {
            input_id,
            timeline,
            expand,
            model,
            prompt,
        } => cmd_history(&client, input_id, timeline, expand, model, prompt).await,
        Commands::Evaluate {
            output_id,
            quality,
            notes,
        } => cmd_evaluate(&client, output_id, quality, notes).await,
        Commands::Evaluations => cmd_evaluations(&client).await,
        Commands::Config { action } => cmd_config(action),
    }
}

// ============================================
// Shared helpers
// ============================================

/// Content from an argument, a file, or an interactive prompt
fn resolve_text(text: Option<String>, file: Option<String>, prompt: &str) -> Result<String> {
    match (text, file) {
        (Some(t), None) => Ok(t),
        (None, Some(f)) => {
            fs::read_to_string(&f).with_context(|| format!("Failed to read file: {}", f))
        }
        (Some(_), Some(_)) => bail!("Cannot specify both text and --file"),
        (None, None) => Input::new()
            .with_prompt(prompt)
            .interact_text()
            .context("Failed to read input"),
    }
}

fn confirm_or_skip(question: &str, yes: bool) -> Result<bool> {
    if yes {
        return Ok(true);
    }
    Confirm::new()
        .with_prompt(question)
        .default(false)
        .interact()
        .context("Failed to read confirmation")
}

/// Build the working set for a run, resolving display names from the
/// fetched lists and rejecting ids the backend does not know
fn build_selection(
    models: &[LlmModel],
    prompts: &[Prompt],
    model_ids: &[i64],
    prompt_ids: &[i64],
) -> Result<SelectionState> {
    let mut state = SelectionState::new();
    for id in model_ids {
        let model = models
            .iter()
            .find(|m| m.id == *id)
            .with_context(|| format!("Unknown model id {}", id))?;
        state.select(SelectionKind::Model, model.id, model.name.clone());
    }
    for id in prompt_ids {
        let prompt = prompts
            .iter()
            .find(|p| p.id == *id)
            .with_context(|| format!("Unknown prompt id {}", id))?;
        state.select(SelectionKind::Prompt, prompt.id, prompt.name.clone());
    }
    Ok(state)
}

/// Backfill flat names the older processing endpoints omit
fn fill_names(bundle: &mut ResultBundle, models: &[LlmModel], prompts: &[Prompt]) {
    for record in &mut bundle.prompt_results {
        if record.model_name.is_none() {
            if let Some(id) = record.model_id {
                record.model_name = models.iter().find(|m| m.id == id).map(|m| m.name.clone());
            }
        }
        if record.prompt_name.is_none() {
            if let Some(id) = record.prompt_id {
                record.prompt_name = prompts.iter().find(|p| p.id == id).map(|p| p.name.clone());
            }
        }
    }
}

/// The designated input set: explicit flag, configured default, else the
/// newest set on the backend
async fn resolve_input_set(
    client: &ApiClient,
    config: &Config,
    set: Option<i64>,
) -> Result<i64> {
    if let Some(id) = set.or(config.default_input_set) {
        return Ok(id);
    }
    let mut sets = client.list_input_sets().await?;
    sets.sort_by(|a, b| b.id.cmp(&a.id));
    match sets.first() {
        Some(newest) => {
            println!(
                "{}",
                format!("Using newest input set: {} (#{})", newest.name, newest.id).dimmed()
            );
            Ok(newest.id)
        }
        None => bail!("Please select an input set (none exist yet - create one with 'promptbench set create')"),
    }
}

// ============================================
// Command Implementations
// ============================================

async fn cmd_model(client: &ApiClient, action: ModelAction) -> Result<()> {
    match action {
        ModelAction::List => {
            let models = client.list_models().await?;
            if models.is_empty() {
                println!("No models available");
                return Ok(());
            }
            println!("{}", "Models:".bold());
            for model in models {
                println!(
                    "  {} {} {}",
                    format!("#{}", model.id).dimmed(),
                    model.name.cyan().bold(),
                    model.description.as_deref().unwrap_or("").dimmed()
                );
            }
        }
        ModelAction::Add { name, description } => {
            let model = client.create_model(&name, &description).await?;
            println!("{} Model '{}' added (#{})", "✓".green(), model.name, model.id);
        }
    }
    Ok(())
}

async fn cmd_prompt(client: &ApiClient, action: PromptAction) -> Result<()> {
    match action {
        PromptAction::List => {
            let prompts = client.list_prompts().await?;
            if prompts.is_empty() {
                println!("No prompts available");
                println!("\n{}", "Create the starter prompts with:".dimmed());
                println!("  promptbench prompt init-defaults");
                return Ok(());
            }
            println!("{}", "Prompts:".bold());
            for prompt in prompts {
                println!(
                    "  {} {} {}",
                    format!("#{}", prompt.id).dimmed(),
                    prompt.name.cyan().bold(),
                    prompt.description.as_deref().unwrap_or("").dimmed()
                );
            }
        }

        PromptAction::Show { prompt_id } => {
            let detail = client.get_prompt(prompt_id).await?;
            println!("{} {}", format!("#{}", detail.id).dimmed(), detail.name.cyan().bold());
            if let Some(description) = &detail.description {
                println!("  {}", description.dimmed());
            }
            println!("\n{}", detail.template);
            if !detail.versions.is_empty() {
                let latest = detail.latest_version().map(|v| v.version_number);
                println!("\n{}", "Versions:".bold());
                for version in &detail.versions {
                    let marker = if Some(version.version_number) == latest {
                        " (latest)".green().to_string()
                    } else {
                        String::new()
                    };
                    println!(
                        "  {} v{}{}",
                        format!("#{}", version.id).dimmed(),
                        version.version_number,
                        marker
                    );
                }
            }
        }

        PromptAction::Add {
            name,
            template,
            description,
        } => {
            let prompt = client.create_prompt(&name, &template, &description).await?;
            println!("{} Prompt '{}' added (#{})", "✓".green(), prompt.name, prompt.id);
        }

        PromptAction::Edit {
            prompt_id,
            name,
            template,
            description,
        } => {
            if name.is_none() && template.is_none() && description.is_none() {
                bail!("Nothing to update: pass --name, --template or --description");
            }
            let prompt = client
                .update_prompt(
                    prompt_id,
                    &UpdatePromptRequest {
                        name,
                        template,
                        description,
                    },
                )
                .await?;
            println!("{} Prompt '{}' updated", "✓".green(), prompt.name);
        }

        PromptAction::Delete { prompt_id, yes } => {
            let question = format!("Are you sure you want to delete prompt #{}?", prompt_id);
            if !confirm_or_skip(&question, yes)? {
                return Ok(());
            }
            client.delete_prompt(prompt_id).await?;
            println!("{} Prompt #{} deleted", "✓".green(), prompt_id);
        }

        PromptAction::Versions { prompt_id } => {
            let versions = client.list_prompt_versions(prompt_id).await?;
            if versions.is_empty() {
                println!("No versions recorded for prompt #{}", prompt_id);
                return Ok(());
            }
            println!("{}", "Versions:".bold());
            for version in versions {
                println!(
                    "  {} v{} {}",
                    format!("#{}", version.id).dimmed(),
                    version.version_number,
                    render::truncate_string(&version.template.replace('\n', " "), 70).dimmed()
                );
            }
        }

        PromptAction::NewVersion {
            prompt_id,
            template,
            file,
            system_prompt,
        } => {
            let template = resolve_text(template, file, "Template text")?;
            let version = client
                .create_prompt_version(prompt_id, &template, system_prompt.as_deref())
                .await?;
            println!(
                "{} Version v{} created for prompt #{}",
                "✓".green(),
                version.version_number,
                prompt_id
            );
        }

        PromptAction::ShowVersion { version_id } => {
            let version = client.get_prompt_version(version_id).await?;
            println!(
                "{} v{} of prompt #{}",
                format!("#{}", version.id).dimmed(),
                version.version_number,
                version.prompt_id
            );
            if let Some(system_prompt) = &version.system_prompt {
                println!("\n{}", "System prompt:".bold());
                println!("{}", system_prompt);
            }
            println!("\n{}", version.template);
        }

        PromptAction::InitDefaults => {
            let existing = client.list_prompts().await?;
            if !existing.is_empty() {
                println!(
                    "Prompts already exist ({}); leaving them untouched",
                    existing.len()
                );
                return Ok(());
            }
            // Deliberately serialized to preserve creation order
            let mut created = 0;
            for (name, template, description) in DEFAULT_PROMPTS {
                match client.create_prompt(name, template, description).await {
                    Ok(prompt) => {
                        created += 1;
                        println!("{} Prompt '{}' added (#{})", "✓".green(), prompt.name, prompt.id);
                    }
                    Err(e) => {
                        tracing::error!(name, error = %e, "failed to create default prompt");
                        eprintln!("{} Could not create '{}': {}", "✗".red(), name, e);
                    }
                }
            }
            println!("{} of {} starter prompts created", created, DEFAULT_PROMPTS.len());
        }
    }
    Ok(())
}

async fn cmd_set(client: &ApiClient, action: SetAction) -> Result<()> {
    match action {
        SetAction::List => {
            let mut sets = client.list_input_sets().await?;
            if sets.is_empty() {
                println!("No input sets available");
                return Ok(());
            }
            // Newest first, by numeric id
            sets.sort_by(|a, b| b.id.cmp(&a.id));
            println!("{}", "Input sets:".bold());
            for set in sets {
                println!(
                    "  {} {} {}",
                    format!("#{}", set.id).dimmed(),
                    set.name.cyan().bold(),
                    set.description.as_deref().unwrap_or("").dimmed()
                );
            }
        }

        SetAction::Show { input_set_id } => {
            let detail = client.get_input_set(input_set_id).await?;
            println!(
                "{} {} {}",
                format!("#{}", detail.id).dimmed(),
                detail.name.cyan().bold(),
                detail.description.as_deref().unwrap_or("").dimmed()
            );
            if detail.inputs.is_empty() {
                println!("  No inputs available");
                return Ok(());
            }
            let mut inputs = detail.inputs;
            inputs.sort_by(|a, b| b.id.cmp(&a.id));
            for input in inputs {
                let name = input
                    .name
                    .clone()
                    .filter(|n| !n.is_empty())
                    .unwrap_or_else(|| format!("Input #{}", input.id));
                println!(
                    "  {} {} {}",
                    format!("#{}", input.id).dimmed(),
                    name,
                    render::truncate_string(&input.text.replace('\n', " "), 60).dimmed()
                );
            }
        }

        SetAction::Create { name, description } => {
            let set = client.create_input_set(&name, &description).await?;
            println!("{} Input set '{}' created (#{})", "✓".green(), set.name, set.id);
        }

        SetAction::Update {
            input_set_id,
            name,
            description,
        } => {
            if name.is_none() && description.is_none() {
                bail!("Nothing to update: pass --name or --description");
            }
            let set = client
                .update_input_set(input_set_id, &UpdateInputSetRequest { name, description })
                .await?;
            println!("{} Input set '{}' updated", "✓".green(), set.name);
        }

        SetAction::Delete { input_set_id, yes } => {
            let question = format!(
                "Are you sure you want to delete input set #{} and its inputs?",
                input_set_id
            );
            if !confirm_or_skip(&question, yes)? {
                return Ok(());
            }
            client.delete_input_set(input_set_id).await?;
            println!("{} Input set #{} deleted", "✓".green(), input_set_id);
        }

        SetAction::AddInput {
            input_set_id,
            text,
            file,
            name,
        } => {
            let text = resolve_text(text, file, "Input text")?;
            let input = client.add_input_to_set(input_set_id, &text, &name).await?;
            println!(
                "{} Input #{} added to set #{}",
                "✓".green(),
                input.id,
                input_set_id
            );
        }
    }
    Ok(())
}

async fn cmd_input(client: &ApiClient, action: InputAction) -> Result<()> {
    match action {
        InputAction::List => {
            let inputs = client.list_inputs().await?;
            if inputs.is_empty() {
                println!("No inputs available");
                return Ok(());
            }
            println!("{}", "Inputs:".bold());
            for input in inputs {
                let name = input
                    .name
                    .clone()
                    .filter(|n| !n.is_empty())
                    .unwrap_or_else(|| format!("Input #{}", input.id));
                println!(
                    "  {} {} {}",
                    format!("#{}", input.id).dimmed(),
                    name,
                    render::truncate_string(&input.text.replace('\n', " "), 60).dimmed()
                );
            }
        }

        InputAction::Show { input_id } => {
            let input = client.get_input(input_id).await?;
            let name = input
                .name
                .clone()
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| format!("Input #{}", input.id));
            println!("{} {}", format!("#{}", input.id).dimmed(), name.bold());
            println!("{}", input.text);
        }

        InputAction::Create { text, file, name } => {
            let text = resolve_text(text, file, "Input text")?;
            let input = client.create_input(&text, &name).await?;
            println!("{} Input #{} created", "✓".green(), input.id);
        }

        InputAction::Update {
            input_id,
            text,
            name,
        } => {
            if text.is_none() && name.is_none() {
                bail!("Nothing to update: pass --text or --name");
            }
            client
                .update_input(input_id, &UpdateInputRequest { text, name })
                .await?;
            println!("{} Input #{} updated", "✓".green(), input_id);
        }

        InputAction::Delete { input_id, yes } => {
            let question = format!("Are you sure you want to delete input #{}?", input_id);
            if !confirm_or_skip(&question, yes)? {
                return Ok(());
            }
            client.delete_input(input_id).await?;
            println!("{} Input #{} deleted", "✓".green(), input_id);
        }
    }
    Ok(())
}

async fn cmd_run(
    client: &ApiClient,
    text: Option<String>,
    file: Option<String>,
    model_ids: Vec<i64>,
    prompt_ids: Vec<i64>,
) -> Result<()> {
    if model_ids.is_empty() {
        bail!("Please select at least one model (-m <id>)");
    }
    if prompt_ids.is_empty() {
        bail!("Please select at least one prompt (-p <id>)");
    }
    let text = resolve_text(text, file, "Input text")?;
    if text.trim().is_empty() {
        bail!("Please enter some text");
    }

    // Disjoint startup loads, issued concurrently
    let (models, prompts) = tokio::join!(client.list_models(), client.list_prompts());
    let (models, prompts) = (models?, prompts?);
    build_selection(&models, &prompts, &model_ids, &prompt_ids)?;

    println!(
        "{}",
        format!(
            "Processing with {} models x {} prompts...",
            model_ids.len(),
            prompt_ids.len()
        )
        .dimmed()
    );
    let mut bundle = client
        .process_text(&text, &model_ids, &prompt_ids, None)
        .await
        .context("Error processing text")?;

    fill_names(&mut bundle, &models, &prompts);
    render::print_bundle(&BundleView::from_bundle(&bundle));
    Ok(())
}

#[allow(clippy::too_many_arguments)]
async fn cmd_batch(
    client: &ApiClient,
    config: &Config,
    set: Option<i64>,
    model_ids: Vec<i64>,
    prompt_ids: Vec<i64>,
    input_ids: Vec<i64>,
    sort: Option<SortKey>,
    desc: bool,
    filter: Option<String>,
    export: Option<Option<PathBuf>>,
) -> Result<()> {
    let set_id = resolve_input_set(client, config, set).await?;

    // Disjoint startup loads, issued concurrently
    let (models, prompts) = tokio::join!(client.list_models(), client.list_prompts());
    let (models, prompts) = (models?, prompts?);

    let mut selection = build_selection(&models, &prompts, &model_ids, &prompt_ids)?;
    selection.set_input_set(Some(set_id));
    if !input_ids.is_empty() {
        selection.set_input_mode(InputMode::Specific);
        for id in &input_ids {
            selection.choose_input(*id);
        }
    }

    if !selection.can_run() {
        if selection.model_ids().is_empty() {
            bail!("Please select at least one model (-m <id>)");
        }
        if selection.prompt_ids().is_empty() {
            bail!("Please select at least one prompt (-p <id>)");
        }
        bail!("Please select an input set");
    }

    let detail = client.get_input_set(set_id).await?;
    if detail.inputs.is_empty() {
        println!("The selected input set has no inputs");
        return Ok(());
    }

    let run_inputs: Vec<i64> = match selection.input_mode() {
        InputMode::All => detail.inputs.iter().map(|i| i.id).collect(),
        InputMode::Specific => {
            let chosen = selection.chosen_input_ids();
            let known: Vec<i64> = detail
                .inputs
                .iter()
                .map(|i| i.id)
                .filter(|id| chosen.contains(id))
                .collect();
            if known.is_empty() {
                bail!("None of the chosen inputs belong to input set #{}", set_id);
            }
            known
        }
    };

    println!(
        "{}",
        format!(
            "Running {} inputs x {} models x {} prompts...",
            run_inputs.len(),
            selection.model_ids().len(),
            selection.prompt_ids().len()
        )
        .dimmed()
    );

    let mut bundles = client
        .compare_prompts(
            &run_inputs,
            &selection.prompt_ids(),
            &selection.model_ids(),
            None,
        )
        .await
        .context("Error running batch evaluation")?;

    for bundle in &mut bundles {
        bundle.augment_from(&detail.inputs);
        fill_names(bundle, &models, &prompts);
    }
    sort_bundles_newest_first(&mut bundles);

    let mut rows = rows_from_bundles(bundles.iter().map(BundleView::from_bundle).collect());
    if let Some(needle) = &filter {
        apply_filter(&mut rows, needle);
    }
    if let Some(key) = sort {
        sort_rows(&mut rows, key, !desc);
    }

    render::print_grid(&rows);

    if let Some(path) = export {
        let path = path.unwrap_or_else(|| {
            PathBuf::from(export_filename(chrono::Local::now().date_naive()))
        });
        let csv = export_csv(&rows);
        fs::write(&path, csv).with_context(|| format!("Failed to write CSV to {:?}", path))?;
        println!("\n{} Results exported to {:?}", "✓".green(), path);
    }
    Ok(())
}

async fn cmd_compare(
    client: &ApiClient,
    config: &Config,
    set: Option<i64>,
    input_ids: Vec<i64>,
    model_ids: Vec<i64>,
    prompt_ids: Vec<i64>,
) -> Result<()> {
    if prompt_ids.is_empty() {
        bail!("Please select at least one prompt (-p <id>)");
    }
    if model_ids.is_empty() {
        bail!("Please select at least one model (-m <id>)");
    }

    let run_inputs = if !input_ids.is_empty() {
        input_ids
    } else {
        let set_id = resolve_input_set(client, config, set).await?;
        let detail = client.get_input_set(set_id).await?;
        if detail.inputs.is_empty() {
            bail!("Please select at least one input set or input");
        }
        detail.inputs.iter().map(|i| i.id).collect()
    };

    let bundles = client
        .compare_prompts(&run_inputs, &prompt_ids, &model_ids, None)
        .await
        .context("Error running comparison")?;

    if bundles.is_empty() {
        println!("No comparison results to display");
        return Ok(());
    }
    for (index, bundle) in bundles.iter().enumerate() {
        if index > 0 {
            println!();
        }
        render::print_comparison(&BundleView::from_bundle(bundle));
    }
    Ok(())
}

async fn cmd_history(
    client: &ApiClient,
    input_id: i64,
    timeline: bool,
    expand: bool,
    model: Option<i64>,
    prompt: Option<i64>,
) -> Result<()> {
    let history = client
        .get_input_history(input_id)
        .await
        .context("Error loading history")?;

    if history.input.is_none() {
        println!("Input not found");
        return Ok(());
    }
    let input = InputView::resolve(history.input.as_ref(), Some(input_id), None);

    if history.results.is_empty() {
        println!("{}", input.name.bold());
        println!("No history available for this input");
        return Ok(());
    }

    if timeline {
        let days = build_timeline(&history.results);
        render::print_timeline(&days, &input);
        return Ok(());
    }

    let (model_options, prompt_options) = filter_options(&history.results);
    let names = |options: &[(i64, String)]| {
        options
            .iter()
            .map(|(id, name)| format!("#{} {}", id, name))
            .collect::<Vec<_>>()
            .join(", ")
    };
    println!("{} {}", "Models:".dimmed(), names(&model_options).dimmed());
    println!("{} {}", "Prompts:".dimmed(), names(&prompt_options).dimmed());
    println!();

    let matrix = HistoryMatrix::build(&history.results, model, prompt);
    render::print_matrix(&matrix, &input, expand);
    Ok(())
}

async fn cmd_evaluate(
    client: &ApiClient,
    output_id: i64,
    quality: Quality,
    notes: Option<String>,
) -> Result<()> {
    let mut slot = EvaluationSlot::new(None);
    let output_id = slot.begin(Some(output_id), quality)?;

    let notes = notes.unwrap_or_default();
    match client.create_evaluation(output_id, quality, &notes).await {
        Ok(_) => {
            slot.complete();
            println!(
                "{} Evaluation saved: output #{} rated {}",
                "✓".green(),
                output_id,
                quality
            );
            Ok(())
        }
        Err(e) => {
            slot.fail();
            Err(e).context("Error saving evaluation")
        }
    }
}

async fn cmd_evaluations(client: &ApiClient) -> Result<()> {
    let evaluations = client.list_evaluations().await?;
    if evaluations.is_empty() {
        println!("No evaluations recorded");
        return Ok(());
    }
    println!("{}", "Evaluations:".bold());
    for evaluation in evaluations {
        let quality = evaluation.quality.to_string();
        let colored_quality = match evaluation.quality {
            Quality::Good => quality.green(),
            Quality::Ok => quality.yellow(),
            Quality::Bad => quality.red(),
        };
        let notes = evaluation
            .notes
            .as_deref()
            .filter(|n| !n.is_empty())
            .map(|n| render::truncate_string(n, 60))
            .unwrap_or_default();
        println!(
            "  output {} {} {}",
            format!("#{}", evaluation.output_id).dimmed(),
            colored_quality,
            notes.dimmed()
        );
    }
    Ok(())
}

fn cmd_config(action: Option<ConfigAction>) -> Result<()> {
    match action {
        None => {
            let config = Config::load()?;
            println!("{}", "Configuration:".bold());
            println!("  Path: {:?}", Config::config_path()?);
            println!("  Base URL: {}", config.base_url);
            println!(
                "  Default input set: {}",
                config
                    .default_input_set
                    .map(|id| format!("#{}", id))
                    .unwrap_or_else(|| "None".to_string())
                    .cyan()
            );
        }
        Some(ConfigAction::SetUrl { url }) => {
            let mut config = Config::load()?;
            config.base_url = url.trim_end_matches('/').to_string();
            config.save()?;
            println!("{} Base URL set to {}", "✓".green(), config.base_url);
        }
        Some(ConfigAction::SetDefaultSet { input_set_id }) => {
            let mut config = Config::load()?;
            config.default_input_set = Some(input_set_id);
            config.save()?;
            println!("{} Default input set set to #{}", "✓".green(), input_set_id);
        }
    }
    Ok(())
}
