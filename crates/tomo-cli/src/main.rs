//! Tomo CLI - Companion chat and image generation
//!
//! Simple CLI for interacting with the Tomo API.

mod api;
mod config;

use anyhow::{bail, Context, Result};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use clap::{Parser, Subcommand};
use colored::Colorize;
use dialoguer::{Input, Password};
use std::fs;
use uuid::Uuid;

use api::{CreateCompanionRequest, ImageRequest, TomoClient};
use config::{Config, Profile};

#[derive(Parser)]
#[command(name = "tomo")]
#[command(about = "Tomo CLI - AI companion chat and image generation", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Login and store API key
    Login {
        /// API key (will prompt if not provided)
        #[arg(short, long)]
        key: Option<String>,
    },

    /// Manage profiles (companion shortcuts)
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },

    /// Companion management
    Companion {
        #[command(subcommand)]
        action: CompanionAction,
    },

    /// Chat with a companion (interactive when no message is given)
    Chat {
        /// One-shot message; omit for an interactive session
        message: Option<String>,
        /// Profile to use
        #[arg(short, long)]
        profile: Option<String>,
    },

    /// Show chat history
    History {
        /// Max messages to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
        /// Profile to use
        #[arg(short, long)]
        profile: Option<String>,
    },

    /// Scene operations
    Scene {
        #[command(subcommand)]
        action: SceneAction,
    },

    /// Generate an image of a companion
    Image {
        /// Extra prompt text (scene tags are appended automatically)
        prompt: Option<String>,
        /// Art style override: anime or realistic
        #[arg(short, long)]
        style: Option<String>,
        /// Sampling steps override
        #[arg(long)]
        steps: Option<u32>,
        /// CFG scale override
        #[arg(long)]
        cfg_scale: Option<f32>,
        /// Output file
        #[arg(short, long, default_value = "tomo-image.png")]
        output: String,
        /// Do not append scene tags to the prompt
        #[arg(long)]
        no_scene_tags: bool,
        /// Profile to use
        #[arg(short, long)]
        profile: Option<String>,
    },

    /// Show current configuration
    Config,
}

#[derive(Subcommand)]
enum ProfileAction {
    /// Add a new profile
    Add {
        /// Profile name (e.g., "yuki")
        name: String,
        /// Companion ID
        #[arg(long)]
        companion_id: String,
        /// Display name (optional)
        #[arg(long)]
        display_name: Option<String>,
    },
    /// List all profiles
    List,
    /// Set default profile
    Set {
        /// Profile name to set as default
        name: String,
    },
    /// Remove a profile
    Remove {
        /// Profile name to remove
        name: String,
    },
}

#[derive(Subcommand)]
enum CompanionAction {
    /// List all companions
    List,
    /// Create a companion (prompts for missing fields)
    Create {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        persona: Option<String>,
        #[arg(long)]
        appearance: Option<String>,
        /// Name the companion calls you
        #[arg(long)]
        user_name: Option<String>,
        /// Art style: anime (default) or realistic
        #[arg(long)]
        style: Option<String>,
    },
    /// Show a companion
    Show {
        /// Companion ID (or use --profile)
        id: Option<String>,
        #[arg(short, long)]
        profile: Option<String>,
    },
    /// Delete a companion
    Delete {
        /// Companion ID
        id: String,
    },
}

#[derive(Subcommand)]
enum SceneAction {
    /// Show the current scene
    Show {
        #[arg(short, long)]
        profile: Option<String>,
    },
    /// Reset the scene to defaults
    Wipe {
        #[arg(short, long)]
        profile: Option<String>,
    },
    /// Recompute the scene from recent history
    Analyze {
        #[arg(short, long)]
        profile: Option<String>,
    },
}

fn client(config: &Config) -> TomoClient {
    TomoClient::new(&config.base_url, config.api_key.as_deref().unwrap_or(""))
}

fn resolve_companion_id(config: &Config, profile: Option<&str>) -> Result<Uuid> {
    let (name, profile) = config
        .resolve_profile(profile)
        .context("No profile given and no default profile set. Run `tomo profile add` first.")?;
    profile
        .companion_id
        .parse()
        .with_context(|| format!("Profile '{}' has an invalid companion id", name))
}

fn print_scene(scene: &api::SceneResponse) {
    println!("  {} {}", "outfit:".bold(), scene.outfit);
    println!("  {} {}", "location:".bold(), scene.location);
    println!("  {} {}", "action:".bold(), scene.action);
    println!("  {} {}", "expression:".bold(), scene.expression);
    println!("  {} {}", "lighting:".bold(), scene.lighting);
    if !scene.visual_tags.is_empty() {
        println!("  {} {}", "tags:".bold(), scene.visual_tags.join(", "));
    }
    if !scene.is_user_present {
        println!("  {}", "(you are not present in the scene)".dimmed());
    }
}

fn or_prompt(value: Option<String>, prompt: &str) -> Result<String> {
    match value {
        Some(v) => Ok(v),
        None => Ok(Input::new().with_prompt(prompt).interact_text()?),
    }
}

/// Save a `data:image/png;base64,...` URI to a file
fn save_data_uri(data_uri: &str, output: &str) -> Result<()> {
    let encoded = data_uri
        .rsplit_once("base64,")
        .map(|(_, tail)| tail)
        .unwrap_or(data_uri);
    let bytes = BASE64
        .decode(encoded)
        .context("Server returned an undecodable image")?;
    fs::write(output, bytes).with_context(|| format!("Failed to write {}", output))?;
    Ok(())
}

async fn run_chat_message(client: &TomoClient, id: Uuid, message: &str) -> Result<()> {
    let turn = client.chat(id, message).await?;
    println!("{}", turn.reply.content.cyan());
    if !turn.scene_updated {
        if let Some(err) = turn.analysis_error {
            eprintln!("{} {}", "scene not updated:".yellow(), err.dimmed());
        }
    }
    Ok(())
}

async fn run_interactive_chat(client: &TomoClient, id: Uuid) -> Result<()> {
    let companion = client.get_companion(id).await?;
    println!(
        "{} (type {} to leave)",
        format!("Chatting with {}", companion.name).bold(),
        "exit".yellow()
    );

    loop {
        let line: String = Input::new()
            .with_prompt(companion.user_name.clone())
            .interact_text()?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed == "exit" || trimmed == "quit" {
            break;
        }
        let turn = client.chat(id, trimmed).await?;
        println!("{} {}", format!("{}:", companion.name).bold(), turn.reply.content.cyan());
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Login { key } => {
            let key = match key {
                Some(k) => k,
                None => Password::new().with_prompt("API key").interact()?,
            };
            let mut config = Config::load()?;
            config.api_key = Some(key);
            config.save()?;
            println!("{}", "API key saved.".green());

            if client(&config).health().await.unwrap_or(false) {
                println!("{}", "Connected to Tomo API.".green());
            } else {
                eprintln!(
                    "{} Could not reach {} - check base_url in {:?}",
                    "warning:".yellow(),
                    config.base_url,
                    Config::config_path()?
                );
            }
        }

        Commands::Profile { action } => {
            let mut config = Config::load()?;
            match action {
                ProfileAction::Add {
                    name,
                    companion_id,
                    display_name,
                } => {
                    companion_id
                        .parse::<Uuid>()
                        .context("companion_id must be a UUID")?;
                    config.profiles.insert(
                        name.clone(),
                        Profile {
                            companion_id,
                            name: display_name,
                        },
                    );
                    if config.default_profile.is_none() {
                        config.default_profile = Some(name.clone());
                    }
                    config.save()?;
                    println!("Profile {} added.", name.green());
                }
                ProfileAction::List => {
                    if config.profiles.is_empty() {
                        println!("No profiles. Add one with `tomo profile add`.");
                    }
                    for (name, profile) in &config.profiles {
                        let marker = if config.default_profile.as_deref() == Some(name) {
                            "*".green().to_string()
                        } else {
                            " ".to_string()
                        };
                        println!("{} {} -> {}", marker, name.bold(), profile.companion_id);
                    }
                }
                ProfileAction::Set { name } => {
                    if !config.profiles.contains_key(&name) {
                        bail!("Unknown profile: {}", name);
                    }
                    config.default_profile = Some(name.clone());
                    config.save()?;
                    println!("Default profile set to {}.", name.green());
                }
                ProfileAction::Remove { name } => {
                    if config.profiles.remove(&name).is_none() {
                        bail!("Unknown profile: {}", name);
                    }
                    if config.default_profile.as_deref() == Some(name.as_str()) {
                        config.default_profile = None;
                    }
                    config.save()?;
                    println!("Profile {} removed.", name);
                }
            }
        }

        Commands::Companion { action } => {
            let config = Config::load()?;
            let client = client(&config);
            match action {
                CompanionAction::List => {
                    let companions = client.list_companions().await?;
                    if companions.is_empty() {
                        println!("No companions yet. Create one with `tomo companion create`.");
                    }
                    for c in companions {
                        println!(
                            "{} {} ({}) - {}",
                            c.id.to_string().dimmed(),
                            c.name.bold(),
                            c.art_style,
                            c.scene.action
                        );
                    }
                }
                CompanionAction::Create {
                    name,
                    persona,
                    appearance,
                    user_name,
                    style,
                } => {
                    let request = CreateCompanionRequest {
                        name: or_prompt(name, "Companion name")?,
                        persona: or_prompt(persona, "Personality")?,
                        appearance: or_prompt(appearance, "Appearance")?,
                        user_name: or_prompt(user_name, "What should they call you?")?,
                        art_style: style,
                    };
                    let companion = client.create_companion(&request).await?;
                    println!(
                        "{} {} ({})",
                        "Created".green(),
                        companion.name.bold(),
                        companion.id
                    );
                    println!(
                        "Tip: {} to chat with them by name.",
                        format!(
                            "tomo profile add {} --companion-id {}",
                            companion.name.to_lowercase(),
                            companion.id
                        )
                        .yellow()
                    );
                }
                CompanionAction::Show { id, profile } => {
                    let id = match id {
                        Some(raw) => raw.parse().context("id must be a UUID")?,
                        None => resolve_companion_id(&config, profile.as_deref())?,
                    };
                    let c = client.get_companion(id).await?;
                    println!("{} ({})", c.name.bold(), c.art_style);
                    println!("{} {}", "persona:".bold(), c.persona);
                    println!("{} {}", "appearance:".bold(), c.appearance);
                    println!("{}", "scene:".bold());
                    print_scene(&c.scene);
                }
                CompanionAction::Delete { id } => {
                    let id: Uuid = id.parse().context("id must be a UUID")?;
                    client.delete_companion(id).await?;
                    println!("{}", "Companion deleted.".green());
                }
            }
        }

        Commands::Chat { message, profile } => {
            let config = Config::load()?;
            let client = client(&config);
            let id = resolve_companion_id(&config, profile.as_deref())?;
            match message {
                Some(message) => run_chat_message(&client, id, &message).await?,
                None => run_interactive_chat(&client, id).await?,
            }
        }

        Commands::History { limit, profile } => {
            let config = Config::load()?;
            let client = client(&config);
            let id = resolve_companion_id(&config, profile.as_deref())?;
            let mut logs = client.chat_history(id, limit).await?;
            logs.reverse(); // oldest first for reading
            for log in logs {
                let speaker = if log.role == "user" {
                    "you".bold().to_string()
                } else {
                    log.role.cyan().to_string()
                };
                println!("{}: {}", speaker, log.content);
            }
        }

        Commands::Scene { action } => {
            let config = Config::load()?;
            let client = client(&config);
            match action {
                SceneAction::Show { profile } => {
                    let id = resolve_companion_id(&config, profile.as_deref())?;
                    print_scene(&client.get_scene(id).await?);
                }
                SceneAction::Wipe { profile } => {
                    let id = resolve_companion_id(&config, profile.as_deref())?;
                    let scene = client.wipe_scene(id).await?;
                    println!("{}", "Scene reset.".green());
                    print_scene(&scene);
                }
                SceneAction::Analyze { profile } => {
                    let id = resolve_companion_id(&config, profile.as_deref())?;
                    let scene = client.analyze(id).await?;
                    println!("{}", "Scene refreshed.".green());
                    print_scene(&scene);
                }
            }
        }

        Commands::Image {
            prompt,
            style,
            steps,
            cfg_scale,
            output,
            no_scene_tags,
            profile,
        } => {
            let config = Config::load()?;
            let client = client(&config);
            let id = resolve_companion_id(&config, profile.as_deref())?;

            let request = ImageRequest {
                prompt: prompt.unwrap_or_default(),
                negative_prompt: None,
                style,
                steps,
                cfg_scale,
                use_scene_tags: !no_scene_tags,
            };

            println!("{}", "Generating image...".dimmed());
            let result = client.generate_image(id, &request).await?;

            if result.success {
                let image = result
                    .image
                    .context("Server reported success but sent no image")?;
                save_data_uri(&image, &output)?;
                println!("{} {}", "Saved".green(), output.bold());
            } else {
                bail!(
                    "Image generation failed: {}",
                    result.error.unwrap_or_else(|| "unknown error".to_string())
                );
            }
        }

        Commands::Config => {
            let config = Config::load()?;
            println!("{} {:?}", "config file:".bold(), Config::config_path()?);
            println!("{} {}", "base_url:".bold(), config.base_url);
            println!(
                "{} {}",
                "api_key:".bold(),
                if config.api_key.is_some() {
                    "set".green().to_string()
                } else {
                    "not set".red().to_string()
                }
            );
            println!(
                "{} {}",
                "default_profile:".bold(),
                config.default_profile.as_deref().unwrap_or("-")
            );
        }
    }

    Ok(())
}
