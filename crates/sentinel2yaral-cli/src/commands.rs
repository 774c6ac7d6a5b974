//! CLI command definitions and handlers

use anyhow::Result;
use clap::{Parser, Subcommand};
use sentinel2yaral_core::{
    clean_yaral_output, ConversionPrompt, RuleLibrary, SentinelRule, DEFAULT_RULES_DIR,
    MAX_REFERENCE_RULES,
};
use sentinel2yaral_llm::{
    GeminiClient, GeminiConfig, GenerationParams, LlmClient, AVAILABLE_MODELS, DEFAULT_REGIONS,
};
use std::path::PathBuf;

/// Main CLI structure
#[derive(Parser)]
#[command(name = "sentinel2yaral")]
#[command(about = "Convert Microsoft Sentinel detection rules to Chronicle YARA-L")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Google Cloud project id
    #[arg(long, env = "GCP_PROJECT", global = true)]
    pub project: Option<String>,

    /// OAuth2 access token for Vertex AI
    #[arg(long, env = "GCP_ACCESS_TOKEN", global = true, hide_env_values = true)]
    pub access_token: Option<String>,

    /// Directory holding bundled example rules
    #[arg(long, default_value = DEFAULT_RULES_DIR, global = true)]
    pub rules_dir: String,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Convert a Sentinel rule to YARA-L
    Convert {
        /// Sentinel rule YAML file
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Bundled example rule name
        #[arg(short, long)]
        example: Option<String>,

        /// Gemini model to use
        #[arg(short, long)]
        model: Option<String>,

        /// Sampling temperature (0.0 - 1.0)
        #[arg(long)]
        temperature: Option<f64>,

        /// Maximum output tokens (1000 - 8192)
        #[arg(long)]
        max_tokens: Option<u32>,

        /// Nucleus sampling threshold (0.0 - 1.0)
        #[arg(long)]
        top_p: Option<f64>,

        /// Write the YARA-L rule to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,
    },

    /// List bundled example rules
    Examples {
        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,
    },

    /// List available models and parameter defaults
    Models {
        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,
    },

    /// Start the web converter
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// Port to bind to
        #[arg(short, long, default_value = "3000")]
        port: u16,
    },

    /// Show tool information
    Info,
}

/// Output format options
#[derive(Clone, Debug, PartialEq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Command execution result
pub struct CommandResult {
    pub success: bool,
    pub message: String,
    pub data: Option<serde_json::Value>,
}

/// Execute CLI commands
pub struct CommandExecutor {
    project: Option<String>,
    access_token: Option<String>,
    rules_dir: String,
}

impl CommandExecutor {
    pub fn new(cli: &Cli) -> Self {
        Self {
            project: cli.project.clone(),
            access_token: cli.access_token.clone(),
            rules_dir: cli.rules_dir.clone(),
        }
    }

    /// Execute a CLI command
    pub async fn execute(&mut self, command: Commands) -> Result<CommandResult> {
        match command {
            Commands::Convert {
                file,
                example,
                model,
                temperature,
                max_tokens,
                top_p,
                output,
                format,
            } => {
                self.execute_convert(file, example, model, temperature, max_tokens, top_p, output, format)
                    .await
            }
            Commands::Examples { format } => self.execute_examples(format),
            Commands::Models { format } => self.execute_models(format),
            Commands::Serve { host, port } => self.execute_serve(host, port).await,
            Commands::Info => self.execute_info(),
        }
    }

    fn gemini_config(&self, model: Option<&str>) -> Result<GeminiConfig> {
        let project = self.project.clone().ok_or_else(|| {
            anyhow::anyhow!("Project ID must be provided via --project or GCP_PROJECT")
        })?;

        let mut config = GeminiConfig::new(&project);
        if let Some(model) = model {
            config = config.with_model(model);
        }
        if let Some(token) = &self.access_token {
            config = config.with_access_token(token);
        }
        Ok(config)
    }

    #[allow(clippy::too_many_arguments)]
    async fn execute_convert(
        &self,
        file: Option<PathBuf>,
        example: Option<String>,
        model: Option<String>,
        temperature: Option<f64>,
        max_tokens: Option<u32>,
        top_p: Option<f64>,
        output: Option<PathBuf>,
        format: OutputFormat,
    ) -> Result<CommandResult> {
        let library = RuleLibrary::load(&self.rules_dir)?;

        let rule = match (&file, &example) {
            (Some(path), None) => SentinelRule::from_yaml_file(path)?,
            (None, Some(name)) => library.get_required(name)?.clone(),
            _ => {
                return Err(anyhow::anyhow!(
                    "Exactly one of --file or --example must be specified"
                ))
            }
        };

        let defaults = GenerationParams::default();
        let params = GenerationParams {
            temperature: temperature.unwrap_or(defaults.temperature),
            max_output_tokens: max_tokens.unwrap_or(defaults.max_output_tokens),
            top_p: top_p.unwrap_or(defaults.top_p),
        };

        let client = GeminiClient::new(self.gemini_config(model.as_deref())?)?;
        let prompt = ConversionPrompt::new(&rule)
            .with_references(library.reference_rules(MAX_REFERENCE_RULES))
            .build()?;

        let raw = client.generate(&prompt, &params).await?;
        let yaral = clean_yaral_output(&raw);

        if let Some(path) = &output {
            std::fs::write(path, &yaral)?;
        } else if let Some(name) = &example {
            // Example conversions are persisted alongside their source
            let saved = library.save_converted(name, &yaral)?;
            eprintln!("Saved converted rule to {}", saved.display());
        }

        match format {
            OutputFormat::Text => println!("{}", yaral),
            OutputFormat::Json => println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "model": client.model(),
                    "yaral_rule": yaral,
                }))?
            ),
        }

        Ok(CommandResult {
            success: true,
            message: "Rule converted".to_string(),
            data: Some(serde_json::json!({ "yaral_rule": yaral })),
        })
    }

    fn execute_examples(&self, format: OutputFormat) -> Result<CommandResult> {
        let library = RuleLibrary::load(&self.rules_dir)?;

        let examples: Vec<serde_json::Value> = library
            .rule_names()
            .into_iter()
            .filter_map(|name| {
                let rule = library.get(&name)?;
                Some(serde_json::json!({
                    "name": name,
                    "display_name": rule.display_name(),
                    "severity": rule.severity(),
                }))
            })
            .collect();

        match format {
            OutputFormat::Text => {
                if examples.is_empty() {
                    println!("No example rules found in {}", self.rules_dir);
                }
                for example in &examples {
                    println!(
                        "{}  {}",
                        example["name"].as_str().unwrap_or_default(),
                        example["display_name"].as_str().unwrap_or("-")
                    );
                }
            }
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&examples)?),
        }

        Ok(CommandResult {
            success: true,
            message: format!("{} example rules", examples.len()),
            data: Some(serde_json::Value::Array(examples)),
        })
    }

    fn execute_models(&self, format: OutputFormat) -> Result<CommandResult> {
        let defaults = GenerationParams::default();
        let data = serde_json::json!({
            "models": AVAILABLE_MODELS,
            "default_model": AVAILABLE_MODELS[0],
            "default_params": defaults,
        });

        match format {
            OutputFormat::Text => {
                for model in AVAILABLE_MODELS {
                    if model == AVAILABLE_MODELS[0] {
                        println!("{} (default)", model);
                    } else {
                        println!("{}", model);
                    }
                }
                println!(
                    "defaults: temperature={} max_output_tokens={} top_p={}",
                    defaults.temperature, defaults.max_output_tokens, defaults.top_p
                );
            }
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&data)?),
        }

        Ok(CommandResult {
            success: true,
            message: "Available models listed".to_string(),
            data: Some(data),
        })
    }

    async fn execute_serve(&self, host: String, port: u16) -> Result<CommandResult> {
        use sentinel2yaral_api::{shutdown_signal, ConverterServer, ServerConfig};

        let config = ServerConfig {
            host: host.clone(),
            port,
            rules_dir: self.rules_dir.clone(),
        };
        let server = ConverterServer::with_config(config, self.gemini_config(None)?)?;

        println!("Starting converter on {}:{}", host, port);
        println!("Press Ctrl+C to stop");

        server.run_with_shutdown(shutdown_signal()).await?;

        Ok(CommandResult {
            success: true,
            message: "Server stopped".to_string(),
            data: None,
        })
    }

    fn execute_info(&self) -> Result<CommandResult> {
        println!("sentinel2yaral {}", env!("CARGO_PKG_VERSION"));
        println!("default model: {}", AVAILABLE_MODELS[0]);
        println!("failover regions: {}", DEFAULT_REGIONS.join(", "));
        println!("rules directory: {}", self.rules_dir);
        println!(
            "project: {}",
            self.project.as_deref().unwrap_or("(not configured)")
        );

        Ok(CommandResult {
            success: true,
            message: "Info displayed".to_string(),
            data: None,
        })
    }
}
