use anyhow::Result;
use clap::{Parser, Subcommand};
use prompt_enhancer::ai::openai::Credential;
use prompt_enhancer::{ui, Config, PromptEnhancer};
use std::io::{self, IsTerminal, Write};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "prompt-enhancer")]
#[command(about = "Rewrite image-generation prompts with a chat-completion model")]
struct CliArgs {
    /// Never ask for an API key on the terminal.
    #[arg(long)]
    no_prompt: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Add detail, lighting and style cues to a prompt.
    Enhance {
        prompt: String,
        #[arg(long, default_value = "photorealistic")]
        style: String,
        /// Enhancement intensity in percent.
        #[arg(long, default_value_t = 50, value_parser = clap::value_parser!(u32).range(0..=100))]
        intensity: u32,
    },
    /// Suggest better prompts given what the last image looked like.
    Improve {
        prompt: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value_t = 50, value_parser = clap::value_parser!(u32).range(0..=100))]
        intensity: u32,
    },
    /// Produce three stylistically different rewrites.
    Alternatives {
        prompt: String,
        #[arg(long, default_value = "creative")]
        variation: String,
    },
}

fn is_yes(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("y")
}

/// Print `prompt` to stderr and read one line; `None` on end of input.
fn read_line(prompt: &str) -> io::Result<Option<String>> {
    eprint!("{}", prompt);
    io::stderr().flush()?;

    let mut line = String::new();
    if io::stdin().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Ask for a key until one validates or the user skips. Returns whether a key was set.
async fn prompt_for_api_key(enhancer: &PromptEnhancer) -> io::Result<bool> {
    eprintln!("An OpenAI API key is required for prompt enhancement.");
    eprintln!("Get one from https://platform.openai.com/api-keys");
    eprintln!("The key is kept in memory only and never written to disk.");

    loop {
        let Some(line) = read_line("OpenAI API key (blank to skip): ")? else {
            return Ok(false);
        };

        let Some(credential) = Credential::new(&line) else {
            match read_line("No API key entered. Skip prompt enhancement? (y/n): ")? {
                Some(answer) if !is_yes(&answer) => continue,
                _ => return Ok(false),
            }
        };

        if !credential.has_expected_prefix() {
            match read_line("Key doesn't start with 'sk-'. Continue anyway? (y/n): ")? {
                Some(answer) if is_yes(&answer) => {}
                Some(_) => continue,
                None => return Ok(false),
            }
        }

        eprintln!("Validating API key...");
        if enhancer.set_api_key(credential.expose()).await {
            eprintln!("API key validated, prompt enhancement enabled.");
            return Ok(true);
        }

        eprintln!("Invalid API key. Please check it and try again.");
        match read_line("Skip API key setup? (y/n): ")? {
            Some(answer) if !is_yes(&answer) => continue,
            _ => return Ok(false),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "prompt_enhancer=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args = CliArgs::parse();

    let config = Config::from_env()?;
    let enhancer = PromptEnhancer::from_config(&config).await?;

    if !enhancer.is_api_key_set() {
        if !args.no_prompt && io::stdin().is_terminal() {
            if !prompt_for_api_key(&enhancer).await? {
                warn!("API key input skipped, prompt enhancement disabled");
            }
        } else {
            info!("No valid API key; set OPENAI_API_KEY to enable prompt enhancement");
        }
    }

    let output = match &args.command {
        Command::Enhance {
            prompt,
            style,
            intensity,
        } => ui::enhance_prompt_ui(&enhancer, prompt, style, *intensity).await,
        Command::Improve {
            prompt,
            description,
            intensity,
        } => ui::improve_image_prompt_ui(&enhancer, prompt, description, *intensity).await,
        Command::Alternatives { prompt, variation } => {
            ui::generate_alternative_prompt_ui(&enhancer, prompt, variation).await
        }
    };

    println!("{}", output);

    if !enhancer.is_api_key_set() {
        error!("Prompt enhancement is unavailable");
        std::process::exit(1);
    }
    Ok(())
}
