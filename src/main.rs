use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use ml_platformer::rl::{
    default_device, load_network, AgentConfig, FrameAgent, InferenceBackend, PolicyAgent,
};

#[derive(Parser)]
#[command(name = "ml_platformer")]
#[command(version, about = "Run a pretrained platformer policy over screen frames")]
struct Cli {
    /// What to do with the checkpoint
    #[arg(long, default_value = "act")]
    mode: Mode,

    /// Path to the model checkpoint (without extension)
    #[arg(long)]
    model: PathBuf,

    /// Number of discrete actions the checkpoint was trained against
    #[arg(long, default_value = "12")]
    action_count: usize,

    /// Frame images in tick order (act mode)
    frames: Vec<PathBuf>,
}

#[derive(Clone, ValueEnum)]
enum Mode {
    /// Feed frames through the agent and print one action index per tick
    Act,
    /// Print the checkpoint metadata
    Describe,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let device = default_device();

    match cli.mode {
        Mode::Act => {
            if cli.frames.is_empty() {
                bail!("no frame images supplied");
            }

            let config = AgentConfig::new(cli.action_count);
            let mut agent =
                FrameAgent::<InferenceBackend>::from_checkpoint(&cli.model, &config, device)?;
            log::info!(
                "loaded checkpoint {:?} ({} actions)",
                cli.model,
                cli.action_count
            );

            for (tick, path) in cli.frames.iter().enumerate() {
                let observation = image::open(path)
                    .with_context(|| format!("failed to open frame {:?}", path))?
                    .to_rgb8();
                let action = agent.act(observation)?;
                log::debug!("tick {} -> action {}", tick, action);
                println!("{}", action);
            }
        }
        Mode::Describe => {
            let (_, metadata) = load_network::<InferenceBackend>(&cli.model, &device)?;
            println!("{}", serde_json::to_string_pretty(&metadata)?);
        }
    }

    Ok(())
}
