use anyhow::Result;
use clap::Parser;
use megprep::{prepare_participant, write_chunk, PrepConfig, Scaling, HCP_MEG_RATE};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "prep", about = "Load a participant's MEG task chunks and apply optional transforms")]
struct Args {
    /// Directory containing <task>_<participant>_<chunk>.safetensors files
    #[arg(long)]
    dir: PathBuf,

    /// Participant identifier, e.g. 105923
    #[arg(long)]
    participant: String,

    /// Per-node scaling: minmax | zscore
    #[arg(long)]
    scaling: Option<String>,

    /// Integer downsampling factor
    #[arg(long)]
    factor: Option<usize>,

    /// Target sampling rate in Hz (alternative to --factor)
    #[arg(long)]
    target_rate: Option<f64>,

    /// Original sampling rate in Hz
    #[arg(long, default_value_t = HCP_MEG_RATE)]
    orig_rate: f64,

    /// Downsampling method: stride | decimate
    #[arg(long, default_value = "stride")]
    method: String,

    /// Write one <task>.safetensors per present task into this directory
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let cfg = PrepConfig {
        scaling: args
            .scaling
            .as_deref()
            .map(|s| s.parse::<Scaling>())
            .transpose()?,
        factor: args.factor,
        target_rate: args.target_rate,
        orig_rate: args.orig_rate,
        method: args.method.parse()?,
    };

    let arrays = prepare_participant(&args.dir, &args.participant, &cfg)?;

    for (name, data) in arrays.tasks() {
        match data {
            Some(m) => println!("{name}: [{} x {}]", m.nrows(), m.ncols()),
            None => println!("{name}: absent"),
        }
    }

    if let Some(out_dir) = args.output {
        std::fs::create_dir_all(&out_dir)?;
        for (name, data) in arrays.tasks() {
            if let Some(m) = data {
                let path = out_dir.join(format!("{name}.{}", megprep::CHUNK_EXT));
                write_chunk(&path, name, m)?;
                println!("written → {}", path.display());
            }
        }
    }

    Ok(())
}
