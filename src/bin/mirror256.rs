//! Mirror256 CLI
//!
//! Hash text, hex or files, walk a digest back through the inverse path, or time the hasher.

use std::io::Read;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rand::{distributions::Alphanumeric, Rng};
use tracing::info;
use tracing_subscriber::EnvFilter;

use mirror256::encoding::Iv;
use mirror256::mirror256::{Config, Mirror256};

#[derive(Parser)]
#[command(name = "mirror256")]
#[command(about = "Reversible Toffoli/Fredkin gate-network digest", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Derive the IV from this seed instead of the cube-root constants
    #[arg(long, global = true)]
    seed: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the digest of each input (stdin when none is given)
    Hash {
        /// Text to hash, UTF-8 encoded
        #[arg(value_name = "TEXT")]
        texts: Vec<String>,

        /// Hex-encoded bytes to hash
        #[arg(long, value_name = "HEX")]
        hex: Vec<String>,

        /// Files to hash
        #[arg(short, long, value_name = "FILE")]
        file: Vec<PathBuf>,
    },
    /// Hash a message while logging its encoding chain, then recover it from the digest
    Roundtrip {
        #[arg(value_name = "TEXT")]
        text: String,
    },
    /// Hash random 32-character messages for a while and report the rate
    Bench {
        #[arg(long, default_value_t = 1)]
        seconds: u64,
    },
}

fn config(seed: &Option<String>, record_chain: bool) -> Config {
    Config {
        iv: match seed {
            Some(s) => Iv::Seeded(s.as_bytes().to_vec()),
            None => Iv::Standard,
        },
        record_chain,
    }
}

fn hash(cfg: Config, texts: &[String], hexes: &[String], files: &[PathBuf]) -> Result<()> {
    if texts.is_empty() && hexes.is_empty() && files.is_empty() {
        let mut h = Mirror256::with_config(cfg);
        let mut buffer = [0u8; 64 * 1024];
        let mut stdin = std::io::stdin().lock();
        loop {
            let n = stdin.read(&mut buffer)?;
            if n == 0 {
                break;
            }
            h.update(&buffer[..n])?;
        }
        println!("{}  -", h.hexdigest());
        return Ok(());
    }

    for text in texts {
        let mut h = Mirror256::with_config(cfg.clone());
        h.update(text)?;
        println!("{}  {:?}", h.hexdigest(), text);
    }

    for hex in hexes {
        let mut h = Mirror256::with_config(cfg.clone());
        h.update_hex(hex)
            .with_context(|| format!("Failed to decode hex input: {}", hex))?;
        println!("{}  0x{}", h.hexdigest(), hex);
    }

    for path in files {
        let mut file = std::fs::File::open(path)
            .with_context(|| format!("Failed to open: {}", path.display()))?;
        let mut h = Mirror256::with_config(cfg.clone());
        let mut buffer = [0u8; 64 * 1024];
        loop {
            let n = file.read(&mut buffer)?;
            if n == 0 {
                break;
            }
            h.update(&buffer[..n])?;
        }
        println!("{}  {}", h.hexdigest(), path.display());
    }

    Ok(())
}

fn roundtrip(cfg: Config, text: &str) -> Result<()> {
    let mut h = Mirror256::with_config(cfg);
    h.update(text)?;
    let digest = h.hexdigest();
    let blocks = h.chain().map(|c| c.len()).unwrap_or(0);

    let recovered = h.recover_message()?;
    let matches = recovered == text.as_bytes();
    println!("Message:   {:?}", text);
    println!("Digest:    {}", digest);
    println!("Blocks:    {}", blocks);
    println!("Recovered: {:?}", String::from_utf8_lossy(&recovered));
    println!("Match:     {}", matches);

    anyhow::ensure!(matches, "inverse path did not reproduce the message");
    Ok(())
}

fn bench(cfg: Config, seconds: u64) -> Result<()> {
    let mut rng = rand::thread_rng();
    let budget = Duration::from_secs(seconds);
    let start = Instant::now();
    let mut count = 0u64;

    while start.elapsed() < budget {
        let msg: String = (&mut rng)
            .sample_iter(&Alphanumeric)
            .take(32)
            .map(char::from)
            .collect();
        let mut h = Mirror256::with_config(cfg.clone());
        h.update(&msg)?;
        h.hexdigest();
        count += 1;
    }

    let rate = count as f64 / start.elapsed().as_secs_f64();
    info!(count, seconds, "bench finished");
    println!("{:.0} hashes per second", rate);
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Hash { texts, hex, file } => hash(config(&cli.seed, false), texts, hex, file)?,
        Commands::Roundtrip { text } => roundtrip(config(&cli.seed, true), text)?,
        Commands::Bench { seconds } => bench(config(&cli.seed, false), *seconds)?,
    }

    Ok(())
}
