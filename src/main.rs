//! merkle CLI - command line interface for merkle_commit
//!
//! Hashes items, builds trees, and derives / verifies inclusion proofs.
//! All results are printed as JSON on stdout; logs go to stderr.

use clap::{Parser, Subcommand};
use merkle_commit::{
    hash, verify_proof_with, Config, Digest, MerkleTree, OutputFormat, PairEncoding, ProofPath,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "merkle")]
#[command(about = "SHA-256 merkle commitments and inclusion proofs")]
#[command(version)]
struct Cli {
    /// Output format (json or text); overrides the config file
    #[arg(short, long)]
    format: Option<FormatArg>,

    /// How child digests are combined (raw bytes or hex text); overrides the config file
    #[arg(short, long)]
    encoding: Option<EncodingArg>,

    /// Path to the config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
enum FormatArg {
    Json,
    Text,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Text => OutputFormat::Text,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
enum EncodingArg {
    Raw,
    Hex,
}

impl From<EncodingArg> for PairEncoding {
    fn from(arg: EncodingArg) -> Self {
        match arg {
            EncodingArg::Raw => PairEncoding::Raw,
            EncodingArg::Hex => PairEncoding::Hex,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default config file
    Init,

    /// Hash a string or a file
    Hash {
        /// The string to hash
        #[arg(required_unless_present = "file")]
        input: Option<String>,
        /// Hash the contents of this file instead
        #[arg(long, conflicts_with = "input")]
        file: Option<PathBuf>,
    },

    /// Build a tree and print its root
    Root {
        /// Items are hex leaf digests rather than raw data
        #[arg(long)]
        leaves: bool,
        /// Items, in order
        #[arg(required = true)]
        items: Vec<String>,
    },

    /// Derive the inclusion proof for one leaf
    Proof {
        /// Leaf index (0-based)
        #[arg(short, long, allow_negative_numbers = true)]
        index: i64,
        /// Items are hex leaf digests rather than raw data
        #[arg(long)]
        leaves: bool,
        /// Items, in order
        #[arg(required = true)]
        items: Vec<String>,
    },

    /// Verify an inclusion proof against a root
    Verify {
        /// Leaf digest (hex)
        #[arg(long)]
        leaf: String,
        /// Expected root digest (hex)
        #[arg(long)]
        root: String,
        /// Proof as JSON, or @path to a JSON file
        #[arg(long)]
        proof: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // init rewrites the config file, so an unreadable one must not stop it
    let (config, unreadable) = match Config::resolve(cli.config.as_deref()) {
        Ok(config) => (config, None),
        Err(e) if matches!(cli.command, Commands::Init) => (Config::default(), Some(e)),
        Err(e) => return Err(e.into()),
    };
    init_tracing(&config.log_level);
    if let Some(e) = unreadable {
        tracing::warn!(error = %e, "replacing unreadable config with defaults");
    }

    let encoding = cli.encoding.map(PairEncoding::from).unwrap_or(config.encoding);
    let format = cli.format.map(OutputFormat::from).unwrap_or(config.format);

    match cli.command {
        Commands::Init => {
            let path = match cli.config {
                Some(path) => path,
                None => Config::default_path()
                    .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?,
            };
            config.save(&path)?;
            output(
                format,
                &serde_json::json!({
                    "status": "ok",
                    "message": format!("Wrote config to {}", path.display())
                }),
            )?;
        }

        Commands::Hash { input, file } => {
            let digest = match (input, file) {
                (_, Some(path)) => hash(std::fs::read(&path)?),
                (Some(input), None) => hash(input),
                (None, None) => anyhow::bail!("Nothing to hash"),
            };
            output(format, &serde_json::json!({ "digest": digest }))?;
        }

        Commands::Root { leaves, items } => {
            let tree = MerkleTree::build_with(to_leaves(&items, leaves)?, encoding)?;
            let levels: Vec<usize> = tree.levels().iter().map(Vec::len).collect();
            output(
                format,
                &serde_json::json!({
                    "root": tree.root(),
                    "leaf_count": tree.leaf_count(),
                    "levels": levels,
                    "encoding": encoding
                }),
            )?;
        }

        Commands::Proof {
            index,
            leaves,
            items,
        } => {
            let tree = MerkleTree::build_with(to_leaves(&items, leaves)?, encoding)?;
            let leaf_index =
                usize::try_from(index).map_err(|_| merkle_commit::Error::IndexOutOfRange {
                    index,
                    leaf_count: tree.leaf_count(),
                })?;
            let proof = tree.get_proof(leaf_index)?;
            let leaf = tree.leaf(leaf_index).copied();
            output(
                format,
                &serde_json::json!({
                    "index": leaf_index,
                    "leaf": leaf,
                    "root": tree.root(),
                    "encoding": encoding,
                    "proof": proof
                }),
            )?;
        }

        Commands::Verify { leaf, root, proof } => {
            let leaf = Digest::from_hex(&leaf)?;
            let root = Digest::from_hex(&root)?;
            let proof = read_proof(&proof)?;
            let valid = verify_proof_with(&leaf, &proof, &root, encoding);
            output(
                format,
                &serde_json::json!({
                    "valid": valid,
                    "steps": proof.len()
                }),
            )?;
        }
    }

    Ok(())
}

fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

fn to_leaves(items: &[String], as_digests: bool) -> anyhow::Result<Vec<Digest>> {
    if as_digests {
        Ok(items
            .iter()
            .map(|item| Digest::from_hex(item))
            .collect::<merkle_commit::Result<_>>()?)
    } else {
        Ok(items.iter().map(hash).collect())
    }
}

/// Parse a proof given inline as JSON or as `@path`
fn read_proof(arg: &str) -> anyhow::Result<ProofPath> {
    let json = match arg.strip_prefix('@') {
        Some(path) => std::fs::read_to_string(Path::new(path))?,
        None => arg.to_string(),
    };
    Ok(serde_json::from_str(&json)?)
}

fn output(format: OutputFormat, value: &serde_json::Value) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string(value)?);
        }
        OutputFormat::Text => {
            println!("{}", serde_json::to_string_pretty(value)?);
        }
    }
    Ok(())
}
