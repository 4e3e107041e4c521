use blk_core::{
    parse_block, walk_main_chain, csv_out, ByteReader, ChainIndex, NullResolver, ParserConfig,
    ResolveByHash,
};
use blk_resolver::HttpResolver;
use clap::{Parser, Subcommand};
use log::{debug, info, warn};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

mod config;
use config::Config;

#[derive(Parser)]
#[command(name = "blk-cli")]
struct CliArgs {
    /// Path to the configuration file
    #[clap(short, long, default_value = "config.toml")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse blk<ordinal>.dat files in [start, end], build the chain index,
    /// walk it, and write the main-chain CSV manifest.
    Parse {
        start_file_ordinal: u32,
        end_file_ordinal: u32,
        output_csv_path: String,
    },
    /// Re-load an existing CSV index, re-open the referenced raw files at
    /// the recorded offsets, re-parse just those blocks, and verify the
    /// recomputed hash matches the CSV's `blockHashHex` column.
    Map { csv_path: String },
}

struct Orchestrator {
    config: Config,
    parser_config: ParserConfig,
}

impl Orchestrator {
    fn new(config: Config) -> Self {
        let mut parser_config = ParserConfig::default();
        if let Some(max) = config.network.max_output_value {
            parser_config.max_output_value = max;
        }
        Self {
            config,
            parser_config,
        }
    }

    fn block_file_path(&self, ordinal: u32) -> PathBuf {
        Path::new(&self.config.blocks_dir).join(format!("blk{ordinal:05}.dat"))
    }

    fn run_parse(&self, start: u32, end: u32, output_csv_path: &str) -> anyhow::Result<()> {
        let mut index = ChainIndex::new();
        let mut last_key = None;

        for ordinal in start..=end {
            let path = self.block_file_path(ordinal);
            let file_endpoint = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();

            let file = match File::open(&path) {
                Ok(f) => f,
                Err(e) => {
                    warn!("skipping {}: {e}", path.display());
                    continue;
                }
            };

            let mut reader = ByteReader::from_file(file);
            let mut block_number = 0u64;
            loop {
                match parse_block(&mut reader, &self.parser_config, &file_endpoint, block_number) {
                    Ok(block) => {
                        last_key = Some(block.summary.compressed_hash);
                        index.insert(block.summary);
                        block_number += 1;
                    }
                    Err(e) => {
                        debug!("stopped reading {file_endpoint} after {block_number} blocks: {e}");
                        break;
                    }
                }
            }
            info!("parsed {block_number} blocks from {file_endpoint}");
        }

        let Some(start_key) = last_key else {
            anyhow::bail!("no blocks were successfully parsed in the given file range");
        };

        let resolver: Box<dyn ResolveByHash> = match &self.config.resolver_endpoint {
            Some(endpoint) => Box::new(HttpResolver::new(Some(endpoint.clone()))),
            None => Box::new(NullResolver),
        };

        let records = walk_main_chain(&index, start_key, resolver.as_ref());
        info!("main-chain walk emitted {} records", records.len());

        let output = File::create(output_csv_path)?;
        csv_out::write_csv(output, &records)?;
        Ok(())
    }

    fn run_map(&self, csv_path: &str) -> anyhow::Result<()> {
        let input = File::open(csv_path)?;
        let rows = csv_out::read_csv(input)?;

        let mut mismatches = 0usize;
        for row in &rows {
            let path = Path::new(&self.config.blocks_dir).join(&row.file_endpoint);
            let mut file = File::open(&path)?;
            use std::io::Seek;
            file.seek(std::io::SeekFrom::Start(row.byte_offset))?;
            let mut reader = ByteReader::from_file(file);

            match parse_block(&mut reader, &self.parser_config, &row.file_endpoint, row.raw_block_number) {
                Ok(block) if block.block_hash == row.block_hash => {
                    debug!("verified {}", row.block_hash);
                }
                Ok(block) => {
                    mismatches += 1;
                    warn!(
                        "hash mismatch at {}:{}: expected {}, recomputed {}",
                        row.file_endpoint, row.byte_offset, row.block_hash, block.block_hash
                    );
                }
                Err(e) => {
                    mismatches += 1;
                    warn!("re-parse failed at {}:{}: {e}", row.file_endpoint, row.byte_offset);
                }
            }
        }

        if mismatches > 0 {
            anyhow::bail!("{mismatches} of {} rows failed verification", rows.len());
        }
        info!("verified all {} rows", rows.len());
        Ok(())
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let args = CliArgs::parse();

    let config = match Config::new(&args.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("failed to load config: {e:#}");
            return ExitCode::from(2);
        }
    };
    debug!("configuration loaded: {config:?}");

    let orchestrator = Orchestrator::new(config);

    let result = match args.command {
        Command::Parse {
            start_file_ordinal,
            end_file_ordinal,
            output_csv_path,
        } => orchestrator.run_parse(start_file_ordinal, end_file_ordinal, &output_csv_path),
        Command::Map { csv_path } => orchestrator.run_map(&csv_path),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("blk-cli: {e:#}");
            ExitCode::from(1)
        }
    }
}
