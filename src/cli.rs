//! Command-line interface for portblock

use crate::allocator::PoolAllocator;
use crate::config::{PoolConfig, DEFAULT_HOST, DEFAULT_LIMIT};
use crate::range::RangeAllocator;
use crate::version::{platform, VERSION};
use clap::{Parser, Subcommand};
use log::{info, LevelFilter};
use serde::Serialize;
use std::error::Error;
use std::net::IpAddr;
use std::time::Duration;

/// CLI represents the command-line interface for portblock
pub struct CLI {
    app: App,
}

/// Reserve contiguous blocks of free TCP ports
#[derive(Parser)]
#[clap(version = VERSION, about = "Reserve contiguous blocks of free TCP ports")]
struct App {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the version number
    Version,

    /// Acquire a contiguous block of OS-free ports
    Acquire {
        /// Number of contiguous ports
        #[clap(short = 'n', long, default_value = "1")]
        count: usize,

        /// Seconds to keep retrying before giving up
        #[clap(short = 't', long, default_value = "5")]
        timeout: f64,

        /// Maximum number of reserved ports in the pool
        #[clap(short = 'l', long, default_value_t = DEFAULT_LIMIT)]
        limit: usize,

        /// Do not serialize attempts with a lock
        #[clap(long)]
        no_sync: bool,

        /// Maximum random pause between attempts in milliseconds
        #[clap(short = 'b', long)]
        backoff_ms: Option<u64>,

        /// Address to probe ports on
        #[clap(short = 'H', long, default_value_t = DEFAULT_HOST)]
        host: IpAddr,

        /// Keep retrying oversized requests until the timeout
        #[clap(long)]
        spin: bool,

        /// Print the result as JSON
        #[clap(long)]
        json: bool,

        /// Show debug logs (use -dd for trace logs)
        #[clap(short = 'd', long, action = clap::ArgAction::Count)]
        debug: u8,
    },

    /// Allocate ports sequentially from a fixed range
    Range {
        /// First port of the range
        #[clap(short = 's', long, default_value = "10000")]
        start: u16,

        /// Last port of the range (inclusive)
        #[clap(short = 'e', long, default_value = "10010")]
        end: u16,

        /// Number of ports to allocate
        #[clap(short = 'n', long, default_value = "1")]
        count: usize,

        /// Print the result as JSON
        #[clap(long)]
        json: bool,

        /// Show debug logs (use -dd for trace logs)
        #[clap(short = 'd', long, action = clap::ArgAction::Count)]
        debug: u8,
    },
}

/// JSON output of the acquire and range commands
#[derive(Serialize)]
struct PortsOutput<'a> {
    base: u16,
    ports: &'a [u16],
}

impl CLI {
    /// Creates a new CLI instance
    pub fn new() -> Self {
        CLI { app: App::parse() }
    }

    /// Executes the CLI application
    pub fn execute(&self) -> Result<(), Box<dyn Error>> {
        match &self.app.command {
            Commands::Version => {
                println!("portblock version {} {}", VERSION, platform());
                Ok(())
            }
            Commands::Acquire {
                count,
                timeout,
                limit,
                no_sync,
                backoff_ms,
                host,
                spin,
                json,
                debug,
            } => {
                self.init_logging(*debug);

                let mut config = PoolConfig::default()
                    .with_limit(*limit)
                    .with_synchronized(!no_sync)
                    .with_host(*host)
                    .with_fail_fast(!spin);

                if let Some(ms) = backoff_ms {
                    config = config.with_backoff(Duration::from_millis(*ms));
                }

                self.run_acquire(config, *count, *timeout, *json)
            }
            Commands::Range {
                start,
                end,
                count,
                json,
                debug,
            } => {
                self.init_logging(*debug);
                self.run_range(*start, *end, *count, *json)
            }
        }
    }

    /// Initialize logging with appropriate level
    fn init_logging(&self, debug_level: u8) {
        let level = match debug_level {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        };

        env_logger::Builder::new()
            .format_timestamp_millis()
            .filter_level(level)
            .init();
    }

    /// Acquire a block from a fresh pool allocator and print it
    fn run_acquire(
        &self,
        config: PoolConfig,
        count: usize,
        timeout: f64,
        json: bool,
    ) -> Result<(), Box<dyn Error>> {
        let timeout = Duration::try_from_secs_f64(timeout)
            .map_err(|e| format!("Invalid timeout {}: {}", timeout, e))?;

        let allocator = PoolAllocator::new(config);
        let block = allocator.acquire(count, timeout)?;

        info!(
            "Reserved {} port(s) from {} to {}",
            block.len(),
            block.base(),
            usize::from(block.base()) + block.len() - 1
        );

        print_ports(block.base(), block.ports(), json)
    }

    /// Allocate `count` ports from a range allocator and print them
    fn run_range(
        &self,
        start: u16,
        end: u16,
        count: usize,
        json: bool,
    ) -> Result<(), Box<dyn Error>> {
        if start > end {
            return Err(format!("Invalid range: {} > {}", start, end).into());
        }

        let allocator = RangeAllocator::new_from_range(start, end);
        let ports = (0..count)
            .map(|_| allocator.allocate(None))
            .collect::<Result<Vec<_>, _>>()?;

        let base = ports.iter().copied().min().unwrap_or(start);
        print_ports(base, &ports, json)
    }
}

impl Default for CLI {
    fn default() -> Self {
        Self::new()
    }
}

fn print_ports(base: u16, ports: &[u16], json: bool) -> Result<(), Box<dyn Error>> {
    if json {
        println!("{}", serde_json::to_string(&PortsOutput { base, ports })?);
    } else {
        for port in ports {
            println!("{}", port);
        }
    }
    Ok(())
}
