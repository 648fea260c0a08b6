// 地址规范化命令行工具
use std::io::{BufRead, Write};
use std::path::PathBuf;

use address_normalizer_lib::{AddressNormalizationConfig, AddressNormalizer};
use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "address-normalizer")]
#[command(about = "Normalizes free-text Russian postal addresses", long_about = None)]
struct Args {
    /// Path to config.json (defaults to the user config directory)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Default region, overrides the config file
    #[arg(long, value_name = "NAME")]
    region: Option<String>,

    /// Append the dictionary slice id after a tab
    #[arg(long)]
    slice: bool,

    /// Print the cleaned AST as JSON instead of the normalized address
    #[arg(long)]
    cleaned: bool,

    /// Addresses to normalize (read from stdin, one per line, when empty)
    addresses: Vec<String>,
}

fn main() -> Result<()> {
    // 初始化日志（输出到 stderr，避免混入结果）
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    // 1. 加载配置
    let mut config = match &args.config {
        Some(path) => AddressNormalizationConfig::load_from(path)?,
        None => AddressNormalizationConfig::load()?,
    };
    if let Some(region) = &args.region {
        config.default_region = Some(region.clone());
    }
    let normalizer = AddressNormalizer::new(config);

    // 2. 逐条处理
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if args.addresses.is_empty() {
        for line in std::io::stdin().lock().lines() {
            process(&normalizer, &args, &line?, &mut out)?;
        }
    } else {
        for address in &args.addresses {
            process(&normalizer, &args, address, &mut out)?;
        }
    }

    Ok(())
}

fn process(
    normalizer: &AddressNormalizer,
    args: &Args,
    raw_address: &str,
    out: &mut impl Write,
) -> Result<()> {
    if args.cleaned {
        let ast = normalizer.clean(raw_address);
        writeln!(out, "{}", serde_json::to_string(&ast)?)?;
        return Ok(());
    }

    match normalizer.normalize(raw_address) {
        Some(normalized) if args.slice => {
            let slice_id = normalizer.derive_slice_id(&normalized);
            writeln!(out, "{}\t{}", normalized, slice_id)?;
        }
        Some(normalized) => writeln!(out, "{}", normalized)?,
        None => {
            tracing::debug!("地址为空: {:?}", raw_address);
            writeln!(out, "-")?;
        }
    }

    Ok(())
}
