use anyhow::{Context, bail};
use clap::{Parser, ValueEnum};
use seqguid::{GeneratorConfiguration, Layout, Optimization};

/// Output encoding for each generated identifier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Lowercase hyphenated text.
    #[default]
    Text,
    /// The 16 bytes the target engine stores, as 32 hex digits.
    StorageHex,
}

/// Generate database-friendly sequential GUIDs.
#[derive(Parser, Debug)]
#[command(name = "seqguid", version, about)]
pub struct CliArgs {
    /// Target storage engine (none, sql-server, sql-server-with-process-id,
    /// mysql, ravendb, oracle, as-string, as-binary, at-end)
    #[arg(long, short = 'o', env = "SEQGUID_OPTIMIZATION", default_value = "sql-server")]
    pub optimization: String,

    /// Number of identifiers to print
    #[arg(long, short = 'n', env = "SEQGUID_COUNT", default_value_t = 1)]
    pub count: usize,

    /// Which Ethernet-class adapter supplies the node bytes
    #[arg(long, env = "SEQGUID_WORKER_INDEX")]
    pub worker_index: Option<usize>,

    /// Embed the process id in the node bytes
    #[arg(long, env = "SEQGUID_USE_PROCESS_ID")]
    pub use_process_id: bool,

    /// Output encoding
    #[arg(long, value_enum, env = "SEQGUID_FORMAT", default_value_t = Format::Text)]
    pub format: Format,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CliConfig {
    pub optimization: Optimization,
    /// Generator configuration and layout; `None` for random identifiers.
    pub plan: Option<(GeneratorConfiguration, Layout)>,
    pub count: usize,
    pub format: Format,
}

impl TryFrom<CliArgs> for CliConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        let optimization: Optimization = args
            .optimization
            .parse()
            .context("invalid --optimization")?;

        if args.count == 0 {
            bail!("--count must be at least 1");
        }

        let plan = match optimization.plan() {
            Some((config, layout)) => {
                let config = GeneratorConfiguration::new(
                    args.worker_index.unwrap_or(config.worker_index),
                    args.use_process_id || config.use_process_id,
                );
                Some((config, layout))
            }
            None if args.worker_index.is_some() || args.use_process_id => {
                bail!("--worker-index and --use-process-id need a sequential optimization");
            }
            None => None,
        };

        Ok(Self {
            optimization,
            plan,
            count: args.count,
            format: args.format,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> anyhow::Result<CliConfig> {
        let argv = core::iter::once("seqguid").chain(args.iter().copied());
        let args = CliArgs::try_parse_from(argv)?;
        CliConfig::try_from(args)
    }

    #[test]
    fn defaults_to_sql_server() {
        let config = parse(&[]).unwrap();
        assert_eq!(config.optimization, Optimization::SqlServer);
        assert_eq!(
            config.plan,
            Some((GeneratorConfiguration::new(0, false), Layout::SqlServer))
        );
        assert_eq!(config.count, 1);
        assert_eq!(config.format, Format::Text);
    }

    #[test]
    fn overrides_apply_to_the_strategy() {
        let config = parse(&[
            "--optimization",
            "oracle",
            "--worker-index",
            "2",
            "--use-process-id",
            "-n",
            "5",
            "--format",
            "storage-hex",
        ])
        .unwrap();

        assert_eq!(
            config.plan,
            Some((GeneratorConfiguration::new(2, true), Layout::Binary))
        );
        assert_eq!(config.count, 5);
        assert_eq!(config.format, Format::StorageHex);
    }

    #[test]
    fn random_ids_have_no_plan() {
        let config = parse(&["-o", "none"]).unwrap();
        assert_eq!(config.plan, None);
    }

    #[test]
    fn rejects_zero_count() {
        assert!(parse(&["--count", "0"]).is_err());
    }

    #[test]
    fn rejects_unknown_optimization() {
        let err = parse(&["-o", "cassandra"]).unwrap_err();
        assert!(format!("{err:#}").contains("cassandra"));
    }

    #[test]
    fn rejects_node_options_for_random_ids() {
        assert!(parse(&["-o", "none", "--worker-index", "1"]).is_err());
    }
}
